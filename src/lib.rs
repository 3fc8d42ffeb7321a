//! # `eisenhower`
//!
//! Persistence core for an Eisenhower-matrix task prioritizer: tasks
//! classified into four priority quadrants, an append-only ledger of
//! every mutation, and per-day usage counters, all stored in a single
//! local `SQLite` database.
//!
//! The entry point is [`matrix::Matrix`], which runs each composite
//! operation (create, update, delete, move, complete) as an ordered
//! sequence of single-collection steps.

pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod matrix;
pub mod oplog;
pub mod paths;
pub mod stats;
pub mod tasks;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
pub use matrix::Matrix;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
