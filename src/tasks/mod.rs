//! Task records and their repository.
//!
//! Tasks are classified into the four Eisenhower quadrants. This module
//! provides:
//! - The [`Task`] model and its enums ([`Quadrant`], [`Priority`],
//!   [`Status`])
//! - Slug-based id generation
//! - [`TaskRepository`], the store owning the `tasks` collection with
//!   quadrant-scoped queries
//!
//! Composite operations (create/move/complete/delete with their ledger
//! and analytics side effects) live in [`crate::matrix`].

pub mod id;
pub mod models;
pub mod repo;

pub use models::{
    InvalidPriority, InvalidQuadrant, InvalidStatus, NewTask, Priority, Quadrant, Status, Task,
};
pub use repo::TaskRepository;
