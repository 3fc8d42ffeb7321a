//! Identifier generation.
//!
//! Task IDs are generated from the name by:
//! 1. Converting to lowercase
//! 2. Replacing non-alphanumeric characters with hyphens
//! 3. Collapsing multiple hyphens
//! 4. Trimming leading/trailing hyphens
//! 5. Appending 8 random hex characters
//!
//! Ledger entry IDs are opaque: a fixed prefix plus 16 random hex
//! characters. Uniqueness is the only hard requirement; the primary key
//! backstops the (vanishing) collision chance.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Global counter for deterministic ID generation in tests.
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Whether to use deterministic IDs (for testing).
static USE_DETERMINISTIC_IDS: AtomicBool = AtomicBool::new(false);

/// Enable deterministic ID generation for testing.
///
/// When enabled, suffixes count up from zero instead of being random.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(true, Ordering::SeqCst);
    TEST_COUNTER.store(0, Ordering::SeqCst);
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(false, Ordering::SeqCst);
}

/// Convert a task name to a slug.
///
/// Lowercases, replaces runs of non-alphanumeric characters with a single
/// hyphen, trims hyphens at both ends, and truncates to 50 characters.
#[must_use]
pub fn slugify(name: &str) -> String {
    slugify_with_max_len(name, 50)
}

/// Convert a task name to a slug with a custom maximum length.
#[must_use]
pub fn slugify_with_max_len(name: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // Start true to avoid leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    if slug.len() > max_len {
        slug.truncate(max_len);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Generate `chars` random hex characters.
#[allow(clippy::cast_possible_truncation)]
fn random_hex(chars: usize) -> String {
    if USE_DETERMINISTIC_IDS.load(Ordering::SeqCst) {
        let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        return format!("{count:0chars$x}");
    }

    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    // Truncation is intentional - we only need entropy, not precision
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64),
    );

    let mut out = String::with_capacity(chars + 16);
    while out.len() < chars {
        let word = hasher.finish();
        out.push_str(&format!("{word:016x}"));
        hasher.write_u64(word);
    }
    out.truncate(chars);
    out
}

/// Generate a task ID from a name.
///
/// The ID is the slugified name plus an 8-character random hex suffix.
#[must_use]
pub fn task_id(name: &str) -> String {
    let slug = slugify(name);
    let suffix = random_hex(8);

    if slug.is_empty() {
        format!("task-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

/// Generate an opaque ledger entry ID.
#[must_use]
pub fn entry_id() -> String {
    format!("evt-{}", random_hex(16))
}
