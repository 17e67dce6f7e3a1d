//! Error types for the item catalog and snapshot persistence.
//!
//! Status transitions and the session state machine never fail. These errors
//! only cover catalog edits with bad input and the fallible layer underneath
//! the snapshot store, which callers normally see through the infallible
//! [`SnapshotStore`](crate::snapshot::SnapshotStore) trait.

use thiserror::Error;

/// Errors from adding or removing items in the [`ItemStore`](crate::store::ItemStore).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The prompt or answer text was empty after trimming.
    #[error("{field} text must not be empty")]
    EmptyText { field: &'static str },

    /// No item with this identifier exists in the pool.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The identifier counter cannot advance any further.
    #[error("no item identifiers left")]
    IdsExhausted,
}

/// Errors while reading or writing a persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The backing file could not be read or written.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The document was not valid JSON or did not match the schema.
    #[error("snapshot is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document's schema version is neither current nor migratable.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(i64),
}
