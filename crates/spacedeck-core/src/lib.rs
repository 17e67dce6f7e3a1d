//! spacedeck-core: Spaced-repetition scheduling for a flashcard trainer.
//!
//! This crate holds the item model, the review backoff, study queue
//! construction, the in-session state machine, and the item store that owns
//! every status transition, plus versioned snapshot persistence.

pub mod error;
pub mod model;
pub mod practice;
pub mod queue;
pub mod schedule;
pub mod seed;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod traits;

pub use model::{Item, ItemKind, Status};
pub use queue::{build_queue, QueueRequest, ReviewPolicy};
pub use schedule::{next_review_time, Clock, SystemClock};
pub use session::{SessionPhase, StudySession};
pub use snapshot::{JsonFileStore, MemoryStore, Snapshot, SnapshotStore};
pub use store::ItemStore;
