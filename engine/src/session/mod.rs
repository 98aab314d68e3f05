//! Session coordinator - the sole mutation entry point
//!
//! Owns the single in-memory record collection and the system-state
//! singleton, and orchestrates the rule components on every mutating
//! operation. See `engine.rs` for the coordinator, `snapshot.rs` for the
//! persisted session surface.

pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use engine::{
    AllocationSummary, FundRequest, SessionConfig, SessionCoordinator, SessionError, SessionMode,
};
pub use snapshot::{SessionSnapshot, SnapshotError};
