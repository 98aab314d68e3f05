//! Rule components
//!
//! The only two writers of record status after creation:
//! - **cluster**: cross-region duplicate-identity detection, which holds
//!   flagged citizens' claims for review
//! - **allocator**: the deterministic tier-prioritized budget pass, which
//!   approves or blocks claims against a budget
//!
//! Both operate on an owned working copy and hand the updated collection
//! back to the coordinator, which replaces the batch wholesale.

pub mod allocator;
pub mod cluster;

// Re-exports
pub use allocator::{allocate, AllocationOutcome, BUDGET_REJECTION_NOTE};
pub use cluster::{apply_cross_region_rule, detect_clusters, CROSS_REGION_NOTE};
