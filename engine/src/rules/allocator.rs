//! Deterministic budget allocation.
//!
//! A greedy pass by priority class: claims are visited in ascending income
//! tier rank (LOW first), earliest timestamp first within a tier, and each
//! claim is approved while the running budget covers it, otherwise blocked.
//! The goal is overspend avoidance, not value maximization - this is not an
//! optimal-value knapsack.
//!
//! # Critical Invariants
//!
//! - Approved amounts never sum beyond the supplied budget
//! - Already-blocked claims are terminal for the pass and budget-exempt
//! - The returned collection preserves the original record ordering

use crate::models::record::{LedgerRecord, RecordStatus};
use serde::Serialize;

/// Rule name under which the allocator annotates records
pub const BUDGET_RULE: &str = "budget-allocation";

/// Audit note attached to claims blocked by the budget pass
pub const BUDGET_REJECTION_NOTE: &str =
    "Rejected by deterministic budget rule: remaining allocation insufficient for this claim";

/// Result of one allocation pass
#[derive(Debug, Clone, Serialize)]
pub struct AllocationOutcome {
    /// Updated records, in the original collection order
    pub records: Vec<LedgerRecord>,

    /// Budget left over after the pass
    pub remaining_budget: i64,

    /// Claims approved by this pass
    pub approved: usize,

    /// Claims newly blocked by this pass
    pub blocked: usize,
}

/// Run the budget pass over a batch
///
/// Negative budgets are treated as 0. Ordering within the pass is fully
/// deterministic: tier rank, then timestamp, then record ID as the final
/// tie-break.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use welfare_ledger_core_rs::{allocate, IncomeTier, LedgerRecord, RecordStatus};
///
/// let now = Utc::now();
/// let make = |id: &str, tier: IncomeTier, amount: i64| {
///     LedgerRecord::new(
///         id.to_string(),
///         format!("CIT-{id}"),
///         "PM-AWAS".to_string(),
///         "RG-01".to_string(),
///         tier,
///         amount,
///         now,
///         "0000000000000000".to_string(),
///         "cccccccccccc".to_string(),
///     )
/// };
///
/// let batch = vec![
///     make("TXN-0001", IncomeTier::High, 1_000),
///     make("TXN-0002", IncomeTier::Low, 1_000),
/// ];
///
/// let outcome = allocate(batch, 1_000);
/// assert_eq!(outcome.records[1].status(), RecordStatus::Approved); // LOW wins
/// assert_eq!(outcome.records[0].status(), RecordStatus::Blocked);
/// assert_eq!(outcome.remaining_budget, 0);
/// ```
pub fn allocate(records: Vec<LedgerRecord>, budget: i64) -> AllocationOutcome {
    let mut records = records;

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        let left = &records[a];
        let right = &records[b];
        left.income_tier()
            .rank()
            .cmp(&right.income_tier().rank())
            .then_with(|| left.timestamp().cmp(&right.timestamp()))
            .then_with(|| left.id().cmp(right.id()))
    });

    let mut remaining = budget.max(0);
    let mut approved = 0;
    let mut blocked = 0;

    for index in order {
        let record = &mut records[index];
        if record.status() == RecordStatus::Blocked {
            continue;
        }

        if remaining >= record.amount() {
            remaining -= record.amount();
            record.set_status(RecordStatus::Approved);
            approved += 1;
        } else {
            record.set_status(RecordStatus::Blocked);
            record.annotate(BUDGET_RULE, BUDGET_REJECTION_NOTE);
            blocked += 1;
        }
    }

    AllocationOutcome {
        records,
        remaining_budget: remaining,
        approved,
        blocked,
    }
}
