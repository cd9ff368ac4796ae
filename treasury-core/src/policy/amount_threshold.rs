//! Amount-threshold policy: contributes a required signature count that
//! escalates with transaction size.

use super::PolicyOutcome;
use crate::models::transaction::Transaction;

/// A half-open `[min, max)` amount bracket and the signature threshold it
/// contributes. The last range in the sorted list is treated as open-ended:
/// its `max` is ignored for amounts that exceed every bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
    pub threshold: u32,
}

impl AmountRange {
    pub fn new(min: f64, max: f64, threshold: u32) -> Self {
        Self { min, max, threshold }
    }

    fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount < self.max
    }
}

/// Never rejects a transaction outright; it only ever *contributes* a
/// required signature count for the manager to fold into the proposal's
/// overall threshold.
#[derive(Debug, Clone)]
pub struct AmountThresholdPolicy {
    policy_id: String,
    enabled: bool,
    ranges: Vec<AmountRange>,
}

impl AmountThresholdPolicy {
    /// `ranges` need not be pre-sorted; they are sorted by `min` here.
    pub fn new(policy_id: impl Into<String>, mut ranges: Vec<AmountRange>) -> Self {
        ranges.sort_by(|a, b| a.min.partial_cmp(&b.min).unwrap_or(std::cmp::Ordering::Equal));
        Self {
            policy_id: policy_id.into(),
            enabled: true,
            ranges,
        }
    }

    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The bracket containing `amount`, or the last (highest) bracket if
    /// `amount` exceeds every configured upper bound, or a default of 2 if
    /// no ranges were configured at all.
    pub(super) fn validate(&self, transaction: &Transaction) -> PolicyOutcome {
        let amount = transaction.amount();
        let threshold = self
            .ranges
            .iter()
            .find(|r| r.contains(amount))
            .map(|r| r.threshold)
            .or_else(|| self.ranges.last().map(|r| r.threshold))
            .unwrap_or(2);
        PolicyOutcome {
            time_lock_contribution: None,
            threshold_contribution: Some(threshold),
        }
    }
}
