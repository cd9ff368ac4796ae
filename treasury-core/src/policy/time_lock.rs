//! Time-lock policy: contributes a minimum delay before a proposal becomes
//! executable, scaled by the transaction amount.

use super::{PolicyContext, PolicyOutcome};
use crate::models::category::Category;
use crate::models::transaction::Transaction;
use std::collections::BTreeMap;

const DEFAULT_BASE_LOCK_SECONDS: i64 = 3_600;
const DEFAULT_AMOUNT_FACTOR: f64 = 1_000.0;

/// Never rejects a transaction outright; it only ever *contributes* a
/// time-lock duration for the manager to fold into the proposal's overall
/// required delay.
#[derive(Debug, Clone)]
pub struct TimeLockPolicy {
    policy_id: String,
    enabled: bool,
    base_lock_duration_seconds: BTreeMap<Category, i64>,
    default_base_lock_duration_seconds: i64,
    amount_factor: f64,
}

impl TimeLockPolicy {
    pub fn new(policy_id: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            enabled: true,
            base_lock_duration_seconds: BTreeMap::new(),
            default_base_lock_duration_seconds: DEFAULT_BASE_LOCK_SECONDS,
            amount_factor: DEFAULT_AMOUNT_FACTOR,
        }
    }

    pub fn with_category_lock(mut self, category: Category, seconds: i64) -> Self {
        self.base_lock_duration_seconds.insert(category, seconds);
        self
    }

    pub fn with_amount_factor(mut self, amount_factor: f64) -> Self {
        self.amount_factor = amount_factor;
        self
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

    /// Base delay plus one base-interval per `amount_factor` units of spend.
    pub(super) fn validate(&self, transaction: &Transaction, ctx: &PolicyContext) -> PolicyOutcome {
        let base = self
            .base_lock_duration_seconds
            .get(&ctx.category)
            .copied()
            .unwrap_or(self.default_base_lock_duration_seconds);
        let scale_steps = (transaction.amount() / self.amount_factor).floor().max(0.0) as i64;
        PolicyOutcome {
            time_lock_contribution: Some(base + scale_steps * DEFAULT_BASE_LOCK_SECONDS),
            threshold_contribution: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::signature::Signature;
    use crate::models::transaction::TransactionType;
    use crate::policy::ValidationPhase;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn tx(amount: f64) -> Transaction {
        Transaction::new(
            "tx".into(),
            TransactionType::Transfer,
            "r".into(),
            amount,
            "SUI".into(),
            "".into(),
        )
    }

    fn ctx(signatures: &BTreeMap<String, Signature>) -> PolicyContext<'_> {
        PolicyContext {
            category: Category::Operations,
            current_time: Utc::now(),
            signatures,
            phase: ValidationPhase::Create,
        }
    }

    #[test]
    fn larger_amounts_escalate_the_lock_duration() {
        let policy = TimeLockPolicy::new("t1");
        let signatures = BTreeMap::new();
        let small = policy.validate(&tx(10.0), &ctx(&signatures));
        let large = policy.validate(&tx(5_000.0), &ctx(&signatures));
        assert!(large.time_lock_contribution.unwrap() > small.time_lock_contribution.unwrap());
    }

    #[test]
    fn never_contributes_a_threshold() {
        let policy = TimeLockPolicy::new("t1");
        let signatures = BTreeMap::new();
        let outcome = policy.validate(&tx(10.0), &ctx(&signatures));
        assert!(outcome.threshold_contribution.is_none());
    }

    #[test]
    fn scale_step_is_the_fixed_interval_not_the_category_base() {
        let policy = TimeLockPolicy::new("t1").with_category_lock(Category::Operations, 7_200);
        let signatures = BTreeMap::new();
        let outcome = policy.validate(&tx(5_000.0), &ctx(&signatures));
        assert_eq!(outcome.time_lock_contribution, Some(7_200 + 5 * 3_600));
    }
}
