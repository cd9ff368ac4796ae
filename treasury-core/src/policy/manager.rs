//! Policy manager: holds the active set of policies and folds their
//! validation outcomes into one decision per proposal.

use super::{Policy, PolicyContext, PolicyViolation};
use crate::models::spending::SpendingRecord;
use crate::models::transaction::Transaction;
use std::collections::BTreeMap;

const DEFAULT_THRESHOLD: u32 = 2;

/// Owns every registered [`Policy`] by id and runs them against a
/// transaction in insertion-independent, deterministic (`BTreeMap`) order.
#[derive(Debug, Clone, Default)]
pub struct PolicyManager {
    policies: BTreeMap<String, Policy>,
}

impl PolicyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_policy(&mut self, policy: Policy) {
        self.policies.insert(policy.policy_id().to_string(), policy);
    }

    pub fn remove_policy(&mut self, policy_id: &str) -> Option<Policy> {
        self.policies.remove(policy_id)
    }

    pub fn get_policy(&self, policy_id: &str) -> Option<&Policy> {
        self.policies.get(policy_id)
    }

    pub fn get_policy_mut(&mut self, policy_id: &str) -> Option<&mut Policy> {
        self.policies.get_mut(policy_id)
    }

    pub fn list_policies(&self) -> impl Iterator<Item = &Policy> {
        self.policies.values()
    }

    /// Runs every enabled policy against one transaction, stopping at the
    /// first violation (policies run in `policy_id` order, so the reported
    /// violation is deterministic for a given configuration).
    pub fn validate_transaction(
        &self,
        transaction: &Transaction,
        ctx: &PolicyContext,
        history: &[SpendingRecord],
    ) -> Result<(), PolicyViolation> {
        for policy in self.policies.values() {
            policy.validate(transaction, ctx, history)?;
        }
        Ok(())
    }

    /// Maximum time-lock contribution across every transaction and every
    /// enabled `TimeLock` policy, computed in one pass; returns 0 when
    /// nothing contributes.
    pub fn required_time_lock(&self, transactions: &[Transaction], ctx: &PolicyContext) -> i64 {
        let mut max_lock = 0i64;
        for policy in self.policies.values() {
            if let Policy::TimeLock(time_lock) = policy {
                if !time_lock.enabled() {
                    continue;
                }
                for transaction in transactions {
                    if let Some(contribution) = time_lock.validate(transaction, ctx).time_lock_contribution {
                        max_lock = max_lock.max(contribution);
                    }
                }
            }
        }
        max_lock
    }

    /// Maximum signature threshold across every transaction and every
    /// enabled `AmountThreshold` policy, defaulting to 2 if none contribute.
    pub fn required_threshold(&self, transactions: &[Transaction]) -> u32 {
        let mut max_threshold = None;
        for policy in self.policies.values() {
            if let Policy::AmountThreshold(amount_threshold) = policy {
                if !amount_threshold.enabled() {
                    continue;
                }
                for transaction in transactions {
                    if let Some(contribution) = amount_threshold.validate(transaction).threshold_contribution {
                        max_threshold = Some(max_threshold.unwrap_or(0).max(contribution));
                    }
                }
            }
        }
        max_threshold.unwrap_or(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use crate::models::signature::Signature;
    use crate::models::transaction::TransactionType;
    use crate::policy::{AmountRange, AmountThresholdPolicy, TimeLockPolicy, ValidationPhase, WhitelistPolicy};
    use chrono::Utc;

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
    fn required_threshold_defaults_when_no_policy_contributes() {
        let manager = PolicyManager::new();
        assert_eq!(manager.required_threshold(&[tx(100.0)]), DEFAULT_THRESHOLD);
    }

    #[test]
    fn required_threshold_takes_the_maximum_across_transactions() {
        let mut manager = PolicyManager::new();
        manager.add_policy(Policy::AmountThreshold(AmountThresholdPolicy::new(
            "a1",
            vec![
                AmountRange::new(0.0, 1_000.0, 1),
                AmountRange::new(1_000.0, f64::MAX, 3),
            ],
        )));
        assert_eq!(manager.required_threshold(&[tx(10.0), tx(5_000.0)]), 3);
    }

    #[test]
    fn required_time_lock_takes_the_maximum_across_transactions() {
        let mut manager = PolicyManager::new();
        manager.add_policy(Policy::TimeLock(TimeLockPolicy::new("t1")));
        let signatures = BTreeMap::new();
        let lock = manager.required_time_lock(&[tx(10.0), tx(5_000.0)], &ctx(&signatures));
        assert!(lock > 0);
    }

    #[test]
    fn disabled_policy_does_not_block_validation() {
        let mut manager = PolicyManager::new();
        let mut whitelist = WhitelistPolicy::new("w1");
        whitelist.set_enabled(false);
        manager.add_policy(Policy::Whitelist(whitelist));
        let signatures = BTreeMap::new();
        assert!(manager
            .validate_transaction(&tx(10.0), &ctx(&signatures), &[])
            .is_ok());
    }
}
