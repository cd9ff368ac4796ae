//! Spending limit policy: caps per-transaction, per-category, and global
//! spend within a rolling calendar window.

use super::{PolicyContext, PolicyOutcome, PolicyViolation};
use crate::models::category::Category;
use crate::models::spending::SpendingRecord;
use crate::models::transaction::Transaction;
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use std::collections::BTreeMap;

/// Anchor for the rolling spend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodType {
    /// Current calendar day, local midnight (UTC, since the core has no
    /// timezone of its own).
    Daily,
    /// ISO week starting Monday 00:00.
    Weekly,
    /// First day of the current month, 00:00.
    Monthly,
}

/// Caps spend over a rolling window, consulting the treasury's single
/// shared spending ledger rather than keeping a private copy, so there is
/// exactly one source of truth for what has already been spent.
#[derive(Debug, Clone)]
pub struct SpendingLimitPolicy {
    policy_id: String,
    enabled: bool,
    period_type: PeriodType,
    global_limit: Option<f64>,
    max_per_transaction: Option<f64>,
    limit_per_category: BTreeMap<Category, f64>,
}

impl SpendingLimitPolicy {
    pub fn new(policy_id: impl Into<String>, period_type: PeriodType) -> Self {
        Self {
            policy_id: policy_id.into(),
            enabled: true,
            period_type,
            global_limit: None,
            max_per_transaction: None,
            limit_per_category: BTreeMap::new(),
        }
    }

    pub fn with_global_limit(mut self, limit: f64) -> Self {
        self.global_limit = Some(limit);
        self
    }

    pub fn with_max_per_transaction(mut self, max: f64) -> Self {
        self.max_per_transaction = Some(max);
        self
    }

    pub fn with_category_limit(mut self, category: Category, limit: f64) -> Self {
        self.limit_per_category.insert(category, limit);
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

    fn period_start(&self, current_time: DateTime<Utc>) -> DateTime<Utc> {
        match self.period_type {
            PeriodType::Daily => current_time
                .with_hour(0)
                .and_then(|t| t.with_minute(0))
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(current_time),
            PeriodType::Weekly => {
                let days_since_monday = current_time.weekday().num_days_from_monday();
                let midnight = current_time
                    .with_hour(0)
                    .and_then(|t| t.with_minute(0))
                    .and_then(|t| t.with_second(0))
                    .and_then(|t| t.with_nanosecond(0))
                    .unwrap_or(current_time);
                midnight - chrono::Duration::days(days_since_monday as i64)
            }
            PeriodType::Monthly => Utc
                .with_ymd_and_hms(current_time.year(), current_time.month(), 1, 0, 0, 0)
                .single()
                .unwrap_or(current_time),
        }
    }

    fn spent_since(&self, history: &[SpendingRecord], since: DateTime<Utc>, category: Option<Category>) -> f64 {
        history
            .iter()
            .filter(|r| r.timestamp() >= since)
            .filter(|r| match category {
                Some(c) => r.category() == c,
                None => true,
            })
            .map(|r| r.amount())
            .sum()
    }

    pub(super) fn validate(
        &self,
        transaction: &Transaction,
        ctx: &PolicyContext,
        history: &[SpendingRecord],
    ) -> Result<PolicyOutcome, PolicyViolation> {
        if let Some(max) = self.max_per_transaction {
            if transaction.amount() > max {
                return Err(PolicyViolation::new(
                    &self.policy_id,
                    format!(
                        "transaction amount {} exceeds max per transaction {}",
                        transaction.amount(),
                        max
                    ),
                ));
            }
        }

        let period_start = self.period_start(ctx.current_time);

        if let Some(limit) = self.limit_per_category.get(&ctx.category) {
            let spent = self.spent_since(history, period_start, Some(ctx.category));
            if spent + transaction.amount() > *limit {
                return Err(PolicyViolation::new(
                    &self.policy_id,
                    format!(
                        "spending limit exceeded for category {}: {} + {} > {}",
                        ctx.category,
                        spent,
                        transaction.amount(),
                        limit
                    ),
                ));
            }
        }

        if let Some(limit) = self.global_limit {
            let spent = self.spent_since(history, period_start, None);
            if spent + transaction.amount() > limit {
                return Err(PolicyViolation::new(
                    &self.policy_id,
                    format!(
                        "global spending limit exceeded: {} + {} > {}",
                        spent,
                        transaction.amount(),
                        limit
                    ),
                ));
            }
        }

        Ok(PolicyOutcome::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::signature::Signature;
    use crate::models::transaction::TransactionType;
    use crate::policy::ValidationPhase;
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

    fn ctx(current_time: DateTime<Utc>, signatures: &BTreeMap<String, Signature>) -> PolicyContext<'_> {
        PolicyContext {
            category: Category::Operations,
            current_time,
            signatures,
            phase: ValidationPhase::Create,
        }
    }

    #[test]
    fn max_per_transaction_blocks_over_limit() {
        let policy = SpendingLimitPolicy::new("p1", PeriodType::Daily).with_max_per_transaction(1_000.0);
        let now = Utc::now();
        let signatures = BTreeMap::new();
        let result = policy.validate(&tx(1_500.0), &ctx(now, &signatures), &[]);
        assert!(matches!(result, Err(v) if v.policy_id == "p1"));
    }

    #[test]
    fn sequential_batch_does_not_accumulate_provisionally() {
        let policy = SpendingLimitPolicy::new("p1", PeriodType::Daily).with_global_limit(1_000.0);
        let now = Utc::now();
        let signatures = BTreeMap::new();
        // Two 600-unit transactions each pass independently: the history
        // argument is not updated between calls within one proposal, so
        // nothing accumulates provisionally across transactions in a batch.
        assert!(policy.validate(&tx(600.0), &ctx(now, &signatures), &[]).is_ok());
        assert!(policy.validate(&tx(600.0), &ctx(now, &signatures), &[]).is_ok());
    }
}
