//! Policy framework
//!
//! Six composable policy variants share one validation contract. Each
//! policy is either **rejecting** (can raise a [`PolicyViolation`] to abort
//! a transaction) or **contributing** (can raise the required time-lock or
//! signature threshold), and some are both.
//!
//! Policies here are a closed `enum` rather than a trait object: the set of
//! six variants is fixed, so an exhaustive `match` gives the manager
//! compile-time coverage instead of runtime dynamic dispatch.

mod amount_threshold;
mod approval;
mod category;
mod manager;
mod spending_limit;
mod time_lock;
mod whitelist;

pub use amount_threshold::{AmountRange, AmountThresholdPolicy};
pub use approval::ApprovalPolicy;
pub use category::CategoryPolicy;
pub use manager::PolicyManager;
pub use spending_limit::{PeriodType, SpendingLimitPolicy};
pub use time_lock::TimeLockPolicy;
pub use whitelist::WhitelistPolicy;

use crate::models::category::Category;
use crate::models::signature::Signature;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// Which side of the proposal lifecycle a validation pass runs in.
///
/// Required-signer checks only make sense once signers have had a chance to
/// sign, so they are gated to `Execute`. Veto checks run in both phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    Create,
    Execute,
}

/// Everything a policy needs to validate one transaction.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub category: Category,
    pub current_time: DateTime<Utc>,
    pub signatures: &'a BTreeMap<String, Signature>,
    pub phase: ValidationPhase,
}

/// Raised by a rejecting policy when a transaction fails its rule.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{policy_id}: {message}")]
pub struct PolicyViolation {
    pub policy_id: String,
    pub message: String,
}

impl PolicyViolation {
    pub fn new(policy_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            message: message.into(),
        }
    }
}

/// The two output channels a contributing policy can raise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolicyOutcome {
    pub time_lock_contribution: Option<i64>,
    pub threshold_contribution: Option<u32>,
}

/// One of the six policy variants the treasury can compose.
#[derive(Debug, Clone)]
pub enum Policy {
    SpendingLimit(SpendingLimitPolicy),
    Whitelist(WhitelistPolicy),
    Category(CategoryPolicy),
    TimeLock(TimeLockPolicy),
    AmountThreshold(AmountThresholdPolicy),
    Approval(ApprovalPolicy),
}

impl Policy {
    pub fn policy_id(&self) -> &str {
        match self {
            Policy::SpendingLimit(p) => p.policy_id(),
            Policy::Whitelist(p) => p.policy_id(),
            Policy::Category(p) => p.policy_id(),
            Policy::TimeLock(p) => p.policy_id(),
            Policy::AmountThreshold(p) => p.policy_id(),
            Policy::Approval(p) => p.policy_id(),
        }
    }

    pub fn policy_type(&self) -> &'static str {
        match self {
            Policy::SpendingLimit(_) => "spending_limit",
            Policy::Whitelist(_) => "whitelist",
            Policy::Category(_) => "category",
            Policy::TimeLock(_) => "timelock",
            Policy::AmountThreshold(_) => "amount_threshold",
            Policy::Approval(_) => "approval",
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Policy::SpendingLimit(p) => p.enabled(),
            Policy::Whitelist(p) => p.enabled(),
            Policy::Category(p) => p.enabled(),
            Policy::TimeLock(p) => p.enabled(),
            Policy::AmountThreshold(p) => p.enabled(),
            Policy::Approval(p) => p.enabled(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Policy::SpendingLimit(p) => p.set_enabled(enabled),
            Policy::Whitelist(p) => p.set_enabled(enabled),
            Policy::Category(p) => p.set_enabled(enabled),
            Policy::TimeLock(p) => p.set_enabled(enabled),
            Policy::AmountThreshold(p) => p.set_enabled(enabled),
            Policy::Approval(p) => p.set_enabled(enabled),
        }
    }

    /// Validate one transaction. `history` is the treasury's single shared
    /// spending ledger; only `SpendingLimitPolicy` consults it.
    pub fn validate(
        &self,
        transaction: &crate::models::transaction::Transaction,
        ctx: &PolicyContext,
        history: &[crate::models::spending::SpendingRecord],
    ) -> Result<PolicyOutcome, PolicyViolation> {
        if !self.enabled() {
            return Ok(PolicyOutcome::default());
        }
        match self {
            Policy::SpendingLimit(p) => p.validate(transaction, ctx, history),
            Policy::Whitelist(p) => p.validate(transaction, ctx),
            Policy::Category(p) => p.validate(transaction, ctx),
            Policy::TimeLock(p) => Ok(p.validate(transaction, ctx)),
            Policy::AmountThreshold(p) => Ok(p.validate(transaction)),
            Policy::Approval(p) => p.validate(ctx),
        }
    }
}
