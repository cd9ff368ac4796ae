//! Proposal model: a bundle of transactions moving through the
//! multi-signature state machine.

use crate::models::category::Category;
use crate::models::signature::Signature;
use crate::models::transaction::Transaction;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of a proposal. `Pending` and `ReadyToExecute` are part
/// of the taxonomy but the state machine always creates proposals directly
/// into `TimeLocked`; both `Pending` and `TimeLocked` are treated as the
/// "signable" state by every operation that checks status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    TimeLocked,
    ReadyToExecute,
    Executed,
    Cancelled,
    Failed,
}

impl ProposalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProposalStatus::Executed | ProposalStatus::Cancelled | ProposalStatus::Failed
        )
    }

    /// The two statuses signing and execution preconditions accept.
    pub fn is_signable(self) -> bool {
        matches!(self, ProposalStatus::Pending | ProposalStatus::TimeLocked)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    proposal_id: String,
    creator: String,
    transactions: Vec<Transaction>,
    category: Category,
    description: String,
    threshold_required: u32,
    created_at: DateTime<Utc>,
    time_lock_duration_seconds: i64,
    status: ProposalStatus,
    signatures: BTreeMap<String, Signature>,
    executed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl Proposal {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        proposal_id: String,
        creator: String,
        transactions: Vec<Transaction>,
        category: Category,
        description: String,
        threshold_required: u32,
        created_at: DateTime<Utc>,
        time_lock_duration_seconds: i64,
    ) -> Self {
        Self {
            proposal_id,
            creator,
            transactions,
            category,
            description,
            threshold_required,
            created_at,
            time_lock_duration_seconds,
            status: ProposalStatus::TimeLocked,
            signatures: BTreeMap::new(),
            executed_at: None,
            cancelled_at: None,
        }
    }

    pub fn proposal_id(&self) -> &str {
        &self.proposal_id
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn threshold_required(&self) -> u32 {
        self.threshold_required
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn time_lock_duration_seconds(&self) -> i64 {
        self.time_lock_duration_seconds
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn signatures(&self) -> &BTreeMap<String, Signature> {
        &self.signatures
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_signed_by(&self, signer: &str) -> bool {
        self.signatures.contains_key(signer)
    }

    pub fn time_locked_until(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.time_lock_duration_seconds)
    }

    fn time_lock_elapsed(&self, current_time: DateTime<Utc>) -> bool {
        current_time >= self.time_locked_until()
    }

    /// True if every execution precondition holds: time lock elapsed,
    /// enough signatures, and still in a signable status.
    pub fn can_execute(&self, current_time: DateTime<Utc>) -> bool {
        self.time_lock_elapsed(current_time)
            && self.signature_count() >= self.threshold_required as usize
            && self.status.is_signable()
    }

    pub(crate) fn record_signature(&mut self, signature: Signature) {
        self.signatures.insert(signature.signer().to_string(), signature);
    }

    pub(crate) fn mark_executed(&mut self, current_time: DateTime<Utc>) {
        self.status = ProposalStatus::Executed;
        self.executed_at = Some(current_time);
    }

    pub(crate) fn mark_cancelled(&mut self, current_time: DateTime<Utc>) {
        self.status = ProposalStatus::Cancelled;
        self.cancelled_at = Some(current_time);
    }

    pub(crate) fn mark_failed(&mut self) {
        self.status = ProposalStatus::Failed;
    }
}
