//! Treasury: the proposal state machine tying models, policies, and the
//! emergency module together.

use crate::amount;
use crate::emergency::EmergencyModule;
use crate::error::TreasuryError;
use crate::models::asset::AssetId;
use crate::models::audit::AuditLogEntry;
use crate::models::balance::TreasuryBalance;
use crate::models::category::Category;
use crate::models::config::TreasuryConfig;
use crate::models::proposal::{Proposal, ProposalStatus};
use crate::models::signature::Signature;
use crate::models::spending::SpendingRecord;
use crate::models::transaction::Transaction;
use crate::policy::{PolicyContext, PolicyManager, ValidationPhase};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Hard cap on transactions per proposal, keeping hash computation and
/// policy evaluation bounded per proposal regardless of caller input.
const MAX_TRANSACTIONS_PER_PROPOSAL: usize = 50;

/// An in-memory multi-signature treasury.
///
/// # Example
/// ```
/// use treasury_core::{Category, Treasury};
/// use std::collections::BTreeSet;
///
/// let signers: BTreeSet<String> = ["alice", "bob"].iter().map(|s| s.to_string()).collect();
/// let treasury = Treasury::new("main".to_string(), signers, 1, None, None).unwrap();
/// assert_eq!(treasury.get_balance("SUI"), 0.0);
/// ```
pub struct Treasury {
    treasury_id: String,
    config: TreasuryConfig,
    balances: BTreeMap<AssetId, TreasuryBalance>,
    proposals: BTreeMap<String, Proposal>,
    policy_manager: PolicyManager,
    emergency_module: EmergencyModule,
    spending_records: Vec<SpendingRecord>,
    audit_logs: Vec<AuditLogEntry>,
    frozen: bool,
}

impl Treasury {
    /// `emergency_threshold` defaults to `signers.len() / 2 + 1`;
    /// `emergency_signers` defaults to the same set as `signers`.
    pub fn new(
        treasury_id: String,
        signers: std::collections::BTreeSet<String>,
        threshold: u32,
        emergency_threshold: Option<u32>,
        emergency_signers: Option<std::collections::BTreeSet<String>>,
    ) -> Result<Self, TreasuryError> {
        if threshold as usize > signers.len() {
            return Err(TreasuryError::invalid_argument("threshold cannot exceed number of signers"));
        }

        let emergency_threshold = emergency_threshold.unwrap_or((signers.len() / 2 + 1) as u32);
        let emergency_signers = emergency_signers.unwrap_or_else(|| signers.clone());

        let config = TreasuryConfig::new(treasury_id.clone(), signers, threshold, emergency_threshold, emergency_signers.clone());

        Ok(Self {
            treasury_id,
            config,
            balances: BTreeMap::new(),
            proposals: BTreeMap::new(),
            policy_manager: PolicyManager::new(),
            emergency_module: EmergencyModule::new(emergency_threshold, emergency_signers),
            spending_records: Vec::new(),
            audit_logs: Vec::new(),
            frozen: false,
        })
    }

    pub fn treasury_id(&self) -> &str {
        &self.treasury_id
    }

    pub fn config(&self) -> &TreasuryConfig {
        &self.config
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn policy_manager(&self) -> &PolicyManager {
        &self.policy_manager
    }

    pub fn policy_manager_mut(&mut self) -> &mut PolicyManager {
        &mut self.policy_manager
    }

    pub fn add_signer(&mut self, new_signer: impl Into<String>, authorizer: &str) -> Result<(), TreasuryError> {
        if !self.config.is_signer(authorizer) {
            return Err(TreasuryError::permission_denied(authorizer));
        }
        let new_signer = new_signer.into();
        self.config.signers.insert(new_signer.clone());
        self.audit("add_signer", authorizer, None, [("new_signer".to_string(), new_signer)]);
        Ok(())
    }

    pub fn remove_signer(&mut self, signer_to_remove: &str, authorizer: &str, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        let _ = current_time;
        if !self.config.is_signer(authorizer) {
            return Err(TreasuryError::permission_denied(authorizer));
        }
        if self.config.signers.len() as u32 <= self.config.threshold {
            return Err(TreasuryError::invalid_state("cannot remove signer when it would drop below threshold"));
        }
        self.config.signers.remove(signer_to_remove);
        self.config.emergency_signers.remove(signer_to_remove);
        self.audit(
            "remove_signer",
            authorizer,
            None,
            [("removed_signer".to_string(), signer_to_remove.to_string())],
        );
        Ok(())
    }

    pub fn deposit(&mut self, coin_type: impl Into<AssetId>, amount: f64, depositor: &str, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        if !amount::is_positive(amount) {
            return Err(TreasuryError::invalid_argument("deposit amount must be positive"));
        }
        let coin_type = coin_type.into();
        let balance = self
            .balances
            .entry(coin_type.clone())
            .or_insert_with(|| TreasuryBalance::new(coin_type.clone(), current_time));
        balance.deposit(amount, current_time);
        self.audit(
            "deposit",
            depositor,
            None,
            [("coin_type".to_string(), coin_type.to_string()), ("amount".to_string(), amount.to_string())],
        );
        Ok(())
    }

    pub fn get_balance(&self, coin_type: &str) -> f64 {
        self.balances.get(coin_type).map(|b| b.amount()).unwrap_or(0.0)
    }

    pub fn get_all_balances(&self) -> BTreeMap<String, f64> {
        self.balances.iter().map(|(coin, balance)| (coin.to_string(), balance.amount())).collect()
    }

    /// Validates every transaction against every enabled policy, then
    /// creates a proposal whose time lock and threshold are the maximum
    /// contribution from all policies (never below the treasury's base
    /// `threshold`).
    pub fn create_proposal(
        &mut self,
        creator: &str,
        transactions: Vec<Transaction>,
        category: Category,
        description: impl Into<String>,
        current_time: DateTime<Utc>,
    ) -> Result<String, TreasuryError> {
        if !self.config.is_signer(creator) {
            return Err(TreasuryError::permission_denied(creator));
        }
        if self.frozen {
            return Err(TreasuryError::runtime_fault("treasury is frozen; cannot create proposals"));
        }
        if transactions.is_empty() {
            return Err(TreasuryError::invalid_argument("proposal must contain at least one transaction"));
        }
        if transactions.len() > MAX_TRANSACTIONS_PER_PROPOSAL {
            return Err(TreasuryError::invalid_argument(format!(
                "maximum {MAX_TRANSACTIONS_PER_PROPOSAL} transactions per proposal"
            )));
        }
        if let Some(bad) = transactions.iter().find(|t| !amount::is_valid(t.amount())) {
            return Err(TreasuryError::invalid_argument(format!("transaction {} has an invalid amount", bad.tx_id())));
        }

        let empty_signatures = BTreeMap::new();
        let create_ctx = PolicyContext {
            category,
            current_time,
            signatures: &empty_signatures,
            phase: ValidationPhase::Create,
        };
        for transaction in &transactions {
            self.policy_manager
                .validate_transaction(transaction, &create_ctx, &self.spending_records)?;
        }

        let proposal_id = Uuid::new_v4().to_string();
        let time_lock_duration = self.policy_manager.required_time_lock(&transactions, &create_ctx);
        let required_threshold = self.config.threshold.max(self.policy_manager.required_threshold(&transactions));
        let description = description.into();

        let tx_count = transactions.len();
        let proposal = Proposal::new(
            proposal_id.clone(),
            creator.to_string(),
            transactions,
            category,
            description,
            required_threshold,
            current_time,
            time_lock_duration,
        );
        self.proposals.insert(proposal_id.clone(), proposal);

        self.audit(
            "create_proposal",
            creator,
            Some(proposal_id.clone()),
            [
                ("transactions".to_string(), tx_count.to_string()),
                ("category".to_string(), category.to_string()),
                ("time_lock_duration".to_string(), time_lock_duration.to_string()),
                ("threshold".to_string(), required_threshold.to_string()),
            ],
        );

        Ok(proposal_id)
    }

    pub fn sign_proposal(
        &mut self,
        proposal_id: &str,
        signer: &str,
        signature_bytes: Vec<u8>,
        current_time: DateTime<Utc>,
    ) -> Result<(), TreasuryError> {
        if !self.config.is_signer(signer) {
            return Err(TreasuryError::permission_denied(signer));
        }
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| TreasuryError::not_found(format!("proposal {proposal_id}")))?;

        if !proposal.status().is_signable() {
            return Err(TreasuryError::invalid_state(format!(
                "cannot sign proposal in status {:?}",
                proposal.status()
            )));
        }
        if proposal.is_signed_by(signer) {
            return Err(TreasuryError::invalid_argument(format!("{signer} has already signed this proposal")));
        }

        let tx_hash = proposal_hash(proposal);
        let signature = Signature::new(signer.to_string(), signature_bytes, current_time, tx_hash);
        if !signature.is_well_formed() {
            return Err(TreasuryError::invalid_argument("signature must have a non-empty signer and payload"));
        }
        proposal.record_signature(signature);

        let signature_count = proposal.signature_count();
        self.audit(
            "sign_proposal",
            signer,
            Some(proposal_id.to_string()),
            [("signature_count".to_string(), signature_count.to_string())],
        );
        Ok(())
    }

    /// Two-phase execution: every transaction is validated and every debit
    /// checked for sufficient balance *before* any balance is mutated. If
    /// every transaction clears validation, debits and spending records are
    /// applied in a second pass that cannot itself fail, so a proposal never
    /// ends up partially executed.
    pub fn execute_proposal(&mut self, proposal_id: &str, executor: &str, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        let proposal = self
            .proposals
            .get(proposal_id)
            .ok_or_else(|| TreasuryError::not_found(format!("proposal {proposal_id}")))?;

        if !proposal.can_execute(current_time) {
            let reason = format!(
                "proposal cannot execute: time locked until {}, signatures {}/{}",
                proposal.time_locked_until(),
                proposal.signature_count(),
                proposal.threshold_required()
            );
            return Err(TreasuryError::invalid_state(reason));
        }

        let execute_ctx = PolicyContext {
            category: proposal.category(),
            current_time,
            signatures: proposal.signatures(),
            phase: ValidationPhase::Execute,
        };

        let validation = self.validate_and_price_execution(proposal, &execute_ctx);
        let (total_amount, records) = match validation {
            Ok(result) => result,
            Err(failure) => {
                let proposal = self.proposals.get_mut(proposal_id).expect("checked above");
                proposal.mark_failed();
                self.audit(
                    "execute_proposal_failed",
                    executor,
                    Some(proposal_id.to_string()),
                    [("error".to_string(), failure.to_string())],
                );
                return Err(failure);
            }
        };

        for (coin_type, amount) in aggregate_by_coin(&self.proposals[proposal_id]) {
            let balance = self.balances.get_mut(coin_type.as_str()).expect("checked during validation");
            assert!(
                balance.withdraw(amount, current_time),
                "balance for {coin_type} insufficient despite passing validation"
            );
        }
        self.spending_records.extend(records);

        let proposal = self.proposals.get_mut(proposal_id).expect("checked above");
        let tx_count = proposal.transactions().len();
        proposal.mark_executed(current_time);

        self.audit(
            "execute_proposal",
            executor,
            Some(proposal_id.to_string()),
            [
                ("transactions".to_string(), tx_count.to_string()),
                ("total_amount".to_string(), total_amount.to_string()),
            ],
        );
        Ok(())
    }

    /// Validation phase: policy checks for every transaction plus a
    /// balance-sufficiency check against the *aggregate* planned withdrawal
    /// per coin type, with no mutation. Checking per-transaction against the
    /// unmutated balance would let two transactions each individually pass
    /// while their sum overdraws. Returns the total spend and the spending
    /// records to append if every check passes.
    fn validate_and_price_execution(
        &self,
        proposal: &Proposal,
        ctx: &PolicyContext,
    ) -> Result<(f64, Vec<SpendingRecord>), TreasuryError> {
        let planned_withdrawals = aggregate_by_coin(proposal);
        for (coin_type, planned_total) in &planned_withdrawals {
            let balance = self
                .balances
                .get(coin_type.as_str())
                .ok_or_else(|| TreasuryError::invalid_state(format!("no balance for coin type {coin_type}")))?;
            if !balance.can_withdraw(*planned_total) {
                return Err(TreasuryError::invalid_state(format!("insufficient balance for {coin_type}")));
            }
        }

        let mut records = Vec::with_capacity(proposal.transactions().len());
        for transaction in proposal.transactions() {
            self.policy_manager.validate_transaction(transaction, ctx, &self.spending_records)?;

            records.push(SpendingRecord::new(
                transaction.amount(),
                ctx.current_time,
                proposal.category(),
                proposal.proposal_id().to_string(),
                transaction.compute_hash(),
            ));
        }

        let total_amount = amount::sum(planned_withdrawals.values());
        Ok((total_amount, records))
    }

    pub fn cancel_proposal(&mut self, proposal_id: &str, canceller: &str, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        let proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| TreasuryError::not_found(format!("proposal {proposal_id}")))?;

        if proposal.creator() != canceller && !proposal.is_signed_by(canceller) {
            return Err(TreasuryError::permission_denied(canceller));
        }
        if proposal.status() == ProposalStatus::Executed {
            return Err(TreasuryError::invalid_state("cannot cancel an executed proposal"));
        }
        if proposal.status() == ProposalStatus::Cancelled {
            return Err(TreasuryError::invalid_state("proposal already cancelled"));
        }

        proposal.mark_cancelled(current_time);
        self.audit("cancel_proposal", canceller, Some(proposal_id.to_string()), []);
        Ok(())
    }

    pub fn get_proposal(&self, proposal_id: &str) -> Option<&Proposal> {
        self.proposals.get(proposal_id)
    }

    pub fn list_proposals(&self, status: Option<ProposalStatus>) -> Vec<&str> {
        self.proposals
            .values()
            .filter(|p| match status {
                Some(s) => p.status() == s,
                None => true,
            })
            .map(|p| p.proposal_id())
            .collect()
    }

    pub fn get_spending_history(&self, category: Option<Category>) -> Vec<&SpendingRecord> {
        self.spending_records
            .iter()
            .filter(|r| match category {
                Some(c) => r.category() == c,
                None => true,
            })
            .collect()
    }

    pub fn trigger_emergency_freeze(&mut self, initiator: &str, reason: impl Into<String>, current_time: DateTime<Utc>) -> Result<String, TreasuryError> {
        if !self.config.is_emergency_signer(initiator) {
            return Err(TreasuryError::permission_denied(initiator));
        }
        if !self.config.can_trigger_emergency(current_time) {
            return Err(TreasuryError::runtime_fault("emergency cooldown period still active"));
        }

        let action_id = Uuid::new_v4().to_string();
        let reason = reason.into();
        self.emergency_module
            .create_emergency_action(action_id.clone(), initiator, "freeze", reason.clone(), current_time)?;

        self.audit(
            "emergency_freeze_initiated",
            initiator,
            None,
            [("action_id".to_string(), action_id.clone()), ("reason".to_string(), reason)],
        );
        Ok(action_id)
    }

    pub fn sign_emergency_action(&mut self, action_id: &str, signer: &str, signature_bytes: Vec<u8>, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        self.emergency_module.sign_emergency_action(action_id, signer, signature_bytes, current_time)?;
        self.audit(
            "emergency_action_signed",
            signer,
            None,
            [("action_id".to_string(), action_id.to_string())],
        );
        Ok(())
    }

    pub fn execute_emergency_action(&mut self, action_id: &str, executor: &str, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        if !self.emergency_module.can_execute_action(action_id) {
            let action = self.emergency_module.get_action(action_id);
            return Err(match action {
                None => TreasuryError::not_found(format!("emergency action {action_id}")),
                Some(a) => TreasuryError::runtime_fault(format!(
                    "insufficient signatures: {}/{}",
                    a.signature_count(),
                    self.emergency_module.emergency_threshold()
                )),
            });
        }

        let action_type = self
            .emergency_module
            .get_action(action_id)
            .map(|a| a.action_type().to_string())
            .unwrap_or_default();

        self.emergency_module.mark_executed(action_id, current_time)?;

        if action_type == "freeze" {
            self.frozen = true;
            self.config.last_emergency_at = Some(current_time);
            self.audit(
                "emergency_action_executed",
                executor,
                None,
                [("action_id".to_string(), action_id.to_string()), ("type".to_string(), "freeze".to_string())],
            );
        }
        Ok(())
    }

    pub fn unfreeze_treasury(&mut self, signer: &str, reason: impl Into<String>, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        let _ = current_time;
        if !self.config.is_emergency_signer(signer) {
            return Err(TreasuryError::permission_denied(signer));
        }
        if !self.frozen {
            return Err(TreasuryError::invalid_state("treasury is not frozen"));
        }
        self.frozen = false;
        self.audit("treasury_unfrozen", signer, None, [("reason".to_string(), reason.into())]);
        Ok(())
    }

    pub fn get_audit_logs(&self) -> &[AuditLogEntry] {
        &self.audit_logs
    }

    /// A serializable snapshot of the treasury's externally visible state.
    pub fn get_treasury_state(&self) -> TreasuryState {
        TreasuryState {
            treasury_id: self.treasury_id.clone(),
            signers: self.config.signers.clone(),
            threshold: self.config.threshold,
            emergency_threshold: self.config.emergency_threshold,
            frozen: self.frozen,
            balances: self.get_all_balances(),
            active_proposals: self.list_proposals(Some(ProposalStatus::TimeLocked)).len(),
            total_spending: self.spending_records.iter().map(|r| r.amount()).sum(),
            policy_count: self.policy_manager.list_policies().count(),
        }
    }

    fn audit(
        &mut self,
        action_name: &str,
        actor: &str,
        proposal_id: Option<String>,
        details: impl IntoIterator<Item = (String, String)>,
    ) {
        let details: BTreeMap<String, String> = details.into_iter().collect();
        let timestamp = Utc::now();
        tracing::info!(
            action = action_name,
            actor,
            proposal_id = proposal_id.as_deref(),
            ?details,
            "treasury audit event"
        );
        self.audit_logs
            .push(AuditLogEntry::new(timestamp, action_name.to_string(), actor.to_string(), proposal_id, details));
    }
}

/// Canonical hash of a proposal's constituent transaction hashes, bound
/// into every signature on that proposal.
fn proposal_hash(proposal: &Proposal) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(proposal.proposal_id().as_bytes());
    for transaction in proposal.transactions() {
        hasher.update([0u8]);
        hasher.update(transaction.compute_hash().as_bytes());
    }
    hasher.update([0u8]);
    hasher.update(proposal.category().to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

fn aggregate_by_coin(proposal: &Proposal) -> BTreeMap<String, f64> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for transaction in proposal.transactions() {
        grouped.entry(transaction.coin_type().to_string()).or_default().push(transaction.amount());
    }
    grouped.into_iter().map(|(coin, amounts)| (coin, amount::sum(&amounts))).collect()
}

/// Serializable snapshot returned by [`Treasury::get_treasury_state`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct TreasuryState {
    pub treasury_id: String,
    pub signers: std::collections::BTreeSet<String>,
    pub threshold: u32,
    pub emergency_threshold: u32,
    pub frozen: bool,
    pub balances: BTreeMap<String, f64>,
    pub active_proposals: usize,
    pub total_spending: f64,
    pub policy_count: usize,
}
