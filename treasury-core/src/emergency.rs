//! Emergency module: a freeze quorum independent of the normal proposal
//! signature collection, with its own signer set and threshold.

use crate::error::TreasuryError;
use crate::models::emergency_action::EmergencyAction;
use crate::models::signature::Signature;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Tracks every emergency action ever initiated, regardless of how the
/// surrounding [`crate::treasury::Treasury`] gates who may call in.
#[derive(Debug, Clone)]
pub struct EmergencyModule {
    emergency_threshold: u32,
    emergency_signers: BTreeSet<String>,
    actions: BTreeMap<String, EmergencyAction>,
}

impl EmergencyModule {
    pub fn new(emergency_threshold: u32, emergency_signers: BTreeSet<String>) -> Self {
        Self {
            emergency_threshold,
            emergency_signers,
            actions: BTreeMap::new(),
        }
    }

    pub fn emergency_threshold(&self) -> u32 {
        self.emergency_threshold
    }

    pub fn is_emergency_signer(&self, actor: &str) -> bool {
        self.emergency_signers.contains(actor)
    }

    pub fn create_emergency_action(
        &mut self,
        action_id: String,
        initiator: &str,
        action_type: impl Into<String>,
        reason: impl Into<String>,
        current_time: DateTime<Utc>,
    ) -> Result<(), TreasuryError> {
        if !self.emergency_signers.contains(initiator) {
            return Err(TreasuryError::permission_denied(initiator));
        }
        let action = EmergencyAction::new(action_id.clone(), action_type.into(), initiator.to_string(), current_time, reason.into());
        self.actions.insert(action_id, action);
        Ok(())
    }

    pub fn sign_emergency_action(
        &mut self,
        action_id: &str,
        signer: &str,
        signature_bytes: Vec<u8>,
        current_time: DateTime<Utc>,
    ) -> Result<(), TreasuryError> {
        if !self.emergency_signers.contains(signer) {
            return Err(TreasuryError::permission_denied(signer));
        }
        let action = self
            .actions
            .get_mut(action_id)
            .ok_or_else(|| TreasuryError::not_found(format!("emergency action {action_id}")))?;

        if action.executed() {
            return Err(TreasuryError::invalid_state("cannot sign an executed emergency action"));
        }
        if action.is_signed_by(signer) {
            return Err(TreasuryError::invalid_argument(format!("{signer} has already signed this action")));
        }

        let signature = Signature::new(signer.to_string(), signature_bytes, current_time, action_id.to_string());
        if !signature.is_well_formed() {
            return Err(TreasuryError::invalid_argument("signature must have a non-empty signer and payload"));
        }
        action.add_signature(signature);
        Ok(())
    }

    pub fn get_action(&self, action_id: &str) -> Option<&EmergencyAction> {
        self.actions.get(action_id)
    }

    pub fn can_execute_action(&self, action_id: &str) -> bool {
        match self.actions.get(action_id) {
            Some(action) => action.signature_count() as u32 >= self.emergency_threshold && !action.executed(),
            None => false,
        }
    }

    /// Marks the action executed. Caller (`Treasury::execute_emergency_action`)
    /// is responsible for checking [`Self::can_execute_action`] first and for
    /// applying the action's real-world effect (e.g. freezing the treasury).
    pub(crate) fn mark_executed(&mut self, action_id: &str, current_time: DateTime<Utc>) -> Result<(), TreasuryError> {
        let action = self
            .actions
            .get_mut(action_id)
            .ok_or_else(|| TreasuryError::not_found(format!("emergency action {action_id}")))?;
        action.mark_executed(current_time);
        Ok(())
    }

    pub fn add_emergency_signer(&mut self, signer: impl Into<String>) {
        self.emergency_signers.insert(signer.into());
    }

    /// Refuses to drop the signer set at or below the emergency threshold,
    /// so a freeze quorum can never become structurally unreachable.
    pub fn remove_emergency_signer(&mut self, signer: &str) -> Result<(), TreasuryError> {
        if self.emergency_signers.len() as u32 <= self.emergency_threshold {
            return Err(TreasuryError::invalid_state(
                "cannot remove signer when it would drop below threshold",
            ));
        }
        self.emergency_signers.remove(signer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signers(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn non_signer_cannot_initiate() {
        let mut module = EmergencyModule::new(2, signers(&["a", "b"]));
        let err = module.create_emergency_action("id1".into(), "mallory", "freeze", "test", Utc::now());
        assert!(matches!(err, Err(TreasuryError::PermissionDenied { .. })));
    }

    #[test]
    fn execution_requires_enough_signatures() {
        let mut module = EmergencyModule::new(2, signers(&["a", "b", "c"]));
        module
            .create_emergency_action("id1".into(), "a", "freeze", "test", Utc::now())
            .unwrap();
        assert!(!module.can_execute_action("id1"));
        module.sign_emergency_action("id1", "a", vec![1], Utc::now()).unwrap();
        assert!(!module.can_execute_action("id1"));
        module.sign_emergency_action("id1", "b", vec![1], Utc::now()).unwrap();
        assert!(module.can_execute_action("id1"));
    }

    #[test]
    fn cannot_sign_twice_or_after_execution() {
        let mut module = EmergencyModule::new(1, signers(&["a"]));
        module
            .create_emergency_action("id1".into(), "a", "freeze", "test", Utc::now())
            .unwrap();
        module.sign_emergency_action("id1", "a", vec![1], Utc::now()).unwrap();
        assert!(module.sign_emergency_action("id1", "a", vec![1], Utc::now()).is_err());
        module.mark_executed("id1", Utc::now()).unwrap();
        let mut module2 = EmergencyModule::new(1, signers(&["a", "b"]));
        module2
            .create_emergency_action("id2".into(), "a", "freeze", "test", Utc::now())
            .unwrap();
        module2.mark_executed("id2", Utc::now()).unwrap();
        assert!(module2.sign_emergency_action("id2", "b", vec![1], Utc::now()).is_err());
    }

    #[test]
    fn malformed_signature_payload_is_rejected() {
        let mut module = EmergencyModule::new(2, signers(&["a", "b"]));
        module
            .create_emergency_action("id1".into(), "a", "freeze", "test", Utc::now())
            .unwrap();
        assert!(module.sign_emergency_action("id1", "a", vec![], Utc::now()).is_err());
        assert_eq!(module.get_action("id1").unwrap().signature_count(), 0);
    }

    #[test]
    fn removing_a_signer_below_threshold_is_refused() {
        let mut module = EmergencyModule::new(2, signers(&["a", "b"]));
        assert!(module.remove_emergency_signer("a").is_err());
    }
}
