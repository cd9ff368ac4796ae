//! Emergency action model: a freeze request moving through its own
//! independent signature quorum.

use crate::models::signature::Signature;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A quorum action initiated by an emergency signer (currently only
/// `"freeze"` is recognized by the treasury core).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyAction {
    action_id: String,
    action_type: String,
    initiated_by: String,
    initiated_at: DateTime<Utc>,
    reason: String,
    signatures: BTreeMap<String, Signature>,
    executed: bool,
    executed_at: Option<DateTime<Utc>>,
}

impl EmergencyAction {
    pub fn new(
        action_id: String,
        action_type: String,
        initiated_by: String,
        initiated_at: DateTime<Utc>,
        reason: String,
    ) -> Self {
        Self {
            action_id,
            action_type,
            initiated_by,
            initiated_at,
            reason,
            signatures: BTreeMap::new(),
            executed: false,
            executed_at: None,
        }
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn initiated_by(&self) -> &str {
        &self.initiated_by
    }

    pub fn initiated_at(&self) -> DateTime<Utc> {
        self.initiated_at
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn signatures(&self) -> &BTreeMap<String, Signature> {
        &self.signatures
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_signed_by(&self, signer: &str) -> bool {
        self.signatures.contains_key(signer)
    }

    pub fn executed(&self) -> bool {
        self.executed
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    pub(crate) fn add_signature(&mut self, signature: Signature) {
        self.signatures.insert(signature.signer().to_string(), signature);
    }

    pub(crate) fn mark_executed(&mut self, current_time: DateTime<Utc>) {
        self.executed = true;
        self.executed_at = Some(current_time);
    }
}
