//! Whitelist policy: restricts transactions to approved recipients, with an
//! optional time-boxed temporary allowance and a blacklist that always wins.

use super::{PolicyContext, PolicyOutcome, PolicyViolation};
use crate::models::transaction::Transaction;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Approved, temporary, and blacklisted recipients for one policy instance.
///
/// Resolution order on validation: blacklist rejects outright, then an
/// approved recipient always passes, then a temporary entry passes only if
/// it has not yet expired, otherwise the transaction is rejected.
#[derive(Debug, Clone)]
pub struct WhitelistPolicy {
    policy_id: String,
    enabled: bool,
    approved_recipients: BTreeSet<String>,
    temporary_entries: BTreeMap<String, DateTime<Utc>>,
    blacklisted_recipients: BTreeSet<String>,
}

impl WhitelistPolicy {
    pub fn new(policy_id: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            enabled: true,
            approved_recipients: BTreeSet::new(),
            temporary_entries: BTreeMap::new(),
            blacklisted_recipients: BTreeSet::new(),
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

    /// Adds a permanent recipient. Refuses if the recipient is blacklisted.
    pub fn add_recipient(&mut self, recipient: impl Into<String>) -> bool {
        let recipient = recipient.into();
        if self.blacklisted_recipients.contains(&recipient) {
            return false;
        }
        self.approved_recipients.insert(recipient);
        true
    }

    /// Adds a recipient that is only approved until `expires_at`. Refuses if
    /// the recipient is blacklisted.
    pub fn add_temporary_recipient(&mut self, recipient: impl Into<String>, expires_at: DateTime<Utc>) -> bool {
        let recipient = recipient.into();
        if self.blacklisted_recipients.contains(&recipient) {
            return false;
        }
        self.temporary_entries.insert(recipient, expires_at);
        true
    }

    /// Blacklists a recipient, purging any approved or temporary entry.
    pub fn blacklist_recipient(&mut self, recipient: impl Into<String>) {
        let recipient = recipient.into();
        self.approved_recipients.remove(&recipient);
        self.temporary_entries.remove(&recipient);
        self.blacklisted_recipients.insert(recipient);
    }

    pub fn is_blacklisted(&self, recipient: &str) -> bool {
        self.blacklisted_recipients.contains(recipient)
    }

    pub(super) fn validate(
        &self,
        transaction: &Transaction,
        ctx: &PolicyContext,
    ) -> Result<PolicyOutcome, PolicyViolation> {
        let recipient = transaction.recipient();

        if self.blacklisted_recipients.contains(recipient) {
            return Err(PolicyViolation::new(
                &self.policy_id,
                format!("recipient {recipient} is blacklisted"),
            ));
        }

        if self.approved_recipients.contains(recipient) {
            return Ok(PolicyOutcome::default());
        }

        if let Some(expires_at) = self.temporary_entries.get(recipient) {
            if ctx.current_time < *expires_at {
                return Ok(PolicyOutcome::default());
            }
            return Err(PolicyViolation::new(
                &self.policy_id,
                format!("temporary approval for recipient {recipient} has expired"),
            ));
        }

        Err(PolicyViolation::new(
            &self.policy_id,
            format!("recipient {recipient} is not whitelisted"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionType;
    use crate::policy::ValidationPhase;
    use chrono::Duration;
    use std::collections::BTreeMap;

    fn tx(recipient: &str) -> Transaction {
        Transaction::new(
            "tx".into(),
            TransactionType::Transfer,
            recipient.into(),
            100.0,
            "SUI".into(),
            "".into(),
        )
    }

    fn ctx(now: DateTime<Utc>, signatures: &BTreeMap<String, crate::models::signature::Signature>) -> PolicyContext<'_> {
        PolicyContext {
            category: crate::models::category::Category::Operations,
            current_time: now,
            signatures,
            phase: ValidationPhase::Create,
        }
    }

    #[test]
    fn blacklist_overrides_prior_approval() {
        let mut policy = WhitelistPolicy::new("w1");
        policy.add_recipient("bob");
        policy.blacklist_recipient("bob");
        let now = Utc::now();
        let signatures = BTreeMap::new();
        let result = policy.validate(&tx("bob"), &ctx(now, &signatures));
        assert!(result.is_err());
    }

    #[test]
    fn temporary_entry_expires() {
        let mut policy = WhitelistPolicy::new("w1");
        let now = Utc::now();
        policy.add_temporary_recipient("carol", now + Duration::seconds(10));
        let signatures = BTreeMap::new();
        assert!(policy.validate(&tx("carol"), &ctx(now, &signatures)).is_ok());
        assert!(policy
            .validate(&tx("carol"), &ctx(now + Duration::seconds(20), &signatures))
            .is_err());
    }

    #[test]
    fn blacklisting_refuses_further_approval_attempts() {
        let mut policy = WhitelistPolicy::new("w1");
        policy.blacklist_recipient("dave");
        assert!(!policy.add_recipient("dave"));
        assert!(!policy.add_temporary_recipient("dave", Utc::now()));
    }
}
