//! Approval policy: per-category required signer sets and a standing veto
//! list.

use super::{PolicyContext, PolicyOutcome, PolicyViolation, ValidationPhase};
use crate::models::category::Category;
use std::collections::{BTreeMap, BTreeSet};

/// Vetoes apply whenever any veto signer has signed, whether the proposal is
/// still collecting signatures or is about to execute. Required-signer
/// membership only matters once signing has had a chance to happen, so it is
/// checked in [`ValidationPhase::Execute`] only — checking it at creation
/// time would reject every proposal before anyone could sign.
#[derive(Debug, Clone)]
pub struct ApprovalPolicy {
    policy_id: String,
    enabled: bool,
    required_signers_by_category: BTreeMap<Category, BTreeSet<String>>,
    veto_signers: BTreeSet<String>,
}

impl ApprovalPolicy {
    pub fn new(policy_id: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            enabled: true,
            required_signers_by_category: BTreeMap::new(),
            veto_signers: BTreeSet::new(),
        }
    }

    pub fn with_required_signers(mut self, category: Category, signers: BTreeSet<String>) -> Self {
        self.required_signers_by_category.insert(category, signers);
        self
    }

    pub fn with_veto_signer(mut self, signer: impl Into<String>) -> Self {
        self.veto_signers.insert(signer.into());
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

    pub(super) fn validate(&self, ctx: &PolicyContext) -> Result<PolicyOutcome, PolicyViolation> {
        for vetoer in &self.veto_signers {
            if ctx.signatures.contains_key(vetoer) {
                return Err(PolicyViolation::new(
                    &self.policy_id,
                    format!("{vetoer} vetoed this proposal"),
                ));
            }
        }

        if ctx.phase == ValidationPhase::Execute {
            if let Some(required) = self.required_signers_by_category.get(&ctx.category) {
                let missing: Vec<&str> = required
                    .iter()
                    .filter(|s| !ctx.signatures.contains_key(s.as_str()))
                    .map(|s| s.as_str())
                    .collect();
                if !missing.is_empty() {
                    return Err(PolicyViolation::new(
                        &self.policy_id,
                        format!("missing required signer(s): {}", missing.join(", ")),
                    ));
                }
            }
        }

        Ok(PolicyOutcome::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::signature::Signature;
    use chrono::Utc;

    fn sig(signer: &str) -> Signature {
        Signature::new(signer.into(), vec![1], Utc::now(), "h".into())
    }

    fn ctx<'a>(
        category: Category,
        signatures: &'a BTreeMap<String, Signature>,
        phase: ValidationPhase,
    ) -> PolicyContext<'a> {
        PolicyContext {
            category,
            current_time: Utc::now(),
            signatures,
            phase,
        }
    }

    #[test]
    fn veto_signer_blocks_in_either_phase() {
        let policy = ApprovalPolicy::new("a1").with_veto_signer("legal");
        let mut signatures = BTreeMap::new();
        signatures.insert("legal".to_string(), sig("legal"));
        assert!(policy
            .validate(&ctx(Category::Operations, &signatures, ValidationPhase::Create))
            .is_err());
        assert!(policy
            .validate(&ctx(Category::Operations, &signatures, ValidationPhase::Execute))
            .is_err());
    }

    #[test]
    fn required_signers_only_enforced_at_execute() {
        let mut required = BTreeSet::new();
        required.insert("alice".to_string());
        let policy = ApprovalPolicy::new("a1").with_required_signers(Category::Operations, required);
        let signatures = BTreeMap::new();
        assert!(policy
            .validate(&ctx(Category::Operations, &signatures, ValidationPhase::Create))
            .is_ok());
        assert!(policy
            .validate(&ctx(Category::Operations, &signatures, ValidationPhase::Execute))
            .is_err());
    }
}
