//! Category policy: restricts a proposal's category to an allowed set.

use super::{PolicyContext, PolicyOutcome, PolicyViolation};
use crate::models::category::Category;
use crate::models::transaction::Transaction;
use std::collections::BTreeSet;

/// Rejects any transaction whose proposal category is not in
/// `allowed_categories`. An empty `allowed_categories` set means no
/// restriction — nothing is rejected. The context always carries a concrete
/// `Category` (proposals are created with one), so there is no "missing
/// category" branch to handle.
#[derive(Debug, Clone)]
pub struct CategoryPolicy {
    policy_id: String,
    enabled: bool,
    allowed_categories: BTreeSet<Category>,
}

impl CategoryPolicy {
    pub fn new(policy_id: impl Into<String>, allowed_categories: BTreeSet<Category>) -> Self {
        Self {
            policy_id: policy_id.into(),
            enabled: true,
            allowed_categories,
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

    pub fn allow_category(&mut self, category: Category) {
        self.allowed_categories.insert(category);
    }

    pub(super) fn validate(
        &self,
        _transaction: &Transaction,
        ctx: &PolicyContext,
    ) -> Result<PolicyOutcome, PolicyViolation> {
        if self.allowed_categories.is_empty() || self.allowed_categories.contains(&ctx.category) {
            Ok(PolicyOutcome::default())
        } else {
            Err(PolicyViolation::new(
                &self.policy_id,
                format!("category {} is not permitted by this policy", ctx.category),
            ))
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

    fn tx() -> Transaction {
        Transaction::new(
            "tx".into(),
            TransactionType::Transfer,
            "r".into(),
            100.0,
            "SUI".into(),
            "".into(),
        )
    }

    fn ctx(category: Category, signatures: &BTreeMap<String, Signature>) -> PolicyContext<'_> {
        PolicyContext {
            category,
            current_time: Utc::now(),
            signatures,
            phase: ValidationPhase::Create,
        }
    }

    #[test]
    fn rejects_category_not_in_allowed_set() {
        let mut allowed = BTreeSet::new();
        allowed.insert(Category::Operations);
        let policy = CategoryPolicy::new("c1", allowed);
        let signatures = BTreeMap::new();
        assert!(policy.validate(&tx(), &ctx(Category::Marketing, &signatures)).is_err());
        assert!(policy.validate(&tx(), &ctx(Category::Operations, &signatures)).is_ok());
    }

    #[test]
    fn empty_allowed_set_permits_every_category() {
        let policy = CategoryPolicy::new("c1", BTreeSet::new());
        let signatures = BTreeMap::new();
        assert!(policy.validate(&tx(), &ctx(Category::Marketing, &signatures)).is_ok());
        assert!(policy.validate(&tx(), &ctx(Category::Security, &signatures)).is_ok());
    }
}
