//! Transaction model
//!
//! A transaction is an immutable instruction inside a proposal: move,
//! mint, or burn a fixed amount of one asset. Transactions never mutate
//! after construction; amendment means building a new proposal.

use crate::models::asset::AssetId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// What kind of ledger operation a transaction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Transfer,
    Burn,
    Mint,
}

/// A single spending instruction within a proposal.
///
/// # Example
/// ```
/// use treasury_core::{Transaction, TransactionType};
///
/// let tx = Transaction::new(
///     "tx-1".to_string(),
///     TransactionType::Transfer,
///     "0xrecipient".to_string(),
///     2_500.0,
///     "SUI".into(),
///     "quarterly grant".to_string(),
/// );
/// assert_eq!(tx.amount(), 2_500.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    tx_id: String,
    tx_type: TransactionType,
    recipient: String,
    amount: f64,
    coin_type: AssetId,
    description: String,
    metadata: BTreeMap<String, String>,
}

impl Transaction {
    pub fn new(
        tx_id: String,
        tx_type: TransactionType,
        recipient: String,
        amount: f64,
        coin_type: AssetId,
        description: String,
    ) -> Self {
        Self {
            tx_id,
            tx_type,
            recipient,
            amount,
            coin_type,
            description,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach metadata (builder pattern).
    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn tx_type(&self) -> TransactionType {
        self.tx_type
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn coin_type(&self) -> &str {
        self.coin_type.as_str()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Canonical content hash, stable across processes and runs.
    ///
    /// Unlike a `std::hash::Hash`-based digest (unstable per-process due to
    /// `RandomState`), this hashes a deterministic field projection with
    /// SHA-256, so the same transaction always yields the same hash and can
    /// safely appear in audit logs or be bound into a signature.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.tx_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(tx_type_tag(self.tx_type).as_bytes());
        hasher.update([0u8]);
        hasher.update(self.recipient.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.amount.to_bits().to_be_bytes());
        hasher.update([0u8]);
        hasher.update(self.coin_type.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.description.as_bytes());
        for (key, value) in &self.metadata {
            hasher.update([0u8]);
            hasher.update(key.as_bytes());
            hasher.update([1u8]);
            hasher.update(value.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

fn tx_type_tag(tx_type: TransactionType) -> &'static str {
    match tx_type {
        TransactionType::Transfer => "transfer",
        TransactionType::Burn => "burn",
        TransactionType::Mint => "mint",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            "tx-1".to_string(),
            TransactionType::Transfer,
            "0xrecipient".to_string(),
            2_500.0,
            "SUI".into(),
            "quarterly grant".to_string(),
        )
    }

    #[test]
    fn hash_is_stable_across_calls() {
        let tx = sample();
        assert_eq!(tx.compute_hash(), tx.compute_hash());
    }

    #[test]
    fn hash_differs_on_amount_change() {
        let a = sample();
        let b = Transaction::new(
            "tx-1".to_string(),
            TransactionType::Transfer,
            "0xrecipient".to_string(),
            2_501.0,
            "SUI".into(),
            "quarterly grant".to_string(),
        );
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn metadata_participates_in_hash() {
        let a = sample();
        let mut metadata = BTreeMap::new();
        metadata.insert("memo".to_string(), "q1".to_string());
        let b = sample().with_metadata(metadata);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
