//! Spending record: an append-only receipt of an executed transaction's
//! debit against the treasury.

use crate::models::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingRecord {
    amount: f64,
    timestamp: DateTime<Utc>,
    category: Category,
    proposal_id: String,
    tx_hash: String,
}

impl SpendingRecord {
    pub fn new(
        amount: f64,
        timestamp: DateTime<Utc>,
        category: Category,
        proposal_id: String,
        tx_hash: String,
    ) -> Self {
        Self {
            amount,
            timestamp,
            category,
            proposal_id,
            tx_hash,
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn proposal_id(&self) -> &str {
        &self.proposal_id
    }

    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }
}
