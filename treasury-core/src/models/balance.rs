//! Treasury balance model
//!
//! One balance per asset. Deposits and withdrawals are the only mutators;
//! the invariant `amount >= 0` is enforced by `withdraw` refusing to
//! overdraw rather than by clamping, so callers can distinguish
//! insufficient funds from success.

use crate::amount;
use crate::models::asset::AssetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The treasury's holdings of a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryBalance {
    coin_type: AssetId,
    amount: f64,
    last_updated: DateTime<Utc>,
}

impl TreasuryBalance {
    pub fn new(coin_type: AssetId, current_time: DateTime<Utc>) -> Self {
        Self {
            coin_type,
            amount: 0.0,
            last_updated: current_time,
        }
    }

    pub fn coin_type(&self) -> &str {
        self.coin_type.as_str()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Credit the balance. Caller must have already validated `amount > 0`.
    pub fn deposit(&mut self, amount: f64, current_time: DateTime<Utc>) {
        debug_assert!(amount::is_positive(amount));
        self.amount += amount;
        self.last_updated = current_time;
    }

    /// Debit the balance if sufficient funds are available.
    ///
    /// Returns `false` (and leaves the balance untouched) rather than going
    /// negative, preserving the `amount >= 0` invariant unconditionally.
    pub fn withdraw(&mut self, amount: f64, current_time: DateTime<Utc>) -> bool {
        if amount > self.amount {
            return false;
        }
        self.amount -= amount;
        self.last_updated = current_time;
        true
    }

    /// True if a `withdraw` of this amount would succeed, without mutating.
    pub fn can_withdraw(&self, amount: f64) -> bool {
        amount <= self.amount
    }
}
