//! Treasury configuration: signer sets, thresholds, emergency cooldown.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const DEFAULT_EMERGENCY_COOLDOWN_SECONDS: i64 = 86_400;

/// Static governance parameters for one treasury instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryConfig {
    pub treasury_id: String,
    pub signers: BTreeSet<String>,
    pub threshold: u32,
    pub emergency_threshold: u32,
    pub emergency_signers: BTreeSet<String>,
    pub emergency_cooldown_seconds: i64,
    pub last_emergency_at: Option<DateTime<Utc>>,
}

impl TreasuryConfig {
    pub fn new(
        treasury_id: String,
        signers: BTreeSet<String>,
        threshold: u32,
        emergency_threshold: u32,
        emergency_signers: BTreeSet<String>,
    ) -> Self {
        Self {
            treasury_id,
            signers,
            threshold,
            emergency_threshold,
            emergency_signers,
            emergency_cooldown_seconds: DEFAULT_EMERGENCY_COOLDOWN_SECONDS,
            last_emergency_at: None,
        }
    }

    pub fn is_signer(&self, actor: &str) -> bool {
        self.signers.contains(actor)
    }

    pub fn is_emergency_signer(&self, actor: &str) -> bool {
        self.emergency_signers.contains(actor)
    }

    /// True if enough time has elapsed since the last emergency action (or
    /// none has ever fired) to allow triggering a new one.
    pub fn can_trigger_emergency(&self, current_time: DateTime<Utc>) -> bool {
        match self.last_emergency_at {
            None => true,
            Some(last) => current_time - last >= Duration::seconds(self.emergency_cooldown_seconds),
        }
    }
}
