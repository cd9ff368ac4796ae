//! Append-only audit log emitted by the treasury core.
//!
//! Every entry is also mirrored to a `tracing` event at the call site (see
//! `treasury::Treasury::audit`), so an external shell can route the same
//! history to both an in-memory record and a structured log sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    timestamp: DateTime<Utc>,
    action_name: String,
    actor: String,
    proposal_id: Option<String>,
    details: BTreeMap<String, String>,
}

impl AuditLogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        action_name: String,
        actor: String,
        proposal_id: Option<String>,
        details: BTreeMap<String, String>,
    ) -> Self {
        Self {
            timestamp,
            action_name,
            actor,
            proposal_id,
            details,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn proposal_id(&self) -> Option<&str> {
        self.proposal_id.as_deref()
    }

    pub fn details(&self) -> &BTreeMap<String, String> {
        &self.details
    }
}
