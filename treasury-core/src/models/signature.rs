//! Signature model
//!
//! Cryptographic verification is out of scope here, left to an external
//! collaborator; a signature is opaque bytes validated only for
//! non-emptiness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque signer attestation bound to a transaction hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    signer: String,
    signature_bytes: Vec<u8>,
    timestamp: DateTime<Utc>,
    tx_hash: String,
}

impl Signature {
    pub fn new(
        signer: String,
        signature_bytes: Vec<u8>,
        timestamp: DateTime<Utc>,
        tx_hash: String,
    ) -> Self {
        Self {
            signer,
            signature_bytes,
            timestamp,
            tx_hash,
        }
    }

    pub fn signer(&self) -> &str {
        &self.signer
    }

    pub fn signature_bytes(&self) -> &[u8] {
        &self.signature_bytes
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    /// True if both the signer identity and the signature payload are
    /// non-empty. This is the full extent of "verification" in scope here;
    /// real cryptographic checks are an external collaborator's job.
    pub fn is_well_formed(&self) -> bool {
        !self.signer.is_empty() && !self.signature_bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signer_or_bytes_is_not_well_formed() {
        let now = Utc::now();
        assert!(!Signature::new(String::new(), vec![1], now, "h".into()).is_well_formed());
        assert!(!Signature::new("alice".into(), vec![], now, "h".into()).is_well_formed());
        assert!(Signature::new("alice".into(), vec![1], now, "h".into()).is_well_formed());
    }
}
