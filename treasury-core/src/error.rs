//! Treasury-wide error taxonomy.
//!
//! A closed set of six error kinds is shared across every public operation,
//! rather than one error enum per submodule. `#[from]`
//! lifts a [`crate::policy::PolicyViolation`] into `TreasuryError::PolicyViolation`
//! at the one seam where policies are invoked by the core.

use crate::policy::PolicyViolation;
use thiserror::Error;

/// Error returned by any treasury-core operation.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum TreasuryError {
    #[error("{actor} is not an authorized signer")]
    PermissionDenied { actor: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("policy violation: {0}")]
    PolicyViolation(#[from] PolicyViolation),

    #[error("runtime fault: {0}")]
    RuntimeFault(String),
}

impl TreasuryError {
    pub fn permission_denied(actor: impl Into<String>) -> Self {
        Self::PermissionDenied { actor: actor.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn runtime_fault(message: impl Into<String>) -> Self {
        Self::RuntimeFault(message.into())
    }
}
