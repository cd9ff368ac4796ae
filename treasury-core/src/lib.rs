//! Treasury Controller - In-Memory Multi-Signature Treasury Engine
//!
//! A policy-gated state machine that governs the lifecycle of spending
//! proposals against a shared pool of fungible assets.
//!
//! # Architecture
//!
//! - **clock**: Time injection seam (no implicit wall-clock reads in the core)
//! - **models**: Domain types (Transaction, Proposal, Signature, balances, audit log)
//! - **policy**: Six composable policy variants plus the manager that folds them
//! - **emergency**: Independent quorum that can freeze the treasury out-of-band
//! - **treasury**: The proposal state machine that ties everything together
//!
//! # Critical Invariants
//!
//! 1. Every operation that depends on wall-clock time receives it as a parameter.
//! 2. Execution is two-phase: all debits are validated before any are applied.
//! 3. Terminal proposal statuses (`Executed`, `Cancelled`, `Failed`) never reopen.

pub mod amount;
pub mod clock;
pub mod emergency;
pub mod error;
pub mod models;
pub mod policy;
pub mod treasury;

pub use clock::{Clock, SystemClock};
pub use error::TreasuryError;
pub use models::{
    asset::AssetId,
    audit::AuditLogEntry,
    balance::TreasuryBalance,
    category::Category,
    config::TreasuryConfig,
    emergency_action::EmergencyAction,
    proposal::{Proposal, ProposalStatus},
    signature::Signature,
    spending::SpendingRecord,
    transaction::{Transaction, TransactionType},
};
pub use policy::{Policy, PolicyContext, PolicyManager, PolicyViolation, ValidationPhase};
pub use treasury::Treasury;
