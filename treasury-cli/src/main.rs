//! Thin command-line shell around `treasury_core`.
//!
//! Loads a treasury definition and a scripted sequence of operations from a
//! single JSON file, replays them in order against an in-memory `Treasury`,
//! and prints the resulting state. Intended for demos and smoke tests, not
//! as a production operator interface.

use clap::Parser;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;
use treasury_core::clock::{Clock, SystemClock};
use treasury_core::{Category, Transaction, TransactionType, Treasury};

#[derive(Parser, Debug)]
#[command(name = "treasury-cli", about = "Replay a scripted treasury session")]
struct Args {
    /// Path to a JSON script (see `Script` for the expected shape).
    script: PathBuf,

    /// Increase log verbosity (`-v`, `-vv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Deserialize)]
struct Script {
    treasury: TreasurySetup,
    #[serde(default)]
    operations: Vec<Operation>,
}

#[derive(Debug, Deserialize)]
struct TreasurySetup {
    treasury_id: String,
    signers: BTreeSet<String>,
    threshold: u32,
    #[serde(default)]
    emergency_threshold: Option<u32>,
    #[serde(default)]
    emergency_signers: Option<BTreeSet<String>>,
}

#[derive(Debug, Deserialize)]
struct TransactionSpec {
    tx_id: String,
    tx_type: String,
    recipient: String,
    amount: f64,
    coin_type: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Operation {
    Deposit {
        coin_type: String,
        amount: f64,
        actor: String,
    },
    CreateProposal {
        creator: String,
        transactions: Vec<TransactionSpec>,
        category: String,
        description: String,
    },
    SignProposal {
        proposal_id: String,
        signer: String,
    },
    ExecuteProposal {
        proposal_id: String,
        executor: String,
    },
    CancelProposal {
        proposal_id: String,
        canceller: String,
    },
    TriggerEmergencyFreeze {
        initiator: String,
        reason: String,
    },
    SignEmergencyAction {
        action_id: String,
        signer: String,
    },
    ExecuteEmergencyAction {
        action_id: String,
        executor: String,
    },
    UnfreezeTreasury {
        signer: String,
        reason: String,
    },
}

fn parse_category(raw: &str) -> Result<Category, String> {
    match raw {
        "operations" => Ok(Category::Operations),
        "marketing" => Ok(Category::Marketing),
        "development" => Ok(Category::Development),
        "research" => Ok(Category::Research),
        "security" => Ok(Category::Security),
        "other" => Ok(Category::Other),
        other => Err(format!("unknown category {other}")),
    }
}

fn parse_tx_type(raw: &str) -> Result<TransactionType, String> {
    match raw {
        "transfer" => Ok(TransactionType::Transfer),
        "burn" => Ok(TransactionType::Burn),
        "mint" => Ok(TransactionType::Mint),
        other => Err(format!("unknown transaction type {other}")),
    }
}

fn run(args: Args) -> Result<(), String> {
    let raw = std::fs::read_to_string(&args.script).map_err(|e| format!("reading script: {e}"))?;
    let script: Script = serde_json::from_str(&raw).map_err(|e| format!("parsing script: {e}"))?;

    let mut treasury = Treasury::new(
        script.treasury.treasury_id,
        script.treasury.signers,
        script.treasury.threshold,
        script.treasury.emergency_threshold,
        script.treasury.emergency_signers,
    )
    .map_err(|e| e.to_string())?;

    let clock = SystemClock;
    let mut created_proposals = Vec::new();
    let mut created_actions = Vec::new();
    for (index, operation) in script.operations.into_iter().enumerate() {
        let now = clock.now();
        let operation = resolve_refs(operation, &created_proposals, &created_actions);
        match apply(&mut treasury, operation, now) {
            Ok(Created::Proposal(id)) => created_proposals.push(id),
            Ok(Created::EmergencyAction(id)) => created_actions.push(id),
            Ok(Created::Nothing) => {}
            Err(e) => tracing::warn!(step = index, error = %e, "operation failed"),
        }
    }

    let state = treasury.get_treasury_state();
    let rendered = serde_json::to_string_pretty(&state).map_err(|e| e.to_string())?;
    println!("{rendered}");
    Ok(())
}

enum Created {
    Nothing,
    Proposal(String),
    EmergencyAction(String),
}

/// Substitutes a `"$N"` placeholder with the id returned by the Nth
/// `create_proposal` (for proposal ids) or `trigger_emergency_freeze` (for
/// emergency action ids) call, so a script can reference something it just
/// created without knowing its generated UUID in advance.
fn resolve_refs(operation: Operation, created_proposals: &[String], created_actions: &[String]) -> Operation {
    fn resolve(id: String, created: &[String]) -> String {
        id.strip_prefix('$')
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| created.get(n))
            .cloned()
            .unwrap_or(id)
    }

    match operation {
        Operation::SignProposal { proposal_id, signer } => Operation::SignProposal {
            proposal_id: resolve(proposal_id, created_proposals),
            signer,
        },
        Operation::ExecuteProposal { proposal_id, executor } => Operation::ExecuteProposal {
            proposal_id: resolve(proposal_id, created_proposals),
            executor,
        },
        Operation::CancelProposal { proposal_id, canceller } => Operation::CancelProposal {
            proposal_id: resolve(proposal_id, created_proposals),
            canceller,
        },
        Operation::SignEmergencyAction { action_id, signer } => Operation::SignEmergencyAction {
            action_id: resolve(action_id, created_actions),
            signer,
        },
        Operation::ExecuteEmergencyAction { action_id, executor } => Operation::ExecuteEmergencyAction {
            action_id: resolve(action_id, created_actions),
            executor,
        },
        other => other,
    }
}

fn apply(treasury: &mut Treasury, operation: Operation, now: chrono::DateTime<chrono::Utc>) -> Result<Created, String> {
    match operation {
        Operation::Deposit { coin_type, amount, actor } => treasury
            .deposit(coin_type, amount, &actor, now)
            .map(|_| Created::Nothing)
            .map_err(|e| e.to_string()),
        Operation::CreateProposal {
            creator,
            transactions,
            category,
            description,
        } => {
            let category = parse_category(&category)?;
            let transactions = transactions
                .into_iter()
                .map(|t| {
                    Ok(Transaction::new(
                        t.tx_id,
                        parse_tx_type(&t.tx_type)?,
                        t.recipient,
                        t.amount,
                        t.coin_type.into(),
                        t.description,
                    ))
                })
                .collect::<Result<Vec<_>, String>>()?;
            treasury
                .create_proposal(&creator, transactions, category, description, now)
                .map(Created::Proposal)
                .map_err(|e| e.to_string())
        }
        Operation::SignProposal { proposal_id, signer } => treasury
            .sign_proposal(&proposal_id, &signer, vec![1], now)
            .map(|_| Created::Nothing)
            .map_err(|e| e.to_string()),
        Operation::ExecuteProposal { proposal_id, executor } => treasury
            .execute_proposal(&proposal_id, &executor, now)
            .map(|_| Created::Nothing)
            .map_err(|e| e.to_string()),
        Operation::CancelProposal { proposal_id, canceller } => treasury
            .cancel_proposal(&proposal_id, &canceller, now)
            .map(|_| Created::Nothing)
            .map_err(|e| e.to_string()),
        Operation::TriggerEmergencyFreeze { initiator, reason } => treasury
            .trigger_emergency_freeze(&initiator, reason, now)
            .map(Created::EmergencyAction)
            .map_err(|e| e.to_string()),
        Operation::SignEmergencyAction { action_id, signer } => treasury
            .sign_emergency_action(&action_id, &signer, vec![1], now)
            .map(|_| Created::Nothing)
            .map_err(|e| e.to_string()),
        Operation::ExecuteEmergencyAction { action_id, executor } => treasury
            .execute_emergency_action(&action_id, &executor, now)
            .map(|_| Created::Nothing)
            .map_err(|e| e.to_string()),
        Operation::UnfreezeTreasury { signer, reason } => treasury
            .unfreeze_treasury(&signer, reason, now)
            .map(|_| Created::Nothing)
            .map_err(|e| e.to_string()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
