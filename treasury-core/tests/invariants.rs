//! Property-based checks of the state machine's core invariants across
//! randomized sequences of deposits and proposal lifecycles.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::BTreeSet;
use treasury_core::{Category, Transaction, TransactionType, Treasury};

fn signers() -> BTreeSet<String> {
    ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
}

proptest! {
    /// A balance never goes negative no matter how many proposals execute,
    /// since `execute_proposal` only ever debits what it already validated.
    #[test]
    fn balance_never_goes_negative(deposit_amount in 1.0f64..100_000.0, spend_amounts in prop::collection::vec(1.0f64..50_000.0, 0..8)) {
        let mut treasury = Treasury::new("t1".into(), signers(), 2, None, None).unwrap();
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        treasury.deposit("SUI", deposit_amount, "a", t0).unwrap();

        for (index, amount) in spend_amounts.iter().enumerate() {
            let tx = Transaction::new(format!("tx-{index}"), TransactionType::Transfer, "r".into(), *amount, "SUI".into(), "".into());
            if let Ok(proposal_id) = treasury.create_proposal("a", vec![tx], Category::Operations, "spend", t0) {
                treasury.sign_proposal(&proposal_id, "a", vec![1], t0).unwrap();
                treasury.sign_proposal(&proposal_id, "b", vec![1], t0).unwrap();
                let _ = treasury.execute_proposal(&proposal_id, "a", t0 + Duration::seconds(1));
            }
            prop_assert!(treasury.get_balance("SUI") >= 0.0);
        }
    }

    /// A second execution attempt on an already-executed proposal always
    /// fails; the proposal's terminal status never reopens.
    #[test]
    fn executed_proposal_cannot_execute_again(amount in 1.0f64..1_000.0) {
        let mut treasury = Treasury::new("t1".into(), signers(), 2, None, None).unwrap();
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        treasury.deposit("SUI", 1_000_000.0, "a", t0).unwrap();
        let tx = Transaction::new("tx".into(), TransactionType::Transfer, "r".into(), amount, "SUI".into(), "".into());
        let proposal_id = treasury.create_proposal("a", vec![tx], Category::Operations, "spend", t0).unwrap();
        treasury.sign_proposal(&proposal_id, "a", vec![1], t0).unwrap();
        treasury.sign_proposal(&proposal_id, "b", vec![1], t0).unwrap();
        treasury.execute_proposal(&proposal_id, "a", t0).unwrap();

        prop_assert!(treasury.execute_proposal(&proposal_id, "a", t0).is_err());
    }
}

#[test]
fn add_then_remove_signer_restores_the_original_set() {
    let mut treasury = Treasury::new("t1".into(), signers(), 2, None, None).unwrap();
    let t0 = Utc.timestamp_opt(0, 0).unwrap();
    let before: BTreeSet<String> = treasury.config().signers.clone();

    treasury.add_signer("d", "a").unwrap();
    treasury.remove_signer("d", "a", t0).unwrap();

    assert_eq!(treasury.config().signers, before);
}

#[test]
fn threshold_equal_to_signer_count_requires_unanimous_consent() {
    let mut treasury = Treasury::new("t1".into(), signers(), 3, None, None).unwrap();
    let t0 = Utc.timestamp_opt(0, 0).unwrap();
    treasury.deposit("SUI", 1_000.0, "a", t0).unwrap();
    let tx = Transaction::new("tx".into(), TransactionType::Transfer, "r".into(), 10.0, "SUI".into(), "".into());
    let proposal_id = treasury.create_proposal("a", vec![tx], Category::Operations, "x", t0).unwrap();

    treasury.sign_proposal(&proposal_id, "a", vec![1], t0).unwrap();
    treasury.sign_proposal(&proposal_id, "b", vec![1], t0).unwrap();
    assert!(treasury.execute_proposal(&proposal_id, "a", t0).is_err());

    treasury.sign_proposal(&proposal_id, "c", vec![1], t0).unwrap();
    assert!(treasury.execute_proposal(&proposal_id, "a", t0).is_ok());
}
