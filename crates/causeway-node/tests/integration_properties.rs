//! Integration test: the pipeline's safety and determinism properties,
//! each checked end-to-end through the public crate APIs.

use causeway_execution::{ExecutionEngine, InMemoryStateStore, StateStore, TransferInstruction};
use causeway_finality::{DaPublisher, FinalityGate, LocalAttestor};
use causeway_ingress::{AdmissionValidator, assign_domain};
use causeway_ordering::{da_commitment, order_domain, order_transactions};
use causeway_types::*;
use rand::seq::SliceRandom;

fn acct(name: &str) -> ObjectId {
    ObjectId::account(name)
}

fn alice_bob_store() -> InMemoryStateStore {
    InMemoryStateStore::with_objects([
        StateObject::new(acct("Alice"), 1, 100),
        StateObject::new(acct("Bob"), 1, 5),
    ])
}

fn transfer_tx(id: &str, amount: u64, write_set: Vec<ObjectId>) -> (Transaction, Vec<u8>) {
    let payload = TransferInstruction::new("Alice", "Bob", amount).encode().unwrap();
    let mut tx = Transaction::dummy(id, [7; 32]);
    tx.write_set = write_set;
    tx.ciphertext = payload.clone();
    (tx, payload)
}

fn executed_domain(txs: &[Transaction]) -> CausalDomain {
    let mut d = CausalDomain::new(assign_domain(&txs[0].write_set));
    for tx in txs {
        d.push(tx.clone()).unwrap();
    }
    order_domain(&mut d).unwrap();
    for i in 0..txs.len() {
        d.record_outcome(i, TxOutcome::Executed).unwrap();
    }
    d
}

// 1
#[test]
fn domain_assignment_ignores_write_set_order() {
    let ab = assign_domain(&[acct("A"), acct("B")]);
    let ba = assign_domain(&[acct("B"), acct("A")]);
    assert_eq!(ab, ba);

    let mut rng = rand::thread_rng();
    let mut set: Vec<ObjectId> = (0..12).map(|i| acct(&format!("user{i}"))).collect();
    let expected = assign_domain(&set);
    for _ in 0..50 {
        set.shuffle(&mut rng);
        assert_eq!(assign_domain(&set), expected);
    }
}

// 2
#[test]
fn ordering_is_repeatable_and_a_permutation() {
    let mut pending: Vec<Transaction> = (0..40)
        .map(|i| Transaction::dummy_random(&format!("tx{i}")))
        .collect();
    let first = order_transactions(&pending);
    let second = order_transactions(&pending);
    assert_eq!(first, second);

    pending.shuffle(&mut rand::thread_rng());
    assert_eq!(order_transactions(&pending), first, "arrival order must not matter");

    let mut a: Vec<&TxId> = pending.iter().map(|t| &t.id).collect();
    let mut b: Vec<&TxId> = first.iter().map(|t| &t.id).collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);

    let mut d = CausalDomain::new(DomainId::from_digest(&[0; 32]));
    for tx in &pending {
        d.push(tx.clone()).unwrap();
    }
    order_domain(&mut d).unwrap();
    let once = d.ordered().to_vec();
    order_domain(&mut d).unwrap();
    assert_eq!(d.ordered(), once.as_slice());
    assert!(d.is_permutation_of_pending());
}

// 3
#[test]
fn finality_requires_da() {
    let (tx, _) = transfer_tx("t1", 10, vec![acct("Alice"), acct("Bob")]);
    let mut d = executed_domain(&[tx]);
    let mut gate = FinalityGate::new();

    for _ in 0..3 {
        let err = gate.finalize(&mut d, 1).unwrap_err();
        assert!(matches!(
            err,
            CausewayError::Finality(FinalityError::DaUnavailable(_))
        ));
        assert!(!d.is_finalized());
    }

    DaPublisher::new(LocalAttestor).publish(&mut d).unwrap();
    gate.finalize(&mut d, 1).unwrap();
    assert!(d.is_finalized());

    assert!(gate.finalize(&mut d, 2).is_err());
    assert!(DaPublisher::new(LocalAttestor).publish(&mut d).is_err());
    assert!(d.is_finalized(), "finality is irreversible");
    assert_eq!(d.phase(), DomainPhase::Finalized);
}

// 4
#[test]
fn transfer_updates_balances_and_versions() {
    let store = alice_bob_store();
    let engine = ExecutionEngine::new();

    let (tx, payload) = transfer_tx("t1", 10, vec![acct("Alice"), acct("Bob")]);
    engine.execute(&tx, &payload, &store).unwrap();
    assert_eq!(store.get(&acct("Alice")).unwrap(), StateObject::new(acct("Alice"), 2, 90));
    assert_eq!(store.get(&acct("Bob")).unwrap(), StateObject::new(acct("Bob"), 2, 15));

    let (tx, payload) = transfer_tx("t2", 1000, vec![acct("Alice"), acct("Bob")]);
    let err = engine.execute(&tx, &payload, &store).unwrap_err();
    assert!(matches!(err, ExecutionError::InsufficientFunds { .. }));
    assert_eq!(store.get(&acct("Alice")).unwrap(), StateObject::new(acct("Alice"), 2, 90));
    assert_eq!(store.get(&acct("Bob")).unwrap(), StateObject::new(acct("Bob"), 2, 15));
}

// 5
#[test]
fn write_set_is_enforced() {
    let store = alice_bob_store();
    let engine = ExecutionEngine::new();

    for write_set in [
        vec![acct("Alice")],
        vec![acct("Bob")],
        vec![acct("Carol"), acct("Dave")],
    ] {
        let (tx, payload) = transfer_tx("t1", 10, write_set);
        let err = engine.execute(&tx, &payload, &store).unwrap_err();
        assert!(matches!(err, ExecutionError::WriteSetMismatch(_)));
    }
    assert_eq!(store.get(&acct("Alice")).unwrap(), StateObject::new(acct("Alice"), 1, 100));
    assert_eq!(store.get(&acct("Bob")).unwrap(), StateObject::new(acct("Bob"), 1, 5));
}

// 6
#[test]
fn admission_rejects_malformed_submissions() {
    let mut validator = AdmissionValidator::new();

    let mut no_reads = Transaction::dummy("r", [1; 32]);
    no_reads.read_set.clear();
    assert_eq!(
        validator.admit(&no_reads).unwrap_err(),
        AdmissionError::MissingSets {
            which: DeclaredSet::Read
        }
    );

    let mut no_writes = Transaction::dummy("w", [1; 32]);
    no_writes.write_set.clear();
    assert_eq!(
        validator.admit(&no_writes).unwrap_err(),
        AdmissionError::MissingSets {
            which: DeclaredSet::Write
        }
    );

    let mut no_fee = Transaction::dummy("f", [1; 32]);
    no_fee.fee = FeeEnvelope::new(0);
    assert_eq!(validator.admit(&no_fee).unwrap_err(), AdmissionError::MissingFee);

    assert_eq!(validator.stats().admitted, 0);
    assert_eq!(validator.stats().rejected, 3);
}

// 7
#[test]
fn da_commit_tracks_ordered_commitments_only() {
    let a = Transaction::dummy("a", [1; 32]);
    let b = Transaction::dummy("b", [2; 32]);
    let c = Transaction::dummy("c", [3; 32]);

    let mut d1 = executed_domain(&[a.clone(), b.clone()]);
    let publisher = DaPublisher::new(LocalAttestor);
    let first = publisher.publish(&mut d1).unwrap();
    assert_eq!(publisher.publish(&mut d1).unwrap(), first, "republish is idempotent");

    // Same commitments, different ids, ciphertexts and arrival order.
    let mut a2 = Transaction::dummy("other-a", [1; 32]);
    a2.ciphertext = vec![9, 9, 9];
    let mut d2 = executed_domain(&[b.clone(), a2]);
    assert_eq!(publisher.publish(&mut d2).unwrap(), first);

    // A different commitment set changes the digest.
    let mut d3 = executed_domain(&[a.clone(), c]);
    assert_ne!(publisher.publish(&mut d3).unwrap(), first);

    // A different order of the same commitments changes the digest.
    assert_ne!(da_commitment(&[b, a]), first);
}
