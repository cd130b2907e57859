//! Integration test: concurrent domains over overlapping state objects.
//!
//! Domains run in parallel; two domains may write the same account. The
//! store's versioned commit must keep every account consistent: balances
//! are conserved and each successful transfer bumps exactly two versions.

use std::{sync::Arc, thread};

use causeway_execution::{
    ExecutionEngine, InMemoryStateStore, PassthroughRevealer, RevealService, StateStore,
    TransferInstruction,
};
use causeway_finality::LocalAttestor;
use causeway_ingress::{CommitParams, commit_transaction};
use causeway_node::Node;
use causeway_types::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

const ACCOUNTS: usize = 8;
const INITIAL: u64 = 1_000;

fn name(i: usize) -> String {
    format!("user{i}")
}

fn seeded() -> Arc<InMemoryStateStore> {
    Arc::new(InMemoryStateStore::with_objects(
        (0..ACCOUNTS).map(|i| StateObject::new(ObjectId::account(&name(i)), 1, INITIAL)),
    ))
}

fn version_bumps(store: &InMemoryStateStore) -> u64 {
    (0..ACCOUNTS)
        .map(|i| store.get(&ObjectId::account(&name(i))).unwrap().version - 1)
        .sum()
}

/// Random transfers between random pairs. Write sets sometimes include a
/// third account so the same pair lands in several domains.
fn random_transfers(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|n| {
            let from = rng.gen_range(0..ACCOUNTS);
            let to = (from + rng.gen_range(1..ACCOUNTS)) % ACCOUNTS;
            let mut write_set = vec![ObjectId::account(&name(from)), ObjectId::account(&name(to))];
            if rng.gen_bool(0.5) {
                write_set.push(ObjectId::account(&name(rng.gen_range(0..ACCOUNTS))));
            }
            let payload = TransferInstruction::new(name(from), name(to), rng.gen_range(1..400));
            commit_transaction(CommitParams {
                ciphertext: payload.encode().unwrap(),
                read_set: write_set.clone(),
                write_set,
                max_fee: 1,
                nonce: n as u64,
            })
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_domains_conserve_balance() {
    let store = seeded();
    let shared: Arc<dyn StateStore> = store.clone();
    let reveal: Arc<dyn RevealService> = Arc::new(PassthroughRevealer);
    let mut node =
        Node::new(&CausewayConfig::default(), shared, reveal, Arc::new(LocalAttestor)).unwrap();

    for tx in random_transfers(42, 300) {
        node.submit(tx).unwrap();
    }
    let domains = node.router().len();
    assert!(domains > 1, "workload must span several domains");

    let report = node.process_all(1).await.unwrap();
    assert_eq!(report.finalized.len(), domains);
    assert!(report.deferred.is_empty());

    let executed: usize = report.finalized.iter().map(|r| r.executed).sum();
    let failed: usize = report.finalized.iter().map(|r| r.failed).sum();
    assert_eq!(executed + failed, 300);
    assert!(executed > 0);

    assert_eq!(store.total_balance(), u128::from(INITIAL) * ACCOUNTS as u128);
    assert_eq!(version_bumps(&store), 2 * executed as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_workload_same_domain_digests() {
    let mut commits = Vec::new();
    for _ in 0..2 {
        let store: Arc<dyn StateStore> = seeded();
        let reveal: Arc<dyn RevealService> = Arc::new(PassthroughRevealer);
        let mut node =
            Node::new(&CausewayConfig::default(), store, reveal, Arc::new(LocalAttestor)).unwrap();
        for tx in random_transfers(7, 60) {
            node.submit(tx).unwrap();
        }
        let report = node.process_all(1).await.unwrap();
        commits.push(
            report
                .finalized
                .iter()
                .map(|r| (r.domain_id.clone(), r.da_commit))
                .collect::<Vec<_>>(),
        );
    }
    assert_eq!(commits[0], commits[1]);
}

#[test]
fn racing_threads_serialize_on_shared_objects() {
    let store = seeded();
    let engine = Arc::new(ExecutionEngine::with_retries(1_000));
    let mut handles = Vec::new();

    for t in 0..4u64 {
        let store = Arc::clone(&store);
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let mut ok = 0u64;
            for tx in random_transfers(100 + t, 200) {
                if engine.execute(&tx, &tx.ciphertext, store.as_ref()).is_ok() {
                    ok += 1;
                }
            }
            ok
        }));
    }
    let executed: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(store.total_balance(), u128::from(INITIAL) * ACCOUNTS as u128);
    assert_eq!(version_bumps(&store), 2 * executed);
}
