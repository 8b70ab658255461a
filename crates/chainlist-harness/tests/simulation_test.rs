//! Deterministic simulation tests.
//!
//! Several clients share one server over turmoil's simulated network. Each
//! client replays a seeded workload and records which operations succeeded.
//! Once every client is done the shared list is checked against those
//! records.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chainlist_core::LinkedList;
use chainlist_harness::{Operation, OperationResult, Workload, connect, host_server};
use chainlist_proto::links_are_well_formed;
use chainlist_server::{ApiDriver, ConnectionLimits, SharedDriver, shared};

/// Counts recorded by the clients of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    inserts: usize,
    deletes: usize,
    failed_deletes: usize,
}

/// Run `clients` concurrent clients with `ops_per_client` operations each and
/// return the final values plus the combined tally.
fn run_simulation(
    sim_seed: u64,
    clients: u64,
    ops_per_client: usize,
    initial: &[i64],
    latency: Option<(Duration, Duration)>,
) -> (Vec<i64>, Tally) {
    let mut builder = turmoil::Builder::new();
    builder.simulation_duration(Duration::from_secs(120)).rng_seed(sim_seed);
    if let Some((min, max)) = latency {
        builder.min_message_latency(min).max_message_latency(max);
    }
    let mut sim = builder.build();

    let driver: SharedDriver =
        shared(ApiDriver::new(LinkedList::from_values(initial.iter().copied())));
    let tally = Arc::new(Mutex::new(Tally::default()));

    host_server(&mut sim, SharedDriver::clone(&driver), ConnectionLimits::default());

    for client_id in 0..clients {
        let tally = Arc::clone(&tally);
        sim.client(format!("client-{client_id}"), async move {
            let mut client = connect().await?;
            let ops = Workload::new(sim_seed ^ client_id)
                .with_value_range(4)
                .operations(ops_per_client);

            let mut local = Tally::default();
            for op in ops {
                let (status, body) = match op {
                    Operation::Insert { value, at_start } => {
                        client.insert(i64::from(value), Operation::position(at_start)).await?
                    },
                    Operation::Delete { value } => client.delete(i64::from(value)).await?,
                    Operation::Snapshot => client.list().await?,
                };

                let result = OperationResult::from_status(status, body.message());
                match (op, result) {
                    (Operation::Insert { .. }, OperationResult::Ok) => local.inserts += 1,
                    (Operation::Delete { .. }, OperationResult::Ok) => local.deletes += 1,
                    (Operation::Delete { .. }, OperationResult::Error(_)) => {
                        local.failed_deletes += 1;
                    },
                    (Operation::Snapshot, OperationResult::Ok) => {
                        let nodes = body.data().unwrap_or_default();
                        assert!(links_are_well_formed(nodes), "torn snapshot: {nodes:?}");
                    },
                    (op, result) => panic!("unexpected result {result:?} for {op:?}"),
                }
            }

            let mut shared_tally = tally.lock().expect("mutex poisoned");
            shared_tally.inserts += local.inserts;
            shared_tally.deletes += local.deletes;
            shared_tally.failed_deletes += local.failed_deletes;
            Ok(())
        });
    }

    sim.run().expect("simulation should succeed");

    let values = driver.try_lock().expect("no connection holds the driver").list().values();
    let tally = *tally.lock().expect("mutex poisoned");
    (values, tally)
}

#[test]
fn concurrent_clients_conserve_length() {
    let initial = [1, 2, 3];
    let (values, tally) = run_simulation(42, 4, 40, &initial, None);

    assert_eq!(values.len(), initial.len() + tally.inserts - tally.deletes);
    assert!(tally.inserts + tally.deletes + tally.failed_deletes <= 4 * 40);
}

#[test]
fn latency_reorders_but_conserves_length() {
    let latency = Some((Duration::from_millis(1), Duration::from_millis(40)));
    let (values, tally) = run_simulation(7, 6, 30, &[], latency);

    assert_eq!(values.len(), tally.inserts - tally.deletes);
}

#[test]
fn same_seed_same_final_list() {
    let latency = Some((Duration::from_millis(1), Duration::from_millis(20)));
    let first = run_simulation(1234, 3, 25, &[0], latency);
    let second = run_simulation(1234, 3, 25, &[0], latency);

    assert_eq!(first, second, "simulation must be reproducible from its seed");
}

#[test]
fn single_client_matches_model() {
    use chainlist_harness::ModelList;

    let ops = Workload::new(5).with_value_range(4).operations(60);
    let mut model = ModelList::new([1, 2, 3]);
    for op in &ops {
        model.apply(op);
    }

    // One client replays the same workload that the model just ran.
    let (values, _) = run_simulation(5, 1, 60, &[1, 2, 3], None);
    assert_eq!(values, model.values());
}
