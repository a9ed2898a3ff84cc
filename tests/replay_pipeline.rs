//! End-to-end replay pipeline tests against the in-memory store and bus.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use replay_core::pacing::{FixedInterval, NoPacing};
use replay_core::{Dispatcher, Orchestrator};
use replay_transport::{MemoryBlobStore, MemoryBus};

const HUB: &str = "myhub";

/// The three-blob capture folder from the acceptance scenario: one real data
/// blob, one with the wrong extension, one placeholder-sized.
fn scenario_store() -> MemoryBlobStore {
    let mut store = MemoryBlobStore::new();
    store.insert_with_size(
        "ns/hub/0/2021/01/01/00/00/00_a.json",
        1000,
        br#"[{"id":1},{"id":2}]"#.to_vec(),
    );
    store.insert_with_size("ns/hub/0/2021/01/01/00/00/00_b.txt", 1000, b"ignored".to_vec());
    store.insert_with_size("ns/hub/0/2021/01/01/00/00/00_c.json", 100, b"[]".to_vec());
    store
}

fn orchestrator(
    store: MemoryBlobStore,
    bus: Arc<MemoryBus>,
    interval_ms: u64,
) -> Orchestrator {
    let dispatcher = Dispatcher::new(bus, HUB, Arc::new(FixedInterval::from_millis(interval_ms)));
    Orchestrator::new(Arc::new(store), dispatcher)
}

#[tokio::test(start_paused = true)]
async fn only_the_eligible_blob_is_replayed_in_order_and_paced() {
    let bus = Arc::new(MemoryBus::new());
    let start = tokio::time::Instant::now();

    let summary = orchestrator(scenario_store(), bus.clone(), 100)
        .run(None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.blobs_seen, 3);
    assert_eq!(summary.replayed, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.messages_sent, 2);

    // Exactly the two messages of blob a, in capture order.
    assert_eq!(bus.payloads(), vec![r#"{"id":1}"#, r#"{"id":2}"#]);
    assert!(bus.sent().iter().all(|(dest, _)| dest == HUB));

    // One paced interval after each message, including the last.
    assert_eq!(start.elapsed(), Duration::from_millis(200));
}

#[tokio::test]
async fn rerunning_an_unchanged_container_reproduces_the_same_sequence() {
    let token = CancellationToken::new();

    let first_bus = Arc::new(MemoryBus::new());
    orchestrator(scenario_store(), first_bus.clone(), 0)
        .run(None, &token)
        .await
        .unwrap();

    let second_bus = Arc::new(MemoryBus::new());
    orchestrator(scenario_store(), second_bus.clone(), 0)
        .run(None, &token)
        .await
        .unwrap();

    assert_eq!(first_bus.payloads(), second_bus.payloads());
    assert_eq!(first_bus.payloads(), vec![r#"{"id":1}"#, r#"{"id":2}"#]);
}

#[tokio::test]
async fn prefix_narrows_the_scan() {
    let mut store = scenario_store();
    store.insert_with_size("other/hub/0/d.json", 1000, br#"[{"id":9}]"#.to_vec());
    let bus = Arc::new(MemoryBus::new());

    let summary = orchestrator(store, bus.clone(), 0)
        .run(Some("other/"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.blobs_seen, 1);
    assert_eq!(bus.payloads(), vec![r#"{"id":9}"#]);
}

#[tokio::test]
async fn paging_does_not_change_replay_order() {
    let mut store = MemoryBlobStore::new();
    store.set_page_size(1);
    for i in 0..4 {
        store.insert_with_size(
            format!("ns/hub/0/{i:02}.json"),
            1000,
            format!(r#"[{{"seq":{i}}}]"#).into_bytes(),
        );
    }
    let bus = Arc::new(MemoryBus::new());

    let dispatcher = Dispatcher::new(bus.clone(), HUB, Arc::new(NoPacing));
    let summary = Orchestrator::new(Arc::new(store), dispatcher)
        .run(None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.replayed, 4);
    assert_eq!(
        bus.payloads(),
        vec![
            r#"{"seq":0}"#,
            r#"{"seq":1}"#,
            r#"{"seq":2}"#,
            r#"{"seq":3}"#
        ]
    );
}

#[tokio::test]
async fn a_bad_blob_between_good_ones_is_contained() {
    let mut store = MemoryBlobStore::new();
    store.insert_with_size("ns/hub/0/00_good.json", 1000, br#"[{"id":1}]"#.to_vec());
    store.insert_with_size("ns/hub/0/01_bad.json", 1000, b"{ truncated".to_vec());
    store.insert_with_size("ns/hub/0/02_good.json", 1000, br#"[{"id":2}]"#.to_vec());
    let bus = Arc::new(MemoryBus::new());

    let dispatcher = Dispatcher::new(bus.clone(), HUB, Arc::new(NoPacing));
    let summary = Orchestrator::new(Arc::new(store), dispatcher)
        .run(None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.replayed, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.any_failed());
    assert_eq!(bus.payloads(), vec![r#"{"id":1}"#, r#"{"id":2}"#]);
}
