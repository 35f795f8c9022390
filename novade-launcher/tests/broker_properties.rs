// novade-launcher/tests/broker_properties.rs

use async_trait::async_trait;
use novade_launcher::config::BrokerConfig;
use novade_launcher::error::{ActivationError, LaunchError};
use novade_launcher::process::{Activator, ProcessProbe, ProcessSpawner, SpawnedProcess};
use novade_launcher::{ExecutableIdentity, LaunchBroker, LaunchOutcome, LaunchRequest};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Hands out increasing pids and marks them alive in the shared process table.
struct FakeSpawner {
    table: Arc<ProcessTable>,
    next_pid: AtomicU32,
    calls: AtomicUsize,
    delay: Duration,
    fail_with: Option<io::ErrorKind>,
}

impl FakeSpawner {
    fn new(table: Arc<ProcessTable>) -> Self {
        Self {
            table,
            next_pid: AtomicU32::new(1000),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail_with: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn failing(mut self, kind: io::ErrorKind) -> Self {
        self.fail_with = Some(kind);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessSpawner for FakeSpawner {
    async fn spawn(&self, _identity: &ExecutableIdentity, _arguments: &[String]) -> io::Result<SpawnedProcess> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(kind) = self.fail_with {
            return Err(io::Error::new(kind, "fake spawn failure"));
        }
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        self.table.start(pid);
        Ok(SpawnedProcess { pid })
    }
}

#[derive(Default)]
struct FakeActivator {
    activated: Mutex<Vec<u32>>,
    delay: Option<Duration>,
}

impl FakeActivator {
    fn calls(&self) -> usize {
        self.activated.lock().len()
    }
}

#[async_trait]
impl Activator for FakeActivator {
    async fn activate(&self, pid: u32, _identity: &ExecutableIdentity) -> Result<(), ActivationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.activated.lock().push(pid);
        Ok(())
    }
}

/// Set of pids considered alive by the probe.
#[derive(Default)]
struct ProcessTable {
    alive: Mutex<HashSet<u32>>,
    probes: AtomicUsize,
}

impl ProcessTable {
    fn start(&self, pid: u32) {
        self.alive.lock().insert(pid);
    }

    fn exit(&self, pid: u32) {
        self.alive.lock().remove(&pid);
    }
}

struct TableProbe(Arc<ProcessTable>);

impl ProcessProbe for TableProbe {
    fn is_running(&self, pid: u32, _identity: &ExecutableIdentity) -> bool {
        self.0.probes.fetch_add(1, Ordering::SeqCst);
        self.0.alive.lock().contains(&pid)
    }
}

struct Harness {
    broker: Arc<LaunchBroker>,
    spawner: Arc<FakeSpawner>,
    activator: Arc<FakeActivator>,
    table: Arc<ProcessTable>,
}

fn harness_with(
    spawner: impl FnOnce(Arc<ProcessTable>) -> FakeSpawner,
    activator: FakeActivator,
    config: BrokerConfig,
) -> Harness {
    let table = Arc::new(ProcessTable::default());
    let spawner = Arc::new(spawner(table.clone()));
    let activator = Arc::new(activator);
    let broker = Arc::new(LaunchBroker::new(
        spawner.clone(),
        activator.clone(),
        Arc::new(TableProbe(table.clone())),
        &config,
    ));
    Harness {
        broker,
        spawner,
        activator,
        table,
    }
}

fn harness() -> Harness {
    harness_with(FakeSpawner::new, FakeActivator::default(), BrokerConfig::default())
}

fn request(values: &[&str]) -> LaunchRequest {
    LaunchRequest::from_wire(values.iter().map(|v| v.to_string()).collect()).unwrap()
}

#[tokio::test]
async fn nothing_running_spawns_once_and_records() {
    let h = harness();

    let outcome = h.broker.handle(request(&["/usr/bin/editor", "notes.txt"])).await;

    let pid = match outcome {
        LaunchOutcome::Launched(pid) => pid,
        other => panic!("expected Launched, got {:?}", other),
    };
    assert_eq!(h.spawner.calls(), 1);
    assert_eq!(h.activator.calls(), 0);
    assert_eq!(h.broker.snapshot().len(), 1);
    assert_eq!(h.broker.lookup("/usr/bin/editor").map(|r| r.pid), Some(pid));
}

#[tokio::test]
async fn live_record_is_activated_and_not_overwritten() {
    let h = harness();
    let first = h.broker.handle(request(&["/usr/bin/editor", "a.txt"])).await;
    let before = h.broker.lookup("/usr/bin/editor").unwrap();

    let second = h.broker.handle(request(&["/usr/bin/editor", "b.txt"])).await;

    let pid = first.pid().unwrap();
    assert!(matches!(second, LaunchOutcome::Activated(p) if p == pid));
    assert_eq!(h.spawner.calls(), 1);
    assert_eq!(h.activator.calls(), 1);
    assert_eq!(h.broker.lookup("/usr/bin/editor").unwrap(), before);
}

#[tokio::test]
async fn stale_record_is_replaced_by_fresh_spawn() {
    let h = harness();
    let old_pid = h.broker.handle(request(&["/usr/bin/editor"])).await.pid().unwrap();
    h.table.exit(old_pid);

    let outcome = h.broker.handle(request(&["/usr/bin/editor", "--new"])).await;

    let new_pid = match outcome {
        LaunchOutcome::Launched(pid) => pid,
        other => panic!("expected Launched, got {:?}", other),
    };
    assert_ne!(new_pid, old_pid);
    assert_eq!(h.spawner.calls(), 2);
    assert_eq!(h.activator.calls(), 0);

    let records = h.broker.snapshot();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pid, new_pid);
    assert_eq!(records[0].last_arguments, vec!["--new".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_spawn_exactly_once() {
    const REQUESTS: usize = 16;
    let h = harness_with(
        |table| FakeSpawner::new(table).with_delay(Duration::from_millis(50)),
        FakeActivator::default(),
        BrokerConfig::default(),
    );

    let mut tasks = Vec::new();
    for i in 0..REQUESTS {
        let broker = h.broker.clone();
        tasks.push(tokio::spawn(async move {
            broker.launch("/usr/bin/editor", vec![format!("file-{}.txt", i)]).await
        }));
    }

    let mut launched = 0;
    let mut activated = 0;
    for task in tasks {
        match task.await.unwrap() {
            LaunchOutcome::Launched(_) => launched += 1,
            LaunchOutcome::Activated(_) => activated += 1,
            LaunchOutcome::Failed(e) => panic!("unexpected failure: {}", e),
        }
    }

    assert_eq!(launched, 1);
    assert_eq!(activated, REQUESTS - 1);
    assert_eq!(h.spawner.calls(), 1);
    assert_eq!(h.activator.calls(), REQUESTS - 1);
    assert_eq!(h.broker.snapshot().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_identities_do_not_serialize_each_other() {
    let h = harness_with(
        |table| FakeSpawner::new(table).with_delay(Duration::from_millis(300)),
        FakeActivator::default(),
        BrokerConfig::default(),
    );

    let started = std::time::Instant::now();
    let a = tokio::spawn({
        let broker = h.broker.clone();
        async move { broker.launch("/usr/bin/a", Vec::new()).await }
    });
    let b = tokio::spawn({
        let broker = h.broker.clone();
        async move { broker.launch("/usr/bin/b", Vec::new()).await }
    });
    assert!(matches!(a.await.unwrap(), LaunchOutcome::Launched(_)));
    assert!(matches!(b.await.unwrap(), LaunchOutcome::Launched(_)));

    assert!(started.elapsed() < Duration::from_millis(550));
    assert_eq!(h.broker.snapshot().len(), 2);
}

#[tokio::test]
async fn empty_identity_touches_nothing() {
    let h = harness();

    let outcome = h.broker.handle(LaunchRequest::new("", vec!["x".to_string()])).await;

    assert!(matches!(outcome, LaunchOutcome::Failed(LaunchError::InvalidRequest(_))));
    assert_eq!(h.spawner.calls(), 0);
    assert_eq!(h.activator.calls(), 0);
    assert_eq!(h.table.probes.load(Ordering::SeqCst), 0);
    assert!(h.broker.snapshot().is_empty());
}

#[tokio::test]
async fn flag_scenario_launches_then_activates() {
    let h = harness();

    let first = h.broker.handle(request(&["/usr/bin/foo", "--flag"])).await;
    let pid = match first {
        LaunchOutcome::Launched(pid) => pid,
        other => panic!("expected Launched, got {:?}", other),
    };
    let record = h.broker.lookup("/usr/bin/foo").unwrap();
    assert_eq!(record.last_arguments, vec!["--flag".to_string()]);

    let second = h.broker.handle(request(&["/usr/bin/foo", "--flag"])).await;
    assert!(matches!(second, LaunchOutcome::Activated(p) if p == pid));
    assert_eq!(h.broker.lookup("/usr/bin/foo").unwrap().last_arguments, vec!["--flag".to_string()]);
}

#[tokio::test]
async fn spawn_failure_leaves_registry_consistent() {
    let h = harness_with(
        |table| FakeSpawner::new(table).failing(io::ErrorKind::PermissionDenied),
        FakeActivator::default(),
        BrokerConfig::default(),
    );

    let outcome = h.broker.handle(request(&["/usr/bin/locked"])).await;

    match outcome {
        LaunchOutcome::Failed(LaunchError::Spawn { identity, source }) => {
            assert_eq!(identity, "/usr/bin/locked");
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected Failed(Spawn), got {:?}", other),
    }
    assert!(h.broker.lookup("/usr/bin/locked").is_none());
    assert!(!h.broker.is_running("/usr/bin/locked").await);
}

#[tokio::test]
async fn slow_spawner_times_out_without_wedging_the_identity() {
    let h = harness_with(
        |table| FakeSpawner::new(table).with_delay(Duration::from_millis(500)),
        FakeActivator::default(),
        BrokerConfig {
            spawn_timeout_ms: 20,
            activation_timeout_ms: 20,
        },
    );

    for _ in 0..2 {
        let started = std::time::Instant::now();
        let outcome = h.broker.handle(request(&["/usr/bin/slow"])).await;
        assert!(started.elapsed() < Duration::from_millis(400));
        match outcome {
            LaunchOutcome::Failed(LaunchError::Timeout { operation, after }) => {
                assert_eq!(operation, "spawn");
                assert_eq!(after, Duration::from_millis(20));
            }
            other => panic!("expected Failed(Timeout), got {:?}", other),
        }
    }
    assert!(h.broker.snapshot().is_empty());
}

#[tokio::test]
async fn slow_activation_times_out_and_keeps_record() {
    let h = harness_with(
        FakeSpawner::new,
        FakeActivator {
            delay: Some(Duration::from_millis(500)),
            ..FakeActivator::default()
        },
        BrokerConfig {
            spawn_timeout_ms: 1_000,
            activation_timeout_ms: 20,
        },
    );
    let pid = h.broker.handle(request(&["/usr/bin/editor"])).await.pid().unwrap();

    let outcome = h.broker.activate("/usr/bin/editor").await;

    assert!(matches!(
        outcome,
        LaunchOutcome::Failed(LaunchError::Timeout { operation: "activation", .. })
    ));
    assert_eq!(h.broker.lookup("/usr/bin/editor").map(|r| r.pid), Some(pid));
    assert_eq!(h.spawner.calls(), 1);
}

#[tokio::test]
async fn is_running_verifies_against_process_table() {
    let h = harness();
    let pid = h.broker.launch("/usr/bin/editor", Vec::new()).await.pid().unwrap();
    assert!(h.broker.is_running("/usr/bin/editor").await);

    h.table.exit(pid);

    assert!(!h.broker.is_running("/usr/bin/editor").await);
    assert!(h.broker.lookup("/usr/bin/editor").is_none());
}

#[tokio::test]
async fn activate_starts_a_missing_application_without_arguments() {
    let h = harness();

    let outcome = h.broker.activate("/usr/bin/editor").await;

    assert!(matches!(outcome, LaunchOutcome::Launched(_)));
    assert!(h.broker.lookup("/usr/bin/editor").unwrap().last_arguments.is_empty());
}
