//! In-memory doubles for the cluster and the notification endpoint.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use sidecar_core::{
    ResourceEvent, ResourceEventStream, ResourceKind, ResourceRecord, ResourceSource,
    SelectorConfig, SourceError, SourceResult,
};
use sidecar_notify::{Notifier, NotifyError, NotifyResult};
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::UnboundedReceiverStream;

type EventSender = mpsc::UnboundedSender<SourceResult<ResourceEvent>>;

struct Subscription {
    kind: ResourceKind,
    namespace: Option<String>,
    sender: EventSender,
}

#[derive(Default)]
struct ClusterState {
    objects: Vec<ResourceRecord>,
    failing_kinds: Vec<ResourceKind>,
    list_calls: Vec<(ResourceKind, Option<String>)>,
    subscriptions: Vec<Subscription>,
}

/// [`ResourceSource`] backed by an in-memory object list and test-driven watch streams.
///
/// `list` filters stored objects by kind, namespace and selector, mirroring server-side
/// filtering. Watch events are pushed with [`FakeCluster::emit`] and are delivered
/// without selector filtering so client-side matching stays observable.
#[derive(Clone)]
pub struct FakeCluster {
    state: Arc<Mutex<ClusterState>>,
    subscribed: Arc<watch::Sender<usize>>,
}

impl Default for FakeCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCluster {
    /// Empty cluster.
    #[must_use]
    pub fn new() -> Self {
        let (subscribed, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(ClusterState::default())),
            subscribed: Arc::new(subscribed),
        }
    }

    /// Cluster pre-populated with `records`.
    #[must_use]
    pub fn with_objects(records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        let cluster = Self::new();
        for record in records {
            cluster.insert(record);
        }
        cluster
    }

    /// Store or replace an object returned by `list`.
    pub fn insert(&self, record: ResourceRecord) {
        let mut state = self.lock();
        state.objects.retain(|existing| existing.key != record.key);
        state.objects.push(record);
    }

    /// Make every `list` call for `kind` fail.
    pub fn fail_lists_for(&self, kind: ResourceKind) {
        self.lock().failing_kinds.push(kind);
    }

    /// `(kind, namespace)` pairs passed to `list`, in call order.
    #[must_use]
    pub fn list_calls(&self) -> Vec<(ResourceKind, Option<String>)> {
        self.lock().list_calls.clone()
    }

    /// Number of watch streams opened so far.
    #[must_use]
    pub fn subscriptions(&self) -> usize {
        *self.subscribed.borrow()
    }

    /// Wait until at least `count` watch streams have been opened.
    pub async fn wait_for_subscriptions(&self, count: usize) {
        let mut receiver = self.subscribed.subscribe();
        let _ = receiver.wait_for(|opened| *opened >= count).await;
    }

    /// Deliver `event` to every open stream of the event's kind whose namespace covers it.
    /// Returns the number of streams that received it.
    #[must_use]
    pub fn emit(&self, event: &ResourceEvent) -> usize {
        let record = event.record();
        let state = self.lock();
        state
            .subscriptions
            .iter()
            .filter(|sub| sub.kind == record.kind())
            .filter(|sub| {
                sub.namespace
                    .as_deref()
                    .is_none_or(|namespace| namespace == record.namespace())
            })
            .filter(|sub| sub.sender.send(Ok(event.clone())).is_ok())
            .count()
    }

    /// Push a stream error to every open stream of `kind`.
    pub fn emit_error(&self, kind: ResourceKind) {
        let state = self.lock();
        for sub in state.subscriptions.iter().filter(|sub| sub.kind == kind) {
            let _ = sub.sender.send(Err(SourceError::watch(
                kind,
                sub.namespace.as_deref(),
                io::Error::other("watch connection reset"),
            )));
        }
    }

    /// Close every open stream.
    pub fn close_streams(&self) {
        self.lock().subscriptions.clear();
    }

    fn lock(&self) -> MutexGuard<'_, ClusterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ResourceSource for FakeCluster {
    async fn list(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        selector: &SelectorConfig,
    ) -> SourceResult<Vec<ResourceRecord>> {
        let mut state = self.lock();
        state
            .list_calls
            .push((kind, namespace.map(str::to_string)));
        if state.failing_kinds.contains(&kind) {
            return Err(SourceError::list(
                kind,
                namespace,
                io::Error::other("api server unavailable"),
            ));
        }
        Ok(state
            .objects
            .iter()
            .filter(|record| record.kind() == kind)
            .filter(|record| namespace.is_none_or(|namespace| namespace == record.namespace()))
            .filter(|record| selector.matches(&record.labels))
            .cloned()
            .collect())
    }

    fn watch(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        _selector: &SelectorConfig,
    ) -> ResourceEventStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.lock().subscriptions.push(Subscription {
            kind,
            namespace: namespace.map(str::to_string),
            sender,
        });
        self.subscribed.send_modify(|opened| *opened += 1);
        Box::pin(UnboundedReceiverStream::new(receiver))
    }
}

/// [`Notifier`] that counts calls and optionally fails with a fixed HTTP status.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    calls: AtomicUsize,
    fail_status: Option<u16>,
}

impl RecordingNotifier {
    /// Notifier that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier that always fails as if the endpoint answered `status`.
    #[must_use]
    pub const fn failing(status: u16) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_status: Some(status),
        }
    }

    /// Number of `notify` calls observed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self) -> NotifyResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_status {
            Some(status) => Err(NotifyError::Status {
                url: "memory://recording-notifier".to_string(),
                status,
            }),
            None => Ok(()),
        }
    }
}
