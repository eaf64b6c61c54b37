//! List and watch against the API server.
//!
//! # Design
//! - One `Api` handle per call, namespaced or cluster-wide, filtered server-side by
//!   the selector expression.
//! - Watch streams reconnect through the watcher's default backoff; transport errors
//!   are surfaced as stream items so the caller can log them.
//! - Every stream owns its own [`EventClassifier`] so Add and Update stay distinct.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::Client;
use kube::api::{Api, ListParams};
use kube::runtime::{WatchStreamExt, watcher};
use sidecar_core::{
    EventClassifier, ResourceEventStream, ResourceKind, ResourceRecord, ResourceSource,
    SelectorConfig, SourceError, SourceResult,
};
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::convert::{MirroredResource, to_signal};

/// [`ResourceSource`] backed by a live cluster connection.
#[derive(Clone)]
pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    /// Connect using in-cluster configuration or the local kubeconfig.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ClientInit`] when no usable configuration is found.
    pub async fn connect() -> SourceResult<Self> {
        let client = Client::try_default()
            .await
            .map_err(|err| SourceError::ClientInit {
                source: Box::new(err),
            })?;
        info!(
            default_namespace = client.default_namespace(),
            "cluster client initialised"
        );
        Ok(Self { client })
    }

    fn api<K: MirroredResource>(&self, namespace: Option<&str>) -> Api<K> {
        match namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    async fn list_kind<K: MirroredResource>(
        &self,
        namespace: Option<&str>,
        selector: &SelectorConfig,
    ) -> SourceResult<Vec<ResourceRecord>> {
        let params = selector
            .to_query()
            .map_or_else(ListParams::default, |query| {
                ListParams::default().labels(&query)
            });
        let objects = self
            .api::<K>(namespace)
            .list(&params)
            .await
            .map_err(|err| SourceError::list(K::KIND, namespace, err))?;
        debug!(
            kind = %K::KIND,
            namespace = namespace.unwrap_or("*"),
            count = objects.items.len(),
            "listed resources"
        );
        Ok(objects.items.iter().map(MirroredResource::to_record).collect())
    }

    fn watch_kind<K: MirroredResource>(
        &self,
        namespace: Option<&str>,
        selector: &SelectorConfig,
    ) -> ResourceEventStream {
        let config = selector
            .to_query()
            .map_or_else(watcher::Config::default, |query| {
                watcher::Config::default().labels(&query)
            });
        let mut events = Box::pin(watcher(self.api::<K>(namespace), config).default_backoff());
        let namespace = namespace.map(str::to_string);

        Box::pin(async_stream::stream! {
            let mut classifier = EventClassifier::new();
            while let Some(item) = events.next().await {
                match item {
                    Ok(event) => {
                        for resource_event in classifier.classify(to_signal(&event)) {
                            yield Ok(resource_event);
                        }
                    }
                    Err(err) => {
                        yield Err(SourceError::watch(K::KIND, namespace.as_deref(), err));
                    }
                }
            }
        })
    }
}

#[async_trait]
impl ResourceSource for KubeSource {
    async fn list(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        selector: &SelectorConfig,
    ) -> SourceResult<Vec<ResourceRecord>> {
        match kind {
            ResourceKind::ConfigMap => self.list_kind::<ConfigMap>(namespace, selector).await,
            ResourceKind::Secret => self.list_kind::<Secret>(namespace, selector).await,
        }
    }

    fn watch(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
        selector: &SelectorConfig,
    ) -> ResourceEventStream {
        match kind {
            ResourceKind::ConfigMap => self.watch_kind::<ConfigMap>(namespace, selector),
            ResourceKind::Secret => self.watch_kind::<Secret>(namespace, selector),
        }
    }
}
