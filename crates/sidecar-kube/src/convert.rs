//! Conversion from typed cluster objects into cluster-agnostic records.

use std::fmt::Debug;

use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::Resource;
use kube::runtime::watcher;
use serde::de::DeserializeOwned;
use sidecar_core::{EntryData, ResourceKind, ResourceRecord, WatchSignal};

/// A namespaced object kind whose data entries can be mirrored.
pub trait MirroredResource:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + Debug
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Kind reported on the produced records.
    const KIND: ResourceKind;

    /// Entry name to raw bytes mapping carried by the object.
    fn entries(&self) -> EntryData;

    /// Convert into a record, keeping identity, labels, annotations and entries.
    fn to_record(&self) -> ResourceRecord {
        let meta = self.meta();
        let mut record = ResourceRecord::new(
            Self::KIND,
            meta.namespace.clone().unwrap_or_default(),
            meta.name.clone().unwrap_or_default(),
        );
        record.labels = meta.labels.clone().unwrap_or_default();
        record.annotations = meta.annotations.clone().unwrap_or_default();
        record.data = self.entries();
        record
    }
}

impl MirroredResource for ConfigMap {
    const KIND: ResourceKind = ResourceKind::ConfigMap;

    // binaryData is not mirrored.
    fn entries(&self) -> EntryData {
        self.data
            .iter()
            .flatten()
            .map(|(name, value)| (name.clone(), value.clone().into_bytes()))
            .collect()
    }
}

impl MirroredResource for Secret {
    const KIND: ResourceKind = ResourceKind::Secret;

    fn entries(&self) -> EntryData {
        self.data
            .iter()
            .flatten()
            .map(|(name, value)| (name.clone(), value.0.clone()))
            .collect()
    }
}

/// Translate a watcher event into the transport-neutral signal.
pub fn to_signal<K: MirroredResource>(event: &watcher::Event<K>) -> WatchSignal {
    match event {
        watcher::Event::Apply(object) => WatchSignal::Apply(object.to_record()),
        watcher::Event::Delete(object) => WatchSignal::Delete(object.to_record()),
        watcher::Event::Init => WatchSignal::InitStarted,
        watcher::Event::InitApply(object) => WatchSignal::InitApply(object.to_record()),
        watcher::Event::InitDone => WatchSignal::InitDone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::ByteString;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn meta(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("monitoring".to_string()),
            labels: Some(BTreeMap::from([(
                "grafana_dashboard".to_string(),
                "1".to_string(),
            )])),
            annotations: Some(BTreeMap::from([(
                "k8s-sidecar-target-directory".to_string(),
                "team-a".to_string(),
            )])),
            ..ObjectMeta::default()
        }
    }

    #[test]
    fn config_map_text_becomes_bytes() {
        let config_map = ConfigMap {
            metadata: meta("dashboards"),
            data: Some(BTreeMap::from([
                ("cfg.json".to_string(), r#"{"a":1}"#.to_string()),
                ("notes.yaml".to_string(), "x: 1".to_string()),
            ])),
            ..ConfigMap::default()
        };

        let record = config_map.to_record();
        assert_eq!(record.kind(), ResourceKind::ConfigMap);
        assert_eq!(record.namespace(), "monitoring");
        assert_eq!(record.name(), "dashboards");
        assert_eq!(record.labels.get("grafana_dashboard").map(String::as_str), Some("1"));
        assert_eq!(
            record.annotations.get("k8s-sidecar-target-directory").map(String::as_str),
            Some("team-a")
        );
        assert_eq!(record.data.get("cfg.json"), Some(&br#"{"a":1}"#.to_vec()));
        assert_eq!(record.data.len(), 2);
    }

    #[test]
    fn secret_bytes_are_kept_verbatim() {
        let secret = Secret {
            metadata: meta("credentials"),
            data: Some(BTreeMap::from([(
                "token.json".to_string(),
                ByteString(vec![0xff, 0x7b, 0x7d]),
            )])),
            ..Secret::default()
        };

        let record = secret.to_record();
        assert_eq!(record.kind(), ResourceKind::Secret);
        assert_eq!(record.data.get("token.json"), Some(&vec![0xff, 0x7b, 0x7d]));
    }

    #[test]
    fn missing_metadata_maps_to_empty_collections() {
        let record = ConfigMap::default().to_record();
        assert!(record.labels.is_empty());
        assert!(record.annotations.is_empty());
        assert!(record.data.is_empty());
        assert_eq!(record.name(), "");
    }

    #[test]
    fn watcher_events_map_to_signals() {
        let config_map = ConfigMap {
            metadata: meta("dashboards"),
            ..ConfigMap::default()
        };
        let record = config_map.to_record();

        assert_eq!(
            to_signal(&watcher::Event::Apply(config_map.clone())),
            WatchSignal::Apply(record.clone())
        );
        assert_eq!(
            to_signal(&watcher::Event::Delete(config_map.clone())),
            WatchSignal::Delete(record.clone())
        );
        assert_eq!(
            to_signal(&watcher::Event::<ConfigMap>::Init),
            WatchSignal::InitStarted
        );
        assert_eq!(
            to_signal(&watcher::Event::InitApply(config_map)),
            WatchSignal::InitApply(record)
        );
        assert_eq!(
            to_signal(&watcher::Event::<ConfigMap>::InitDone),
            WatchSignal::InitDone
        );
    }
}
