//! Turns raw watch signals into add/update/delete events.
//!
//! # Design
//! - Watch transports only report "object applied" or "object deleted"; the sync
//!   pipeline needs to tell a first sighting from a later change, so the classifier
//!   keeps the last known state of every object in its partition.
//! - Updates carry the replaced record so consumers can drop entries that vanished.
//! - A re-list (`InitStarted … InitDone`) replays the current objects; anything known
//!   before the re-list but absent from it is reported as deleted.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ResourceEvent, ResourceKey, ResourceRecord};

/// Raw signal emitted by a watch transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    /// Object created or modified.
    Apply(ResourceRecord),
    /// Object deleted.
    Delete(ResourceRecord),
    /// A full re-list is starting.
    InitStarted,
    /// Object replayed during a re-list.
    InitApply(ResourceRecord),
    /// The re-list finished.
    InitDone,
}

/// Per-subscription object index used to classify watch signals.
#[derive(Debug, Default)]
pub struct EventClassifier {
    known: BTreeMap<ResourceKey, ResourceRecord>,
    relisted: Option<BTreeSet<ResourceKey>>,
}

impl EventClassifier {
    /// Build an empty classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Whether no objects are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Classify one signal into zero or more events.
    pub fn classify(&mut self, signal: WatchSignal) -> Vec<ResourceEvent> {
        match signal {
            WatchSignal::Apply(record) => vec![self.observe(record)],
            WatchSignal::InitApply(record) => {
                if let Some(relisted) = self.relisted.as_mut() {
                    relisted.insert(record.key.clone());
                }
                vec![self.observe(record)]
            }
            WatchSignal::Delete(record) => {
                self.known.remove(&record.key);
                vec![ResourceEvent::Deleted(record)]
            }
            WatchSignal::InitStarted => {
                self.relisted = Some(BTreeSet::new());
                Vec::new()
            }
            WatchSignal::InitDone => self.finish_relist(),
        }
    }

    fn observe(&mut self, record: ResourceRecord) -> ResourceEvent {
        match self.known.insert(record.key.clone(), record.clone()) {
            Some(previous) => ResourceEvent::Updated {
                record,
                previous: Some(Box::new(previous)),
            },
            None => ResourceEvent::Added(record),
        }
    }

    fn finish_relist(&mut self) -> Vec<ResourceEvent> {
        let Some(relisted) = self.relisted.take() else {
            return Vec::new();
        };
        let vanished: Vec<ResourceKey> = self
            .known
            .keys()
            .filter(|key| !relisted.contains(*key))
            .cloned()
            .collect();
        vanished
            .into_iter()
            .filter_map(|key| self.known.remove(&key))
            .map(ResourceEvent::Deleted)
            .collect()
    }
}
