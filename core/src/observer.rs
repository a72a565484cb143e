//! Reporting operation outcomes.
//!
//! `PodClient` never logs directly. It hands a `PodEvent` to the observer it
//! was built with, so tests can capture events without installing a global
//! subscriber. `TracingObserver` is the default and forwards to `tracing`.

use std::sync::Mutex;

use crate::error::PodError;

/// Something worth reporting about a pod operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodEvent {
    ContainerExists { url: String },
    /// The existence probe did not return 200; creation follows.
    ContainerMissing { url: String, reason: String },
    ContainerCreated { url: String },
    Published { url: String, records: usize },
    Read { url: String, records: usize },
    /// A conditional write lost a race and is being retried.
    WriteConflict { url: String, attempt: u32 },
    Failed { operation: &'static str, error: PodError },
}

pub trait PodObserver {
    fn observe(&self, event: &PodEvent);
}

/// Emits each event as a `tracing` event under the `pod` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PodObserver for TracingObserver {
    fn observe(&self, event: &PodEvent) {
        match event {
            PodEvent::ContainerExists { url } => {
                tracing::info!(target: "pod", %url, "container already exists")
            }
            PodEvent::ContainerMissing { url, reason } => {
                tracing::debug!(target: "pod", %url, %reason, "container not found, creating")
            }
            PodEvent::ContainerCreated { url } => {
                tracing::info!(target: "pod", %url, "container created")
            }
            PodEvent::Published { url, records } => {
                tracing::info!(target: "pod", %url, records, "published data")
            }
            PodEvent::Read { url, records } => {
                tracing::info!(target: "pod", %url, records, "read data")
            }
            PodEvent::WriteConflict { url, attempt } => {
                tracing::warn!(target: "pod", %url, attempt, "conditional write conflicted, retrying")
            }
            PodEvent::Failed { operation, error } => {
                tracing::warn!(target: "pod", operation, %error, "pod operation failed")
            }
        }
    }
}

/// Keeps every event in memory. Handy for asserting on side-channel output.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PodEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PodEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn failures(&self) -> Vec<PodError> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PodEvent::Failed { error, .. } => Some(error),
                _ => None,
            })
            .collect()
    }
}

impl PodObserver for RecordingObserver {
    fn observe(&self, event: &PodEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

impl<O: PodObserver + ?Sized> PodObserver for &O {
    fn observe(&self, event: &PodEvent) {
        (**self).observe(event)
    }
}

impl<O: PodObserver + ?Sized> PodObserver for std::sync::Arc<O> {
    fn observe(&self, event: &PodEvent) {
        (**self).observe(event)
    }
}
