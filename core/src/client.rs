//! Blocking pod client.
//!
//! # Design
//! `PodClient` strings `PodRequests` builders and parsers together over a
//! `Transport`. Every operation returns a `PodResult` and reports its outcome
//! to the observer; `FailSilent` layers the swallow-everything contract on
//! top. The only state is the normalized base address, so one client can be
//! shared freely.

use crate::codec::{self, Record};
use crate::error::{PodError, PodResult};
use crate::http::{HttpRequest, HttpResponse};
use crate::ldp::{ConditionalWrite, ContainerStatus, PodRequests};
use crate::observer::{PodEvent, PodObserver, TracingObserver};
use crate::silent::FailSilent;
use crate::transport::{Transport, TransportConfig, UreqTransport};

/// Conditional appends give up after this many lost races by default.
pub const DEFAULT_APPEND_ATTEMPTS: u32 = 3;

/// Blocking client for one pod.
///
/// `T` performs the HTTP round-trips and `O` receives an event for every
/// outcome. Operations run their requests one after another on the calling
/// thread and hold no state besides the base address.
#[derive(Debug, Clone)]
pub struct PodClient<T, O = TracingObserver> {
    requests: PodRequests,
    transport: T,
    observer: O,
    max_append_attempts: u32,
}

impl PodClient<UreqTransport> {
    /// Client over a fresh `ureq` agent.
    pub fn with_config(base_url: &str, config: &TransportConfig) -> Self {
        Self::new(base_url, UreqTransport::new(config))
    }
}

impl<T: Transport> PodClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            requests: PodRequests::new(base_url),
            transport,
            observer: TracingObserver,
            max_append_attempts: DEFAULT_APPEND_ATTEMPTS,
        }
    }
}

impl<T: Transport, O: PodObserver> PodClient<T, O> {
    pub fn with_observer<P: PodObserver>(self, observer: P) -> PodClient<T, P> {
        PodClient {
            requests: self.requests,
            transport: self.transport,
            observer,
            max_append_attempts: self.max_append_attempts,
        }
    }

    /// At least one attempt is always made.
    pub fn with_max_append_attempts(mut self, attempts: u32) -> Self {
        self.max_append_attempts = attempts.max(1);
        self
    }

    pub fn requests(&self) -> &PodRequests {
        &self.requests
    }

    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    /// View of this client that never surfaces errors.
    pub fn fail_silent(&self) -> FailSilent<'_, T, O> {
        FailSilent::new(self)
    }

    /// Make sure `container` exists, creating it when the probe does not
    /// answer 200.
    pub fn create_container(&self, container: &str) -> PodResult<ContainerStatus> {
        let url = self.requests.container_url(container);
        let probe = self.requests.build_probe_container(container);
        let reason = match self.transport.execute(&probe) {
            Ok(response) if self.requests.parse_probe_container(&response) => {
                self.observer.observe(&PodEvent::ContainerExists { url });
                return Ok(ContainerStatus::AlreadyExists);
            }
            Ok(response) => format!("HTTP {}", response.status),
            Err(error) => error.to_string(),
        };
        self.observer.observe(&PodEvent::ContainerMissing {
            url: url.clone(),
            reason,
        });

        let result = self
            .send(&self.requests.build_create_container(container))
            .and_then(|response| self.requests.parse_create_container(container, response));
        self.report("create_container", result, |_| PodEvent::ContainerCreated { url })
    }

    /// Replace the resource with `records`, creating it if needed.
    pub fn publish_data(&self, container: &str, file: &str, records: &[Record]) -> PodResult<()> {
        let request = self.requests.build_publish(container, file, records);
        let result = self
            .send(&request)
            .and_then(|response| self.requests.parse_publish(container, file, response));
        self.report("publish_data", result, |_| PodEvent::Published {
            url: request.url.clone(),
            records: records.len(),
        })
    }

    pub fn read_data(&self, container: &str, file: &str) -> PodResult<Vec<String>> {
        let request = self.requests.build_read(container, file);
        let result = self
            .send(&request)
            .and_then(|response| self.requests.parse_read(container, file, response));
        self.report("read_data", result, |records| PodEvent::Read {
            url: request.url.clone(),
            records: records.len(),
        })
    }

    /// Append `new_records` by reading the resource and publishing the
    /// concatenation.
    ///
    /// A resource that cannot be read counts as empty. Nothing guards the
    /// gap between the read and the write: a concurrent writer's records can
    /// be overwritten. Use [`append_data`](Self::append_data) when the pod
    /// serves entity tags.
    pub fn update_data(&self, container: &str, file: &str, new_records: &[Record]) -> PodResult<()> {
        let existing = self.read_data(container, file).unwrap_or_default();
        let mut records = codec::into_records(existing);
        records.extend_from_slice(new_records);
        self.publish_data(container, file, &records)
    }

    /// Append `new_records` with an `If-Match` / `If-None-Match` guarded
    /// write, re-reading and retrying when another writer got there first.
    pub fn append_data(&self, container: &str, file: &str, new_records: &[Record]) -> PodResult<()> {
        let url = self.requests.resource_url(container, file);
        for attempt in 1..=self.max_append_attempts {
            let current = self
                .send(&self.requests.build_read(container, file))
                .and_then(|response| self.requests.parse_versioned_read(container, file, response))
                .map_err(|error| self.fail("append_data", error))?;

            let condition = current.condition();
            let mut records = codec::into_records(current.records);
            records.extend_from_slice(new_records);
            let request =
                self.requests
                    .build_conditional_publish(container, file, &records, &condition);
            let written = self
                .send(&request)
                .and_then(|response| {
                    self.requests
                        .parse_conditional_publish(container, file, response)
                })
                .map_err(|error| self.fail("append_data", error))?;

            match written {
                ConditionalWrite::Written => {
                    self.observer.observe(&PodEvent::Published {
                        url,
                        records: records.len(),
                    });
                    return Ok(());
                }
                ConditionalWrite::PreconditionFailed => {
                    self.observer.observe(&PodEvent::WriteConflict {
                        url: url.clone(),
                        attempt,
                    });
                }
            }
        }
        Err(self.fail(
            "append_data",
            PodError::Conflict {
                url,
                attempts: self.max_append_attempts,
            },
        ))
    }

    fn send(&self, request: &HttpRequest) -> PodResult<HttpResponse> {
        Ok(self.transport.execute(request)?)
    }

    fn fail(&self, operation: &'static str, error: PodError) -> PodError {
        self.observer.observe(&PodEvent::Failed {
            operation,
            error: error.clone(),
        });
        error
    }

    fn report<V>(
        &self,
        operation: &'static str,
        result: PodResult<V>,
        on_success: impl FnOnce(&V) -> PodEvent,
    ) -> PodResult<V> {
        match result {
            Ok(value) => {
                self.observer.observe(&on_success(&value));
                Ok(value)
            }
            Err(error) => Err(self.fail(operation, error)),
        }
    }
}
