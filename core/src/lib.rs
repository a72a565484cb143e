//! Client for line-oriented resources in a Linked Data Platform pod.
//!
//! # Overview
//! A pod is a tree of LDP containers served over HTTP. This crate creates
//! containers and publishes, reads and appends newline-delimited text
//! resources inside them.
//!
//! # Design
//! - `PodRequests` builds `HttpRequest`s and parses `HttpResponse`s without
//!   I/O (host-does-IO pattern); `Transport` performs the round-trip.
//! - `PodClient` composes the two and returns `PodResult`s. `FailSilent`
//!   wraps it for callers that want failures logged and otherwise ignored.
//! - Outcomes go to an injected `PodObserver`; the default forwards to
//!   `tracing`.
//! - `update_data` is a plain read-then-write with no isolation.
//!   `append_data` uses entity tags to detect concurrent writers.

pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod ldp;
pub mod observer;
pub mod silent;
pub mod transport;

pub use client::PodClient;
pub use codec::Record;
pub use error::{PodError, PodResult, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use ldp::{ContainerStatus, PodRequests, WriteCondition};
pub use observer::{PodEvent, PodObserver, RecordingObserver, TracingObserver};
pub use silent::FailSilent;
pub use transport::{Transport, TransportConfig, UreqTransport};
