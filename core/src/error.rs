//! Error types for the pod client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because a missing resource is the one
//! failure callers routinely branch on (an absent file reads as "no records"
//! in the fail-silent facade). Every other unexpected status lands in
//! `UnexpectedStatus` with the raw status and body for debugging.

use thiserror::Error;

/// The network round-trip itself failed: connection refused, timeout,
/// broken body stream and the like.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{method} {url} failed: {message}")]
pub struct TransportError {
    pub method: &'static str,
    pub url: String,
    pub message: String,
}

/// Errors returned by `PodClient` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PodError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 404 for the resource.
    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// The server answered with a status the operation does not accept.
    #[error("unexpected HTTP {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Every conditional write lost to a concurrent writer.
    #[error("conditional write to {url} kept conflicting after {attempts} attempts")]
    Conflict { url: String, attempts: u32 },

    /// The store returned the resource without an `ETag`, so a conditional
    /// write cannot be expressed.
    #[error("{url} has no ETag; conditional writes are unsupported")]
    MissingEtag { url: String },
}

impl PodError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PodError::NotFound { .. })
    }
}

pub type PodResult<T> = Result<T, PodError>;
