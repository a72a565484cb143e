//! Stateless LDP request builder and response parser.
//!
//! # Design
//! `PodRequests` holds only the pod base address. Each exchange is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the `HttpResponse`. `PodClient` strings them together over a
//! `Transport`; hosts that do their own I/O can use this type directly.

use crate::codec::{self, Record};
use crate::error::PodError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_TURTLE: &str = "text/turtle";

/// Whether a container had to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    AlreadyExists,
    Created,
}

/// Precondition attached to a conditional publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCondition {
    /// Only overwrite the version identified by this entity tag.
    IfMatch(String),
    /// Only create; fail if anything is already stored at the URL.
    IfAbsent,
}

/// Records read together with the entity tag they were served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecords {
    pub records: Vec<String>,
    /// `None` when the resource does not exist yet.
    pub etag: Option<String>,
}

impl VersionedRecords {
    pub fn condition(&self) -> WriteCondition {
        match &self.etag {
            Some(etag) => WriteCondition::IfMatch(etag.clone()),
            None => WriteCondition::IfAbsent,
        }
    }
}

/// Outcome of a conditional publish that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalWrite {
    Written,
    PreconditionFailed,
}

/// Builds and parses the HTTP exchanges for one pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRequests {
    base_url: String,
}

impl PodRequests {
    pub fn new(base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn container_url(&self, container: &str) -> String {
        format!("{}{container}/", self.base_url)
    }

    pub fn resource_url(&self, container: &str, file: &str) -> String {
        format!("{}{container}/{file}", self.base_url)
    }

    pub fn build_probe_container(&self, container: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Head,
            url: self.container_url(container),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_container(&self, container: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            url: self.container_url(container),
            headers: vec![content_type(TEXT_TURTLE)],
            body: Some(String::new()),
        }
    }

    pub fn build_publish(&self, container: &str, file: &str, records: &[Record]) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            url: self.resource_url(container, file),
            headers: vec![content_type(TEXT_PLAIN)],
            body: Some(codec::encode(records)),
        }
    }

    pub fn build_conditional_publish(
        &self,
        container: &str,
        file: &str,
        records: &[Record],
        condition: &WriteCondition,
    ) -> HttpRequest {
        let mut request = self.build_publish(container, file, records);
        request.headers.push(match condition {
            WriteCondition::IfMatch(etag) => ("if-match".to_string(), etag.clone()),
            WriteCondition::IfAbsent => ("if-none-match".to_string(), "*".to_string()),
        });
        request
    }

    pub fn build_read(&self, container: &str, file: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.resource_url(container, file),
            headers: vec![("accept".to_string(), TEXT_PLAIN.to_string())],
            body: None,
        }
    }

    /// `true` when the probe proves the container exists. Anything other
    /// than 200 means "go ahead and create it".
    pub fn parse_probe_container(&self, response: &HttpResponse) -> bool {
        response.status == 200
    }

    pub fn parse_create_container(
        &self,
        container: &str,
        response: HttpResponse,
    ) -> Result<ContainerStatus, PodError> {
        check_write_status(self.container_url(container), response)?;
        Ok(ContainerStatus::Created)
    }

    pub fn parse_publish(
        &self,
        container: &str,
        file: &str,
        response: HttpResponse,
    ) -> Result<(), PodError> {
        check_write_status(self.resource_url(container, file), response)
    }

    pub fn parse_conditional_publish(
        &self,
        container: &str,
        file: &str,
        response: HttpResponse,
    ) -> Result<ConditionalWrite, PodError> {
        if response.status == 412 {
            return Ok(ConditionalWrite::PreconditionFailed);
        }
        self.parse_publish(container, file, response)?;
        Ok(ConditionalWrite::Written)
    }

    pub fn parse_read(
        &self,
        container: &str,
        file: &str,
        response: HttpResponse,
    ) -> Result<Vec<String>, PodError> {
        let url = self.resource_url(container, file);
        check_status(&url, &response, 200)?;
        Ok(codec::decode(&response.body))
    }

    /// Like `parse_read`, but keeps the entity tag and maps 404 to an empty,
    /// untagged result so the caller can follow up with `IfAbsent`.
    pub fn parse_versioned_read(
        &self,
        container: &str,
        file: &str,
        response: HttpResponse,
    ) -> Result<VersionedRecords, PodError> {
        let url = self.resource_url(container, file);
        if response.status == 404 {
            return Ok(VersionedRecords {
                records: Vec::new(),
                etag: None,
            });
        }
        check_status(&url, &response, 200)?;
        let etag = response
            .header("etag")
            .map(str::to_string)
            .ok_or(PodError::MissingEtag { url })?;
        Ok(VersionedRecords {
            records: codec::decode(&response.body),
            etag: Some(etag),
        })
    }
}

fn content_type(value: &str) -> (String, String) {
    ("content-type".to_string(), value.to_string())
}

/// Writes succeed on 201 (created) or 200 (replaced).
fn check_write_status(url: String, response: HttpResponse) -> Result<(), PodError> {
    match response.status {
        200 | 201 => Ok(()),
        status => Err(PodError::UnexpectedStatus {
            url,
            status,
            body: response.body,
        }),
    }
}

/// Map non-success status codes to the appropriate `PodError` variant.
fn check_status(url: &str, response: &HttpResponse, expected: u16) -> Result<(), PodError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(PodError::NotFound {
            url: url.to_string(),
        });
    }
    Err(PodError::UnexpectedStatus {
        url: url.to_string(),
        status: response.status,
        body: response.body.clone(),
    })
}
