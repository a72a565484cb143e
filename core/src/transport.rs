//! Executing `HttpRequest`s against the network.
//!
//! `Transport` is the only seam where I/O happens. `UreqTransport` is the
//! blocking default; tests swap in scripted transports.

use std::time::Duration;

use serde::Deserialize;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations must return every received status as data. Only failures
/// to complete the exchange are errors.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Settings for `UreqTransport`. Unset fields leave ureq's defaults alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Upper bound on a whole request, connect to last body byte.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    /// Largest response body accepted. `None` reads bodies of any size, so a
    /// large resource is never mistaken for an unreadable one.
    pub max_body_bytes: Option<u64>,
}

impl TransportConfig {
    /// Read `POD_TIMEOUT_SECS` and `POD_USER_AGENT`. Unparseable timeouts are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("POD_TIMEOUT_SECS").ok().and_then(|raw| {
            raw.parse::<u64>()
                .map_err(|e| tracing::warn!(value = %raw, error = %e, "ignoring POD_TIMEOUT_SECS"))
                .ok()
        });
        Self {
            timeout_secs,
            user_agent: std::env::var("POD_USER_AGENT").ok(),
            max_body_bytes: None,
        }
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: Option<String>,
    max_body_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        // Non-2xx statuses are protocol data for `PodRequests`, not errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout_secs.map(Duration::from_secs))
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent.clone(),
            max_body_bytes: config.max_body_bytes.unwrap_or(u64::MAX),
        }
    }

    fn headers<'a>(&'a self, request: &'a HttpRequest) -> impl Iterator<Item = (&'a str, &'a str)> {
        request
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .chain(self.user_agent.as_deref().map(|agent| ("user-agent", agent)))
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let failed = |message: String| TransportError {
            method: request.method.as_str(),
            url: request.url.clone(),
            message,
        };

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in self.headers(request) {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            HttpMethod::Head => {
                let mut builder = self.agent.head(&request.url);
                for (name, value) in self.headers(request) {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            HttpMethod::Put => {
                let mut builder = self.agent.put(&request.url);
                for (name, value) in self.headers(request) {
                    builder = builder.header(name, value);
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| failed(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = if request.method == HttpMethod::Head {
            String::new()
        } else {
            // ureq caps bodies at 10 MiB unless told otherwise.
            response
                .body_mut()
                .with_config()
                .limit(self.max_body_bytes)
                .read_to_string()
                .map_err(|e| failed(e.to_string()))?
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
