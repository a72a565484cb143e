//! In-memory LDP pod for tests and local experiments.
//!
//! Every path is handled by one fallback handler. Paths ending in `/` are
//! containers, everything else is a plain-text resource. Writes bump a
//! global version counter that doubles as the entity tag.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Container { version: u64 },
    Resource { version: u64, content_type: String, body: String },
}

impl Entry {
    pub fn version(&self) -> u64 {
        match self {
            Entry::Container { version } | Entry::Resource { version, .. } => *version,
        }
    }

    pub fn etag(&self) -> String {
        format!("\"{}\"", self.version())
    }
}

#[derive(Debug)]
pub struct Store {
    entries: BTreeMap<String, Entry>,
    next_version: u64,
}

impl Default for Store {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("/".to_string(), Entry::Container { version: 0 });
        Self {
            entries,
            next_version: 1,
        }
    }
}

impl Store {
    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    fn bump(&mut self) -> u64 {
        let version = self.next_version;
        self.next_version += 1;
        version
    }

    /// Create every missing ancestor container of `path`.
    fn ensure_parents(&mut self, path: &str) {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return;
        }
        let mut end = 0;
        while let Some(offset) = trimmed[end + 1..].find('/') {
            end += offset + 1;
            let parent = &trimmed[..=end];
            if !self.entries.contains_key(parent) {
                let version = self.bump();
                self.entries
                    .insert(parent.to_string(), Entry::Container { version });
            }
        }
    }

    /// Direct children of a container, as paths.
    fn children(&self, container: &str) -> Vec<&str> {
        self.entries
            .keys()
            .filter(|key| {
                key.len() > container.len()
                    && key.starts_with(container)
                    && !key[container.len()..].trim_end_matches('/').contains('/')
            })
            .map(String::as_str)
            .collect()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_store(Db::default())
}

/// Router over an existing store, so tests can inspect what was written.
pub fn app_with_store(db: Db) -> Router {
    Router::new().fallback(handle).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn handle(
    State(db): State<Db>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    tracing::debug!(%method, %path, "pod request");
    match method {
        Method::GET | Method::HEAD => read(&db, &path, method == Method::HEAD).await,
        Method::PUT => write(&db, &path, &headers, body).await,
        _ => status(StatusCode::METHOD_NOT_ALLOWED),
    }
}

async fn read(db: &Db, path: &str, head: bool) -> Response {
    let store = db.read().await;
    let Some(entry) = store.get(path) else {
        return status(StatusCode::NOT_FOUND);
    };
    let (content_type, body) = match entry {
        Entry::Resource {
            content_type, body, ..
        } => (content_type.clone(), body.clone()),
        Entry::Container { .. } => {
            let listing: String = store
                .children(path)
                .into_iter()
                .map(|child| format!("{child}\n"))
                .collect();
            ("text/turtle".to_string(), listing)
        }
    };
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::ETAG, entry.etag())
        .header(header::CONTENT_TYPE, content_type);
    let body = if head { Body::empty() } else { Body::from(body) };
    builder
        .body(body)
        .unwrap_or_else(|_| status(StatusCode::INTERNAL_SERVER_ERROR))
}

async fn write(db: &Db, path: &str, headers: &HeaderMap, body: String) -> Response {
    let mut store = db.write().await;
    let existing = store.get(path).cloned();

    if let Some(expected) = header_str(headers, header::IF_MATCH) {
        let matches = existing.as_ref().is_some_and(|entry| entry.etag() == expected);
        if !matches {
            return status(StatusCode::PRECONDITION_FAILED);
        }
    }
    if header_str(headers, header::IF_NONE_MATCH) == Some("*") && existing.is_some() {
        return status(StatusCode::PRECONDITION_FAILED);
    }

    if path.ends_with('/') {
        if existing.is_some() {
            return status(StatusCode::OK);
        }
        store.ensure_parents(path);
        let version = store.bump();
        store
            .entries
            .insert(path.to_string(), Entry::Container { version });
        return status(StatusCode::CREATED);
    }

    if let Some(Entry::Container { .. }) = store.get(&format!("{path}/")) {
        return status(StatusCode::CONFLICT);
    }
    store.ensure_parents(path);
    let version = store.bump();
    let content_type = header_str(headers, header::CONTENT_TYPE)
        .unwrap_or("application/octet-stream")
        .to_string();
    store.entries.insert(
        path.to_string(),
        Entry::Resource {
            version,
            content_type,
            body,
        },
    );
    status(if existing.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    })
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn status(code: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = code;
    response
}
