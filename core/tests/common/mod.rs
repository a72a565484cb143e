#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};

use pod_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};

/// Start a mock pod on a random port and return its base URL.
pub fn spawn_pod() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_pod::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/pod")
}

/// Holds the first GET of this transport at a barrier, so several writers
/// can be forced to read the same state before any of them writes.
pub struct GatedTransport {
    inner: UreqTransport,
    barrier: Arc<Barrier>,
    passed: AtomicBool,
}

impl GatedTransport {
    pub fn new(barrier: Arc<Barrier>) -> Self {
        Self {
            inner: UreqTransport::default(),
            barrier,
            passed: AtomicBool::new(false),
        }
    }
}

impl Transport for GatedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.inner.execute(request)?;
        if request.method == HttpMethod::Get && !self.passed.swap(true, Ordering::SeqCst) {
            self.barrier.wait();
        }
        Ok(response)
    }
}
