//! Transports shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Answers every request with a fixed response and records what it saw.
pub(crate) struct FixedTransport {
    pub(crate) response: HttpResponse,
    pub(crate) seen: Mutex<Vec<HttpRequest>>,
}

impl FixedTransport {
    pub(crate) fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: HttpResponse {
                status,
                headers: vec![("X-Rate-Limit".to_string(), "10".to_string())],
                body: body.to_string(),
            },
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Transport for FixedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Never answers. Counts how many in-flight exchanges were dropped.
#[derive(Default)]
pub(crate) struct HangingTransport {
    pub(crate) started: Notify,
    pub(crate) dropped: Arc<AtomicUsize>,
}

struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for HangingTransport {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let _guard = DropCounter(self.dropped.clone());
        self.started.notify_one();
        std::future::pending::<()>().await;
        unreachable!()
    }
}

pub(crate) async fn wait_for_drops(counter: &AtomicUsize, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while counter.load(Ordering::SeqCst) < expected {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("transport future was not dropped");
}
