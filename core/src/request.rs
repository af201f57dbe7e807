//! Deferred requests, their execution, and cancellation.
//!
//! # Design
//! A `RequestBuilder` is an uninvoked `HttpRequest` bound to the shared
//! `ClientConfig`. Its type parameter picks how a successful body is decoded:
//! `JsonBody<T>`, `TextBody`, or `EmptyBody` for endpoints that return
//! nothing. The builder can be driven two ways:
//!
//! - sans-IO: take `request()`, perform the exchange yourself, and hand the
//!   `HttpResponse` to `decode()`;
//! - through the configured `Transport`: `execute()` spawns the exchange on
//!   the current tokio runtime and returns a `PendingResponse`, or
//!   `into_stream()` wraps it in a single-value `ResponseStream`.
//!
//! Every spawned exchange owns a `RequestTask`. Cancelling it aborts the
//! tokio task, which drops the in-flight transport future. The abort is
//! issued at most once however many handles ask for it.

use std::future::Future;
use std::marker::PhantomData;
use std::ops::Range;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures::stream::{FusedStream, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{find_header, HttpMethod, HttpRequest, HttpResponse};

/// Turns a successful response body into the endpoint's result type.
pub trait ResponseDecoder: Send + 'static {
    type Output: Send + 'static;

    fn decode(body: &str) -> Result<Self::Output, ApiError>;
}

/// Decode the body as JSON into `T`.
pub struct JsonBody<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned + Send + 'static> ResponseDecoder for JsonBody<T> {
    type Output = T;

    fn decode(body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Keep the body as raw text.
pub struct TextBody;

impl ResponseDecoder for TextBody {
    type Output = String;

    fn decode(body: &str) -> Result<String, ApiError> {
        Ok(body.to_string())
    }
}

/// Ignore the body.
pub struct EmptyBody;

impl ResponseDecoder for EmptyBody {
    type Output = ();

    fn decode(_body: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

/// A decoded response together with its status line and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: T,
}

impl<T> Response<T> {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub type DecodableRequestBuilder<T> = RequestBuilder<JsonBody<T>>;
pub type NonDecodableRequestBuilder = RequestBuilder<EmptyBody>;

/// An HTTP request that has been described but not sent.
pub struct RequestBuilder<D: ResponseDecoder> {
    config: Arc<ClientConfig>,
    request: HttpRequest,
    decoder: PhantomData<fn() -> D>,
}

impl<D: ResponseDecoder> RequestBuilder<D> {
    /// Headers configured on `config` are sent first, followed by `headers`.
    pub fn new(
        config: Arc<ClientConfig>,
        method: HttpMethod,
        url: String,
        body: Option<String>,
        headers: Vec<(String, String)>,
        requires_authentication: bool,
    ) -> Self {
        let mut all_headers = config.custom_headers().to_vec();
        all_headers.extend(headers);
        Self {
            request: HttpRequest {
                method,
                url,
                headers: all_headers,
                body,
                requires_authentication,
            },
            config,
            decoder: PhantomData,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    pub fn requires_authentication(&self) -> bool {
        self.request.requires_authentication
    }

    /// Add one more header to this request only.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.request.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Decode a response obtained outside the configured transport.
    pub fn decode(&self, response: HttpResponse) -> Result<Response<D::Output>, ApiError> {
        decode_response::<D>(self.config.success_status(), response)
    }

    /// Send the request through the configured transport.
    ///
    /// Fails with `ApiError::Config` when no tokio runtime is running.
    pub fn execute(self) -> Result<PendingResponse<D::Output>, ApiError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ApiError::Config(format!("no tokio runtime: {e}")))?;
        let RequestBuilder { config, request, .. } = self;
        debug!(method = %request.method, url = %request.url, "executing request");

        let handle = runtime.spawn(async move {
            let response = config.transport().execute(request).await?;
            decode_response::<D>(config.success_status(), response)
        });
        let task = RequestTask::new(handle.abort_handle());
        Ok(PendingResponse { handle, task })
    }

    /// Execute and expose the body as a single-value stream. Failure to
    /// start the request becomes the stream's single item.
    pub fn into_stream(self) -> ResponseStream<D::Output> {
        match self.execute() {
            Ok(pending) => ResponseStream {
                state: State::Pending(pending),
            },
            Err(err) => ResponseStream::failed(err),
        }
    }
}

impl<D: ResponseDecoder> std::fmt::Debug for RequestBuilder<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

fn decode_response<D: ResponseDecoder>(
    success: &Range<u16>,
    response: HttpResponse,
) -> Result<Response<D::Output>, ApiError> {
    if !success.contains(&response.status) {
        warn!(status = response.status, "request failed");
        if response.status == 404 {
            return Err(ApiError::NotFound);
        }
        return Err(ApiError::Http {
            status: response.status,
            body: response.body,
        });
    }
    let body = D::decode(&response.body)?;
    Ok(Response {
        status: response.status,
        headers: response.headers,
        body,
    })
}

/// Cancellation handle for one in-flight request.
#[derive(Debug, Clone)]
pub struct RequestTask {
    inner: Arc<TaskInner>,
}

#[derive(Debug)]
struct TaskInner {
    abort: AbortHandle,
    cancelled: AtomicBool,
}

impl RequestTask {
    fn new(abort: AbortHandle) -> Self {
        Self {
            inner: Arc::new(TaskInner {
                abort,
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Abort the underlying request. Returns `true` only for the call that
    /// actually issued the abort; later calls and calls after the request
    /// finished return `false`.
    pub fn cancel(&self) -> bool {
        if self.inner.abort.is_finished() {
            return false;
        }
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }
        debug!("cancelling request");
        self.inner.abort.abort();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.inner.abort.is_finished()
    }
}

/// The eventual outcome of `RequestBuilder::execute`.
///
/// Dropping it detaches the request; use `task()` to cancel.
#[derive(Debug)]
pub struct PendingResponse<T> {
    handle: JoinHandle<Result<Response<T>, ApiError>>,
    task: RequestTask,
}

impl<T> PendingResponse<T> {
    pub fn task(&self) -> &RequestTask {
        &self.task
    }
}

impl<T> Future for PendingResponse<T> {
    type Output = Result<Response<T>, ApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let joined = ready!(Pin::new(&mut self.handle).poll(cx));
        Poll::Ready(match joined {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(ApiError::Cancelled),
            Err(err) => Err(ApiError::TaskFailed(err.to_string())),
        })
    }
}

#[derive(Debug)]
enum State<T> {
    Pending(PendingResponse<T>),
    Failed(ApiError),
    Done,
}

/// A stream that yields exactly one item, the response body or the error,
/// and then ends.
///
/// Dropping the stream before it yields cancels the request.
#[derive(Debug)]
pub struct ResponseStream<T> {
    state: State<T>,
}

impl<T> ResponseStream<T> {
    /// A stream whose single item is `err`. No request is sent.
    pub fn failed(err: ApiError) -> Self {
        Self {
            state: State::Failed(err),
        }
    }

    pub(crate) fn from_builder<D>(builder: Result<RequestBuilder<D>, ApiError>) -> Self
    where
        D: ResponseDecoder<Output = T>,
    {
        match builder {
            Ok(builder) => builder.into_stream(),
            Err(err) => Self::failed(err),
        }
    }

    /// The handle of the in-flight request, if there still is one.
    pub fn task(&self) -> Option<&RequestTask> {
        match &self.state {
            State::Pending(pending) => Some(pending.task()),
            _ => None,
        }
    }

    /// Cancel the in-flight request. The stream then yields
    /// `ApiError::Cancelled`.
    pub fn cancel(&self) -> bool {
        self.task().is_some_and(RequestTask::cancel)
    }

    /// Wait for the single item.
    pub async fn single(mut self) -> Result<T, ApiError> {
        self.next().await.unwrap_or(Err(ApiError::Cancelled))
    }
}

impl<T> Stream for ResponseStream<T> {
    type Item = Result<T, ApiError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match std::mem::replace(&mut this.state, State::Done) {
            State::Pending(mut pending) => match Pin::new(&mut pending).poll(cx) {
                Poll::Ready(result) => Poll::Ready(Some(result.map(|response| response.body))),
                Poll::Pending => {
                    this.state = State::Pending(pending);
                    Poll::Pending
                }
            },
            State::Failed(err) => Poll::Ready(Some(Err(err))),
            State::Done => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Done => (0, Some(0)),
            _ => (1, Some(1)),
        }
    }
}

impl<T> FusedStream for ResponseStream<T> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<T> Drop for ResponseStream<T> {
    fn drop(&mut self) {
        if let State::Pending(pending) = &self.state {
            if pending.task().cancel() {
                debug!("response stream dropped before completion");
            }
        }
    }
}
