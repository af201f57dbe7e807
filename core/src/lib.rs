//! Asynchronous client for the `user` resource of the pet-store API.
//!
//! # Overview
//! Every endpoint is available as an uninvoked `RequestBuilder`
//! (`UserApi::build_*`) and as a single-value `ResponseStream` that executes
//! the builder and forwards cancellation to the in-flight request.
//!
//! # Design
//! - `ClientConfig` is read-only and shared through `Arc`; it carries the base
//!   path, headers sent with every request, and the `Transport`.
//! - Builders expose the plain `HttpRequest` and a `decode()` for callers
//!   that perform their own I/O, so request building stays deterministic and
//!   testable without a network.
//! - `ReqwestTransport` is the default transport; any `Transport` can be
//!   plugged in.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod request;
#[cfg(test)]
mod testing;
pub mod transport;
pub mod types;
pub mod user_api;

pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{
    DecodableRequestBuilder, EmptyBody, JsonBody, NonDecodableRequestBuilder, PendingResponse,
    RequestBuilder, RequestTask, Response, ResponseDecoder, ResponseStream, TextBody,
};
pub use transport::{ReqwestTransport, Transport};
pub use types::User;
pub use user_api::UserApi;
