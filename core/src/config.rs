//! Shared, read-only client configuration.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiError;
use crate::transport::{ReqwestTransport, Transport, DEFAULT_TIMEOUT};

pub const DEFAULT_BASE_PATH: &str = "http://petstore.swagger.io:80/v2";

pub const BASE_PATH_VAR: &str = "PETSTORE_BASE_PATH";
pub const TIMEOUT_VAR: &str = "PETSTORE_TIMEOUT_SECS";

/// Everything a request builder needs besides its own parameters.
///
/// Shared between builders through `Arc`; nothing mutates it after
/// construction.
#[derive(Clone)]
pub struct ClientConfig {
    base_path: String,
    custom_headers: Vec<(String, String)>,
    success_status: Range<u16>,
    transport: Arc<dyn Transport>,
}

impl ClientConfig {
    pub fn new(base_path: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
            custom_headers: Vec::new(),
            success_status: 200..300,
            transport,
        }
    }

    /// Configuration backed by a `ReqwestTransport` with the default timeout.
    pub fn with_reqwest(base_path: &str) -> Result<Self, ApiError> {
        Ok(Self::new(base_path, Arc::new(ReqwestTransport::new()?)))
    }

    /// Read `PETSTORE_BASE_PATH` and `PETSTORE_TIMEOUT_SECS`, falling back to
    /// the public pet store and a 30 second timeout.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_path = lookup(BASE_PATH_VAR).unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ApiError::Config(format!("{TIMEOUT_VAR}={raw}: {e}")))?,
            None => DEFAULT_TIMEOUT,
        };
        let transport = ReqwestTransport::with_timeout(timeout)?;
        Ok(Self::new(&base_path, Arc::new(transport)))
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.custom_headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Status codes treated as success when decoding responses.
    pub fn with_success_status(mut self, range: Range<u16>) -> Self {
        self.success_status = range;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn custom_headers(&self) -> &[(String, String)] {
        &self.custom_headers
    }

    pub fn success_status(&self) -> &Range<u16> {
        &self.success_status
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_path", &self.base_path)
            .field("custom_headers", &self.custom_headers)
            .field("success_status", &self.success_status)
            .finish_non_exhaustive()
    }
}
