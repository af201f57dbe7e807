//! Endpoints of the pet-store `user` resource.
//!
//! # Design
//! Each endpoint comes as a pair. `build_*` resolves the path, query, headers,
//! and body into an uninvoked `RequestBuilder` whose decoder matches what the
//! endpoint returns. The unprefixed method executes that builder and hands
//! back a single-value `ResponseStream`; dropping the stream cancels the
//! request. Builders that encode a body return `Result` because encoding can
//! fail; through the stream methods that failure becomes the stream's error.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::{append_query, query_items, reject_nil_headers, substitute_path};
use crate::request::{
    DecodableRequestBuilder, NonDecodableRequestBuilder, RequestBuilder, ResponseDecoder,
    ResponseStream, TextBody,
};
use crate::types::User;

/// Client for `/user` endpoints.
#[derive(Debug, Clone)]
pub struct UserApi {
    config: Arc<ClientConfig>,
}

impl UserApi {
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    /// Create user. This can only be done by the logged in user.
    pub fn create_user(&self, body: &User) -> ResponseStream<()> {
        ResponseStream::from_builder(self.build_create_user(body))
    }

    /// `POST /user`
    pub fn build_create_user(&self, body: &User) -> Result<NonDecodableRequestBuilder, ApiError> {
        let body = encode_json(body)?;
        Ok(self.builder(HttpMethod::Post, "/user", &[], Some(body)))
    }

    /// Creates list of users with given input array.
    pub fn create_users_with_array_input(&self, body: &[User]) -> ResponseStream<()> {
        ResponseStream::from_builder(self.build_create_users_with_array_input(body))
    }

    /// `POST /user/createWithArray`
    pub fn build_create_users_with_array_input(
        &self,
        body: &[User],
    ) -> Result<NonDecodableRequestBuilder, ApiError> {
        let body = encode_json(body)?;
        Ok(self.builder(HttpMethod::Post, "/user/createWithArray", &[], Some(body)))
    }

    /// Creates list of users with given input array.
    pub fn create_users_with_list_input(&self, body: &[User]) -> ResponseStream<()> {
        ResponseStream::from_builder(self.build_create_users_with_list_input(body))
    }

    /// `POST /user/createWithList`
    pub fn build_create_users_with_list_input(
        &self,
        body: &[User],
    ) -> Result<NonDecodableRequestBuilder, ApiError> {
        let body = encode_json(body)?;
        Ok(self.builder(HttpMethod::Post, "/user/createWithList", &[], Some(body)))
    }

    /// Delete user. This can only be done by the logged in user.
    pub fn delete_user(&self, username: &str) -> ResponseStream<()> {
        self.build_delete_user(username).into_stream()
    }

    /// `DELETE /user/{username}`
    pub fn build_delete_user(&self, username: &str) -> NonDecodableRequestBuilder {
        let path = substitute_path("/user/{username}", "username", username);
        self.builder(HttpMethod::Delete, &path, &[], None)
    }

    /// Get user by user name.
    pub fn get_user_by_name(&self, username: &str) -> ResponseStream<User> {
        self.build_get_user_by_name(username).into_stream()
    }

    /// `GET /user/{username}`
    pub fn build_get_user_by_name(&self, username: &str) -> DecodableRequestBuilder<User> {
        let path = substitute_path("/user/{username}", "username", username);
        self.builder(HttpMethod::Get, &path, &[], None)
    }

    /// Logs user into the system. Yields the session message.
    pub fn login_user(&self, username: &str, password: &str) -> ResponseStream<String> {
        self.build_login_user(username, password).into_stream()
    }

    /// `GET /user/login`
    ///
    /// The response carries `X-Rate-Limit` and `X-Expires-After` headers,
    /// available through `execute()`.
    pub fn build_login_user(&self, username: &str, password: &str) -> RequestBuilder<TextBody> {
        let query = [
            ("username", Some(username.to_string())),
            ("password", Some(password.to_string())),
        ];
        self.builder(HttpMethod::Get, "/user/login", &query, None)
    }

    /// Logs out current logged in user session.
    pub fn logout_user(&self) -> ResponseStream<()> {
        self.build_logout_user().into_stream()
    }

    /// `GET /user/logout`
    pub fn build_logout_user(&self) -> NonDecodableRequestBuilder {
        self.builder(HttpMethod::Get, "/user/logout", &[], None)
    }

    /// Updated user. This can only be done by the logged in user.
    pub fn update_user(&self, username: &str, body: &User) -> ResponseStream<()> {
        ResponseStream::from_builder(self.build_update_user(username, body))
    }

    /// `PUT /user/{username}`
    pub fn build_update_user(
        &self,
        username: &str,
        body: &User,
    ) -> Result<NonDecodableRequestBuilder, ApiError> {
        let path = substitute_path("/user/{username}", "username", username);
        let body = encode_json(body)?;
        Ok(self.builder(HttpMethod::Put, &path, &[], Some(body)))
    }

    /// `path` must already have every placeholder substituted.
    fn builder<D: ResponseDecoder>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, Option<String>)],
        body: Option<String>,
    ) -> RequestBuilder<D> {
        let url = append_query(
            &format!("{}{path}", self.config.base_path()),
            &query_items(query),
        );
        let headers = reject_nil_headers(vec![(
            "content-type",
            body.as_ref().map(|_| "application/json".to_string()),
        )]);
        debug!(%method, %url, "built request");
        // No user endpoint declares a security requirement.
        RequestBuilder::new(self.config.clone(), method, url, body, headers, false)
    }
}

fn encode_json<T: Serialize + ?Sized>(body: &T) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}
