//! Authenticated request pipeline for the remote API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every store talks to the API through one `ApiClient`. Before a request is
//! dispatched the current bearer token is attached; after the response comes
//! back a 401 invalidates the session (memory and durable storage) and sends
//! the user to the landing page, no matter which store made the call.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError`s carrying the status. Callers decide
//! what to record; the session-level consequences of a 401 have already been
//! applied by the time they see `ApiError::Unauthorized`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::{ApiError, UNAUTHORIZED_STATUS};
use crate::navigation::{Navigator, Route};
use crate::state::session::SessionHandle;

/// Where the user lands after the server rejects their session.
pub const SESSION_REJECTED_ROUTE: Route = Route::Home;

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: SessionHandle, navigator: Arc<dyn Navigator>) -> Self {
        Self { transport, session, navigator }
    }

    /// Session whose token this client attaches.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Send `request` through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` on 401 (after invalidating the session),
    /// `Status` on any other non-2xx, or the transport's error.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Some(token) = self.session.token() {
            request.headers.push((AUTHORIZATION.as_str().to_owned(), bearer(&token)));
        }
        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(%method, %path, "api request");

        let response = self.transport.send(request).await?;

        if response.status == UNAUTHORIZED_STATUS {
            tracing::warn!(%method, %path, "session rejected; clearing credentials");
            self.session.clear();
            self.navigator.navigate(SESSION_REJECTED_ROUTE);
            return Err(ApiError::Unauthorized);
        }
        check_status(&method, &path, response)
    }

    /// Send `request` without the bearer token and without session side
    /// effects. A 401 here is an ordinary `Status` error.
    ///
    /// # Errors
    ///
    /// Returns `Status` on any non-2xx, or the transport's error.
    pub async fn send_public(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(%method, %path, "public api request");

        let response = self.transport.send(request).await?;
        check_status(&method, &path, response)
    }

    /// Send `request` through [`ApiClient::send_public`] and decode the body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send_public`]; also fails if the body does not decode.
    pub async fn request_public_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send_public(request).await?.json()
    }

    /// Send `request` and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; also fails if the body does not decode.
    pub async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(ApiRequest::post(path).with_json(body)?).await
    }

    /// `POST path` without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(ApiRequest::post(path)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(ApiRequest::put(path).with_json(body)?).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(ApiRequest::patch(path).with_json(body)?).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json(ApiRequest::delete(path)).await
    }
}

fn check_status(method: &Method, path: &str, response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    tracing::debug!(%method, %path, status = response.status, "api request failed");
    Err(ApiError::Status { status: response.status, body: response.body })
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
