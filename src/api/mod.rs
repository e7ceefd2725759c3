//! Authenticated request gateway.
//!
//! Every API call goes through [`Gateway::send`], which applies two
//! interception points:
//!
//! - **Before send:** attach `Authorization: Bearer <access token>` when one is
//!   stored. Never fails; a store read error only skips the header.
//! - **On response:** pass successes through. A `401` on a call that has not
//!   been retried (and is not a login/signup/register call) is marked retried
//!   and waits for a fresh access token from a single-flight refresh, then is
//!   re-issued once. Everything else is returned to the caller unchanged.
//!
//! A refresh that cannot happen (no refresh token) or that fails clears the
//! credential store and sends the navigator to the sign-in entry route. Every
//! caller waiting on that refresh receives the same error.

mod endpoint;
mod error;
mod refresh;
mod request;

pub use self::endpoint::{is_auth_endpoint, resource_path};
pub use self::error::ApiError;
pub use self::request::{ApiRequest, ApiResponse};

use self::{
    endpoint::{build_url_with_base, validate_base_url},
    refresh::{RefreshOutcome, RefreshState, Ticket},
};
use crate::{
    navigation::{Navigator, ENTRY_ROUTE},
    store::{self, CredentialKey, CredentialStore},
    APP_USER_AGENT, DEFAULT_API_BASE_URL,
};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Endpoint that exchanges a refresh token for a new access token.
pub const REFRESH_TOKEN_PATH: &str = "/auth/refresh-token";

/// Default per-request timeout, applied to the refresh call as well.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

/// Cheap to clone; clones share the HTTP client, the credential store and the
/// refresh state.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    refresh: RefreshState,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.inner.base_url)
            .field("refreshing", &self.inner.refresh.is_refreshing())
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// # Errors
    /// Returns `ApiError::Config` if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(
        config: &GatewayConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        validate_base_url(&config.base_url)?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: config.base_url.trim().to_string(),
                store,
                navigator,
                refresh: RefreshState::default(),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.inner.store.as_ref()
    }

    /// True while a token refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// Sends a call through both interception points.
    ///
    /// # Errors
    /// Returns the failure of the call (or of its single replay), or a session
    /// error when the access token could not be refreshed.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.execute(&mut request).await?;

        if response.is_success() {
            return Ok(response);
        }

        if is_auth_endpoint(request.path()) {
            debug!(
                path = request.path(),
                status = response.status().as_u16(),
                "auth call failed; not refreshing"
            );
            return Err(response.into_error());
        }

        if response.status() != StatusCode::UNAUTHORIZED || request.is_retried() {
            return Err(response.into_error());
        }

        request.mark_retried();

        let access_token = self.fresh_access_token().await?;
        request.set_bearer(access_token.expose_secret())?;

        debug!(path = request.path(), "replaying call with refreshed token");

        self.execute(&mut request).await?.error_for_status()
    }

    /// # Errors
    /// See [`Gateway::send`]; decoding failures return `ApiError::Parse`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    /// # Errors
    /// See [`Gateway::send`]; decoding failures return `ApiError::Parse`.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::post(path).json(body)?).await?.json()
    }

    /// Posts JSON and ignores the response body.
    ///
    /// # Errors
    /// See [`Gateway::send`].
    pub async fn post_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(ApiRequest::post(path).json(body)?).await?;
        Ok(())
    }

    /// Puts JSON and ignores the response body.
    ///
    /// # Errors
    /// See [`Gateway::send`].
    pub async fn put_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(ApiRequest::put(path).json(body)?).await?;
        Ok(())
    }

    /// # Errors
    /// See [`Gateway::send`]; decoding failures return `ApiError::Parse`.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::patch(path).json(body)?).await?.json()
    }

    /// # Errors
    /// See [`Gateway::send`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await?;
        Ok(())
    }

    async fn execute(&self, request: &mut ApiRequest) -> Result<ApiResponse, ApiError> {
        self.authorize(request);
        self.dispatch(request).await
    }

    /// Before-send interceptor.
    fn authorize(&self, request: &mut ApiRequest) {
        match store::token(self.store(), CredentialKey::AccessToken) {
            Ok(Some(token)) => {
                if let Err(err) = request.set_bearer(token.expose_secret()) {
                    warn!(error = %err, "stored access token not attached");
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "failed to read access token; sending without credentials");
            }
        }
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = build_url_with_base(&self.inner.base_url, request.path());

        let mut builder = self
            .inner
            .client
            .request(request.method().clone(), &url)
            .headers(request.headers().clone());

        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let span = info_span!(
            "api.request",
            http.method = %request.method(),
            path = %request.path(),
            retried = request.is_retried()
        );
        let response = builder.send().instrument(span).await?;
        let response = ApiResponse::read(response).await?;

        debug!(
            path = request.path(),
            status = response.status().as_u16(),
            "response received"
        );

        Ok(response)
    }

    /// Leads a refresh or waits for the one in flight.
    async fn fresh_access_token(&self) -> RefreshOutcome {
        match self.inner.refresh.begin() {
            Ticket::Follower(outcome) => {
                debug!(
                    queued = self.inner.refresh.queued(),
                    "token refresh in flight; waiting"
                );
                outcome
                    .await
                    .unwrap_or_else(|_| Err(ApiError::RefreshInterrupted))
            }
            Ticket::Leader(lease) => {
                let outcome = self.refresh_session().await;

                // The store must be empty before the lease is released, or a
                // new leader could pick up the stale refresh token.
                if let Err(err) = &outcome {
                    warn!(error = %err, "session could not be refreshed; signing out");
                    self.end_session();
                }

                let released = lease.settle(&outcome);
                if outcome.is_ok() {
                    info!(released, "access token refreshed");
                } else {
                    debug!(released, "queued calls rejected");
                }

                outcome
            }
        }
    }

    /// Exchanges the stored refresh token and stores the new access token.
    async fn refresh_session(&self) -> RefreshOutcome {
        let refresh_token = match store::token(self.store(), CredentialKey::RefreshToken) {
            Ok(Some(token)) => token,
            Ok(None) => return Err(ApiError::RefreshTokenMissing),
            Err(err) => {
                return Err(ApiError::RefreshFailed(Box::new(ApiError::Storage(
                    format!("{err:#}"),
                ))))
            }
        };

        let access_token = self
            .request_access_token(&refresh_token)
            .await
            .map_err(|err| ApiError::RefreshFailed(Box::new(err)))?;

        store::update_access_token(self.store(), &access_token).map_err(|err| {
            ApiError::RefreshFailed(Box::new(ApiError::Storage(format!("{err:#}"))))
        })?;

        Ok(access_token)
    }

    /// Calls the refresh endpoint directly, bypassing both interceptors.
    async fn request_access_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<SecretString, ApiError> {
        let url = build_url_with_base(&self.inner.base_url, REFRESH_TOKEN_PATH);
        let payload = RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };

        let span = info_span!(
            "api.refresh_token",
            http.method = "POST",
            path = REFRESH_TOKEN_PATH
        );
        let response = self
            .inner
            .client
            .post(&url)
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        let body: RefreshResponse = ApiResponse::read(response)
            .await?
            .error_for_status()?
            .json()?;

        if body.access_token.trim().is_empty() {
            return Err(ApiError::Parse(
                "Refresh response carried an empty access token".to_string(),
            ));
        }

        Ok(SecretString::from(body.access_token))
    }

    /// Clears the credential store and returns to the sign-in entry route.
    fn end_session(&self) {
        if let Err(err) = store::clear_credentials(self.store()) {
            error!(error = %err, "failed to clear stored credentials");
        }
        self.inner.navigator.navigate(ENTRY_ROUTE);
    }
}
