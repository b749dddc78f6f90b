//! Authenticated Request Dispatcher
//!
//! Wraps a transport call with bearer auth and transparent session renewal:
//!
//! 1. The stored access token (if any) is sent as `Authorization: Bearer`.
//! 2. Any response other than 401 is handed back untouched.
//! 3. On 401 the refresh token is exchanged once; the original request is
//!    re-issued once with the new access token and that response is returned
//!    whatever its status.
//! 4. With no refresh token, or a rejected refresh, the session is cleared and
//!    the location is pointed at the login view.
//!
//! Refreshes are single-flight: callers that hit 401 while another caller is
//! refreshing wait for it and reuse the rotated pair.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::Instrument;

use super::request::{ApiRequest, ApiResponse};
use super::transport::{Transport, TransportError};
use crate::session::{Location, StoreError, TokenPair, TokenStore, LOGIN_FRAGMENT};

/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Errors surfaced by [`Dispatcher::dispatch`]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Network-level failure; no response was received
    #[error("Connection error: {0}")]
    Transport(#[from] TransportError),

    /// 401 received and no refresh token was stored
    #[error("No refresh token, please log in again.")]
    SessionAbsent,

    /// 401 received and the refresh exchange was rejected
    #[error("Session expired, please log in again.")]
    SessionExpired,

    /// The token store could not be read or written
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
}

impl DispatchError {
    /// Whether this error ended the session
    pub fn is_session_error(&self) -> bool {
        matches!(self, DispatchError::SessionAbsent | DispatchError::SessionExpired)
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

enum RefreshOutcome {
    Renewed(TokenPair),
    Rejected,
}

/// Issues authenticated requests against one API base URL
#[derive(Clone)]
pub struct Dispatcher {
    base_url: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn TokenStore>,
    location: Location,
    refresh_gate: Arc<Mutex<()>>,
}

impl Dispatcher {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn TokenStore>,
        location: Location,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            store,
            location,
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Send without auth injection or refresh handling
    pub async fn send_plain(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        tracing::debug!("{} {}", request.method, request.url);
        self.transport.send(request).await
    }

    /// Send with bearer auth and the single refresh-and-retry policy
    pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, DispatchError> {
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %uuid::Uuid::new_v4(),
            method = %request.method,
            url = %request.url,
        );
        self.dispatch_inner(request).instrument(span).await
    }

    async fn dispatch_inner(&self, request: ApiRequest) -> Result<ApiResponse, DispatchError> {
        let access = self.store.access()?;
        let response = self
            .transport
            .send(request.with_bearer(access.as_deref()))
            .await?;

        if !response.is_unauthorized() {
            tracing::debug!("Response {}", response.status);
            return Ok(response);
        }

        tracing::info!("Access token rejected, attempting refresh");
        let pair = self.renew(access.as_deref()).await?;

        let retry = self
            .transport
            .send(request.with_bearer(Some(&pair.access)))
            .await?;
        tracing::debug!("Retry response {}", retry.status);
        Ok(retry)
    }

    /// Obtain a fresh pair, either by refreshing or by adopting one another
    /// caller stored while we waited.
    async fn renew(&self, rejected_access: Option<&str>) -> Result<TokenPair, DispatchError> {
        let _gate = self.refresh_gate.lock().await;

        let current_access = self.store.access()?;
        let Some(refresh) = self.store.refresh()? else {
            tracing::warn!("No refresh token stored, ending session");
            self.force_logout();
            return Err(DispatchError::SessionAbsent);
        };

        if let Some(current) = current_access {
            if rejected_access != Some(current.as_str()) {
                tracing::debug!("Access token rotated by a concurrent refresh");
                return Ok(TokenPair::new(current, refresh));
            }
        }

        match self.refresh(&refresh).await? {
            RefreshOutcome::Renewed(pair) => {
                self.store.save(&pair)?;
                tracing::info!("Session refreshed");
                Ok(pair)
            }
            RefreshOutcome::Rejected => {
                tracing::warn!("Refresh rejected, ending session");
                self.force_logout();
                Err(DispatchError::SessionExpired)
            }
        }
    }

    async fn refresh(&self, refresh: &str) -> Result<RefreshOutcome, DispatchError> {
        let request = ApiRequest::post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh })
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let response = self.transport.send(request).await?;
        if !response.ok() {
            tracing::debug!("Refresh endpoint returned {}", response.status);
            return Ok(RefreshOutcome::Rejected);
        }

        match response.json::<RefreshResponse>() {
            Ok(body) => Ok(RefreshOutcome::Renewed(TokenPair {
                access: body.access,
                refresh: body.refresh.unwrap_or_else(|| refresh.to_string()),
            })),
            Err(e) => {
                tracing::warn!("Malformed refresh response: {}", e);
                Ok(RefreshOutcome::Rejected)
            }
        }
    }

    /// Clear credentials and send the user to the login view
    pub fn force_logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear session tokens: {}", e);
        }
        self.location.set(LOGIN_FRAGMENT);
    }
}
