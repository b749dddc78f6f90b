//! Authentication Service
//!
//! Username/password login, signup, Google sign-in and logout against the
//! auth endpoints. Calls here are unauthenticated; they go around the
//! dispatcher's refresh policy. Successful logins return the token pair and
//! leave persisting it to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::http::{ApiRequest, ApiResponse, Dispatcher, TransportError};
use crate::session::{StoreError, TokenPair};

pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const SIGNUP_PATH: &str = "/api/auth/signup/";
pub const GOOGLE_SOCIAL_PATH: &str = "/api/auth/social/google/";
pub const GOOGLE_LOGIN_PATH: &str = "/api/auth/google-login/";

/// Errors returned by the auth service
#[derive(Error, Debug)]
pub enum AuthError {
    /// The server refused the credentials; the message is shown to the user
    #[error("{0}")]
    Rejected(String),

    #[error("Connection error: {0}")]
    Transport(#[from] TransportError),

    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
}

/// Account returned by a successful signup
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct GoogleRequest<'a> {
    access_token: &'a str,
}

#[derive(Deserialize)]
struct GoogleTokens {
    access_token: String,
    refresh_token: String,
}

/// Client for the auth endpoints
#[derive(Clone)]
pub struct AuthService {
    dispatcher: Dispatcher,
}

impl AuthService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Whether an access token is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.dispatcher.store().is_authenticated()
    }

    /// Persist a pair obtained from one of the login calls
    pub fn save_tokens(&self, pair: &TokenPair) -> Result<(), AuthError> {
        self.dispatcher.store().save(pair)?;
        Ok(())
    }

    /// Log in with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let response = self
            .post(LOGIN_PATH, &LoginRequest { username, password })
            .await?;

        if response.ok() {
            if let Ok(pair) = response.json::<TokenPair>() {
                tracing::info!("Logged in as {}", username);
                return Ok(pair);
            }
        }

        let detail = detail_of(&response).unwrap_or_else(|| "Login failed".to_string());
        tracing::warn!("Login rejected for {}: {}", username, detail);
        Err(AuthError::Rejected(detail))
    }

    /// Create an account
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<NewUser, AuthError> {
        let response = self
            .post(
                SIGNUP_PATH,
                &SignupRequest {
                    username,
                    email,
                    password,
                },
            )
            .await?;

        if response.ok() {
            if let Ok(user) = response.json::<NewUser>() {
                tracing::info!("Created account {} (id {})", username, user.id);
                return Ok(user);
            }
        }

        let messages = response
            .json::<Value>()
            .map(|body| flatten_messages(&body))
            .unwrap_or_default();
        let message = if messages.is_empty() {
            "Signup failed".to_string()
        } else {
            messages.join(", ")
        };
        tracing::warn!("Signup rejected for {}: {}", username, message);
        Err(AuthError::Rejected(message))
    }

    /// Exchange a Google ID token through the social-auth endpoint
    pub async fn google_login(&self, id_token: &str) -> Result<TokenPair, AuthError> {
        self.google(GOOGLE_SOCIAL_PATH, id_token).await
    }

    /// Exchange a Google ID token through the legacy endpoint used by the
    /// sign-in button callback
    pub async fn google_login_legacy(&self, id_token: &str) -> Result<TokenPair, AuthError> {
        self.google(GOOGLE_LOGIN_PATH, id_token).await
    }

    /// Remove stored tokens and point the location at the login view
    pub fn logout(&self) {
        self.dispatcher.force_logout();
        tracing::info!("Logged out");
    }

    async fn google(&self, path: &str, id_token: &str) -> Result<TokenPair, AuthError> {
        let response = self
            .post(path, &GoogleRequest { access_token: id_token })
            .await?;

        if response.ok() {
            if let Ok(tokens) = response.json::<GoogleTokens>() {
                tracing::info!("Logged in via Google");
                return Ok(TokenPair::new(tokens.access_token, tokens.refresh_token));
            }
        }

        let detail = detail_of(&response).unwrap_or_else(|| "Google login failed".to_string());
        Err(AuthError::Rejected(detail))
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse, AuthError> {
        let request = ApiRequest::post(self.dispatcher.url(path))
            .json(body)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(self.dispatcher.send_plain(request).await?)
    }
}

/// Server-provided `detail` message, if the body carries one
pub(crate) fn detail_of(response: &ApiResponse) -> Option<String> {
    response
        .json::<Value>()
        .ok()?
        .get("detail")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Every message in a field-keyed error map, in key order
pub(crate) fn flatten_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        Value::Object(map) => map.values().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}
