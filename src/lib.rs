//! # Sales Predictor
//!
//! Client for the Sales Predictor service: a session-aware API layer, a
//! headless view router, and the dataset upload / model training / saved
//! result workflow.
//!
//! ## Features
//!
//! - **Session handling**: persisted access/refresh token pair
//! - **Authenticated dispatch**: bearer injection, one refresh-and-retry on
//!   401, forced logout when the session cannot be renewed
//! - **Views**: six pages rendered into a single mount point, with an auth
//!   guard on the prediction page
//! - **Prediction workflow**: EDA, training, and saved-result management
//!
//! ## Modules
//!
//! - [`session`]: token store and navigation location
//! - [`http`]: requests, transport, and the dispatcher
//! - [`auth`], [`predict`], [`contact`]: service clients
//! - [`router`], [`ui`], [`app`]: views and the application context
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_predictor::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileTokenStore::new("session.json"));
//!     let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(30))?);
//!     let dispatcher = Dispatcher::new("http://127.0.0.1:8000", transport, store, Location::new());
//!
//!     let mut app = App::new(dispatcher, AppSettings::default());
//!     app.click("login-link").await?;
//!     app.fill("username", "alice").await?;
//!     app.fill("password", "secret").await?;
//!     app.submit("loginForm").await?;
//!
//!     println!("Now on {}", app.current_page());
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod config;
pub mod contact;
pub mod http;
pub mod predict;
pub mod router;
pub mod session;
pub mod ui;

// Re-export top-level types for convenience
pub use app::{App, AppSettings};

pub use auth::{AuthError, AuthService, NewUser};

pub use contact::{ContactApi, ContactError, ContactMessage};

pub use http::{
    ApiRequest, ApiResponse, DispatchError, Dispatcher, ReqwestTransport, Transport,
    TransportError,
};

pub use predict::{
    EdaOutcome, EdaReport, ModelKind, ModelOutcome, ModelReport, PredictApi, PredictError,
    PredictWorkflow, SavedResult, UploadFile,
};

pub use router::{Direction, Page, Router};

pub use session::{FileTokenStore, Location, MemoryTokenStore, StoreError, TokenPair, TokenStore};

pub use ui::{Action, ToastKind, UiError};
