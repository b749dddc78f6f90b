//! Headless User Interface
//!
//! Pages are pure markup producers paired with a bind step that attaches
//! [`Action`]s to elements of the freshly inserted markup. The [`dom::Dom`]
//! holds the single mount point those pages render into.
//!
//! ## Components
//!
//! - [`dom`]: mount point, listeners, form fields, output regions, scroll lock
//! - [`toast`]: transient notifications
//! - [`components`]: navbar, loader, shared markup helpers
//! - [`pages`]: one renderer per view

pub mod components;
pub mod dom;
pub mod pages;
pub mod toast;

use thiserror::Error;

use crate::router::Page;

pub use dom::{Binding, Dom, Event, ScrollLock};
pub use pages::RenderContext;
pub use toast::{Toast, ToastContainer, ToastKind};

/// What a bound listener does when its event fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Page),
    Logout,
    SubmitLogin,
    SubmitSignup,
    SubmitContact,
    GenerateEda,
    TrainModel,
    SaveResult,
    LoadResults,
    EditResult(i64),
    DeleteResult(i64),
    DownloadResult(i64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// No element with this id or name in the current markup
    #[error("No element '{0}' on the current page")]
    MissingElement(String),
}
