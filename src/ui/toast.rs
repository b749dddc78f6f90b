//! Toast Notifications
//!
//! Transient success/error/info/warning messages. The most recent
//! [`HISTORY_LIMIT`] toasts are kept with their timestamps; visibility is a
//! function of time.

use std::fmt;
use std::time::{Duration, Instant};

use super::components::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Info => "ℹ️",
            ToastKind::Warning => "⚠️",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn render(&self) -> String {
        format!(
            r#"<div class="toast {} show"><span class="toast-icon">{}</span><span class="toast-message">{}</span></div>"#,
            self.kind.class(),
            self.kind.icon(),
            escape(&self.message)
        )
    }
}

/// Toasts retained for [`ToastContainer::history`]
pub const HISTORY_LIMIT: usize = 50;

/// Toast container
#[derive(Debug, Clone, Default)]
pub struct ToastContainer {
    duration: Duration,
    toasts: Vec<Toast>,
}

impl ToastContainer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            toasts: Vec::new(),
        }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        let message = message.into();
        match kind {
            ToastKind::Error => tracing::warn!("toast [{}]: {}", kind, message),
            _ => tracing::info!("toast [{}]: {}", kind, message),
        }
        self.toasts.push(Toast {
            kind,
            message,
            shown_at: now,
        });
        if self.toasts.len() > HISTORY_LIMIT {
            let excess = self.toasts.len() - HISTORY_LIMIT;
            self.toasts.drain(..excess);
        }
    }

    /// Recent toasts, oldest first
    pub fn history(&self) -> &[Toast] {
        &self.toasts
    }

    /// Toasts still on screen at `now`
    pub fn visible_at(&self, now: Instant) -> Vec<&Toast> {
        self.toasts
            .iter()
            .filter(|t| now.saturating_duration_since(t.shown_at) < self.duration)
            .collect()
    }

    pub fn render_at(&self, now: Instant) -> String {
        let inner: String = self.visible_at(now).iter().map(|t| t.render()).collect();
        format!(r#"<div class="toast-container">{}</div>"#, inner)
    }
}
