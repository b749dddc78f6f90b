//! Navigation Location
//!
//! Shared stand-in for the address-bar fragment. Forced logouts write
//! `#/login` here; whoever hosts the views observes the change and follows it.

use std::sync::{Arc, Mutex};

/// Fragment written when a session ends
pub const LOGIN_FRAGMENT: &str = "#/login";

#[derive(Debug, Default)]
struct LocationState {
    fragment: String,
    unseen: bool,
}

/// Cloneable handle to the current location fragment
#[derive(Debug, Clone, Default)]
pub struct Location {
    state: Arc<Mutex<LocationState>>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fragment and flag it for observers
    pub fn set(&self, fragment: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.fragment = fragment.to_string();
            state.unseen = true;
        }
    }

    /// Current fragment (empty until first set)
    pub fn fragment(&self) -> String {
        self.state
            .lock()
            .map(|s| s.fragment.clone())
            .unwrap_or_default()
    }

    /// Fragment written since the last call, if any
    pub fn take_change(&self) -> Option<String> {
        let mut state = self.state.lock().ok()?;
        if state.unseen {
            state.unseen = false;
            Some(state.fragment.clone())
        } else {
            None
        }
    }
}
