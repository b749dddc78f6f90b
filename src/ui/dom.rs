//! Document Model
//!
//! A single mount point holding the current markup, plus everything that
//! lives and dies with that markup: bound listeners, form field values, chosen
//! files and the content of output regions. Replacing the mount discards all
//! of it; there is no incremental patching.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::toast::ToastContainer;
use super::{Action, UiError};
use crate::predict::UploadFile;

/// DOM events that listeners can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Click,
    Submit,
    Input,
}

/// A listener bound to an element id
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub element_id: String,
    pub event: Event,
    pub action: Action,
    /// Output region the element was inserted into, if any
    pub region: Option<String>,
}

/// The mount point and its per-render state
#[derive(Debug, Default)]
pub struct Dom {
    mount: String,
    bindings: Vec<Binding>,
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, UploadFile>,
    regions: BTreeMap<String, String>,
    renders: u64,
    pub(crate) scroll: ScrollLock,
    pub(crate) toasts: ToastContainer,
}

impl Dom {
    pub fn new(scroll_cooldown: Duration, toast_duration: Duration) -> Self {
        Self {
            scroll: ScrollLock::new(scroll_cooldown),
            toasts: ToastContainer::new(toast_duration),
            ..Self::default()
        }
    }

    /// Replace the whole mount content, dropping every listener and all
    /// per-element state of the previous markup
    pub fn replace(&mut self, markup: String) {
        self.mount = markup;
        self.bindings.clear();
        self.fields.clear();
        self.files.clear();
        self.regions.clear();
        self.renders += 1;
    }

    /// Number of full replacements so far
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Markup as inserted, without region content
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Current markup with region content spliced in
    pub fn html(&self) -> String {
        let mut html = self.mount.clone();
        for (id, content) in &self.regions {
            let marker = format!("id=\"{}\"", id);
            if let Some(start) = html.find(&marker) {
                if let Some(close) = html[start..].find('>') {
                    html.insert_str(start + close + 1, content);
                }
            }
        }
        html
    }

    /// Whether an element with this id exists in the mount or any region
    pub fn has_element(&self, id: &str) -> bool {
        let marker = format!("id=\"{}\"", id);
        self.mount.contains(&marker) || self.regions.values().any(|c| c.contains(&marker))
    }

    /// Whether a form control with this name or id exists
    pub fn has_control(&self, name: &str) -> bool {
        let marker = format!("name=\"{}\"", name);
        self.has_element(name)
            || self.mount.contains(&marker)
            || self.regions.values().any(|c| c.contains(&marker))
    }

    /// Attach a listener if the element exists; returns whether it was bound
    pub fn bind(&mut self, element_id: &str, event: Event, action: Action) -> bool {
        self.bind_scoped(element_id, event, action, None)
    }

    /// Attach a listener to an element inside an output region
    pub fn bind_in(&mut self, region: &str, element_id: &str, event: Event, action: Action) -> bool {
        self.bind_scoped(element_id, event, action, Some(region.to_string()))
    }

    fn bind_scoped(
        &mut self,
        element_id: &str,
        event: Event,
        action: Action,
        region: Option<String>,
    ) -> bool {
        if !self.has_element(element_id) {
            return false;
        }
        self.bindings.push(Binding {
            element_id: element_id.to_string(),
            event,
            action,
            region,
        });
        true
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Action bound to an element for an event
    pub fn action_for(&self, element_id: &str, event: Event) -> Option<Action> {
        self.bindings
            .iter()
            .find(|b| b.element_id == element_id && b.event == event)
            .map(|b| b.action.clone())
    }

    /// Replace an output region's content, dropping listeners bound inside it
    pub fn set_region(&mut self, id: &str, content: String) -> bool {
        if !self.mount.contains(&format!("id=\"{}\"", id)) {
            return false;
        }
        self.bindings.retain(|b| b.region.as_deref() != Some(id));
        self.regions.insert(id.to_string(), content);
        true
    }

    pub fn region(&self, id: &str) -> &str {
        self.regions.get(id).map(String::as_str).unwrap_or("")
    }

    /// Set a form control's value
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), UiError> {
        if !self.has_control(name) {
            return Err(UiError::MissingElement(name.to_string()));
        }
        self.fields.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Initial value for a control the renderer just emitted; returns whether
    /// the control was found
    pub fn seed_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        if !self.has_control(name) {
            tracing::debug!("no control {} to seed", name);
            return false;
        }
        self.fields.insert(name.to_string(), value.into());
        true
    }

    /// A form control's value (empty if never set)
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Reset the given controls to empty
    pub fn reset_fields(&mut self, names: &[&str]) {
        for name in names {
            self.fields.remove(*name);
        }
    }

    /// Attach a file to a file input
    pub fn set_file(&mut self, input_id: &str, file: UploadFile) -> Result<(), UiError> {
        if !self.has_element(input_id) {
            return Err(UiError::MissingElement(input_id.to_string()));
        }
        self.files.insert(input_id.to_string(), file);
        Ok(())
    }

    pub fn file(&self, input_id: &str) -> Option<&UploadFile> {
        self.files.get(input_id)
    }
}

/// Temporary scroll suppression.
///
/// Each lock schedules its own restore one cooldown later. A restore fires
/// even when a newer lock is still inside its window, so overlapping
/// transitions can unlock early.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    cooldown: Duration,
    /// `(when, locked)` state changes in time order
    events: Vec<(Instant, bool)>,
}

impl ScrollLock {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            events: Vec::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Suppress scrolling from `now` for one cooldown
    pub fn lock(&mut self, now: Instant) {
        self.events.retain(|(at, _)| *at > now);
        self.events.push((now, true));
        self.events.push((now + self.cooldown, false));
        self.events.sort_by_key(|(at, _)| *at);
    }

    /// Whether scrolling is suppressed at `now`
    pub fn is_locked_at(&self, now: Instant) -> bool {
        self.events
            .iter()
            .take_while(|(at, _)| *at <= now)
            .last()
            .map(|(_, locked)| *locked)
            .unwrap_or(false)
    }
}
