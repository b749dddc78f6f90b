//! View Router
//!
//! Tracks which page is showing and derives the flip direction of each
//! transition from a fixed page order. Routing itself cannot fail; the auth
//! guard on the predict page lives in [`crate::app::App::navigate`].

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    About,
    Contact,
    Predict,
    Login,
    Signup,
}

impl Page {
    /// Canonical order used for transition direction
    pub const ORDER: [Page; 6] = [
        Page::Home,
        Page::About,
        Page::Contact,
        Page::Predict,
        Page::Login,
        Page::Signup,
    ];

    pub fn ordinal(&self) -> usize {
        match self {
            Page::Home => 0,
            Page::About => 1,
            Page::Contact => 2,
            Page::Predict => 3,
            Page::Login => 4,
            Page::Signup => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::About => "about",
            Page::Contact => "contact",
            Page::Predict => "predict",
            Page::Login => "login",
            Page::Signup => "signup",
        }
    }

    /// Location fragment, e.g. `#/login`
    pub fn fragment(&self) -> String {
        format!("#/{}", self.name())
    }

    pub fn from_fragment(fragment: &str) -> Option<Page> {
        fragment.strip_prefix("#/")?.parse().ok()
    }

    /// Pages that need a signed-in session
    pub fn requires_auth(&self) -> bool {
        matches!(self, Page::Predict)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ORDER
            .into_iter()
            .find(|p| p.name() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown page '{}'", s))
    }
}

/// Page-flip animation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn between(from: Page, to: Page) -> Self {
        if to.ordinal() > from.ordinal() {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Direction::Forward => "page-flip-left",
            Direction::Backward => "page-flip-right",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    current: Page,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    /// Move to `target`, returning the direction relative to the previous page
    pub fn transition(&mut self, target: Page) -> Direction {
        let direction = Direction::between(self.current, target);
        tracing::debug!("route {} -> {} ({})", self.current, target, direction.class());
        self.current = target;
        direction
    }
}
