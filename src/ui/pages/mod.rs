//! Page Renderers
//!
//! `render` produces markup only; `bind` runs after the markup is in the
//! mount and attaches listeners to it.

mod about;
mod contact;
mod home;
mod login;
mod predict;
mod signup;

pub use contact::FIELDS as CONTACT_FIELDS;
pub use predict::{
    bind_result_cards, render_eda_report, render_model_report, render_result_cards, RESULTS_REGION,
};

use super::dom::Dom;
use crate::router::Page;

/// Session facts a renderer may depend on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub logged_in: bool,
    pub google_client_id: Option<String>,
}

/// Page body markup, without the navbar
pub fn render(page: Page, ctx: &RenderContext) -> String {
    match page {
        Page::Home => home::render(),
        Page::About => about::render(),
        Page::Contact => contact::render(),
        Page::Predict => predict::render(),
        Page::Login => login::render(ctx),
        Page::Signup => signup::render(ctx),
    }
}

/// Attach the page's listeners to the markup currently in `dom`
pub fn bind(page: Page, dom: &mut Dom) {
    match page {
        Page::Home => home::bind(dom),
        Page::About => {}
        Page::Contact => contact::bind(dom),
        Page::Predict => predict::bind(dom),
        Page::Login => login::bind(dom),
        Page::Signup => signup::bind(dom),
    }
}
