//! Shared markup: navbar, loader, the home call-to-action button, escaping.

use super::dom::{Dom, Event};
use super::Action;
use crate::router::Page;

/// Escape text for inclusion in markup
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const NAV_LINKS: [(&str, &str, Page); 4] = [
    ("home-link", "Home", Page::Home),
    ("predict-link", "Predict", Page::Predict),
    ("about-link", "About", Page::About),
    ("contact-link", "Contact", Page::Contact),
];

/// Header navigation bar; auth links depend on the session
pub fn navbar(logged_in: bool) -> String {
    let mut links: String = NAV_LINKS
        .iter()
        .map(|(id, label, _)| format!(r##"<li><a href="#" id="{}">{}</a></li>"##, id, label))
        .collect();

    if logged_in {
        links.push_str(r##"<li><a href="#" id="logout-link">Logout</a></li>"##);
    } else {
        links.push_str(r##"<li><a href="#" id="login-link">Login</a></li>"##);
        links.push_str(r##"<li><a href="#" id="signup-link">Sign Up</a></li>"##);
    }

    format!(
        r#"<div class="navbar-wrapper"><nav class="navbar"><div class="navbar-logo">Sales Predictor</div><ul class="navbar-links">{}</ul></nav></div>"#,
        links
    )
}

/// Attach navbar listeners; auth links bind only if present
pub fn bind_navbar(dom: &mut Dom) {
    for (id, _, page) in NAV_LINKS {
        dom.bind(id, Event::Click, Action::Navigate(page));
    }
    dom.bind("login-link", Event::Click, Action::Navigate(Page::Login));
    dom.bind("signup-link", Event::Click, Action::Navigate(Page::Signup));
    dom.bind("logout-link", Event::Click, Action::Logout);
}

/// Busy indicator placed into output regions while a call is in flight
pub fn loader() -> String {
    r#"<div class="loader-overlay"><div class="loader"><div class="loader-item"></div><div class="loader-item"></div><div class="loader-item"></div><div class="loader-core"></div></div></div>"#
        .to_string()
}

pub fn gooey_button() -> String {
    r#"<div class="gooey-button-container"><button class="gooey-button" id="predict-button">Predict</button><span class="bubbles"><span class="bubble"></span><span class="bubble"></span><span class="bubble"></span><span class="bubble"></span></span></div>"#
        .to_string()
}

/// Error paragraph for an output region
pub fn error_message(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, escape(message))
}

pub fn success_message(message: &str) -> String {
    format!(r#"<p class="success">{}</p>"#, escape(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_navbar_auth_links() {
        let out = navbar(false);
        assert!(out.contains("Sales Predictor"));
        assert!(out.contains(r#"id="login-link""#));
        assert!(out.contains(r#"id="signup-link""#));
        assert!(!out.contains(r#"id="logout-link""#));

        let inside = navbar(true);
        assert!(inside.contains(r#"id="logout-link""#));
        assert!(!inside.contains(r#"id="login-link""#));
    }

    #[test]
    fn test_bind_navbar_skips_missing_links() {
        let mut dom = Dom::default();
        dom.replace(navbar(true));
        bind_navbar(&mut dom);

        assert_eq!(dom.bindings().len(), 5);
        assert_eq!(dom.action_for("logout-link", Event::Click), Some(Action::Logout));
        assert_eq!(dom.action_for("login-link", Event::Click), None);
    }
}
