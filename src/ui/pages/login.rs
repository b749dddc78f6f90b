use super::RenderContext;
use crate::router::Page;
use crate::ui::components::escape;
use crate::ui::dom::{Dom, Event};
use crate::ui::Action;

pub fn render(ctx: &RenderContext) -> String {
    format!(
        concat!(
            r#"<section class="auth-section"><h1>Log In</h1>"#,
            r#"<form id="loginForm" class="auth-form">"#,
            r#"<input name="username" placeholder="Username" required />"#,
            r#"<input name="password" type="password" placeholder="Password" required />"#,
            r#"<button type="submit">Log In</button></form>"#,
            "{}",
            r##"<p>Don't have an account? <a href="#" id="to-signup-inline">Sign up</a></p>"##,
            r#"</section>"#
        ),
        google_slot(ctx)
    )
}

pub fn bind(dom: &mut Dom) {
    dom.bind("loginForm", Event::Submit, Action::SubmitLogin);
    dom.bind("to-signup-inline", Event::Click, Action::Navigate(Page::Signup));
}

/// Google sign-in placeholder, only when a client id is configured
pub(super) fn google_slot(ctx: &RenderContext) -> String {
    match &ctx.google_client_id {
        Some(client_id) => format!(
            r#"<div id="google-signin" data-client-id="{}"></div>"#,
            escape(client_id)
        ),
        None => String::new(),
    }
}
