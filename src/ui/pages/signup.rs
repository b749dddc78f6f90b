use super::login::google_slot;
use super::RenderContext;
use crate::router::Page;
use crate::ui::dom::{Dom, Event};
use crate::ui::Action;

pub fn render(ctx: &RenderContext) -> String {
    format!(
        concat!(
            r#"<section class="auth-section"><h1>Sign Up</h1>"#,
            r#"<form id="signupForm" class="auth-form">"#,
            r#"<input name="username" placeholder="Username" required />"#,
            r#"<input name="email" type="email" placeholder="Email" required />"#,
            r#"<input name="password" type="password" placeholder="Password" required />"#,
            r#"<button type="submit">Create Account</button></form>"#,
            "{}",
            r##"<p>Already have an account? <a href="#" id="to-login-inline">Log in</a></p>"##,
            r#"</section>"#
        ),
        google_slot(ctx)
    )
}

pub fn bind(dom: &mut Dom) {
    dom.bind("signupForm", Event::Submit, Action::SubmitSignup);
    dom.bind("to-login-inline", Event::Click, Action::Navigate(Page::Login));
}
