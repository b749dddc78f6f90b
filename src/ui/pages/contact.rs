use crate::ui::dom::{Dom, Event};
use crate::ui::Action;

pub const FIELDS: [&str; 3] = ["name", "email", "message"];

pub fn render() -> String {
    concat!(
        r#"<section class="contact-section">"#,
        r#"<h1 class="contact-title">Contact</h1>"#,
        r#"<p class="contact-text">Questions, ideas or feedback? Send a message.</p>"#,
        r#"<form id="contactForm" class="contact-form">"#,
        r#"<input type="text" name="name" placeholder="Your Name" required />"#,
        r#"<input type="email" name="email" placeholder="Your Email" required />"#,
        r#"<textarea name="message" placeholder="Your Message" rows="5" required></textarea>"#,
        r#"<button type="submit" class="contact-button">Send Message</button>"#,
        r#"</form></section>"#
    )
    .to_string()
}

pub fn bind(dom: &mut Dom) {
    dom.bind("contactForm", Event::Submit, Action::SubmitContact);
}
