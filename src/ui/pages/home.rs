use crate::router::Page;
use crate::ui::components::gooey_button;
use crate::ui::dom::{Dom, Event};
use crate::ui::Action;

pub fn render() -> String {
    format!(
        r#"<h1 class="hero-title">Welcome to the Sales Predictor</h1><p class="hero-subtitle">Predict your business future with confidence.</p><div class="button-container">{}</div>"#,
        gooey_button()
    )
}

pub fn bind(dom: &mut Dom) {
    dom.bind("predict-button", Event::Click, Action::Navigate(Page::Predict));
}
