pub fn render() -> String {
    concat!(
        r#"<section class="about-section">"#,
        r#"<h1 class="about-title">About</h1>"#,
        r#"<p class="about-text">Sales Predictor turns a CSV of historical sales into an exploratory report "#,
        r#"and a trained forecasting model, and keeps the results you want to come back to.</p>"#,
        r#"<h2 class="about-subheading">Models</h2>"#,
        r#"<ul class="skills-list"><li>Random Forest, Decision Tree, Linear Regression</li>"#,
        r#"<li>XGBoost, LightGBM</li><li>PyTorch neural network</li></ul>"#,
        r#"</section>"#
    )
    .to_string()
}
