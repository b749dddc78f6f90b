//! Prediction page and the report/result-card fragments its regions show.

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;

use crate::predict::{EdaReport, ModelKind, ModelOutcome, SavedResult};
use crate::ui::components::escape;
use crate::ui::dom::{Dom, Event};
use crate::ui::Action;

pub const RESULTS_REGION: &str = "savedResultsContainer";

pub fn render() -> String {
    let options: String = ModelKind::ALL
        .iter()
        .map(|m| format!(r#"<option value="{}">{}</option>"#, m.as_str(), m.label()))
        .collect();

    format!(
        concat!(
            r#"<section class="prediction-section">"#,
            r#"<h1 class="prediction-title">Smart Sales Prediction</h1>"#,
            r#"<h2>Upload Dataset</h2>"#,
            r#"<input type="file" id="fileInput" />"#,
            r#"<button id="edaBtn">Generate EDA</button>"#,
            r#"<div class="eda-output" id="edaOutput"></div>"#,
            r#"<h2>Select Model</h2>"#,
            r#"<select id="modelSelect">{}</select>"#,
            r#"<button id="trainBtn">Train Model</button>"#,
            r#"<div class="train-output" id="trainOutput"></div>"#,
            r#"<h2>Save Results</h2>"#,
            r#"<input type="text" id="noteInput" placeholder="Optional notes..." />"#,
            r#"<button id="saveBtn">Save Result</button>"#,
            r#"<div class="save-output" id="saveOutput"></div>"#,
            r#"<h2>Saved Results</h2>"#,
            r#"<input type="text" id="filterInput" placeholder="Filter by filename or date..." />"#,
            r#"<button id="loadResultsBtn">Load Saved Results</button>"#,
            r#"<div id="savedResultsContainer"></div>"#,
            r#"</section>"#
        ),
        options
    )
}

pub fn bind(dom: &mut Dom) {
    dom.bind("edaBtn", Event::Click, Action::GenerateEda);
    dom.bind("trainBtn", Event::Click, Action::TrainModel);
    dom.bind("saveBtn", Event::Click, Action::SaveResult);
    dom.bind("loadResultsBtn", Event::Click, Action::LoadResults);
    dom.bind("filterInput", Event::Input, Action::LoadResults);
    // first option is preselected
    dom.seed_field("modelSelect", ModelKind::RandomForest.as_str());
}

fn pretty<T: Serialize>(value: &T) -> String {
    escape(&serde_json::to_string_pretty(value).unwrap_or_default())
}

fn or_none(value: Option<&str>) -> String {
    escape(value.unwrap_or("None"))
}

pub fn render_eda_report(report: &EdaReport) -> String {
    let graphs = if report.graphs.is_empty() {
        "<p>No graphs available</p>".to_string()
    } else {
        report
            .graphs
            .iter()
            .map(|(title, b64)| {
                format!(
                    r#"<p><strong>{}</strong></p><img src="data:image/png;base64,{}" />"#,
                    escape(title),
                    escape(b64)
                )
            })
            .collect()
    };

    format!(
        concat!(
            "<h3>EDA Report</h3>",
            "<p><strong>Shape:</strong> {shape}</p>",
            "<p><strong>Columns:</strong> {columns}</p>",
            "<p><strong>Inferred Target Column:</strong> {target}</p>",
            "<p><strong>Date Column Detected:</strong> {date}</p>",
            "<p><strong>Month Feature Added:</strong> {month}</p>",
            "<h4>Missing Values</h4><pre>{missing}</pre>",
            "<h4>Unique Values</h4><pre>{unique}</pre>",
            "<h4>Data Types</h4><pre>{dtypes}</pre>",
            "<h4>Correlation Matrix</h4><pre>{corr}</pre>",
            "<h4>Descriptive Statistics</h4><pre>{stats}</pre>",
            "<h4>Example Rows</h4><pre>{rows}</pre>",
            "<h4>Graphs</h4>{graphs}"
        ),
        shape = escape(&report.shape_label()),
        columns = escape(&report.columns.join(", ")),
        target = or_none(report.inferred_target.as_deref()),
        date = or_none(report.date_column_used.as_deref()),
        month = if report.month_feature_added { "Yes" } else { "No" },
        missing = pretty(&report.missing_values),
        unique = pretty(&report.unique_values),
        dtypes = pretty(&report.dtypes),
        corr = pretty(&report.correlation_matrix),
        stats = pretty(&report.descriptive_stats),
        rows = pretty(&report.example_rows),
        graphs = graphs,
    )
}

pub fn render_model_report(outcome: &ModelOutcome) -> String {
    let report = &outcome.report;
    let metric = |v: Option<f64>| v.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "N/A".into());
    let samples = report
        .sample_predictions
        .as_ref()
        .map(|p| {
            p.iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_else(|| "N/A".into()))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "N/A".into());
    let plot = report
        .forecast_plot_base64
        .as_deref()
        .map(|b64| {
            format!(
                r#"<h4>Forecast Plot</h4><img src="data:image/png;base64,{}" />"#,
                escape(b64)
            )
        })
        .unwrap_or_default();

    format!(
        concat!(
            "<h3>Model Report</h3>",
            "<p><strong>Model Name:</strong> {}</p>",
            "<p><strong>Target Column:</strong> {}</p>",
            "<p><strong>Features Used:</strong> {}</p>",
            "<p><strong>RMSE:</strong> {}</p>",
            "<p><strong>R² Score:</strong> {}</p>",
            "<p><strong>Sample Predictions:</strong> {}</p>",
            "{}"
        ),
        outcome.model.label(),
        or_none(report.target_column.as_deref()),
        escape(&report.features_used.join(", ")),
        metric(report.rmse),
        metric(report.r2_score),
        samples,
        plot
    )
}

/// Server timestamps come as RFC 3339 or naive ISO 8601; anything else is
/// shown verbatim
fn display_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => escape(v),
        _ => "—".to_string(),
    }
}

fn render_result_card(r: &SavedResult) -> String {
    format!(
        concat!(
            r#"<div class="result-card"><details>"#,
            "<summary><strong>{file}</strong> ({date})</summary>",
            "<p><strong>Model:</strong> {model}</p>",
            "<p><strong>Target:</strong> {target}</p>",
            "<p><strong>Shape:</strong> {shape}</p>",
            r#"<p><strong>Notes:</strong> <span id="note-{id}">{notes}</span></p>"#,
            r#"<textarea id="editNote-{id}" rows="2">{raw_notes}</textarea>"#,
            r#"<button id="edit-{id}">Edit</button>"#,
            r#"<button id="delete-{id}">Delete</button>"#,
            r#"<button id="download-{id}">Download JSON</button>"#,
            "</details></div>"
        ),
        id = r.id,
        file = escape(&r.file_name),
        date = escape(&display_date(&r.created_at)),
        model = dash(r.model_name.as_deref()),
        target = dash(r.inferred_target.as_deref()),
        shape = dash(r.data_shape.as_deref()),
        notes = dash(r.notes.as_deref()),
        raw_notes = escape(r.notes.as_deref().unwrap_or("")),
    )
}

pub fn render_result_cards(results: &[SavedResult]) -> String {
    if results.is_empty() {
        return "<p>No saved results.</p>".to_string();
    }
    results.iter().map(render_result_card).collect()
}

/// Bind card buttons and seed each notes editor with the stored notes
pub fn bind_result_cards(dom: &mut Dom, results: &[SavedResult]) {
    for r in results {
        dom.bind_in(RESULTS_REGION, &format!("edit-{}", r.id), Event::Click, Action::EditResult(r.id));
        dom.bind_in(RESULTS_REGION, &format!("delete-{}", r.id), Event::Click, Action::DeleteResult(r.id));
        dom.bind_in(
            RESULTS_REGION,
            &format!("download-{}", r.id),
            Event::Click,
            Action::DownloadResult(r.id),
        );
        dom.seed_field(
            &format!("editNote-{}", r.id),
            r.notes.clone().unwrap_or_default(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::ModelReport;
    use serde_json::json;
    use std::time::Duration;

    fn saved(id: i64, notes: Option<&str>) -> SavedResult {
        SavedResult {
            id,
            file_name: "<sales>.csv".into(),
            created_at: "2024-03-05T14:07:00Z".into(),
            inferred_target: Some("revenue".into()),
            data_shape: None,
            model_name: Some("random_forest".into()),
            notes: notes.map(str::to_string),
            result_json: json!({}),
        }
    }

    #[test]
    fn test_page_has_every_control() {
        let html = render();
        for id in [
            "fileInput", "edaBtn", "modelSelect", "trainBtn", "noteInput", "saveBtn",
            "filterInput", "loadResultsBtn", "edaOutput", "trainOutput", "saveOutput",
            "savedResultsContainer",
        ] {
            assert!(html.contains(&format!("id=\"{}\"", id)), "missing {}", id);
        }
        assert!(html.contains(r#"<input type="file" id="fileInput" />"#));
        assert!(html.contains(r#"<option value="pytorch_nn">"#));
    }

    #[test]
    fn test_bind_preselects_model() {
        let mut dom = Dom::new(Duration::from_millis(600), Duration::from_secs(3));
        dom.replace(render());
        bind(&mut dom);

        assert_eq!(dom.field("modelSelect"), "random_forest");
        assert_eq!(dom.action_for("filterInput", Event::Input), Some(Action::LoadResults));
    }

    #[test]
    fn test_eda_report_markup() {
        let report = EdaReport {
            shape: vec![120, 4],
            columns: vec!["date".into(), "revenue".into()],
            inferred_target: Some("revenue".into()),
            ..EdaReport::default()
        };
        let html = render_eda_report(&report);

        assert!(html.contains("<strong>Shape:</strong> 120 rows, 4 columns"));
        assert!(html.contains("<strong>Date Column Detected:</strong> None"));
        assert!(html.contains("<strong>Month Feature Added:</strong> No"));
        assert!(html.contains("No graphs available"));
    }

    #[test]
    fn test_model_report_markup() {
        let outcome = ModelOutcome {
            model: ModelKind::Xgboost,
            report: ModelReport {
                target_column: Some("revenue".into()),
                rmse: Some(1.5),
                sample_predictions: Some(vec![Some(1.0), None, Some(2.5)]),
                ..ModelReport::default()
            },
            raw: json!({}),
        };
        let html = render_model_report(&outcome);

        assert!(html.contains("<strong>Model Name:</strong> XGBoost"));
        assert!(html.contains("<strong>RMSE:</strong> 1.5000"));
        assert!(html.contains("<strong>R² Score:</strong> N/A"));
        assert!(html.contains("<strong>Sample Predictions:</strong> 1, N/A, 2.5"));
        assert!(!html.contains("Forecast Plot"));
    }

    #[test]
    fn test_result_card_escapes_and_formats() {
        let html = render_result_cards(&[saved(7, Some("<script>"))]);

        assert!(html.contains("&lt;sales&gt;.csv"));
        assert!(html.contains("2024-03-05 14:07"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<strong>Shape:</strong> —"));
        assert!(html.contains(r#"id="delete-7""#));
    }

    #[test]
    fn test_bind_result_cards() {
        let results = vec![saved(1, Some("q1")), saved(2, None)];
        let mut dom = Dom::new(Duration::from_millis(600), Duration::from_secs(3));
        dom.replace(render());
        dom.set_region(RESULTS_REGION, render_result_cards(&results));
        bind_result_cards(&mut dom, &results);

        assert_eq!(dom.action_for("edit-1", Event::Click), Some(Action::EditResult(1)));
        assert_eq!(dom.action_for("download-2", Event::Click), Some(Action::DownloadResult(2)));
        assert_eq!(dom.field("editNote-1"), "q1");
        assert_eq!(dom.field("editNote-2"), "");
    }

    #[test]
    fn test_display_date_fallback() {
        assert_eq!(display_date("2024-01-02T03:04:05.123456"), "2024-01-02 03:04");
        assert_eq!(display_date("yesterday"), "yesterday");
    }
}
