//! Prediction API data types
//!
//! Request and response bodies for the EDA, training and saved-result
//! endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Models offered by the training endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    RandomForest,
    LinearRegression,
    DecisionTree,
    Xgboost,
    Lightgbm,
    PytorchNn,
}

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        ModelKind::RandomForest,
        ModelKind::LinearRegression,
        ModelKind::DecisionTree,
        ModelKind::Xgboost,
        ModelKind::Lightgbm,
        ModelKind::PytorchNn,
    ];

    /// Wire name sent as the `model` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::LinearRegression => "linear_regression",
            ModelKind::DecisionTree => "decision_tree",
            ModelKind::Xgboost => "xgboost",
            ModelKind::Lightgbm => "lightgbm",
            ModelKind::PytorchNn => "pytorch_nn",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "Random Forest",
            ModelKind::LinearRegression => "Linear Regression",
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::Xgboost => "XGBoost",
            ModelKind::Lightgbm => "LightGBM",
            ModelKind::PytorchNn => "PyTorch NN",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = ModelKind::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown model '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// A dataset chosen for upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as name
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Exploratory data analysis report
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EdaReport {
    /// `[rows, columns]`
    #[serde(default)]
    pub shape: Vec<u64>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub dtypes: BTreeMap<String, String>,
    #[serde(default)]
    pub missing_values: Value,
    #[serde(default)]
    pub unique_values: Value,
    #[serde(default)]
    pub descriptive_stats: Value,
    #[serde(default)]
    pub correlation_matrix: Value,
    #[serde(default)]
    pub example_rows: Value,
    #[serde(default)]
    pub inferred_target: Option<String>,
    #[serde(default)]
    pub date_column_used: Option<String>,
    #[serde(default)]
    pub month_feature_added: bool,
    /// Chart title to base64 PNG
    #[serde(default)]
    pub graphs: BTreeMap<String, String>,
}

impl EdaReport {
    /// "N rows, M columns", or the raw shape if it is not two-dimensional
    pub fn shape_label(&self) -> String {
        match self.shape.as_slice() {
            [rows, cols] => format!("{} rows, {} columns", rows, cols),
            [] => String::new(),
            other => format!("{:?}", other),
        }
    }
}

/// Trained model report
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ModelReport {
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub features_used: Vec<String>,
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub r2_score: Option<f64>,
    #[serde(default)]
    /// Non-finite predictions arrive as `null`
    pub sample_predictions: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub forecast_plot_base64: Option<String>,
}

/// Body of `POST /api/save-result/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveResultRequest {
    pub file_name: String,
    pub inferred_target: String,
    pub data_shape: String,
    pub result_json: Value,
    pub model_name: String,
    pub notes: String,
}

/// One entry of the saved-results listing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SavedResult {
    pub id: i64,
    pub file_name: String,
    pub created_at: String,
    #[serde(default)]
    pub inferred_target: Option<String>,
    #[serde(default)]
    pub data_shape: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub result_json: Value,
}

impl SavedResult {
    /// Case-insensitive match on file name or creation timestamp
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.file_name.to_lowercase().contains(&filter)
            || self.created_at.to_lowercase().contains(&filter)
    }
}

/// Page of saved results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedResultsPage {
    #[serde(default)]
    pub results: Vec<SavedResult>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}
