//! Prediction Workflow
//!
//! Holds the most recent EDA and training results between the upload/train
//! calls and a later save, and builds the save payload from them.

use serde_json::Value;
use std::path::{Path, PathBuf};

use super::api::{PredictApi, PredictError, PredictResult};
use super::dto::{EdaReport, ModelKind, ModelReport, SaveResultRequest, SavedResult, UploadFile};

/// An EDA report together with the payload it was decoded from
#[derive(Debug, Clone, PartialEq)]
pub struct EdaOutcome {
    pub report: EdaReport,
    pub raw: Value,
}

/// A training report, the model it was produced by, and the raw payload
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutcome {
    pub model: ModelKind,
    pub report: ModelReport,
    pub raw: Value,
}

/// Upload, train, save and manage saved results for one session
pub struct PredictWorkflow {
    api: PredictApi,
    last_eda: Option<EdaOutcome>,
    last_model: Option<ModelOutcome>,
}

impl PredictWorkflow {
    pub fn new(api: PredictApi) -> Self {
        Self {
            api,
            last_eda: None,
            last_model: None,
        }
    }

    pub fn last_eda(&self) -> Option<&EdaOutcome> {
        self.last_eda.as_ref()
    }

    pub fn last_model(&self) -> Option<&ModelOutcome> {
        self.last_model.as_ref()
    }

    /// Whether there is anything to save
    pub fn has_pending(&self) -> bool {
        self.last_eda.is_some() || self.last_model.is_some()
    }

    /// Run EDA on a dataset and keep the report for saving
    pub async fn generate_eda(&mut self, file: &UploadFile) -> PredictResult<&EdaOutcome> {
        let (report, raw) = self.api.eda(file).await?;
        tracing::info!(
            "EDA for {}: {} (target: {})",
            file.file_name,
            report.shape_label(),
            report.inferred_target.as_deref().unwrap_or("none")
        );
        Ok(self.last_eda.insert(EdaOutcome { report, raw }))
    }

    /// Train a model on a dataset and keep the report for saving
    pub async fn train(&mut self, file: &UploadFile, model: ModelKind) -> PredictResult<&ModelOutcome> {
        let (report, raw) = self.api.train(file, model).await?;
        tracing::info!(
            "Trained {} on {}: rmse={:?} r2={:?}",
            model,
            file.file_name,
            report.rmse,
            report.r2_score
        );
        Ok(self.last_model.insert(ModelOutcome { model, report, raw }))
    }

    /// Payload for saving the pending result; the model result wins over EDA
    pub fn save_request(&self, file_name: &str, notes: &str) -> PredictResult<SaveResultRequest> {
        let eda = self.last_eda.as_ref();
        let model = self.last_model.as_ref();

        let result_json = model
            .map(|m| m.raw.clone())
            .or_else(|| eda.map(|e| e.raw.clone()))
            .ok_or(PredictError::NothingToSave)?;

        let inferred_target = model
            .and_then(|m| m.report.target_column.clone())
            .or_else(|| eda.and_then(|e| e.report.inferred_target.clone()))
            .unwrap_or_default();

        Ok(SaveResultRequest {
            file_name: file_name.to_string(),
            inferred_target,
            data_shape: eda.map(|e| e.report.shape_label()).unwrap_or_default(),
            result_json,
            model_name: model.map(|m| m.model.as_str().to_string()).unwrap_or_default(),
            notes: notes.trim().to_string(),
        })
    }

    /// Save the pending result under the given dataset name
    pub async fn save(&self, file_name: &str, notes: &str) -> PredictResult<Value> {
        let body = self.save_request(file_name, notes)?;
        let confirmation = self.api.save_result(&body).await?;
        tracing::info!("Saved result for {}", file_name);
        Ok(confirmation)
    }

    /// Saved results whose file name or date contains `filter`
    pub async fn load_results(&self, filter: &str) -> PredictResult<Vec<SavedResult>> {
        let results = self.api.list_results().await?;
        Ok(results.into_iter().filter(|r| r.matches(filter)).collect())
    }

    pub async fn edit_notes(&self, id: i64, notes: &str) -> PredictResult<()> {
        self.api.edit_notes(id, notes.trim()).await
    }

    pub async fn delete(&self, id: i64) -> PredictResult<()> {
        self.api.delete_result(id).await
    }

    pub async fn download(&self, id: i64, dir: &Path) -> PredictResult<PathBuf> {
        self.api.download_result(id, dir).await
    }
}
