//! Prediction API Client
//!
//! Thin typed wrapper over the EDA, training and saved-result endpoints. Every
//! call goes through the authenticated dispatcher.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::dto::{
    EdaReport, ModelKind, ModelReport, SaveResultRequest, SavedResult, SavedResultsPage,
    UploadFile,
};
use crate::http::{ApiRequest, ApiResponse, DispatchError, Dispatcher, FormPart};

pub const EDA_PATH: &str = "/api/predict/eda/";
pub const TRAIN_PATH: &str = "/api/predict/train/";
pub const SAVE_RESULT_PATH: &str = "/api/save-result/";
pub const SAVED_RESULTS_PATH: &str = "/api/saved-results/";

/// Page size used when listing saved results
pub const RESULTS_PAGE_SIZE: u32 = 100;

/// Errors from the prediction endpoints and workflow
#[derive(Error, Debug)]
pub enum PredictError {
    /// Transport or session failure from the dispatcher
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The server answered with an error payload
    #[error("{0}")]
    Api(String),

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No dataset has been chosen
    #[error("Upload a CSV file first.")]
    NoFile,

    /// Save requested before any EDA or training result exists
    #[error("Generate EDA or train a model first before saving.")]
    NothingToSave,
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::Decode(err.to_string())
    }
}

/// Result type alias for prediction operations
pub type PredictResult<T> = Result<T, PredictError>;

/// Typed client for the prediction endpoints
#[derive(Clone)]
pub struct PredictApi {
    dispatcher: Dispatcher,
}

impl PredictApi {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Upload a dataset for exploratory analysis.
    ///
    /// Returns the typed report and the raw payload, which is what gets saved.
    pub async fn eda(&self, file: &UploadFile) -> PredictResult<(EdaReport, Value)> {
        let request = ApiRequest::post(self.dispatcher.url(EDA_PATH)).multipart(vec![
            FormPart::file("file", file.file_name.clone(), file.bytes.clone()),
        ]);

        let raw = checked(self.dispatcher.dispatch(request).await?)?;
        let report = serde_json::from_value(raw.clone())?;
        Ok((report, raw))
    }

    /// Upload a dataset and train the chosen model on it
    pub async fn train(
        &self,
        file: &UploadFile,
        model: ModelKind,
    ) -> PredictResult<(ModelReport, Value)> {
        let request = ApiRequest::post(self.dispatcher.url(TRAIN_PATH)).multipart(vec![
            FormPart::file("file", file.file_name.clone(), file.bytes.clone()),
            FormPart::text("model", model.as_str()),
        ]);

        let raw = checked(self.dispatcher.dispatch(request).await?)?;
        let report = serde_json::from_value(raw.clone())?;
        Ok((report, raw))
    }

    /// Persist a result; returns the server's confirmation payload
    pub async fn save_result(&self, body: &SaveResultRequest) -> PredictResult<Value> {
        let request = json_request(ApiRequest::post(self.dispatcher.url(SAVE_RESULT_PATH)), body)?;
        checked(self.dispatcher.dispatch(request).await?)
    }

    /// First page of saved results, newest first
    pub async fn list_results(&self) -> PredictResult<Vec<SavedResult>> {
        let url = format!(
            "{}?page=1&page_size={}",
            self.dispatcher.url(SAVED_RESULTS_PATH),
            RESULTS_PAGE_SIZE
        );
        let page: SavedResultsPage = decode(self.dispatcher.dispatch(ApiRequest::get(url)).await?)?;
        Ok(page.results)
    }

    /// Replace the notes of a saved result
    pub async fn edit_notes(&self, id: i64, notes: &str) -> PredictResult<()> {
        let url = self
            .dispatcher
            .url(&format!("{}edit/{}/", SAVED_RESULTS_PATH, id));
        let request = json_request(ApiRequest::put(url), &serde_json::json!({ "notes": notes }))?;
        checked(self.dispatcher.dispatch(request).await?)?;
        Ok(())
    }

    pub async fn delete_result(&self, id: i64) -> PredictResult<()> {
        let url = self
            .dispatcher
            .url(&format!("{}delete/{}/", SAVED_RESULTS_PATH, id));
        checked(self.dispatcher.dispatch(ApiRequest::delete(url)).await?)?;
        Ok(())
    }

    /// Full stored record for one result
    pub async fn fetch_result(&self, id: i64) -> PredictResult<Value> {
        let url = self
            .dispatcher
            .url(&format!("{}download/{}/", SAVED_RESULTS_PATH, id));
        checked(self.dispatcher.dispatch(ApiRequest::get(url)).await?)
    }

    /// Fetch a result and write it pretty-printed as `result_{id}.json` in `dir`
    pub async fn download_result(&self, id: i64, dir: &Path) -> PredictResult<PathBuf> {
        let record = self.fetch_result(id).await?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("result_{}.json", id));
        tokio::fs::write(&path, serde_json::to_vec_pretty(&record)?).await?;

        tracing::info!("Downloaded result {} to {:?}", id, path);
        Ok(path)
    }
}

fn json_request<T: Serialize>(request: ApiRequest, body: &T) -> PredictResult<ApiRequest> {
    Ok(request.json(body)?)
}

/// Body as JSON, with `{"error": ...}` payloads and non-2xx statuses turned
/// into [`PredictError::Api`]
fn checked(response: ApiResponse) -> PredictResult<Value> {
    let body: Value = match response.json() {
        Ok(body) => body,
        Err(_) if !response.ok() => {
            return Err(PredictError::Api(format!(
                "Request failed with status {}",
                response.status
            )))
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Err(PredictError::Api(message.to_string()));
    }
    if !response.ok() {
        let message = body
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", response.status));
        return Err(PredictError::Api(message));
    }

    Ok(body)
}

fn decode<T: DeserializeOwned>(response: ApiResponse) -> PredictResult<T> {
    Ok(serde_json::from_value(checked(response)?)?)
}
