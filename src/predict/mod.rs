//! Prediction Workflow
//!
//! Client side of the sales prediction service: dataset upload for EDA, model
//! training, and saved-result management.
//!
//! ## Data Flow
//!
//! 1. A dataset is uploaded for EDA and/or training
//! 2. The latest reports are held by [`PredictWorkflow`]
//! 3. A save turns the pending report into a stored result
//! 4. Stored results can be listed, annotated, deleted and downloaded

mod api;
mod dto;
mod workflow;

pub use api::{
    PredictApi, PredictError, PredictResult, EDA_PATH, RESULTS_PAGE_SIZE, SAVED_RESULTS_PATH,
    SAVE_RESULT_PATH, TRAIN_PATH,
};
pub use dto::{
    EdaReport, ModelKind, ModelReport, SaveResultRequest, SavedResult, SavedResultsPage,
    UploadFile,
};
pub use workflow::{EdaOutcome, ModelOutcome, PredictWorkflow};
