// Request Layer
// Validates JSON payloads, runs the detector and records history

use crate::models::{AnalysisResult, AnalyzeRequest, HistoryRecord};
use crate::services::config_store::AppConfig;
use crate::services::detection::Detector;
use crate::services::history_store::{HistoryError, HistoryStore};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ApiError {
    /// HTTP-style status for a transport to use
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::History(_) => 500,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

/// Everything a request needs; built once and shared by callers
#[derive(Debug, Clone)]
pub struct AppState {
    pub detector: Detector,
    pub history: Option<HistoryStore>,
}

impl AppState {
    pub fn new(detector: Detector, history: Option<HistoryStore>) -> Self {
        Self { detector, history }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, HistoryError> {
        let detector = Detector::from_config(&config.detection);
        let history = if config.history.enabled {
            let path = config.history.resolved_database_path();
            Some(HistoryStore::open(&path).await?)
        } else {
            None
        };
        Ok(Self { detector, history })
    }
}

/// Liveness payload
pub fn status() -> Value {
    json!({ "message": "AI vs Human Content Detector API is running" })
}

/// Validate an `{"text": string}` body
pub fn parse_analyze_request(body: &Value) -> Result<AnalyzeRequest, ApiError> {
    match body.get("text") {
        None | Some(Value::Null) => Err(ApiError::InvalidInput("Missing 'text' field".to_string())),
        Some(Value::String(text)) => Ok(AnalyzeRequest { text: text.clone() }),
        Some(_) => Err(ApiError::InvalidInput("'text' must be a string".to_string())),
    }
}

pub async fn analyze(state: &AppState, body: &Value) -> Result<AnalysisResult, ApiError> {
    let request = parse_analyze_request(body)?;
    let request_id = Uuid::new_v4();

    let result = state.detector.analyze(&request.text);

    if let Some(store) = &state.history {
        if let Err(e) = store
            .log_result(
                &request.text,
                result.prediction.label(),
                result.confidence,
                result.features.n_words,
            )
            .await
        {
            warn!(%request_id, error = %e, "analyze.history_write_failed");
        }
    }

    info!(
        %request_id,
        prediction = %result.prediction,
        confidence = result.confidence,
        n_words = result.features.n_words,
        "analyze.completed"
    );
    Ok(result)
}

/// Logged analyses, newest first
pub async fn history(state: &AppState) -> Result<Vec<HistoryRecord>, ApiError> {
    match &state.history {
        Some(store) => Ok(store.fetch_all().await?),
        None => Ok(Vec::new()),
    }
}
