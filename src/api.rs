//! HTTP API over one interactive session

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{
    Language, MapView, Report, ReportPipeline, SessionState, Submission, UiText, WhisperError,
};

/// Shared state of the router: the pipeline and the session it writes to
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<ReportPipeline>,
    session: Arc<Mutex<SessionState>>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            session: Arc::new(Mutex::new(SessionState::new())),
        }
    }

    fn language(&self) -> Language {
        self.pipeline.language()
    }
}

/// Persistent advice panel plus map
#[derive(Serialize)]
pub struct SessionView {
    pub title: &'static str,
    pub advice_header: &'static str,
    pub advice: String,
    pub generated_time: Option<String>,
    pub map_url: Option<String>,
    pub map: Option<Value>,
}

/// Submission result with the localized alert status line
#[derive(Serialize)]
pub struct SubmissionResponse {
    #[serde(flatten)]
    pub submission: Submission,
    pub alert_status: String,
}

pub struct ApiError(WhisperError);

impl From<WhisperError> for ApiError {
    fn from(err: WhisperError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(WhisperError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WhisperError::Validation { .. } => StatusCode::BAD_REQUEST,
            WhisperError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            WhisperError::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reports", post(submit_report))
        .route("/session", get(get_session))
        .route("/ui-text", get(get_ui_text))
        .with_state(state)
}

/// Human-readable status line for a dispatch
#[must_use]
pub fn alert_status(submission: &Submission, text: &UiText) -> String {
    match &submission.dispatch.configuration_error {
        None => text.sms_success.to_string(),
        Some(reason) => format!("{} ({})", text.sms_failure, reason),
    }
}

async fn submit_report(
    State(state): State<AppState>,
    report: Result<Json<Report>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let Json(report) = report?;
    // Held for the whole submission: one report at a time per session
    let mut session = state.session.lock().await;
    let submission = state.pipeline.submit(&mut session, &report).await?;
    let alert_status = alert_status(&submission, state.language().ui_text());

    Ok(Json(SubmissionResponse {
        submission,
        alert_status,
    }))
}

async fn get_session(State(state): State<AppState>) -> Response {
    let session = state.session.lock().await;
    let Some(advice) = session.advice() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let text = state.language().ui_text();
    let map = MapView::from_session(&session);
    Json(SessionView {
        title: text.persistent_title,
        advice_header: text.advice_header,
        advice: advice.to_string(),
        generated_time: session.formatted_time(),
        map_url: map.as_ref().map(MapView::osm_url),
        map: map.as_ref().map(MapView::to_geojson),
    })
    .into_response()
}

async fn get_ui_text(State(state): State<AppState>) -> Json<&'static UiText> {
    Json(state.language().ui_text())
}
