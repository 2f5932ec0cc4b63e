use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fj_domain::{Canvas, PROMPT_COUNT, SessionState};
use fj_service::{Dashboard, Error, Navigation, PipelineOutcome};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
	pub canvases: [Canvas; PROMPT_COUNT],
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
	pub status: &'static str,
	pub navigate: Navigation,
	/// `None` when the analysis succeeded but the entry could not be saved.
	pub entry_id: Option<Uuid>,
	pub tasks: Vec<String>,
	pub insights: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
	pub user_id: String,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/session", get(session))
		.route("/v1/session/sign_in", post(sign_in))
		.route("/v1/session/sign_out", post(sign_out))
		.route("/v1/journal/analyze", post(analyze))
		.route("/v1/journal/dashboard", get(dashboard))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn session(State(state): State<AppState>) -> Json<SessionState> {
	Json(state.journal.snapshot())
}

/// Starts an anonymous session, or returns the current one when already signed in.
async fn sign_in(State(state): State<AppState>) -> Result<Json<SignInResponse>, ApiError> {
	if let Some(user_id) = state.identity.current() {
		return Ok(Json(SignInResponse { user_id }));
	}

	match state.identity.bootstrap(state.identity_provider.as_ref()).await {
		Some(user_id) => Ok(Json(SignInResponse { user_id })),
		None => Err(json_error(
			StatusCode::BAD_GATEWAY,
			"sign_in_failed",
			"Anonymous sign-in failed.",
		)),
	}
}

async fn sign_out(State(state): State<AppState>) -> StatusCode {
	state.identity.sign_out();

	StatusCode::NO_CONTENT
}

async fn analyze(
	State(state): State<AppState>,
	Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
	match state.journal.analyze(&payload.canvases).await? {
		PipelineOutcome::Done { navigate, entry_id, analysis } => Ok(Json(AnalyzeResponse {
			status: "done",
			navigate,
			entry_id,
			tasks: analysis.tasks,
			insights: analysis.insights,
		})),
		PipelineOutcome::Failed => Err(json_error(
			StatusCode::BAD_GATEWAY,
			"analysis_failed",
			"Journal analysis failed. Your drawings were kept; try again.",
		)),
		PipelineOutcome::NoSession => Err(json_error(
			StatusCode::CONFLICT,
			"no_session",
			"No session is established yet.",
		)),
	}
}

async fn dashboard(State(state): State<AppState>) -> Json<Dashboard> {
	Json(state.journal.dashboard().await)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Busy => json_error(
				StatusCode::CONFLICT,
				"busy",
				"A journal analysis is already running.",
			),
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Request failed on storage.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
