use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;
use quill_service::Error;

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
	pub summary: String,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/summarize", post(summarize))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn summarize(
	State(state): State<AppState>,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
	let Json(payload) = payload.map_err(|err| {
		tracing::debug!(error = %err, "Rejected summarize body.");

		if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
			json_error(
				StatusCode::PAYLOAD_TOO_LARGE,
				"PAYLOAD_TOO_LARGE",
				"Note is too long to summarize.",
			)
		} else {
			json_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", "Invalid content provided.")
		}
	})?;
	let summary = state.gateway.summarize_payload(&payload).await?;

	Ok(Json(SummarizeResponse { summary }))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	error: String,
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
			Error::InvalidInput { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", message),
			Error::PayloadTooLarge { message } =>
				json_error(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message),
			Error::SummarizationFailed { message } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "SUMMARIZATION_FAILED", message),
			other => {
				tracing::error!(error = %other, "Unexpected gateway error.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "Internal error.")
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, error: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
