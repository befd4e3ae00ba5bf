//! Media analysis behind the subscription gate.

use axum::{extract::State, Extension, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use vreverse_core::{find_target_model, AnalysisConfig, AnalysisResult, MediaInput};
use vreverse_gemini::{AnalysisError, ErrorKind};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeRequest {
    email: String,
    target_model: String,
    #[serde(default)]
    config: Option<AnalysisConfig>,
    input: InputPayload,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum InputPayload {
    File {
        /// Base64 (standard alphabet) file contents.
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Url {
        url: String,
    },
}

fn decode_input(
    rid: &str,
    payload: InputPayload,
    max_bytes: usize,
) -> Result<MediaInput, ApiError> {
    match payload {
        InputPayload::File { data, mime_type } => {
            let bytes = BASE64.decode(data.trim()).map_err(|e| {
                ApiError::new(rid, "validation_error", format!("input.data is not base64: {e}"))
            })?;
            if bytes.len() > max_bytes {
                return Err(ApiError::new(
                    rid,
                    "payload_too_large",
                    format!("file is {} bytes; the limit is {max_bytes}", bytes.len()),
                ));
            }
            Ok(MediaInput::File { bytes, mime_type })
        }
        InputPayload::Url { url } => Ok(MediaInput::Url {
            url: url.trim().to_string(),
        }),
    }
}

fn map_analysis_error(rid: &str, error: &AnalysisError) -> ApiError {
    match error.kind() {
        ErrorKind::Input => ApiError::new(rid, "validation_error", error.to_string()),
        ErrorKind::Transport => {
            tracing::error!(error = %error, "analysis: provider call failed");
            ApiError::new(rid, "upstream_error", "analysis provider request failed")
        }
        ErrorKind::MalformedResponse => {
            tracing::error!(error = %error, "analysis: unusable provider output");
            ApiError::new(
                rid,
                "malformed_response",
                "analysis provider returned an unusable result",
            )
        }
    }
}

/// POST /api/v1/analyze
pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiError> {
    let rid = req_id.0.as_str();

    let target = find_target_model(&body.target_model)
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;
    let config = body.config.unwrap_or_default();
    config
        .validate()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;
    let input = decode_input(rid, body.input, state.max_upload_bytes)?;
    input
        .validate()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let allowed = vreverse_db::check_access(&state.pool, &state.access, &body.email)
        .await
        .map_err(|e| map_db_error(rid.to_owned(), &e))?;
    if !allowed {
        tracing::info!(input_kind = %input.kind(), "analysis: denied by subscription gate");
        return Err(ApiError::new(
            rid,
            "subscription_required",
            "an active subscription is required",
        ));
    }

    let result = state
        .analyzer
        .analyze(&input, target.id, &config)
        .await
        .map_err(|e| map_analysis_error(rid, &e))?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
#[path = "analyze_test.rs"]
mod tests;
