//! Payment-provider webhook.
//!
//! Approvals upsert the buyer into `subscribers`. Everything else is
//! acknowledged so the provider stops redelivering it. A database failure
//! answers 500, which the provider treats as "retry later".

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};
use subtle::ConstantTimeEq;
use vreverse_core::{parse_payment_notification, PaymentOutcome};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

const TOKEN_HEADERS: [&str; 2] = ["x-hotmart-hottok", "hottok"];

fn provided_token<'a>(headers: &'a HeaderMap, body: &'a Value) -> Option<&'a str> {
    TOKEN_HEADERS
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        .or_else(|| body.get("hottok").and_then(Value::as_str))
}

fn token_matches(expected: &str, provided: Option<&str>) -> bool {
    provided.is_some_and(|p| bool::from(p.as_bytes().ct_eq(expected.as_bytes())))
}

fn ok() -> Response {
    (StatusCode::OK, Json(json!({ "message": "OK" }))).into_response()
}

/// POST /api/v1/webhooks/payment
pub(super) async fn payment_webhook(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.webhook_token.as_deref() {
        if !token_matches(expected, provided_token(&headers, &body)) {
            tracing::warn!("payment webhook: rejected call with missing or wrong token");
            return Err(ApiError::new(
                req_id.0,
                "unauthorized",
                "missing or invalid webhook token",
            ));
        }
    }

    match parse_payment_notification(&body) {
        PaymentOutcome::Approved { email, last_event } => {
            match vreverse_db::upsert_subscriber(&state.pool, &email, &last_event).await {
                Ok(_) => Ok(ok()),
                Err(vreverse_db::DbError::InvalidEmail(raw)) => {
                    tracing::warn!(
                        email = %raw,
                        "payment webhook: approval ignored, unusable email"
                    );
                    Ok(ok())
                }
                Err(e) => Err(map_db_error(req_id.0, &e)),
            }
        }
        PaymentOutcome::Ignored { reason } => {
            tracing::info!(%reason, "payment webhook: ignored");
            Ok(ok())
        }
    }
}
