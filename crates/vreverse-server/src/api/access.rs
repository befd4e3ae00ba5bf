//! Subscription gate lookup.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use vreverse_core::normalize_email;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AccessQuery {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AccessData {
    email: String,
    active: bool,
}

/// GET /api/v1/access?email=
pub(super) async fn check_access(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<ApiResponse<AccessData>>, ApiError> {
    let email = normalize_email(&query.email).unwrap_or_else(|| query.email.trim().to_lowercase());

    let active = vreverse_db::check_access(&state.pool, &state.access, &email)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AccessData { email, active },
        meta: ResponseMeta::new(req_id.0),
    }))
}
