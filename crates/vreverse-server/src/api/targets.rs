//! Target-model catalogue.

use axum::{Extension, Json};
use vreverse_core::{TargetModel, TARGET_MODELS};

use crate::middleware::RequestId;

use super::{ApiResponse, ResponseMeta};

/// GET /api/v1/targets
pub(super) async fn list_targets(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<&'static [TargetModel]>> {
    Json(ApiResponse {
        data: TARGET_MODELS,
        meta: ResponseMeta::new(req_id.0),
    })
}
