use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::filters::FilterSnapshot;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NavigateRequest {
    /// A path within the shop grammar, e.g. `/category/coffee?q=dark`.
    pub path: String,
}

#[utoipa::path(
    post,
    path = "/navigate",
    tag = "navigation",
    request_body = NavigateRequest,
    responses(
        (status = 200, description = "Snapshot after resolution", body = FilterSnapshot),
        (status = 400, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse),
    ),
    description = "Resolve an externally-changed address into filter state."
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn navigate(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<FilterSnapshot>, ApiError> {
    let snapshot = state
        .core
        .navigate(&request.path)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(snapshot))
}
