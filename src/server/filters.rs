use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::filters::{FilterCommand, FilterSnapshot};
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleSectionRequest {
    pub section: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetDrawerRequest {
    pub open: bool,
}

#[utoipa::path(
    get,
    path = "/filters/state",
    tag = "filters",
    responses(
        (status = 200, description = "Current filter snapshot", body = FilterSnapshot),
        (status = 500, body = ApiErrorResponse),
    ),
    description = "Read the current criteria, catalog, URL metadata, and UI toggles."
)]
pub(crate) async fn filter_state(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<FilterSnapshot>, ApiError> {
    let snapshot = state.core.filters().map_err(ApiError::from)?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/filters/command",
    tag = "filters",
    request_body = FilterCommand,
    responses(
        (status = 200, description = "Snapshot after the edit", body = FilterSnapshot),
        (status = 400, body = ApiErrorResponse),
    ),
    description = "Apply a filter edit; the address updates and a listing fetch is scheduled."
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn apply_command(
    State(state): State<Arc<ServerState>>,
    Json(command): Json<FilterCommand>,
) -> Result<Json<FilterSnapshot>, ApiError> {
    let snapshot = state.core.apply_filter(command).await.map_err(ApiError::from)?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/filters/section",
    tag = "filters",
    request_body = ToggleSectionRequest,
    responses((status = 200, body = FilterSnapshot)),
    description = "Toggle an expanded filter section."
)]
pub(crate) async fn toggle_section(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ToggleSectionRequest>,
) -> Result<Json<FilterSnapshot>, ApiError> {
    let snapshot = state
        .core
        .toggle_section(&request.section)
        .map_err(ApiError::from)?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/filters/drawer",
    tag = "filters",
    request_body = SetDrawerRequest,
    responses((status = 200, body = FilterSnapshot)),
    description = "Open or close the mobile filter drawer."
)]
pub(crate) async fn set_drawer(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SetDrawerRequest>,
) -> Result<Json<FilterSnapshot>, ApiError> {
    let snapshot = state
        .core
        .set_drawer_open(request.open)
        .map_err(ApiError::from)?;
    Ok(Json(snapshot))
}
