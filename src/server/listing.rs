use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::listing::ListingSnapshot;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[utoipa::path(
    get,
    path = "/listing",
    tag = "listing",
    responses((status = 200, description = "Visible listing state", body = ListingSnapshot)),
    description = "Read the items, page position, and loading flag."
)]
pub(crate) async fn listing_state(
    State(state): State<Arc<ServerState>>,
) -> Json<ListingSnapshot> {
    Json(state.core.listing())
}

#[utoipa::path(
    post,
    path = "/listing/more",
    tag = "listing",
    responses(
        (status = 200, description = "Listing after appending the next page", body = ListingSnapshot),
        (status = 502, body = ApiErrorResponse),
    ),
    description = "Load the next page and append it; a no-op on the last page."
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn load_more(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<ListingSnapshot>, ApiError> {
    let snapshot = state.core.load_more().await.map_err(ApiError::from)?;
    Ok(Json(snapshot))
}
