use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::server::ServerState;

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses((status = 200, description = "Server-sent core events")),
    description = "Stream filter, address, and listing events as SSE."
)]
pub(crate) async fn stream_events(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.core.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|message| match message {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(payload) => Some(Ok(Event::default().data(payload))),
            Err(error) => {
                tracing::warn!("failed to serialize core event: {error}");
                None
            }
        },
        // Lagged receivers skip to the live edge.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
