use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use crate::core::Core;
use crate::error::{CoreError, CoreResult};

pub mod error;
pub mod events;
pub mod filters;
pub mod listing;
pub mod navigation;
pub mod openapi;

/// HTTP surface for the storefront core, consumed by the web frontend.
/// Binds an ephemeral local port; the embedding process discovers it via
/// [`Server::addr`].
pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    core: Arc<Core>,
}

impl Server {
    pub async fn new(core: Arc<Core>) -> CoreResult<Self> {
        let state = Arc::new(ServerState { core: core.clone() });
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        let app = Router::new()
            .route("/health", get(health))
            .route("/filters/state", get(filters::filter_state))
            .route("/filters/command", post(filters::apply_command))
            .route("/filters/section", post(filters::toggle_section))
            .route("/filters/drawer", post(filters::set_drawer))
            .route("/navigate", post(navigation::navigate))
            .route("/listing", get(listing::listing_state))
            .route("/listing/more", post(listing::load_more))
            .route("/events", get(events::stream_events))
            .with_state(state)
            .layer(cors);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|error| CoreError::Internal(format!("bind: {error}")))?;
        let addr = listener
            .local_addr()
            .map_err(|error| CoreError::Internal(format!("local addr: {error}")))?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });
        tracing::info!("storefront server listening on {addr}");

        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            core,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn core(&self) -> &Arc<Core> {
        &self.core
    }

    pub fn shutdown(&mut self) -> CoreResult<()> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| CoreError::Internal("failed to send shutdown signal".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

async fn health() -> &'static str {
    "ok"
}

pub(crate) struct ServerState {
    pub(crate) core: Arc<Core>,
}
