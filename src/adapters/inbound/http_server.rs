//! Page View HTTP Server
//!
//! Serves `GET /`: records a view and renders the new count, or a fixed
//! apology with status 500 when the counter store fails.

use crate::application::CounterService;
use crate::domain::entities::APOLOGY_MESSAGE;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Build the application router around a counter service.
///
/// Tests drive this router in-process with `tower::ServiceExt::oneshot`.
pub fn router(service: Arc<CounterService>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// HTTP server for the page view counter.
pub struct HttpServer {
    listen_addr: String,
    service: Arc<CounterService>,
}

impl HttpServer {
    pub fn new(listen_addr: String, service: Arc<CounterService>) -> Self {
        Self {
            listen_addr,
            service,
        }
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.listen_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("page tracker listening on {}", listener.local_addr()?);

        axum::serve(listener, router(self.service.clone()))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("page tracker stopped");
        Ok(())
    }
}

// Handler functions

async fn index_handler(State(service): State<Arc<CounterService>>) -> (StatusCode, String) {
    match service.record_view().await {
        Ok(views) => (StatusCode::OK, views.message()),
        Err(err) => {
            tracing::error!(key = %service.key(), error = ?err, "redis error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, APOLOGY_MESSAGE.to_string())
        }
    }
}
