//! HTTP server setup and handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until the shutdown signal fires
//!
//! # Routes
//! - `POST /query` — answer a free-text travel query
//! - `GET /healthz` — liveness probe
//! - `GET /admin/breakers` — circuit breaker states, for operators

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::request::{MakeRequestUuid, QueryRequest, QueryResponse};
use crate::orchestrator::Coordinator;
use crate::resilience::circuit_breaker::BreakerSnapshot;
use crate::resilience::BreakerRegistry;

const EMPTY_QUERY_ANSWER: &str = "Please enter a destination or travel query.";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub breakers: Arc<BreakerRegistry>,
}

/// HTTP server for the travel query service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig, coordinator: Arc<Coordinator>, breakers: Arc<BreakerRegistry>) -> Self {
        let state = AppState {
            coordinator,
            breakers,
        };

        let router = Router::new()
            .route("/query", post(query_handler))
            .route("/healthz", get(healthz_handler))
            .route("/admin/breakers", get(breakers_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            );

        Self { router }
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    if request.query.trim().is_empty() {
        return Json(QueryResponse {
            answer: EMPTY_QUERY_ANSWER.to_string(),
        });
    }

    let answer = state.coordinator.answer(&request.query).await;
    Json(QueryResponse { answer })
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn breakers_handler(State(state): State<AppState>) -> Json<Vec<BreakerSnapshot>> {
    Json(state.breakers.snapshot())
}
