//! Application startup and lifecycle management.

use crate::catalog::CardCatalog;
use crate::config::QuizConfig;
use crate::handlers::{
    app::{health_check, not_found, timeout_error},
    metrics::metrics,
    quiz::{quiz_route, scryfall_check},
};
use crate::quiz::{DIAGNOSTIC_PATH, QUIZ_VARIANTS};
use crate::services::{CardDescriber, CardLookup, OpenAiDescriber, ScryfallClient};
use crate::AppState;
use axum::{
    error_handling::HandleErrorLayer,
    middleware::from_fn,
    routing::{any, get},
    BoxError, Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use service_core::middleware::{cors_middleware, metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the HTTP router: five quiz variants, the lookup diagnostic and the
/// operational endpoints, wrapped in the shared middleware stack.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let mut router = Router::new();
    for variant in QUIZ_VARIANTS.iter() {
        router = router.route(variant.path, quiz_route(variant));
    }

    router
        .route(DIAGNOSTIC_PATH, any(scryfall_check))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        // Expired requests get a JSON 504 instead of an empty body.
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    timeout_error(err, request_timeout)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.as_str())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        // Outermost, so preflights never reach anything below.
        .layer(from_fn(cors_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the production collaborators.
    pub async fn build(config: QuizConfig) -> Result<Self, AppError> {
        let catalog = CardCatalog::cube().map_err(|e| AppError::InternalError(e.into()))?;
        tracing::info!(cards = catalog.len(), "Loaded card catalog");

        let card_lookup: Arc<dyn CardLookup> = Arc::new(
            ScryfallClient::new(config.scryfall.clone(), config.http.outbound_timeout)
                .map_err(|e| AppError::InternalError(e.into()))?,
        );
        tracing::info!(
            endpoint = %config.scryfall.base_url,
            "Initialized Scryfall card lookup"
        );

        let describer: Arc<dyn CardDescriber> = Arc::new(
            OpenAiDescriber::new(config.openai.clone(), config.http.outbound_timeout)
                .map_err(|e| AppError::InternalError(e.into()))?,
        );
        tracing::info!(
            model = %config.openai.model,
            max_tokens = config.openai.max_tokens,
            "Initialized OpenAI describer"
        );

        let state = AppState::new(Arc::new(catalog), card_lookup, describer);

        Self::build_with_state(&config, state).await
    }

    /// Build the application around an already assembled state.
    pub async fn build_with_state(config: &QuizConfig, state: AppState) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            e
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(state, config.http.request_timeout);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Quiz service listening on port {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
