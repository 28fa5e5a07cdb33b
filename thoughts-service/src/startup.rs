//! Router assembly and application lifecycle.
//!
//! The store is opened once in [`Application::build`], shared with handlers
//! through [`AppState`], and closed after the server has drained on shutdown.

use crate::config::{CorsConfig, StoreBackend, ThoughtsConfig};
use crate::dtos::Endpoint;
use crate::handlers;
use crate::services::{InMemoryThoughtStore, MongoThoughtStore, ThoughtStore};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{get, post, MethodRouter},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Maximum accepted JSON body size.
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ThoughtStore>,
    pub endpoints: Arc<Vec<Endpoint>>,
}

/// Routes registered so far, grouped by path in first-seen order.
///
/// Registering through this table keeps `GET /` in step with what the router
/// actually serves.
struct RouteTable {
    routes: Vec<(&'static str, Vec<Method>, MethodRouter<AppState>)>,
}

impl RouteTable {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    fn route(
        mut self,
        path: &'static str,
        method: Method,
        handler: MethodRouter<AppState>,
    ) -> Self {
        match self.routes.iter_mut().find(|(p, _, _)| *p == path) {
            Some((_, methods, existing)) => {
                methods.push(method);
                *existing = existing.clone().merge(handler);
            }
            None => self.routes.push((path, vec![method], handler)),
        }
        self
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        self.routes
            .iter()
            .map(|(path, methods, _)| Endpoint {
                path: path.to_string(),
                methods: methods.iter().map(|m| m.to_string()).collect(),
            })
            .collect()
    }

    fn into_router(self) -> Router<AppState> {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, _, handler)| {
                router.route(path, handler)
            })
    }
}

/// Build the full HTTP router around `store`.
pub fn build_router(store: Arc<dyn ThoughtStore>, cors: &CorsConfig) -> Router {
    let table = RouteTable::new()
        .route("/", Method::GET, get(handlers::list_endpoints))
        .route("/thoughts", Method::GET, get(handlers::list_thoughts))
        .route("/thoughts", Method::POST, post(handlers::create_thought))
        .route("/thoughts/:id/like", Method::POST, post(handlers::like_thought))
        .route("/health", Method::GET, get(handlers::health_check))
        .route("/ready", Method::GET, get(handlers::readiness_check))
        .route("/metrics", Method::GET, get(handlers::metrics_endpoint));

    let state = AppState {
        store,
        endpoints: Arc::new(table.endpoints()),
    };

    table
        .into_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer(cors))
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins = if cors.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

async fn open_store(config: &ThoughtsConfig) -> Result<Arc<dyn ThoughtStore>, AppError> {
    match config.store {
        StoreBackend::MongoDb => {
            let store =
                MongoThoughtStore::connect(&config.mongodb.uri, &config.mongodb.database).await?;
            store.initialize_indexes().await.map_err(|e| {
                tracing::error!("Failed to initialize database indexes: {}", e);
                e
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory thought store; data is lost on restart");
            Ok(Arc::new(InMemoryThoughtStore::new()))
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    store: Arc<dyn ThoughtStore>,
}

impl Application {
    pub async fn build(config: ThoughtsConfig) -> Result<Self, AppError> {
        let store = open_store(&config).await?;
        let router = build_router(store.clone(), &config.cors);

        // Port 0 binds a random port, used by tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server running on http://localhost:{}", port);

        Ok(Self {
            port,
            listener,
            router,
            store,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, then close the store.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        self.store.shutdown().await;
        tracing::info!("Service shutdown complete");
        result
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
