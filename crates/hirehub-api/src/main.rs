//! HireHub HTTP API server.
//!
//! Exposes position and applicant CRUD, the AI matching endpoint, and an
//! administrative re-embed pass over HTTP. Every create/update that can
//! change embedding-source text triggers an explicit best-effort vector
//! refresh after the record is saved.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utoipa::OpenApi;
use uuid::Uuid;

use hirehub_core::{defaults, EmbeddingBackend, GenerationBackend};
use hirehub_db::{log_pool_metrics, Database};
use hirehub_inference::{ChatCompletionsBackend, OllamaBackend};
use hirehub_matching::{EmbeddingService, MatchNarrator, MatchService};

mod handlers;

use handlers::{applicants, matches, positions};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation and debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub embeddings: EmbeddingService,
    pub matches: MatchService,
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Internal(hirehub_core::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<hirehub_core::Error> for ApiError {
    fn from(err: hirehub_core::Error) -> Self {
        use hirehub_core::Error;
        match &err {
            Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            Error::PositionNotFound(id) => ApiError::NotFound(format!("Position not found: {id}")),
            Error::ApplicantNotFound(id) => {
                ApiError::NotFound(format!("Applicant not found: {id}"))
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    return ApiError::Conflict(msg);
                }
                if msg.contains("foreign key") {
                    return ApiError::BadRequest(msg);
                }
                ApiError::Internal(err)
            }
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// OPENAPI
// =============================================================================

/// OpenAPI documentation served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HireHub API",
        version = "0.3.0",
        description = "Applicant tracking with AI-powered resume-to-position matching"
    ),
    components(schemas(
        hirehub_core::CreatePositionRequest,
        hirehub_core::UpdatePositionRequest,
        hirehub_core::PositionResponse,
        hirehub_core::CreateApplicantRequest,
        hirehub_core::UpdateApplicantRequest,
        hirehub_core::ApplicantResponse,
        hirehub_core::MatchResult,
        hirehub_core::Stage,
        hirehub_core::Source,
    )),
    tags(
        (name = "Positions", description = "Job position CRUD"),
        (name = "Applicants", description = "Applicant pipeline CRUD"),
        (name = "Matches", description = "AI candidate ranking and narration"),
    )
)]
struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    // Health probes are periodic, so this doubles as the pool gauge.
    log_pool_metrics(&state.db.pool);
    Json(serde_json::json!({
        "status": "ok",
        "service": "hirehub-api",
    }))
}

// =============================================================================
// ROUTER
// =============================================================================

fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_json))
        // Positions CRUD
        .route(
            "/api/v1/positions",
            get(positions::list_positions).post(positions::create_position),
        )
        .route(
            "/api/v1/positions/:id",
            get(positions::get_position)
                .patch(positions::update_position)
                .delete(positions::delete_position),
        )
        // Matching
        .route(
            "/api/v1/positions/:id/matches",
            get(matches::get_position_matches),
        )
        // Applicants CRUD
        .route(
            "/api/v1/applicants",
            get(applicants::list_applicants).post(applicants::create_applicant),
        )
        .route(
            "/api/v1/applicants/:id",
            get(applicants::get_applicant)
                .patch(applicants::update_applicant)
                .delete(applicants::delete_applicant),
        )
        // Administration
        .route("/api/v1/admin/re-embed", post(matches::re_embed_all))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(build_cors_layer())
        .with_state(state)
}

/// CORS configuration. `CORS_ALLOWED_ORIGINS` holds a comma-separated
/// origin whitelist; unset means any origin (development default).
fn build_cors_layer() -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT];

    match std::env::var("CORS_ALLOWED_ORIGINS") {
        Ok(raw) if !raw.trim().is_empty() => {
            let origins: Vec<_> = raw
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(methods)
                .allow_headers(headers)
        }
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors
    //   RUST_LOG    - standard env filter
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hirehub_api=debug,hirehub_matching=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally log to a daily-rotated file
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("hirehub-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Configuration from environment
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/hirehub".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::SERVER_PORT);

    // Connect to database and run migrations
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Inference backends
    let embedding_backend = Arc::new(OllamaBackend::from_env());
    if embedding_backend.health_check().await.unwrap_or(false) {
        info!(
            model = EmbeddingBackend::model_name(embedding_backend.as_ref()),
            "Embedding backend reachable"
        );
    } else {
        tracing::warn!(
            "Embedding backend unreachable at startup, refreshes will fail until it recovers"
        );
    }
    // Narration backend: hosted chat-completions endpoint by default, or
    // the local Ollama generation model when
    // HIREHUB_NARRATOR_PROVIDER=ollama.
    let narrator_backend: Arc<dyn GenerationBackend> =
        match std::env::var("HIREHUB_NARRATOR_PROVIDER").as_deref() {
            Ok("ollama") => embedding_backend.clone(),
            _ => Arc::new(ChatCompletionsBackend::from_env()),
        };
    let narrator = MatchNarrator::new(narrator_backend);

    // Services
    let embeddings = EmbeddingService::new(
        db.positions.clone(),
        db.applicants.clone(),
        embedding_backend,
    );
    let matches = MatchService::new(db.positions.clone(), db.applicants.clone(), narrator);

    let state = AppState {
        db,
        embeddings,
        matches,
    };

    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
