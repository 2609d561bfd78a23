//! Tally Web Server
//!
//! Axum-based web app and JSON API for the Tally expense tracker.
//!
//! Security features:
//! - Server-side sessions behind an HttpOnly, SameSite=Lax cookie
//! - Every expense query scoped to the authenticated user
//! - Restrictive CORS policy and security headers
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use tally_core::db::{Database, DEFAULT_SESSION_TTL_DAYS};
use tally_core::{AIBackend, ExpenseAssistant};

mod handlers;
mod pages;
mod session;

pub use session::{AuthUser, SESSION_COOKIE};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Lifetime of a login session in days
    pub session_ttl_days: i64,
    /// Mark the session cookie `Secure` (enable behind HTTPS)
    pub secure_cookies: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            secure_cookies: false,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub assistant: ExpenseAssistant,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(
    db: Database,
    assistant: ExpenseAssistant,
    config: ServerConfig,
    static_dir: Option<&str>,
) -> Router {
    match (assistant.backend_name(), assistant.model()) {
        (Some(backend), Some(model)) => {
            info!("AI backend configured: {} (model: {})", backend, model)
        }
        _ => info!("ℹ️  AI not configured (set GEMINI_API_KEY to enable AI features)"),
    }

    let state = Arc::new(AppState {
        db,
        assistant,
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route(
            "/expense",
            get(handlers::list_expenses).post(handlers::add_expense),
        )
        .route("/ai/parse-text", post(handlers::parse_text))
        .route("/ai/insights", get(handlers::get_insights));

    // Build CORS layer
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .route("/", get(handlers::home))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes);

    // Serve the front-end script if a directory was provided
    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ))
}

/// Start the server
pub async fn serve(
    db: Database,
    assistant: ExpenseAssistant,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, assistant, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    assistant: ExpenseAssistant,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.secure_cookies {
        warn!("⚠️  Session cookies are not marked Secure - serve behind HTTPS in production");
    }

    match db.purge_expired_sessions() {
        Ok(count) if count > 0 => info!("Purged {} expired session(s)", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to purge expired sessions: {}", e),
    }

    check_ai_connection(&assistant).await;

    let app = create_router(db, assistant, config, static_dir);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(assistant: &ExpenseAssistant) {
    match assistant.client() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (model: {}); fallbacks will be used",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  AI not configured, parse and insights run in fallback mode");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error to a client-facing status
    ///
    /// Domain errors keep their message; storage and transport failures
    /// become a generic 500.
    pub fn from_core(err: tally_core::Error) -> Self {
        use tally_core::Error as E;
        match err {
            E::Validation(msg) => Self::bad_request(&msg),
            E::Duplicate(msg) => Self::conflict(&msg),
            E::Auth(msg) => Self::unauthorized(&msg),
            E::NotFound(msg) => Self::not_found(&msg),
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
