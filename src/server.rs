// Router assembly and the serve loop, shared by the server binary and
// the CLI's serve subcommand.

use anyhow::Context;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config;
use crate::database::DatabaseManager;
use crate::handlers::public;
use crate::middleware::{require_admin, require_staff, session_auth_middleware};

/// Validate configuration, apply migrations and serve until shutdown.
pub async fn run() -> anyhow::Result<()> {
    let config = config::config();
    config
        .validate()
        .map_err(|message| anyhow::anyhow!("configuration error: {}", message))?;

    tracing::info!(
        "Starting Sabbath School API in {} mode",
        config.environment.as_str()
    );

    // Bring the schema up to date before taking traffic. Without a
    // configured database the server still starts and answers 503 on
    // routes that need it.
    if config.database.url.is_some() {
        DatabaseManager::migrate()
            .await
            .context("failed to apply migrations")?;
    } else {
        tracing::warn!("DATABASE_URL is not set; database-backed routes will answer 503");
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Sabbath School API listening on http://{}", bind_addr);

    axum::serve(listener, app()).await.context("server")
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_auth_routes())
        .merge(protected_routes())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Token acquisition; everything else requires a session.
fn public_auth_routes() -> Router {
    use axum::routing::post;

    Router::new()
        .route("/api/auth/register", post(public::auth::register))
        .route("/api/auth/login", post(public::auth::login))
}

/// Everything behind the session middleware. Role gates are layered per
/// route group so no handler has to re-check.
fn protected_routes() -> Router {
    Router::new()
        .merge(session_routes())
        .merge(account_routes())
        .merge(quarter_routes())
        .merge(class_routes())
        .merge(member_routes())
        .merge(weekly_routes())
        .merge(report_routes())
        .layer(middleware::from_fn(session_auth_middleware))
}

fn session_routes() -> Router {
    use axum::routing::post;
    use crate::handlers::protected::auth;

    Router::new()
        .route("/api/auth/profile", get(auth::profile))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/auth/logout", post(auth::logout))
}

fn account_routes() -> Router {
    use axum::routing::put;
    use crate::handlers::protected::accounts;

    Router::new()
        .route("/api/accounts", get(accounts::list))
        .route("/api/accounts/:id", put(accounts::update).delete(accounts::remove))
        .route_layer(middleware::from_fn(require_admin))
}

fn quarter_routes() -> Router {
    use axum::routing::{patch, post};
    use crate::handlers::protected::quarters;

    let admin = Router::new()
        .route("/api/quarters", post(quarters::create))
        .route("/api/quarters/:id", patch(quarters::update).delete(quarters::remove))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/api/quarters", get(quarters::list))
        .route("/api/quarters/active", get(quarters::active))
        .route("/api/quarters/:id", get(quarters::get))
        .merge(admin)
}

fn class_routes() -> Router {
    use axum::routing::{post, put};
    use crate::handlers::protected::classes;

    let admin = Router::new()
        .route("/api/classes", post(classes::create))
        .route("/api/classes/:id", put(classes::update).delete(classes::remove))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/api/classes", get(classes::list))
        .route("/api/classes/my-classes", get(classes::my_classes))
        .route("/api/classes/:id", get(classes::get))
        .merge(admin)
}

fn member_routes() -> Router {
    use axum::routing::{post, put};
    use crate::handlers::protected::members;

    let staff = Router::new()
        .route("/api/class-members", post(members::create))
        .route("/api/class-members/:id", put(members::update).delete(members::remove))
        .route_layer(middleware::from_fn(require_staff));

    Router::new()
        .route("/api/class-members", get(members::list))
        .route("/api/class-members/:id", get(members::get))
        .merge(staff)
}

fn weekly_routes() -> Router {
    use axum::routing::{post, put};
    use crate::handlers::protected::weekly;

    let staff = Router::new()
        .route("/api/weekly-data", post(weekly::create))
        .route("/api/weekly-data/:id", put(weekly::update).delete(weekly::remove))
        .route_layer(middleware::from_fn(require_staff));

    Router::new()
        .route("/api/weekly-data", get(weekly::list))
        .route("/api/weekly-data/:id", get(weekly::get))
        .merge(staff)
}

fn report_routes() -> Router {
    use crate::handlers::protected::reports;

    Router::new()
        .route("/api/reports/weekly", get(reports::weekly))
        .route("/api/reports/financial", get(reports::financial))
        .route("/api/reports/class/:id/quarterly", get(reports::class_quarterly))
        .route("/api/reports/church/:id/quarterly", get(reports::church_quarterly))
}

/// Browser clients send the session cookie cross-origin, so the CORS
/// layer must name origins explicitly; a wildcard would break
/// credentialed requests.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Sabbath School API",
            "version": version,
            "description": "Sabbath School attendance and offering tracker",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/register, /api/auth/login (public), /api/auth/profile|change-password|logout (session)",
                "accounts": "/api/accounts[/:id] (admin)",
                "quarters": "/api/quarters[/:id], /api/quarters/active (session; mutations admin)",
                "classes": "/api/classes[/:id], /api/classes/my-classes (session; mutations admin)",
                "class_members": "/api/class-members[/:id] (session; mutations admin+secretary)",
                "weekly_data": "/api/weekly-data[/:id] (session; mutations admin+secretary)",
                "reports": "/api/reports/weekly|financial, /api/reports/class/:id/quarterly, /api/reports/church/:id/quarterly (session)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();
    let environment = config::config().environment.as_str();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "environment": environment,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "environment": environment,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
