mod check;
mod login;
mod register;

use crate::error::AppError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderMap, Method, header};
use axum::response::Response;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    // Frontend sends the session cookie cross-origin, so the CORS response
    // must echo the request origin rather than use a wildcard.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/auth", any(dispatch))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct ActionQuery {
    action: Option<String>,
}

/// Single auth endpoint multiplexed on the `action` query parameter,
/// mirroring the contract the frontend already speaks.
async fn dispatch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActionQuery>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    match query.action.as_deref().unwrap_or("") {
        "login" => {
            require_post(&method)?;
            login::login(&state, &body).await
        }
        "register" => {
            require_post(&method)?;
            register::register(&state, &body).await
        }
        "check" => check::check(&state, &headers).await,
        "logout" => check::logout(&state, &headers).await,
        "checkAdmin" => check::check_admin(&state).await,
        _ => Err(AppError::validation("Invalid action")),
    }
}

fn require_post(method: &Method) -> Result<(), AppError> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(AppError::MethodNotAllowed)
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let db_ok = state.db.acquire().await.is_ok();
    let status = if db_ok { "ok" } else { "degraded" };
    Json(serde_json::json!({
        "status": status,
        "db": db_ok
    }))
}
