use crate::db::{admins, roles};
use crate::error::AppError;
use crate::session::{self, Session};
use crate::state::AppState;
use axum::Json;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// GET /api/auth?action=check — session probe.
pub async fn check(state: &AppState, headers: &HeaderMap) -> Result<Response, AppError> {
    let Some(current) = current_session(state, headers).await else {
        return Ok(Json(json!({ "authenticated": false })).into_response());
    };

    let memberships = roles::load_for_user(&state.db, current.user_id).await?;
    // Trusts the primary role stored at login rather than re-ranking by
    // priority; memberships granted or revoked mid-session are not reflected
    // until the next login.
    let role_data = memberships.iter().find(|r| r.kind() == current.role);

    Ok(Json(json!({
        "authenticated": true,
        "user": {
            "id": session::public_user_id(current.user_id),
            "name": current.name,
            "email": current.email,
            "phone": current.phone,
            "role": current.role.as_str(),
            "roleData": role_data,
        }
    }))
    .into_response())
}

/// /api/auth?action=logout — destroys the session unconditionally.
pub async fn logout(state: &AppState, headers: &HeaderMap) -> Result<Response, AppError> {
    if let Some(token) = session::token_from_headers(headers) {
        if state.sessions.remove(&token).await {
            tracing::info!("User logged out");
        }
    }

    Ok((
        [(header::SET_COOKIE, session::clear_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// GET /api/auth?action=checkAdmin — gates whether registration may offer
/// the admin role.
pub async fn check_admin(state: &AppState) -> Result<Response, AppError> {
    let admin_exists = admins::admin_exists(&state.db).await?;
    Ok(Json(json!({ "adminExists": admin_exists })).into_response())
}

async fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let token = session::token_from_headers(headers)?;
    state.sessions.get(&token).await
}
