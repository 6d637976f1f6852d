use crate::db::{accounts, roles};
use crate::error::AppError;
use crate::session::{self, Session};
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Default)]
#[serde(default)]
struct LoginRequest {
    email: String,
    password: String,
}

/// POST /api/auth?action=login
pub async fn login(state: &AppState, body: &Bytes) -> Result<Response, AppError> {
    // Absent or malformed bodies read as empty fields, same as missing ones
    let req: LoginRequest = serde_json::from_slice(body).unwrap_or_default();
    let email = req.email.trim();

    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password required"));
    }

    let account = accounts::authenticate(&state.db, email, &req.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let memberships = roles::load_for_user(&state.db, account.user_id).await?;
    let (primary, role_data) = roles::primary_role(&memberships);
    tracing::debug!(roles = ?memberships, role = primary.as_str(), "Resolved role memberships");

    let token = state
        .sessions
        .create(Session {
            user_id: account.user_id,
            account_id: account.account_id,
            name: account.name.clone(),
            email: account.email.clone(),
            phone: account.phone_number.clone(),
            role: primary,
        })
        .await;

    tracing::info!(
        user_id = account.user_id,
        role = primary.as_str(),
        "User logged in"
    );

    let cookie = session::session_cookie(&token, state.sessions.cookie_max_age_secs());

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "user": {
                "id": session::public_user_id(account.user_id),
                "name": account.name,
                "email": account.email,
                "phone": account.phone_number,
                "role": primary.as_str(),
                "roleData": role_data,
                // Full membership list kept for frontend debugging
                "allRoles": memberships,
            }
        })),
    )
        .into_response())
}
