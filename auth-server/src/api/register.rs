use crate::db::registration::{self, NewRegistration};
use crate::db::roles::RoleKind;
use crate::db::{accounts, admins};
use crate::error::AppError;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use validator::ValidateEmail;

#[derive(Deserialize, Default)]
#[serde(default)]
struct RegisterRequest {
    name: String,
    phone: String,
    email: String,
    password: String,
    confirm: String,
    role: String,
    // Accepted for frontend compatibility, not stored anywhere
    #[allow(dead_code)]
    town: String,
}

/// POST /api/auth?action=register
pub async fn register(state: &AppState, body: &Bytes) -> Result<Response, AppError> {
    let req: RegisterRequest = serde_json::from_slice(body).unwrap_or_default();

    let name = req.name.trim().to_string();
    let phone = req.phone.trim().to_string();
    let email = req.email.trim().to_string();

    validate(&name, &email, &req.password, &req.confirm)?;

    // Absent or unknown role values register as customer
    let role = RoleKind::parse(&req.role);

    // Best-effort pre-check only; see admins::admin_exists on the race
    if role == RoleKind::Admin && admins::admin_exists(&state.db).await? {
        return Err(AppError::validation("Admin account already exists"));
    }

    let password_hash = accounts::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let reg = NewRegistration {
        name,
        phone,
        email,
        password_hash,
        role,
    };

    let user_id = registration::create(&state.db, &reg).await.map_err(|e| {
        if registration::is_unique_violation(&e) {
            AppError::Conflict("Email already exists".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(user_id, role = role.as_str(), "Account created");

    Ok(Json(json!({
        "success": true,
        "message": "Account created successfully",
        "userId": user_id
    }))
    .into_response())
}

/// Validation checks in the order the frontend expects the error messages.
fn validate(name: &str, email: &str, password: &str, confirm: &str) -> Result<(), AppError> {
    if name.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
        return Err(AppError::validation("All required fields must be completed"));
    }
    if !email.validate_email() {
        return Err(AppError::validation("Invalid email address"));
    }
    if password != confirm {
        return Err(AppError::validation("Passwords do not match"));
    }
    if password.len() < 6 {
        return Err(AppError::validation("Password must be at least 6 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), AppError>) -> String {
        result.expect_err("validation should fail").to_string()
    }

    #[test]
    fn test_required_fields_checked_first() {
        // Even with a bad email, missing fields win
        assert_eq!(
            message(validate("", "not-an-email", "a", "b")),
            "All required fields must be completed"
        );
        assert_eq!(
            message(validate("Jane", "jane@example.com", "", "")),
            "All required fields must be completed"
        );
    }

    #[test]
    fn test_email_format_before_password_checks() {
        assert_eq!(
            message(validate("Jane", "not-an-email", "short", "other")),
            "Invalid email address"
        );
    }

    #[test]
    fn test_mismatch_before_length() {
        assert_eq!(
            message(validate("Jane", "jane@example.com", "abc", "abcd")),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_minimum_password_length() {
        assert_eq!(
            message(validate("Jane", "jane@example.com", "abc12", "abc12")),
            "Password must be at least 6 characters"
        );
        assert!(validate("Jane", "jane@example.com", "abc123", "abc123").is_ok());
    }

    #[test]
    fn test_malformed_body_reads_as_empty_fields() {
        let req: RegisterRequest = serde_json::from_slice(b"not json").unwrap_or_default();
        assert!(req.name.is_empty());
        assert!(req.email.is_empty());
    }
}
