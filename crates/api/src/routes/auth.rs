//! Authentication endpoint handlers: organizer accounts and the platform
//! admin credential.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use domain::models::Organizer;
use domain::DomainError;
use shared::password::{hash_password, verify_password};
use shared::token::Role;
use shared::validation::{validate_phone, validate_username};

use crate::app::AppState;
use crate::error::ApiError;

/// Organizer registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(min = 1, message = "PIX key is required"))]
    pub pix_key: String,
}

/// Organizer login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Session established for an organizer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionResponse {
    pub token: String,
    pub organizer: Organizer,
}

/// First-time admin setup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AdminSetupRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub password_confirm: String,
}

/// Admin login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// Session established for the platform admin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminSessionResponse {
    pub token: String,
    pub username: String,
}

/// POST /api/v1/auth/register
///
/// Creates an organizer account. Usernames are lowercased before the
/// uniqueness check, so `Ana` and `ana` are the same account.
pub async fn register(
    State(state): State<AppState>,
    Json(mut request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    // Lowercase before validating so `Ana` and `ana` are the same account
    request.username = request.username.to_lowercase();
    request.validate()?;

    let password_hash = hash_password(&request.password)?;
    let organizer = state.store.register_organizer(Organizer::new(
        request.username,
        password_hash,
        request.name,
        request.phone,
        request.pix_key,
    ))?;

    let token = state
        .tokens
        .issue(&organizer.id.to_string(), Role::Organizer)?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse { token, organizer }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticates an organizer. Unknown usernames and wrong passwords are
/// indistinguishable in the response; blocked accounts are told apart.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let username = request.username.to_lowercase();
    let organizer = state
        .store
        .organizer_by_username(&username)
        .ok_or(DomainError::InvalidCredentials)?;

    if !verify_password(&request.password, &organizer.password_hash)? {
        warn!(username = %username, "failed organizer login");
        return Err(DomainError::InvalidCredentials.into());
    }
    if organizer.blocked {
        warn!(username = %username, "blocked organizer attempted login");
        return Err(DomainError::AccountBlocked.into());
    }

    let token = state
        .tokens
        .issue(&organizer.id.to_string(), Role::Organizer)?;
    info!(username = %username, "organizer logged in");
    Ok(Json(SessionResponse { token, organizer }))
}

/// POST /api/v1/admin/setup
///
/// One-time creation of the platform admin credential. Once configured,
/// further calls are rejected regardless of the supplied password.
pub async fn admin_setup(
    State(state): State<AppState>,
    Json(request): Json<AdminSetupRequest>,
) -> Result<(StatusCode, Json<AdminSessionResponse>), ApiError> {
    request.validate()?;
    if request.password != request.password_confirm {
        return Err(DomainError::PasswordMismatch.into());
    }

    let password_hash = hash_password(&request.password)?;
    state
        .store
        .setup_admin(request.username.clone(), password_hash)?;

    let token = state.tokens.issue(&request.username, Role::Admin)?;
    Ok((
        StatusCode::CREATED,
        Json(AdminSessionResponse {
            token,
            username: request.username,
        }),
    ))
}

/// POST /api/v1/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<AdminSessionResponse>, ApiError> {
    let (username, password_hash) = state
        .store
        .admin_credential()
        .ok_or(DomainError::AdminNotConfigured)?;

    if request.username != username || !verify_password(&request.password, &password_hash)? {
        warn!("failed admin login");
        return Err(DomainError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(&username, Role::Admin)?;
    info!("admin logged in");
    Ok(Json(AdminSessionResponse { token, username }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            username: "ana_123".into(),
            password: "1234".into(),
            name: "Ana Silva".into(),
            phone: "(88) 99999-0000".into(),
            pix_key: "ana@pix".into(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_username() {
        let mut req = valid_register();
        req.username = "Ana Silva".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_rejects_short_password() {
        let mut req = valid_register();
        req.password = "123".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_requires_pix_key() {
        let mut req = valid_register();
        req.pix_key = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_admin_setup_password_length() {
        let req = AdminSetupRequest {
            username: "demetrio".into(),
            password: "12345".into(),
            password_confirm: "12345".into(),
        };
        assert!(req.validate().is_err());

        let req = AdminSetupRequest {
            username: "demetrio".into(),
            password: "123456".into(),
            password_confirm: "123456".into(),
        };
        assert!(req.validate().is_ok());
    }
}
