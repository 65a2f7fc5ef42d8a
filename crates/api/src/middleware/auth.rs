//! Session-token authentication middleware.
//!
//! Two middlewares guard the private surfaces: organizer routes and admin
//! routes. Both validate the Bearer token, check the embedded role and store
//! the caller's identity in request extensions for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use shared::token::Role;

use crate::app::AppState;

/// Authenticated organizer, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct OrganizerAuth {
    pub organizer_id: Uuid,
    pub username: String,
}

/// Authenticated platform admin, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub username: String,
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Middleware that requires a valid organizer session token.
///
/// Beyond token validity, the organizer must still exist and must not be
/// blocked; blocking takes effect on the next request, not at token expiry.
pub async fn require_organizer_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            return unauthorized_response("Invalid or expired token");
        }
    };

    if claims.role != Role::Organizer {
        return forbidden_response("Organizer access required");
    }

    let organizer_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid subject in token"),
    };

    let Some(organizer) = state.store.organizer_by_id(organizer_id) else {
        return unauthorized_response("Unknown organizer");
    };

    if organizer.blocked {
        return forbidden_response("Account is blocked");
    }

    req.extensions_mut().insert(OrganizerAuth {
        organizer_id,
        username: organizer.username,
    });
    next.run(req).await
}

/// Middleware that requires a valid admin session token.
pub async fn require_admin_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            return unauthorized_response("Invalid or expired token");
        }
    };

    if claims.role != Role::Admin {
        return forbidden_response("Admin access required");
    }

    req.extensions_mut().insert(AdminAuth {
        username: claims.sub,
    });
    next.run(req).await
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message,
        })),
    )
        .into_response()
}
