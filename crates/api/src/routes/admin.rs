//! Platform admin endpoint handlers.
//!
//! All routes run behind the admin auth middleware. The admin settles fees,
//! curates the raffle catalog and manages organizer accounts.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{Organizer, PlatformConfig, Raffle, RaffleStatus};
use domain::services::fees;
use domain::DomainError;
use shared::password::{hash_password, verify_password};
use shared::validation::validate_fee_percent;

use crate::app::AppState;
use crate::error::ApiError;

/// Admin password change request. The current password is re-verified even
/// though the route already requires a valid session.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub password_confirm: String,
}

/// Platform-wide dashboard totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminStats {
    pub organizers: usize,
    pub raffles: usize,
    pub active_raffles: usize,
    pub pending_fee_raffles: usize,
    pub fees_collected: f64,
    pub fees_pending: f64,
    pub fees_collected_display: String,
}

/// Query parameters for the admin raffle listing.
#[derive(Debug, Deserialize)]
pub struct AdminRaffleQuery {
    /// Filter by lifecycle status (`pending_fee`, `active`, `inactive`).
    pub status: Option<RaffleStatus>,
}

/// Raffle row in the admin console, with derived counters. The full grid is
/// omitted; the admin view works at campaign granularity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminRaffleView {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub prize: String,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub status: RaffleStatus,
    pub total_numbers: u32,
    pub sold: usize,
    pub paid: usize,
    pub fee_percent: f64,
    pub fee_amount: f64,
    pub fee_paid: bool,
}

impl From<&Raffle> for AdminRaffleView {
    fn from(raffle: &Raffle) -> Self {
        Self {
            id: raffle.id,
            code: raffle.code.clone(),
            name: raffle.name.clone(),
            prize: raffle.prize.clone(),
            organizer_id: raffle.organizer_id,
            organizer_name: raffle.organizer_name.clone(),
            status: raffle.status,
            total_numbers: raffle.total_numbers,
            sold: raffle.sold_count(),
            paid: raffle.paid_count(),
            fee_percent: raffle.fee_percent,
            fee_amount: raffle.fee_amount,
            fee_paid: raffle.fee_paid,
        }
    }
}

/// Organizer row in the admin console.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OrganizerView {
    #[serde(flatten)]
    pub organizer: Organizer,
    pub raffle_count: usize,
}

/// Platform settings update. Absent fields keep their current value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateConfigRequest {
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub fee_percent: Option<f64>,
    pub pix_key: Option<String>,
    pub pix_name: Option<String>,
    pub min_draw_eligible: Option<usize>,
}

/// Generic acknowledgement for destructive operations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/v1/admin/password
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    request.validate()?;
    if request.password != request.password_confirm {
        return Err(DomainError::PasswordMismatch.into());
    }

    let (_, current_hash) = state
        .store
        .admin_credential()
        .ok_or(DomainError::AdminNotConfigured)?;
    if !verify_password(&request.current_password, &current_hash)? {
        warn!("admin password change with wrong current password");
        return Err(DomainError::InvalidCredentials.into());
    }

    let password_hash = hash_password(&request.password)?;
    state.store.set_admin_password_hash(password_hash)?;
    info!("admin password changed");
    Ok(Json(AckResponse {
        success: true,
        message: "Password updated".to_string(),
    }))
}

/// GET /api/v1/admin/stats
pub async fn stats(State(state): State<AppState>) -> Json<AdminStats> {
    let raffles = state.store.list_raffles();
    let collected = fees::fees_collected(&raffles);

    Json(AdminStats {
        organizers: state.store.list_organizers().len(),
        raffles: raffles.len(),
        active_raffles: raffles
            .iter()
            .filter(|r| r.status == RaffleStatus::Active)
            .count(),
        pending_fee_raffles: raffles
            .iter()
            .filter(|r| r.status == RaffleStatus::PendingFee)
            .count(),
        fees_collected: collected,
        fees_pending: fees::fees_pending(&raffles),
        fees_collected_display: shared::money::format_brl(collected),
    })
}

/// GET /api/v1/admin/raffles?status=
pub async fn list_raffles(
    State(state): State<AppState>,
    Query(query): Query<AdminRaffleQuery>,
) -> Json<Vec<AdminRaffleView>> {
    let raffles = state.store.list_raffles();
    Json(
        raffles
            .iter()
            .filter(|r| query.status.map_or(true, |s| r.status == s))
            .map(AdminRaffleView::from)
            .collect(),
    )
}

/// GET /api/v1/admin/organizers
pub async fn list_organizers(State(state): State<AppState>) -> Json<Vec<OrganizerView>> {
    let raffles = state.store.list_raffles();
    Json(
        state
            .store
            .list_organizers()
            .into_iter()
            .map(|organizer| OrganizerView {
                raffle_count: raffles
                    .iter()
                    .filter(|r| r.organizer_id == organizer.id)
                    .count(),
                organizer,
            })
            .collect(),
    )
}

/// POST /api/v1/admin/raffles/:id/confirm-fee
///
/// Confirms the organizer paid the platform fee and activates the raffle.
/// Confirming an already-active raffle is a no-op.
pub async fn confirm_fee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminRaffleView>, ApiError> {
    let updated = state.store.confirm_fee(id)?;
    info!(code = %updated.code, "fee confirmed, raffle active");
    Ok(Json(AdminRaffleView::from(&updated)))
}

/// POST /api/v1/admin/raffles/:id/deactivate
pub async fn deactivate_raffle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminRaffleView>, ApiError> {
    let updated = state.store.deactivate_raffle(id)?;
    info!(code = %updated.code, "raffle deactivated");
    Ok(Json(AdminRaffleView::from(&updated)))
}

/// DELETE /api/v1/admin/raffles/:id
pub async fn delete_raffle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckResponse>, ApiError> {
    state.store.delete_raffle(id)?;
    warn!(raffle = %id, "raffle deleted");
    Ok(Json(AckResponse {
        success: true,
        message: "Raffle deleted".to_string(),
    }))
}

/// POST /api/v1/admin/organizers/:id/block
///
/// Toggles the blocked flag. A blocked organizer cannot log in or use an
/// existing session; their raffles stay as they are.
pub async fn toggle_block_organizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Organizer>, ApiError> {
    let organizer = state.store.toggle_organizer_blocked(id)?;
    Ok(Json(organizer))
}

/// DELETE /api/v1/admin/organizers/:id
///
/// Deletes an organizer account and every raffle they own.
pub async fn delete_organizer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AckResponse>, ApiError> {
    state.store.delete_organizer(id)?;
    warn!(organizer = %id, "organizer deleted with raffles");
    Ok(Json(AckResponse {
        success: true,
        message: "Organizer and their raffles deleted".to_string(),
    }))
}

/// GET /api/v1/admin/config
pub async fn get_config(State(state): State<AppState>) -> Json<PlatformConfig> {
    Json(state.store.config())
}

/// PUT /api/v1/admin/config
///
/// Updates platform settings. A fee percent change applies only to raffles
/// created afterwards.
pub async fn update_config(
    State(state): State<AppState>,
    Json(request): Json<UpdateConfigRequest>,
) -> Result<Json<PlatformConfig>, ApiError> {
    if let Some(percent) = request.fee_percent {
        validate_fee_percent(percent).map_err(|e| {
            ApiError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default())
        })?;
    }

    let updated = state.store.update_platform_settings(
        request.name,
        request.subtitle,
        request.fee_percent,
        request.pix_key,
        request.pix_name,
        request.min_draw_eligible,
    );
    info!(fee_percent = updated.fee_percent, "platform settings updated");
    Ok(Json(updated))
}
