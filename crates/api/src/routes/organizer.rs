//! Organizer console endpoint handlers.
//!
//! Every route runs behind the organizer auth middleware and is scoped to
//! raffles the caller owns; the store enforces ownership on each lookup.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::Raffle;
use domain::services::draw::DrawOutcome;
use domain::services::ledger::{LedgerRow, Receipt};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::OrganizerAuth;
use crate::services::share;

/// Raffle creation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRaffleRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Prize is required"))]
    pub prize: String,

    #[validate(range(min = 0.0, message = "Prize value cannot be negative"))]
    pub prize_value: f64,

    #[validate(range(min = 1, max = 10000, message = "Total numbers must be between 1 and 10000"))]
    pub total_numbers: u32,

    #[validate(range(exclusive_min = 0.0, message = "Price per number must be positive"))]
    pub price_per_number: f64,

    pub draw_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Raffle creation response: the raffle plus fee settlement instructions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateRaffleResponse {
    pub raffle: Raffle,
    pub fee_amount_display: String,
    /// Platform PIX the organizer pays the fee to.
    pub platform_pix_key: String,
    pub platform_pix_name: String,
}

/// Raffle as shown in the organizer dashboard, with derived counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MyRaffleView {
    #[serde(flatten)]
    pub raffle: Raffle,
    pub sold: usize,
    pub paid: usize,
    pub available: usize,
    pub revenue_received: f64,
    pub progress_percent: f64,
}

impl From<Raffle> for MyRaffleView {
    fn from(raffle: Raffle) -> Self {
        Self {
            sold: raffle.sold_count(),
            paid: raffle.paid_count(),
            available: raffle.available_count(),
            revenue_received: raffle.revenue_received(),
            progress_percent: raffle.progress_percent(),
            raffle,
        }
    }
}

/// Query parameters for the payment ledger.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub search: Option<String>,
}

/// Body for toggling a single number's paid flag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TogglePaidRequest {
    pub purchase_key: String,
}

/// Receipt plus the ready-to-send share message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReceiptResponse {
    pub receipt: Receipt,
    pub share_text: String,
}

/// POST /api/v1/raffles
///
/// Creates a raffle for the authenticated organizer. The raffle starts in
/// `pending_fee` and only appears in the storefront after the admin
/// confirms the fee payment.
pub async fn create_raffle(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Json(request): Json<CreateRaffleRequest>,
) -> Result<(StatusCode, Json<CreateRaffleResponse>), ApiError> {
    request.validate()?;

    let spec = store::raffle_spec(
        request.name,
        request.prize,
        request.prize_value,
        request.total_numbers,
        request.price_per_number,
        request.draw_date,
        request.description,
    );
    let raffle = state.store.create_raffle(auth.organizer_id, spec)?;
    let config = state.store.config();

    info!(
        code = %raffle.code,
        organizer = %auth.username,
        fee = raffle.fee_amount,
        "raffle created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateRaffleResponse {
            fee_amount_display: shared::money::format_brl(raffle.fee_amount),
            platform_pix_key: config.pix_key,
            platform_pix_name: config.pix_name,
            raffle,
        }),
    ))
}

/// GET /api/v1/my/raffles
pub async fn my_raffles(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
) -> Json<Vec<MyRaffleView>> {
    let raffles = state.store.raffles_for_organizer(auth.organizer_id);
    Json(raffles.into_iter().map(MyRaffleView::from).collect())
}

/// GET /api/v1/my/raffles/:id/ledger?search=
///
/// Buyer-grouped payment ledger, optionally filtered by name or phone.
pub async fn ledger(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path(id): Path<Uuid>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Vec<LedgerRow>>, ApiError> {
    let rows = state
        .store
        .ledger(id, auth.organizer_id, query.search.as_deref())?;
    Ok(Json(rows))
}

/// POST /api/v1/my/raffles/:id/numbers/:number/toggle-paid
pub async fn toggle_paid(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path((id, number)): Path<(Uuid, u32)>,
    Json(request): Json<TogglePaidRequest>,
) -> Result<Json<MyRaffleView>, ApiError> {
    let updated = state
        .store
        .toggle_paid(id, auth.organizer_id, &request.purchase_key, number)?;
    Ok(Json(updated.into()))
}

/// POST /api/v1/my/raffles/:id/buyers/:purchase_key/mark-paid
pub async fn mark_buyer_paid(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path((id, purchase_key)): Path<(Uuid, String)>,
) -> Result<Json<MyRaffleView>, ApiError> {
    let updated = state
        .store
        .mark_all_paid(id, auth.organizer_id, &purchase_key)?;
    Ok(Json(updated.into()))
}

/// GET /api/v1/my/raffles/:id/buyers/:purchase_key/receipt
pub async fn receipt(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path((id, purchase_key)): Path<(Uuid, String)>,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let receipt = state.store.receipt(id, auth.organizer_id, &purchase_key)?;
    let share_text = share::receipt_message(&receipt);
    Ok(Json(ReceiptResponse {
        receipt,
        share_text,
    }))
}

/// POST /api/v1/my/raffles/:id/draw
///
/// Draws a winner among paid numbers. The draw does not change raffle
/// state; organizers can re-run it until they deactivate the raffle.
pub async fn draw(
    State(state): State<AppState>,
    Extension(auth): Extension<OrganizerAuth>,
    Path(id): Path<Uuid>,
) -> Result<Json<DrawOutcome>, ApiError> {
    let outcome = state.store.draw(id, auth.organizer_id)?;
    info!(raffle = %id, winner = outcome.winning_number, "draw completed");
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateRaffleRequest {
        CreateRaffleRequest {
            name: "Rifa Solidária".into(),
            prize: "Smart TV".into(),
            prize_value: 2000.0,
            total_numbers: 100,
            price_per_number: 5.0,
            draw_date: None,
            description: None,
        }
    }

    #[test]
    fn test_create_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_zero_numbers() {
        let mut req = valid_request();
        req.total_numbers = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_free_tickets() {
        let mut req = valid_request();
        req.price_per_number = 0.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_oversized_grid() {
        let mut req = valid_request();
        req.total_numbers = 10_001;
        assert!(req.validate().is_err());
    }
}
