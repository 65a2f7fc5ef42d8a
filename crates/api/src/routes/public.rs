//! Public storefront endpoint handlers.
//!
//! No authentication: anyone with a raffle code can view the grid and
//! reserve numbers. Responses are projections that never leak buyer
//! contact data or organizer credentials.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{Raffle, RaffleStatus};
use domain::services::reservation::BuyerInfo;
use shared::validation::validate_phone;

use crate::app::AppState;
use crate::error::ApiError;

/// Query parameters for the storefront listing.
#[derive(Debug, Deserialize)]
pub struct StorefrontQuery {
    pub search: Option<String>,
}

/// Storefront card for one active raffle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RaffleSummary {
    pub code: String,
    pub name: String,
    pub prize: String,
    pub prize_value: f64,
    pub price_per_number: f64,
    pub total_numbers: u32,
    pub available: usize,
    pub progress_percent: f64,
    pub organizer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_date: Option<NaiveDate>,
}

/// One grid slot as shown to buyers: taken or free, nothing else.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NumberView {
    pub number: u32,
    pub taken: bool,
}

/// Full raffle page: summary plus the grid and payment instructions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RaffleDetail {
    #[serde(flatten)]
    pub summary: RaffleSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: RaffleStatus,
    pub numbers: Vec<NumberView>,
    /// Buyers pay the organizer directly via PIX.
    pub pix_key: String,
    pub pix_name: String,
}

/// Reservation request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ReserveRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "At least one number must be selected"))]
    pub numbers: Vec<u32>,
}

/// Reservation confirmation with payment instructions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReserveResponse {
    pub purchase_id: Uuid,
    pub raffle_code: String,
    pub numbers: Vec<u32>,
    pub total_due: f64,
    pub total_due_display: String,
    pub pix_key: String,
    pub pix_name: String,
}

fn summarize(raffle: &Raffle) -> RaffleSummary {
    RaffleSummary {
        code: raffle.code.clone(),
        name: raffle.name.clone(),
        prize: raffle.prize.clone(),
        prize_value: raffle.prize_value,
        price_per_number: raffle.price_per_number,
        total_numbers: raffle.total_numbers,
        available: raffle.available_count(),
        progress_percent: raffle.progress_percent(),
        organizer_name: raffle.organizer_name.clone(),
        draw_date: raffle.draw_date,
    }
}

fn detail(raffle: &Raffle) -> RaffleDetail {
    RaffleDetail {
        summary: summarize(raffle),
        description: raffle.description.clone(),
        status: raffle.status,
        numbers: raffle
            .numbers
            .iter()
            .map(|n| NumberView {
                number: n.number,
                taken: !n.is_free(),
            })
            .collect(),
        pix_key: raffle.pix_key.clone(),
        pix_name: raffle.pix_name.clone(),
    }
}

/// GET /api/v1/raffles?search=
///
/// Lists active raffles, optionally filtered by code or name substring.
pub async fn list_raffles(
    State(state): State<AppState>,
    Query(query): Query<StorefrontQuery>,
) -> Json<Vec<RaffleSummary>> {
    let raffles = state.store.list_active_raffles(query.search.as_deref());
    Json(raffles.iter().map(summarize).collect())
}

/// GET /api/v1/raffles/:code
///
/// Raffle page by shareable code. Only active raffles are visible here;
/// pending and deactivated ones 404 as if they never existed.
pub async fn get_raffle(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RaffleDetail>, ApiError> {
    let raffle = state
        .store
        .raffle_by_code(&code)
        .filter(|r| r.status == RaffleStatus::Active)
        .ok_or_else(|| ApiError::NotFound("Raffle not found".to_string()))?;
    Ok(Json(detail(&raffle)))
}

/// POST /api/v1/raffles/:code/reservations
///
/// Reserves numbers for a buyer. Availability is enforced atomically by the
/// store, so a number that shows free here can still come back as taken.
pub async fn reserve_numbers(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(request): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<ReserveResponse>), ApiError> {
    request.validate()?;

    let buyer = BuyerInfo {
        name: request.name,
        phone: request.phone,
        email: request.email,
    };
    let reservation = state.store.reserve_numbers(&code, &request.numbers, &buyer)?;

    // Bill from the reserved set, not the request: duplicates collapse to
    // one slot and must be charged once.
    let raffle = reservation.raffle;
    let total_due = reservation.numbers.len() as f64 * raffle.price_per_number;
    info!(
        code = %raffle.code,
        purchase_id = %reservation.purchase_id,
        count = reservation.numbers.len(),
        "numbers reserved"
    );

    Ok((
        StatusCode::CREATED,
        Json(ReserveResponse {
            purchase_id: reservation.purchase_id,
            raffle_code: raffle.code.clone(),
            numbers: reservation.numbers,
            total_due,
            total_due_display: shared::money::format_brl(total_due),
            pix_key: raffle.pix_key,
            pix_name: raffle.pix_name,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ReserveRequest {
        ReserveRequest {
            name: "Ana".into(),
            phone: "(88) 99999-0000".into(),
            email: None,
            numbers: vec![1, 2],
        }
    }

    #[test]
    fn test_reserve_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_reserve_request_requires_name() {
        let mut req = valid_request();
        req.name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_reserve_request_rejects_short_phone() {
        let mut req = valid_request();
        req.phone = "8888-0000".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_reserve_request_rejects_bad_email() {
        let mut req = valid_request();
        req.email = Some("not-an-email".into());
        assert!(req.validate().is_err());

        req.email = Some("ana@example.com".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_reserve_request_requires_numbers() {
        let mut req = valid_request();
        req.numbers = vec![];
        assert!(req.validate().is_err());
    }
}
