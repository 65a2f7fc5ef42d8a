//! Raffle, Number and Buyer domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::services::fees;

/// Raffle lifecycle status.
///
/// Transitions are monotonic: `pending_fee -> active -> inactive`. A raffle
/// becomes `active` only through fee confirmation, and `inactive` is
/// terminal. Deletion is allowed from any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaffleStatus {
    PendingFee,
    Active,
    Inactive,
}

impl fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleStatus::PendingFee => write!(f, "pending_fee"),
            RaffleStatus::Active => write!(f, "active"),
            RaffleStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Buyer record embedded in each reserved number.
///
/// Buyers are not normalized: the same person appears as distinct records
/// across purchases unless the purchase id links them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Buyer {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Groups numbers bought in one transaction. Always set for new
    /// reservations; optional only to admit legacy records.
    pub purchase_id: Option<Uuid>,
    pub bought_at: DateTime<Utc>,
}

/// One ticket slot in a raffle's fixed-size grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Number {
    /// 1-based sequence value, immutable identity within the raffle.
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    /// Meaningful only when a buyer is set; free numbers are never paid.
    pub paid: bool,
}

impl Number {
    fn free(number: u32) -> Self {
        Self {
            number,
            buyer: None,
            paid: false,
        }
    }

    pub fn is_free(&self) -> bool {
        self.buyer.is_none()
    }

    /// Grouping key for the ledger: the purchase id when present, otherwise
    /// a name+phone compatibility shim (lossy: distinct buyers sharing both
    /// fields would be merged).
    pub fn purchase_key(&self) -> Option<String> {
        let buyer = self.buyer.as_ref()?;
        Some(match buyer.purchase_id {
            Some(id) => id.to_string(),
            None => format!("{}{}", buyer.name, buyer.phone),
        })
    }
}

/// Creation-time parameters for a raffle, validated at the HTTP edge.
#[derive(Debug, Clone)]
pub struct RaffleSpec {
    pub name: String,
    pub prize: String,
    pub prize_value: f64,
    pub total_numbers: u32,
    pub price_per_number: f64,
    pub draw_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// A single raffle campaign, owning its full number grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Raffle {
    pub id: Uuid,
    /// Shareable code, e.g. `RF-A3K7`. Unique across raffles.
    pub code: String,
    pub name: String,
    pub prize: String,
    pub prize_value: f64,
    /// Fixed at creation; the number grid never changes length.
    pub total_numbers: u32,
    pub price_per_number: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    /// Payout key for ticket payments (the organizer's, not the platform's).
    pub pix_key: String,
    pub pix_name: String,
    pub created_at: DateTime<Utc>,
    pub status: RaffleStatus,
    /// Fee percent captured at creation time. Later changes to the global
    /// rate never alter existing raffles.
    pub fee_percent: f64,
    pub fee_amount: f64,
    pub fee_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_confirmed_at: Option<DateTime<Utc>>,
    pub numbers: Vec<Number>,
}

impl Raffle {
    /// Builds a new raffle with a free grid of `total_numbers` slots and the
    /// fee snapshot taken from the fee percent in effect right now. All
    /// raffles start `pending_fee`; there is no zero-fee auto-activate path.
    pub fn create(spec: RaffleSpec, organizer: &super::Organizer, code: String, fee_percent: f64) -> Self {
        let fee_amount = fees::compute_fee(spec.total_numbers, spec.price_per_number, fee_percent);
        Self {
            id: Uuid::new_v4(),
            code,
            name: spec.name,
            prize: spec.prize,
            prize_value: spec.prize_value,
            total_numbers: spec.total_numbers,
            price_per_number: spec.price_per_number,
            draw_date: spec.draw_date,
            description: spec.description,
            organizer_id: organizer.id,
            organizer_name: organizer.name.clone(),
            pix_key: organizer.pix_key.clone(),
            pix_name: organizer.name.clone(),
            created_at: Utc::now(),
            status: RaffleStatus::PendingFee,
            fee_percent,
            fee_amount,
            fee_paid: false,
            fee_confirmed_at: None,
            numbers: (1..=spec.total_numbers).map(Number::free).collect(),
        }
    }

    /// Total face value of the raffle if every number sells.
    pub fn face_value(&self) -> f64 {
        f64::from(self.total_numbers) * self.price_per_number
    }

    pub fn sold_count(&self) -> usize {
        self.numbers.iter().filter(|n| !n.is_free()).count()
    }

    pub fn paid_count(&self) -> usize {
        self.numbers.iter().filter(|n| n.paid).count()
    }

    pub fn available_count(&self) -> usize {
        self.numbers.len() - self.sold_count()
    }

    /// Revenue actually received so far (paid numbers only).
    pub fn revenue_received(&self) -> f64 {
        self.paid_count() as f64 * self.price_per_number
    }

    /// Sold fraction as a percentage, for storefront progress bars.
    pub fn progress_percent(&self) -> f64 {
        if self.total_numbers == 0 {
            return 0.0;
        }
        self.sold_count() as f64 / f64::from(self.total_numbers) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Organizer;

    fn organizer() -> Organizer {
        Organizer::new(
            "ana".into(),
            "hash".into(),
            "Ana Silva".into(),
            "8899990000".into(),
            "ana@pix".into(),
        )
    }

    fn raffle() -> Raffle {
        Raffle::create(
            RaffleSpec {
                name: "Rifa Solidária".into(),
                prize: "Smart TV".into(),
                prize_value: 2000.0,
                total_numbers: 10,
                price_per_number: 5.0,
                draw_date: None,
                description: None,
            },
            &organizer(),
            "RF-A3K7".into(),
            5.0,
        )
    }

    #[test]
    fn test_create_builds_free_grid() {
        let r = raffle();
        assert_eq!(r.numbers.len(), 10);
        assert_eq!(r.numbers[0].number, 1);
        assert_eq!(r.numbers[9].number, 10);
        assert!(r.numbers.iter().all(|n| n.is_free() && !n.paid));
    }

    #[test]
    fn test_create_snapshots_fee() {
        let r = raffle();
        assert_eq!(r.status, RaffleStatus::PendingFee);
        assert_eq!(r.fee_percent, 5.0);
        assert_eq!(r.fee_amount, 2.5);
        assert!(!r.fee_paid);
    }

    #[test]
    fn test_create_inherits_organizer_payout() {
        let r = raffle();
        assert_eq!(r.pix_key, "ana@pix");
        assert_eq!(r.pix_name, "Ana Silva");
        assert_eq!(r.organizer_name, "Ana Silva");
    }

    #[test]
    fn test_counts_on_fresh_raffle() {
        let r = raffle();
        assert_eq!(r.sold_count(), 0);
        assert_eq!(r.available_count(), 10);
        assert_eq!(r.paid_count(), 0);
        assert_eq!(r.face_value(), 50.0);
        assert_eq!(r.progress_percent(), 0.0);
    }

    #[test]
    fn test_purchase_key_fallback() {
        let mut n = Number::free(1);
        n.buyer = Some(Buyer {
            name: "Ana".into(),
            phone: "8888-0000".into(),
            email: None,
            purchase_id: None,
            bought_at: Utc::now(),
        });
        assert_eq!(n.purchase_key().unwrap(), "Ana8888-0000");

        let id = Uuid::new_v4();
        n.buyer.as_mut().unwrap().purchase_id = Some(id);
        assert_eq!(n.purchase_key().unwrap(), id.to_string());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RaffleStatus::PendingFee).unwrap(),
            "\"pending_fee\""
        );
        assert_eq!(RaffleStatus::Active.to_string(), "active");
    }
}
