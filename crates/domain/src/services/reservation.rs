//! Ticket reservation engine.
//!
//! Reserving is the one correctness-critical operation on the platform: two
//! sessions must never hold the same number. The engine is pure
//! (check-then-build a new snapshot); the store applies it under its write
//! lock so the check and the commit are atomic.

use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Buyer, Raffle, RaffleStatus};

/// Buyer contact details supplied with a reservation request.
#[derive(Debug, Clone)]
pub struct BuyerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Outcome of a successful reservation.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub raffle: Raffle,
    /// Purchase id shared by every number in this reservation.
    pub purchase_id: Uuid,
    /// The numbers actually reserved: deduplicated, ascending. Callers must
    /// bill from this set, not from the raw request.
    pub numbers: Vec<u32>,
}

/// Reserves `requested` numbers for one buyer.
///
/// Validates that the raffle is active, the request is non-empty, and every
/// requested number is currently free; any failure leaves the raffle
/// untouched. On success all requested numbers carry the same freshly minted
/// purchase id and `paid = false`.
pub fn reserve(
    raffle: &Raffle,
    requested: &[u32],
    buyer: &BuyerInfo,
) -> Result<Reservation, DomainError> {
    if raffle.status != RaffleStatus::Active {
        return Err(DomainError::RaffleNotActive);
    }

    // Dedupe; a number listed twice is a single reservation of it.
    let wanted: BTreeSet<u32> = requested.iter().copied().collect();
    if wanted.is_empty() {
        return Err(DomainError::NoNumbersSelected);
    }

    for &n in &wanted {
        let slot = raffle
            .numbers
            .iter()
            .find(|x| x.number == n)
            .ok_or(DomainError::NumberOutOfRange(n))?;
        if !slot.is_free() {
            return Err(DomainError::NumberAlreadyTaken(n));
        }
    }

    let purchase_id = Uuid::new_v4();
    let bought_at = Utc::now();
    let record = Buyer {
        name: buyer.name.clone(),
        phone: buyer.phone.clone(),
        email: buyer.email.clone(),
        purchase_id: Some(purchase_id),
        bought_at,
    };

    let mut updated = raffle.clone();
    for slot in &mut updated.numbers {
        if wanted.contains(&slot.number) {
            slot.buyer = Some(record.clone());
            slot.paid = false;
        }
    }

    tracing::debug!(
        raffle = %updated.code,
        count = wanted.len(),
        %purchase_id,
        "numbers reserved"
    );

    Ok(Reservation {
        raffle: updated,
        purchase_id,
        numbers: wanted.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Organizer, RaffleSpec};

    fn active_raffle() -> Raffle {
        let org = Organizer::new(
            "ana".into(),
            "hash".into(),
            "Ana".into(),
            "8899990000".into(),
            "ana@pix".into(),
        );
        let mut r = Raffle::create(
            RaffleSpec {
                name: "Rifa".into(),
                prize: "TV".into(),
                prize_value: 1000.0,
                total_numbers: 10,
                price_per_number: 5.0,
                draw_date: None,
                description: None,
            },
            &org,
            "RF-TEST".into(),
            5.0,
        );
        r.status = RaffleStatus::Active;
        r
    }

    fn buyer() -> BuyerInfo {
        BuyerInfo {
            name: "Ana".into(),
            phone: "8888-0000".into(),
            email: None,
        }
    }

    #[test]
    fn test_reserve_attaches_buyer_unpaid() {
        let raffle = active_raffle();
        let res = reserve(&raffle, &[1, 2], &buyer()).unwrap();

        for n in [1, 2] {
            let slot = &res.raffle.numbers[(n - 1) as usize];
            assert!(!slot.is_free());
            assert!(!slot.paid);
            assert_eq!(
                slot.buyer.as_ref().unwrap().purchase_id,
                Some(res.purchase_id)
            );
        }
        // Untouched numbers stay free
        assert!(res.raffle.numbers[2].is_free());
        // Input raffle unchanged
        assert!(raffle.numbers[0].is_free());
    }

    #[test]
    fn test_reserve_shares_one_purchase_id() {
        let res = reserve(&active_raffle(), &[3, 7, 9], &buyer()).unwrap();
        let ids: Vec<_> = res
            .raffle
            .numbers
            .iter()
            .filter_map(|n| n.buyer.as_ref())
            .map(|b| b.purchase_id)
            .collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| *id == Some(res.purchase_id)));
    }

    #[test]
    fn test_reserve_rejects_taken_number() {
        let first = reserve(&active_raffle(), &[5], &buyer()).unwrap().raffle;
        let err = reserve(&first, &[4, 5], &buyer()).unwrap_err();
        assert_eq!(err, DomainError::NumberAlreadyTaken(5));
        // 4 was not reserved either; the request failed atomically
        assert!(first.numbers[3].is_free());
    }

    #[test]
    fn test_reserve_rejects_empty_request() {
        assert_eq!(
            reserve(&active_raffle(), &[], &buyer()).unwrap_err(),
            DomainError::NoNumbersSelected
        );
    }

    #[test]
    fn test_reserve_rejects_out_of_range() {
        assert_eq!(
            reserve(&active_raffle(), &[11], &buyer()).unwrap_err(),
            DomainError::NumberOutOfRange(11)
        );
    }

    #[test]
    fn test_reserve_rejects_inactive_raffle() {
        let mut r = active_raffle();
        r.status = RaffleStatus::PendingFee;
        assert_eq!(
            reserve(&r, &[1], &buyer()).unwrap_err(),
            DomainError::RaffleNotActive
        );
    }

    #[test]
    fn test_reserve_dedupes_request() {
        let res = reserve(&active_raffle(), &[2, 2, 2], &buyer()).unwrap();
        assert_eq!(res.raffle.sold_count(), 1);
        // the reported set is what was actually reserved
        assert_eq!(res.numbers, vec![2]);
    }

    #[test]
    fn test_reserve_reports_sorted_unique_numbers() {
        let res = reserve(&active_raffle(), &[9, 3, 3, 1], &buyer()).unwrap();
        assert_eq!(res.numbers, vec![1, 3, 9]);
        assert_eq!(res.raffle.sold_count(), 3);
    }
}
