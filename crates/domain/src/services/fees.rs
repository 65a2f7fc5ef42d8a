//! Fee settlement engine.
//!
//! The platform fee is a percentage of a raffle's face value, snapshotted at
//! creation time. Settlement is a manual step: the organizer pays the fee via
//! PIX out-of-band and the admin confirms it here, which is the only way a
//! raffle becomes active.

use chrono::Utc;

use crate::error::DomainError;
use crate::models::{Raffle, RaffleStatus};

/// Computes the platform fee for a raffle.
///
/// `total * price * percent / 100`, full precision; rounding happens only at
/// display time.
pub fn compute_fee(total_numbers: u32, price_per_number: f64, fee_percent: f64) -> f64 {
    f64::from(total_numbers) * price_per_number * fee_percent / 100.0
}

/// Confirms the fee payment of a `pending_fee` raffle, activating it.
///
/// Re-confirming an already-active raffle is an idempotent no-op that keeps
/// the original confirmation timestamp. Confirming an inactive raffle is
/// rejected: `inactive` is terminal.
pub fn confirm_fee_payment(raffle: &Raffle) -> Result<Raffle, DomainError> {
    match raffle.status {
        RaffleStatus::PendingFee => {
            let mut updated = raffle.clone();
            updated.fee_paid = true;
            updated.status = RaffleStatus::Active;
            updated.fee_confirmed_at = Some(Utc::now());
            tracing::info!(raffle = %updated.code, fee = updated.fee_amount, "fee confirmed");
            Ok(updated)
        }
        RaffleStatus::Active => Ok(raffle.clone()),
        RaffleStatus::Inactive => Err(DomainError::InvalidTransition(raffle.status)),
    }
}

/// Deactivates an active raffle. Irreversible.
pub fn deactivate(raffle: &Raffle) -> Result<Raffle, DomainError> {
    if raffle.status != RaffleStatus::Active {
        return Err(DomainError::InvalidTransition(raffle.status));
    }
    let mut updated = raffle.clone();
    updated.status = RaffleStatus::Inactive;
    Ok(updated)
}

/// Sum of fees already settled, for the admin dashboard.
pub fn fees_collected(raffles: &[Raffle]) -> f64 {
    raffles
        .iter()
        .filter(|r| r.fee_paid)
        .map(|r| r.fee_amount)
        .sum()
}

/// Sum of fees still owed by raffles awaiting activation.
pub fn fees_pending(raffles: &[Raffle]) -> f64 {
    raffles
        .iter()
        .filter(|r| !r.fee_paid)
        .map(|r| r.fee_amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Organizer, RaffleSpec};

    fn pending_raffle(fee_percent: f64) -> Raffle {
        let org = Organizer::new(
            "ana".into(),
            "hash".into(),
            "Ana".into(),
            "8899990000".into(),
            "ana@pix".into(),
        );
        Raffle::create(
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
            fee_percent,
        )
    }

    #[test]
    fn test_compute_fee_example() {
        // 10 numbers at 5.00 with 5% => 2.50
        assert_eq!(compute_fee(10, 5.0, 5.0), 2.5);
    }

    #[test]
    fn test_compute_fee_zero_percent() {
        assert_eq!(compute_fee(100, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_compute_fee_keeps_precision() {
        // 33 * 1.10 * 7.5% = 2.7225; no rounding internally
        let fee = compute_fee(33, 1.10, 7.5);
        assert!((fee - 2.7225).abs() < 1e-9);
    }

    #[test]
    fn test_zero_fee_still_requires_confirmation() {
        let r = pending_raffle(0.0);
        assert_eq!(r.status, RaffleStatus::PendingFee);
        assert_eq!(r.fee_amount, 0.0);
    }

    #[test]
    fn test_confirm_activates() {
        let r = pending_raffle(5.0);
        let confirmed = confirm_fee_payment(&r).unwrap();
        assert_eq!(confirmed.status, RaffleStatus::Active);
        assert!(confirmed.fee_paid);
        assert!(confirmed.fee_confirmed_at.is_some());
        // input untouched
        assert_eq!(r.status, RaffleStatus::PendingFee);
    }

    #[test]
    fn test_reconfirm_is_idempotent() {
        let confirmed = confirm_fee_payment(&pending_raffle(5.0)).unwrap();
        let stamp = confirmed.fee_confirmed_at;
        let again = confirm_fee_payment(&confirmed).unwrap();
        assert_eq!(again.status, RaffleStatus::Active);
        assert_eq!(again.fee_confirmed_at, stamp);
    }

    #[test]
    fn test_confirm_inactive_rejected() {
        let confirmed = confirm_fee_payment(&pending_raffle(5.0)).unwrap();
        let inactive = deactivate(&confirmed).unwrap();
        assert!(matches!(
            confirm_fee_payment(&inactive),
            Err(DomainError::InvalidTransition(RaffleStatus::Inactive))
        ));
    }

    #[test]
    fn test_deactivate_requires_active() {
        let pending = pending_raffle(5.0);
        assert!(matches!(
            deactivate(&pending),
            Err(DomainError::InvalidTransition(RaffleStatus::PendingFee))
        ));

        let active = confirm_fee_payment(&pending).unwrap();
        let inactive = deactivate(&active).unwrap();
        assert_eq!(inactive.status, RaffleStatus::Inactive);
        assert!(deactivate(&inactive).is_err());
    }

    #[test]
    fn test_active_implies_fee_paid() {
        // status monotonicity: the only path to active is confirmation
        let active = confirm_fee_payment(&pending_raffle(5.0)).unwrap();
        assert!(active.fee_paid);
    }

    #[test]
    fn test_fee_totals() {
        let pending = pending_raffle(5.0); // fee 2.50
        let active = confirm_fee_payment(&pending_raffle(5.0)).unwrap();
        let raffles = vec![pending, active];
        assert_eq!(fees_collected(&raffles), 2.5);
        assert_eq!(fees_pending(&raffles), 2.5);
    }
}
