//! Draw engine.
//!
//! The winner is a single uniform sample from the paid numbers, taken from
//! the OS CSPRNG. The reveal sequence returned alongside exists purely for
//! the spin animation in clients and never influences the terminal sample.

use serde::Serialize;
use shared::codes::secure_random;

use crate::error::DomainError;
use crate::models::{Buyer, Raffle};

/// Number of cosmetic samples preceding the winner in the reveal sequence.
const REVEAL_STEPS: usize = 30;

/// Result of a draw.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DrawOutcome {
    pub winning_number: u32,
    pub winner: Buyer,
    /// Cosmetic spin sequence; the last element is the winning number.
    pub reveal: Vec<u32>,
}

/// Draws one winning number among the paid tickets.
///
/// `min_eligible` is the deployment's business rule for the smallest paid
/// set worth drawing from (default 2). The draw is not seeded and not
/// reproducible.
pub fn draw(raffle: &Raffle, min_eligible: usize) -> Result<DrawOutcome, DomainError> {
    // A paid number always has a buyer; pair them up so the winner's buyer
    // record comes out of the same filter.
    let eligible: Vec<(u32, &Buyer)> = raffle
        .numbers
        .iter()
        .filter(|n| n.paid)
        .filter_map(|n| n.buyer.as_ref().map(|b| (n.number, b)))
        .collect();

    if eligible.len() < min_eligible {
        return Err(DomainError::InsufficientEligibleNumbers {
            required: min_eligible,
            eligible: eligible.len(),
        });
    }

    let mut reveal: Vec<u32> = (0..REVEAL_STEPS)
        .map(|_| eligible[secure_random(eligible.len())].0)
        .collect();

    // The terminal sample is the only award-determining step.
    let (winning_number, winner) = eligible[secure_random(eligible.len())];
    reveal.push(winning_number);

    tracing::info!(raffle = %raffle.code, winner = winning_number, "draw completed");

    Ok(DrawOutcome {
        winning_number,
        winner: winner.clone(),
        reveal,
    })
}
