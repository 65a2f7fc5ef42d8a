//! Payment ledger: pure derivations over a raffle's number grid.
//!
//! Nothing here is stored; the ledger is recomputed from the grid on demand.
//! Rows group numbers by purchase key and are ordered by first appearance in
//! the grid, which is stable across recomputations.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Number, Raffle};

/// Per-buyer summary of owned numbers and paid/due amounts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LedgerRow {
    pub purchase_key: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub numbers: Vec<Number>,
    pub total_paid: f64,
    pub total_due: f64,
}

/// Receipt projection handed to export/notification collaborators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Receipt {
    pub raffle_name: String,
    pub raffle_code: String,
    pub prize: String,
    pub total_numbers: u32,
    pub price_per_number: f64,
    pub buyer_name: String,
    pub buyer_phone: String,
    pub numbers: Vec<Number>,
    pub total: f64,
    /// True iff every listed number is paid.
    pub is_paid: bool,
    /// Payout key shown while the reservation is unpaid.
    pub pix_key: String,
    pub pix_name: String,
}

/// Derives the buyer-grouped ledger for a raffle. Numbers without a buyer
/// never appear.
pub fn build_ledger(raffle: &Raffle) -> Vec<LedgerRow> {
    let mut rows: Vec<LedgerRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for n in &raffle.numbers {
        let (Some(key), Some(buyer)) = (n.purchase_key(), n.buyer.as_ref()) else {
            continue;
        };

        let i = *index.entry(key.clone()).or_insert_with(|| {
            rows.push(LedgerRow {
                purchase_key: key,
                name: buyer.name.clone(),
                phone: buyer.phone.clone(),
                email: buyer.email.clone(),
                numbers: Vec::new(),
                total_paid: 0.0,
                total_due: 0.0,
            });
            rows.len() - 1
        });

        rows[i].numbers.push(n.clone());
        if n.paid {
            rows[i].total_paid += raffle.price_per_number;
        } else {
            rows[i].total_due += raffle.price_per_number;
        }
    }

    rows
}

/// Filters ledger rows by buyer name (case-insensitive) or phone substring,
/// matching the organizer console search box.
pub fn search_ledger(rows: Vec<LedgerRow>, query: &str) -> Vec<LedgerRow> {
    if query.is_empty() {
        return rows;
    }
    let q = query.to_lowercase();
    rows.into_iter()
        .filter(|r| r.name.to_lowercase().contains(&q) || r.phone.contains(query))
        .collect()
}

/// Flips the paid flag of exactly one number matching both the purchase key
/// and the number value. No-op when nothing matches.
pub fn toggle_paid(raffle: &Raffle, purchase_key: &str, number: u32) -> Raffle {
    let mut updated = raffle.clone();
    for n in &mut updated.numbers {
        if n.number == number && n.purchase_key().as_deref() == Some(purchase_key) {
            n.paid = !n.paid;
        }
    }
    updated
}

/// Marks every number in a purchase group as paid.
pub fn mark_all_paid(raffle: &Raffle, purchase_key: &str) -> Raffle {
    let mut updated = raffle.clone();
    for n in &mut updated.numbers {
        if n.purchase_key().as_deref() == Some(purchase_key) {
            n.paid = true;
        }
    }
    updated
}

/// Builds the receipt projection for one purchase group, or `None` when the
/// key matches nothing.
pub fn build_receipt(raffle: &Raffle, purchase_key: &str) -> Option<Receipt> {
    let row = build_ledger(raffle)
        .into_iter()
        .find(|r| r.purchase_key == purchase_key)?;

    let is_paid = row.numbers.iter().all(|n| n.paid);
    let total = row.numbers.len() as f64 * raffle.price_per_number;

    Some(Receipt {
        raffle_name: raffle.name.clone(),
        raffle_code: raffle.code.clone(),
        prize: raffle.prize.clone(),
        total_numbers: raffle.total_numbers,
        price_per_number: raffle.price_per_number,
        buyer_name: row.name,
        buyer_phone: row.phone,
        numbers: row.numbers,
        total,
        is_paid,
        pix_key: raffle.pix_key.clone(),
        pix_name: raffle.pix_name.clone(),
    })
}
