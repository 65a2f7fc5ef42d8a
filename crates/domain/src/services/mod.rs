//! Business logic engines.

pub mod draw;
pub mod fees;
pub mod ledger;
pub mod reservation;
