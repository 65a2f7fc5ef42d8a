//! Domain layer for the raffle platform.
//!
//! This crate contains:
//! - Domain models (Organizer, Raffle, Number, Buyer, PlatformConfig)
//! - The four engines: reservation, fee settlement, ledger derivation, draw
//! - The domain error taxonomy
//!
//! Everything here is pure: engines take references and return new values or
//! errors, never mutating their inputs. The store crate applies the returned
//! snapshots under its write lock.

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
