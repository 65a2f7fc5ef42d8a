//! Domain models for the raffle platform.

pub mod config;
pub mod organizer;
pub mod raffle;

pub use config::{FeeMode, PlatformConfig};
pub use organizer::Organizer;
pub use raffle::{Buyer, Number, Raffle, RaffleSpec, RaffleStatus};
