//! The canonical state snapshot.

use domain::models::{Organizer, PlatformConfig, Raffle};

/// Everything the platform knows: organizers, raffles and the platform
/// configuration. Collections keep insertion order so listings are stable.
#[derive(Debug, Clone)]
pub struct PlatformState {
    pub organizers: Vec<Organizer>,
    pub raffles: Vec<Raffle>,
    pub config: PlatformConfig,
}

impl PlatformState {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            organizers: Vec::new(),
            raffles: Vec::new(),
            config,
        }
    }
}
