//! Platform configuration model.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// When the platform fee is charged.
///
/// Only `creation` is implemented: the fee is computed from the full face
/// value at raffle creation and settled before activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    #[default]
    Creation,
}

impl FromStr for FeeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "creation" => Ok(FeeMode::Creation),
            _ => Err(format!("Unknown fee mode: {}", s)),
        }
    }
}

/// Platform-wide configuration, owned by the state store and mutated only
/// through admin operations.
///
/// `fee_percent` is the default applied to raffles created from now on;
/// existing raffles keep the snapshot taken at their creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlatformConfig {
    pub name: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    #[serde(skip_serializing, default)]
    pub admin_password_hash: Option<String>,
    /// False until first-time admin setup completes.
    pub initialized: bool,
    pub fee_percent: f64,
    pub fee_mode: FeeMode,
    /// PIX key organizers pay platform fees to.
    pub pix_key: String,
    pub pix_name: String,
    /// Minimum paid numbers required before a draw is allowed.
    pub min_draw_eligible: usize,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: "Rifas Online".into(),
            subtitle: "Plataforma de Rifas Digital".into(),
            admin_username: None,
            admin_password_hash: None,
            initialized: false,
            fee_percent: 5.0,
            fee_mode: FeeMode::Creation,
            pix_key: String::new(),
            pix_name: String::new(),
            min_draw_eligible: 2,
        }
    }
}
