//! Organizer domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raffle creator account.
///
/// Usernames are stored lowercased and are unique across the platform.
/// A blocked organizer cannot authenticate; blocking does not touch the
/// organizer's raffles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Organizer {
    pub id: Uuid,
    pub username: String,
    /// Argon2id PHC string; never serialized to API responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    /// PIX key buyers pay reservations to.
    pub pix_key: String,
    pub created_at: DateTime<Utc>,
    pub blocked: bool,
}

impl Organizer {
    pub fn new(
        username: String,
        password_hash: String,
        name: String,
        phone: String,
        pix_key: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            name,
            phone,
            pix_key,
            created_at: Utc::now(),
            blocked: false,
        }
    }
}
