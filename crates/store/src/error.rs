//! Store error type.

use domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Organizer not found")]
    OrganizerNotFound,

    #[error("Raffle not found")]
    RaffleNotFound,

    #[error("Purchase not found")]
    PurchaseNotFound,

    #[error("Raffle belongs to another organizer")]
    NotOwner,

    #[error("Admin account is already configured")]
    AdminAlreadyConfigured,

    #[error(transparent)]
    Domain(#[from] DomainError),
}
