//! Domain error taxonomy.
//!
//! Every variant is a validation-style, user-recoverable condition. A
//! rejected operation never leaves the state partially mutated: engines
//! validate before applying.

use thiserror::Error;

use crate::models::RaffleStatus;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    // Registration / credential setup
    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Username may only contain lowercase letters, digits and _")]
    InvalidUsernameFormat,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    // Authentication
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Admin account has not been configured yet")]
    AdminNotConfigured,

    // Reservation flow
    #[error("No numbers selected")]
    NoNumbersSelected,

    #[error("Number {0} is already taken")]
    NumberAlreadyTaken(u32),

    #[error("Number {0} does not exist in this raffle")]
    NumberOutOfRange(u32),

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Phone must contain at least 10 digits")]
    PhoneTooShort,

    // Lifecycle
    #[error("Raffle is not active")]
    RaffleNotActive,

    #[error("Raffle in status {0} cannot make this transition")]
    InvalidTransition(RaffleStatus),

    // Draw
    #[error("At least {required} paid numbers are needed to draw, found {eligible}")]
    InsufficientEligibleNumbers { required: usize, eligible: usize },
}
