//! Shared utilities and common types for the raffle platform backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT session tokens for organizer and admin roles
//! - Raffle-code generation and CSPRNG sampling
//! - Currency formatting for display strings
//! - Common validation logic

pub mod codes;
pub mod money;
pub mod password;
pub mod token;
pub mod validation;
