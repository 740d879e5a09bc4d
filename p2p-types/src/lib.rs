//! # P2P Exchange Types
//!
//! Domain types and port traits for the peer-to-peer currency exchange service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, Wallet, ConversionQuote, User, RateTable)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Conversion, ConversionQuote, CurrencyCode, LEDGER_SCALE, NewUser, RateTable,
    SERVICE_FEE_RATE, User, UserId, UserStatus, Wallet, WalletLookup,
};
pub use dto::*;
pub use error::{AppError, DomainError, RateError, RepoError};
pub use ports::{ExchangeRepository, RateProvider};
