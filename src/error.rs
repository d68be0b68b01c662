//! Error types for the bounty board

use thiserror::Error;

use crate::types::Amount;

/// Every failure an operation can surface. All failures are all-or-nothing:
/// an `Err` means no state was mutated and no funds moved.
#[derive(Error, Debug)]
pub enum Error {
    #[error("already registered: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parallel arrays differ in length")]
    LengthMismatch,

    #[error("batch of {0} entries exceeds the 256-entry cap")]
    LengthExceeded(usize),

    #[error("invalid token configuration: {0}")]
    InvalidTokenConfig(String),

    #[error("applicant already has an unreviewed application for this issue")]
    DuplicateApplication,

    #[error("open bounty does not take assignment review")]
    OpenBountyNotAssignable,

    #[error("bounty already fulfilled")]
    AlreadyFulfilled,

    #[error("bounty already removed")]
    AlreadyRemoved,

    #[error("invalid bounty allocator")]
    InvalidAllocator,

    #[error("attached deposit {got} does not match native bounty total {expected}")]
    DepositMismatch { expected: Amount, got: Amount },

    #[error("vault: {0}")]
    Vault(String),

    #[error("escrow: {0}")]
    Escrow(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn vault(message: impl Into<String>) -> Self {
        Self::Vault(message.into())
    }

    pub fn escrow(message: impl Into<String>) -> Self {
        Self::Escrow(message.into())
    }
}
