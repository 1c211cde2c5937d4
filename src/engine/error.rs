use crate::engine::request::OpRecord;
use crate::engine::wallet::{UserId, WalletId};
use crate::engine::Decimal;

/// Top-level error type for the batch-processing path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Operation error: {0}")]
    Op(#[from] OpError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Errors during `OpRecord` -> validated request conversion (hard errors).
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("Invalid operation: {0}")]
    InvalidOp(OpRecord),
}

/// Failures surfaced by ledger operations.
///
/// An insufficient balance is NOT represented here: it is an expected
/// business outcome and comes back as a structured `TransactionResult`
/// with `success == false`, never as an error.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid amount {amount}: must be positive with at most 2 decimal places")]
    InvalidAmount { amount: Decimal },

    #[error("Invalid transfer: sender and recipient are both user {user}")]
    SelfTransfer { user: UserId },

    #[error("Wallet for user {user} is deactivated")]
    WalletInactive { user: UserId },

    #[error("Wallet creation for user {user} still racing after {attempts} attempts")]
    CreateRace { user: UserId, attempts: u32 },

    #[error("Mutation on wallet {wallet} conflicted after {attempts} attempts")]
    Conflict { wallet: WalletId, attempts: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Errors surfaced by a `LedgerStore`.
///
/// `DuplicateWallet` and `VersionConflict` are races the engine retries
/// internally; `Backend` is a transient persistence failure the caller may
/// retry once the atomic-unit guarantee has rolled back any partial writes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Wallet for user {user} already exists")]
    DuplicateWallet { user: UserId },

    #[error("Version conflict on wallet {wallet}")]
    VersionConflict { wallet: WalletId },

    #[error("Wallet {wallet} not found")]
    WalletNotFound { wallet: WalletId },

    #[error("Storage backend failure: {0}")]
    Backend(String),
}
