//! Ledger engine module.
//!
//! This module contains the core balance-mutation logic including:
//! - `LedgerEngine` - The main mutation processor
//! - `Wallet` - Per-user balance state with cumulative counters
//! - `Transaction` - Immutable history entries (credit, debit, transfer pair)
//! - Request types - `AddFunds`, `DeductFunds`, `Transfer`
//! - `LedgerStore` - The durable persistence seam (plus `MemoryStore`)
//! - `Error` types - Validation, conflict, and storage errors

mod error;
mod ledger_engine;
mod request;
mod store;
mod transaction;
mod wallet;

pub(crate) use rust_decimal::Decimal;

pub use error::{Error, LedgerError, OpError, StoreError};
pub use ledger_engine::{LedgerEngine, TransactionResult};
pub use request::{AddFunds, DeductFunds, Op, OpRecord, OpType, Transfer};
pub use store::{CommitReceipt, LedgerStore, MemoryStore, WriteBatch};
pub use transaction::{Transaction, TransactionId, TransactionKind, TransactionStatus};
pub use wallet::{Balance, UserId, Wallet, WalletId};
