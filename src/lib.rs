//! Happy Paisa ledger engine.
//!
//! Tracks a virtual currency balance per user with deposits, deductions and
//! peer-to-peer transfers over a durable, append-only transaction history.
//! Every mutation commits its history entries and wallet rewrites as one
//! atomic, version-checked unit against the injected [`LedgerStore`].
//!
//! ## Example
//!
//! ```
//! use paisa_ledger::{AddFunds, LedgerEngine, MemoryStore};
//! use rust_decimal::Decimal;
//! use uuid::Uuid;
//!
//! let engine = LedgerEngine::new(MemoryStore::new());
//! let user = Uuid::new_v4();
//!
//! let request = AddFunds::new(user, Decimal::new(10000, 2), "signup bonus", None).unwrap();
//! let result = engine.add_funds(request).unwrap();
//! assert!(result.success);
//!
//! let balance = engine.get_balance(user).unwrap();
//! assert_eq!(balance.balance, Decimal::new(10000, 2));
//! ```

mod engine;

pub use engine::{
    AddFunds, Balance, CommitReceipt, DeductFunds, Error, LedgerEngine, LedgerError, LedgerStore,
    MemoryStore, Op, OpError, OpRecord, OpType, StoreError, Transaction, TransactionId,
    TransactionKind, TransactionResult, TransactionStatus, Transfer, UserId, Wallet, WalletId,
    WriteBatch,
};
