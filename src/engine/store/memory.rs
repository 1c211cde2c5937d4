use std::collections::HashMap;
use std::sync::Mutex;

use crate::engine::error::StoreError;
use crate::engine::store::{CommitReceipt, LedgerStore, WriteBatch};
use crate::engine::transaction::Transaction;
use crate::engine::wallet::{UserId, Wallet, WalletId};

/// In-memory `LedgerStore` backed by a mutex.
///
/// The single lock makes every commit naturally atomic and isolated; version
/// checks are still enforced so the store exercises the same optimistic
/// protocol a relational backend would. Used by the CLI, the demo, and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    wallets: HashMap<WalletId, Wallet>,
    by_user: HashMap<UserId, WalletId>,
    log: Vec<Transaction>,
    next_seq: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        log::trace!("MemoryStore initialized");
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store mutex poisoned".to_string()))
    }

    /// Soft-disable a user's wallet. Subsequent mutations through the engine
    /// are refused with `WalletInactive`; the row and its history remain.
    pub fn deactivate(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let wallet_id = inner
            .by_user
            .get(&user_id)
            .copied()
            .ok_or(StoreError::WalletNotFound { wallet: user_id })?;
        let wallet = inner
            .wallets
            .get_mut(&wallet_id)
            .ok_or(StoreError::WalletNotFound { wallet: wallet_id })?;
        wallet.deactivate();
        wallet.mark_committed();
        Ok(())
    }

    /// Total number of history entries across all wallets.
    pub fn entry_count(&self) -> usize {
        self.lock().map(|inner| inner.log.len()).unwrap_or(0)
    }
}

impl LedgerStore for MemoryStore {
    fn fetch_wallet(&self, user_id: UserId) -> Result<Option<Wallet>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .by_user
            .get(&user_id)
            .and_then(|wallet_id| inner.wallets.get(wallet_id))
            .cloned())
    }

    fn insert_wallet(&self, wallet: Wallet) -> Result<Wallet, StoreError> {
        let mut inner = self.lock()?;
        if inner.by_user.contains_key(&wallet.user_id()) {
            return Err(StoreError::DuplicateWallet {
                user: wallet.user_id(),
            });
        }
        inner.by_user.insert(wallet.user_id(), wallet.id());
        inner.wallets.insert(wallet.id(), wallet.clone());
        Ok(wallet)
    }

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        let mut inner = self.lock()?;
        let (mut entries, updates) = batch.into_parts();

        // Validate every version stamp before applying anything.
        for update in &updates {
            let stored = inner
                .wallets
                .get(&update.id())
                .ok_or(StoreError::WalletNotFound {
                    wallet: update.id(),
                })?;
            if stored.version() != update.version() {
                return Err(StoreError::VersionConflict {
                    wallet: update.id(),
                });
            }
        }

        for entry in &mut entries {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            entry.assign_seq(seq);
            inner.log.push(entry.clone());
        }
        for mut update in updates {
            update.mark_committed();
            inner.wallets.insert(update.id(), update);
        }

        Ok(CommitReceipt::new(entries))
    }

    fn transactions_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.lock()?;
        let mut entries: Vec<Transaction> = inner
            .log
            .iter()
            .filter(|entry| entry.user_id() == user_id)
            .cloned()
            .collect();
        // Newest first; seq breaks timestamp ties deterministically.
        entries.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.seq().cmp(&a.seq()))
        });
        entries.truncate(limit);
        Ok(entries)
    }

    fn wallets(&self) -> Result<Vec<Wallet>, StoreError> {
        let inner = self.lock()?;
        let mut wallets: Vec<Wallet> = inner.wallets.values().cloned().collect();
        wallets.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then(a.id().cmp(&b.id()))
        });
        Ok(wallets)
    }
}
