mod memory;

pub use memory::MemoryStore;

use super::error::StoreError;
use super::transaction::Transaction;
use super::wallet::{UserId, Wallet};

/// All writes of one ledger mutation: appended history entries plus
/// rewritten wallet rows. A store applies the whole batch or none of it.
///
/// Each wallet carries the version stamp observed when it was read; the
/// store rejects the entire batch with `StoreError::VersionConflict` if any
/// stamp no longer matches, which is what protects the read-balance /
/// compute / write-balance sequence from lost updates.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    entries: Vec<Transaction>,
    updates: Vec<Wallet>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immutable history entry for append.
    pub fn append_entry(&mut self, entry: Transaction) {
        self.entries.push(entry);
    }

    /// Queue a wallet row rewrite, conditioned on the wallet's version.
    /// Updates are kept sorted by wallet id so a row-locking store acquires
    /// locks in a fixed order regardless of transfer direction.
    pub fn update_wallet(&mut self, wallet: Wallet) {
        let at = self
            .updates
            .partition_point(|queued| queued.id() <= wallet.id());
        self.updates.insert(at, wallet);
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn updates(&self) -> &[Wallet] {
        &self.updates
    }

    pub(super) fn into_parts(self) -> (Vec<Transaction>, Vec<Wallet>) {
        (self.entries, self.updates)
    }
}

/// Receipt for a committed batch: the entries as persisted, with their
/// store-assigned sequence numbers.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    entries: Vec<Transaction>,
}

impl CommitReceipt {
    pub(super) fn new(entries: Vec<Transaction>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub(super) fn into_entries(self) -> Vec<Transaction> {
        self.entries
    }
}

/// Durable persistence behind the engine.
///
/// The engine owns all business rules; a store only guarantees the user-id
/// uniqueness constraint on wallets, version-checked all-or-nothing commits,
/// and `(created_at, seq)` descending history reads.
pub trait LedgerStore: Send + Sync {
    /// Look up the wallet owned by `user_id`, active or not.
    fn fetch_wallet(&self, user_id: UserId) -> Result<Option<Wallet>, StoreError>;

    /// Insert a freshly created wallet. Fails with
    /// `StoreError::DuplicateWallet` if the user already owns one.
    fn insert_wallet(&self, wallet: Wallet) -> Result<Wallet, StoreError>;

    /// Apply a batch atomically: every entry appended and every wallet
    /// rewritten, or nothing at all.
    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError>;

    /// History entries for `user_id`, newest first, at most `limit`.
    fn transactions_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// All wallets, ordered by creation time.
    fn wallets(&self) -> Result<Vec<Wallet>, StoreError>;
}
