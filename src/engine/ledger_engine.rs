use std::io::{Read, Write};

use serde::Serialize;

use super::error::{Error, LedgerError, StoreError};
use super::request::{AddFunds, DeductFunds, Op, OpRecord, Transfer};
use super::store::{CommitReceipt, LedgerStore, WriteBatch};
use super::transaction::{Transaction, TransactionId, TransactionKind};
use super::wallet::{Balance, UserId, Wallet};
use super::Decimal;

/// Internal retry bound for wallet-creation races and optimistic version
/// conflicts. Anything beyond this surfaces as `CreateRace` / `Conflict`
/// and is left to the caller.
const MAX_RETRIES: u32 = 5;

/// Default and maximum page size for history listing.
const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = 100;

/// Outcome of a mutation operation.
///
/// `success == false` is a business rejection (currently only an
/// insufficient balance), not a system fault: no entry was written and no
/// balance changed. System faults come back as `LedgerError` instead.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
}

impl TransactionResult {
    fn completed(message: &str, balance: Decimal, entry: Transaction) -> Self {
        Self {
            success: true,
            transaction_id: Some(entry.id()),
            message: message.to_string(),
            balance: Some(balance),
            transaction: Some(entry),
        }
    }

    fn insufficient_balance(balance: Decimal) -> Self {
        Self {
            success: false,
            transaction_id: None,
            message: "Insufficient balance".to_string(),
            balance: Some(balance),
            transaction: None,
        }
    }
}

/// The core ledger engine.
///
/// Owns all balance-mutation rules for Happy Paisa wallets: deposits,
/// deductions, peer-to-peer transfers, and history reads. Holds no in-memory
/// state of its own; every operation reads wallets from the injected store,
/// computes the new state, and commits the history entries together with the
/// wallet rewrites as one atomic, version-checked batch. Conflicting
/// concurrent mutations are retried from the read, a bounded number of times.
#[derive(Debug)]
pub struct LedgerEngine<S> {
    store: S,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Create a `LedgerEngine` on top of a long-lived store handle.
    pub fn new(store: S) -> Self {
        log::trace!("LedgerEngine initialized");
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up the wallet for `user_id`, creating it with zero balances on
    /// first access. Safe to call concurrently for the same user: the store's
    /// uniqueness constraint makes racing creators converge on one row, the
    /// loser re-fetching the winner's wallet.
    pub fn get_or_create_wallet(&self, user_id: UserId) -> Result<Wallet, LedgerError> {
        for _ in 0..MAX_RETRIES {
            if let Some(wallet) = self.store.fetch_wallet(user_id)? {
                return Ok(wallet);
            }
            match self.store.insert_wallet(Wallet::new(user_id)) {
                Ok(wallet) => {
                    log::debug!("Created new wallet {} for user {user_id}", wallet.id());
                    return Ok(wallet);
                }
                Err(StoreError::DuplicateWallet { .. }) => {
                    log::trace!("Wallet creation race for user {user_id}, re-fetching");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::CreateRace {
            user: user_id,
            attempts: MAX_RETRIES,
        })
    }

    /// Current balance and cumulative counters for `user_id`.
    /// Read-only apart from lazy wallet creation for new users.
    pub fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        let wallet = self.get_or_create_wallet(user_id)?;
        Ok(Balance::from(&wallet))
    }

    /// Credit `amount` to the user's wallet.
    /// Appends one credit entry and bumps balance/total_earned atomically.
    pub fn add_funds(&self, request: AddFunds) -> Result<TransactionResult, LedgerError> {
        log::trace!(
            "[add_funds] user={} amount={}",
            request.user_id(),
            request.amount()
        );
        self.with_retries(request.user_id(), |wallet| {
            wallet.credit(request.amount());

            let entry = Transaction::credit(
                wallet.id(),
                request.user_id(),
                request.amount(),
                format!("Funds added: {}", request.source()),
                request.reference_id().map(str::to_string),
            );
            let mut batch = WriteBatch::new();
            batch.append_entry(entry);
            batch.update_wallet(wallet.clone());
            Ok(Mutation::Commit {
                batch,
                message: "Funds added successfully",
                balance: wallet.balance(),
                result_kind: TransactionKind::Credit,
            })
        })
    }

    /// Debit `amount` from the user's wallet.
    /// An insufficient balance is a business rejection: no entry, no change.
    pub fn deduct_funds(&self, request: DeductFunds) -> Result<TransactionResult, LedgerError> {
        log::trace!(
            "[deduct_funds] user={} amount={}",
            request.user_id(),
            request.amount()
        );
        self.with_retries(request.user_id(), |wallet| {
            if wallet.balance() < request.amount() {
                log::warn!(
                    "[deduct_funds] user={} has {}, requested {}",
                    request.user_id(),
                    wallet.balance(),
                    request.amount()
                );
                return Ok(Mutation::Rejected(TransactionResult::insufficient_balance(
                    wallet.balance(),
                )));
            }
            wallet.debit(request.amount());

            let entry = Transaction::debit(
                wallet.id(),
                request.user_id(),
                request.amount(),
                format!("Funds deducted: {}", request.reason()),
                request.reference_id().map(str::to_string),
            );
            let mut batch = WriteBatch::new();
            batch.append_entry(entry);
            batch.update_wallet(wallet.clone());
            Ok(Mutation::Commit {
                batch,
                message: "Funds deducted successfully",
                balance: wallet.balance(),
                result_kind: TransactionKind::Debit,
            })
        })
    }

    /// Move `amount` between two users.
    ///
    /// Both history entries (transfer-out and transfer-in, sharing the
    /// reference token and pointing at each other as counterparty) and both
    /// wallet rewrites commit as one batch: a transfer is never half-applied.
    pub fn transfer(&self, request: Transfer) -> Result<TransactionResult, LedgerError> {
        log::trace!(
            "[transfer] from={} to={} amount={}",
            request.from_user(),
            request.to_user(),
            request.amount()
        );
        self.with_retries(request.from_user(), |sender| {
            if sender.balance() < request.amount() {
                log::warn!(
                    "[transfer] sender {} has {}, requested {}",
                    request.from_user(),
                    sender.balance(),
                    request.amount()
                );
                return Ok(Mutation::Rejected(TransactionResult::insufficient_balance(
                    sender.balance(),
                )));
            }
            let mut recipient = self.active_wallet(request.to_user())?;

            sender.debit(request.amount());
            recipient.credit(request.amount());

            let out = Transaction::transfer_out(
                sender.id(),
                request.from_user(),
                request.amount(),
                request.to_user(),
                format!(
                    "Transfer to user {}: {}",
                    request.to_user(),
                    request.description()
                ),
                request.reference_id().map(str::to_string),
            );
            let inn = Transaction::transfer_in(
                recipient.id(),
                request.to_user(),
                request.amount(),
                request.from_user(),
                format!(
                    "Transfer from user {}: {}",
                    request.from_user(),
                    request.description()
                ),
                request.reference_id().map(str::to_string),
            );

            let mut batch = WriteBatch::new();
            batch.append_entry(out);
            batch.append_entry(inn);
            batch.update_wallet(sender.clone());
            batch.update_wallet(recipient);
            Ok(Mutation::Commit {
                batch,
                message: "Transfer completed successfully",
                balance: sender.balance(),
                result_kind: TransactionKind::TransferOut,
            })
        })
    }

    /// History entries for `user_id`, newest first. `limit` values outside
    /// `(0, 100]` (or absent) normalize to the default of 50.
    pub fn list_transactions(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let limit = normalize_limit(limit);
        Ok(self.store.transactions_for_user(user_id, limit)?)
    }

    /// Returns the number of wallets in the store
    pub fn wallet_count(&self) -> Result<usize, LedgerError> {
        Ok(self.store.wallets()?.len())
    }

    /// Resolve the wallet a mutation targets, refusing deactivated ones.
    fn active_wallet(&self, user_id: UserId) -> Result<Wallet, LedgerError> {
        let wallet = self.get_or_create_wallet(user_id)?;
        if !wallet.is_active() {
            return Err(LedgerError::WalletInactive { user: user_id });
        }
        Ok(wallet)
    }

    /// Optimistic-concurrency driver shared by all mutations: read the
    /// primary wallet, let `build` stage the batch against that snapshot,
    /// commit, and on a version conflict retry the whole operation from the
    /// read. Bounded; exhaustion surfaces as `Conflict`.
    fn with_retries<F>(&self, user_id: UserId, mut build: F) -> Result<TransactionResult, LedgerError>
    where
        F: FnMut(&mut Wallet) -> Result<Mutation, LedgerError>,
    {
        let mut last_wallet = None;
        for attempt in 1..=MAX_RETRIES {
            let mut wallet = self.active_wallet(user_id)?;
            last_wallet = Some(wallet.id());
            let (batch, message, balance, result_kind) = match build(&mut wallet)? {
                Mutation::Rejected(result) => return Ok(result),
                Mutation::Commit {
                    batch,
                    message,
                    balance,
                    result_kind,
                } => (batch, message, balance, result_kind),
            };

            match self.store.commit(batch) {
                Ok(receipt) => {
                    let entry = primary_entry(receipt, result_kind)?;
                    log::trace!(
                        "[commit] user={user_id} entry={} -> new_balance={balance}",
                        entry.id()
                    );
                    return Ok(TransactionResult::completed(message, balance, entry));
                }
                Err(StoreError::VersionConflict { wallet }) => {
                    log::trace!(
                        "[commit] version conflict on wallet {wallet} (attempt {attempt}), retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::Conflict {
            // A wallet was fetched on every attempt, so the id is known here.
            wallet: last_wallet.unwrap_or_default(),
            attempts: MAX_RETRIES,
        })
    }
}

/// What a mutation closure decided against the wallet snapshot.
enum Mutation {
    /// Business rejection: return as-is, nothing to write.
    Rejected(TransactionResult),
    /// Stage these writes; the entry of `result_kind` names the mutation in
    /// the returned `TransactionResult`.
    Commit {
        batch: WriteBatch,
        message: &'static str,
        balance: Decimal,
        result_kind: TransactionKind,
    },
}

/// Pull the entry that names the mutation out of a commit receipt.
fn primary_entry(
    receipt: CommitReceipt,
    kind: TransactionKind,
) -> Result<Transaction, LedgerError> {
    receipt
        .into_entries()
        .into_iter()
        .find(|entry| entry.kind() == kind)
        .ok_or_else(|| StoreError::Backend("commit receipt missing its primary entry".to_string()).into())
}

fn normalize_limit(limit: Option<usize>) -> usize {
    match limit {
        Some(n) if n > 0 && n <= MAX_HISTORY_LIMIT => n,
        _ => DEFAULT_HISTORY_LIMIT,
    }
}

// =============================================================================
// Batch driver
// =============================================================================

impl<S: LedgerStore> LedgerEngine<S> {
    /// Primary batch API: process ledger operations from any source (File, `TcpStream`, etc.)
    /// Note that the CSV reader is buffered automatically, so you should not wrap rdr in a buffered reader like `io::BufReader`.
    pub fn process_ops<R: Read>(&self, reader: R) -> Result<(), Error> {
        log::info!("Starting ledger operation processing");

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All) // trim whitespace from fields
            .from_reader(reader);

        let mut processed = 0u64;
        let mut rejected = 0u64;

        for result in csv_reader.deserialize() {
            // Step 1: Parse CSV record into raw dirty OpRecord
            let record: OpRecord = result?;

            let row_num = processed + rejected + 1;
            log::trace!("[row {row_num}] Parsing: {record}");

            // Step 2: Convert raw dirty OpRecord into validated Op
            let op = Op::try_from(record)?;

            // Step 3: Process validated Op
            log::trace!("Processing operation: {op}");
            let outcome = match op {
                Op::Add(request) => self.add_funds(request)?,
                Op::Deduct(request) => self.deduct_funds(request)?,
                Op::Transfer(request) => self.transfer(request)?,
            };

            if outcome.success {
                processed += 1;
            } else {
                log::warn!("[row {row_num}] - Rejected: {}", outcome.message);
                rejected += 1;
            }
        }

        log::info!(
            "Processing complete: {} processed, {} rejected, {} wallets",
            processed,
            rejected,
            self.wallet_count()?
        );
        Ok(())
    }

    /// Secondary batch API: write final wallet state to any sink (Stdout, File, `TcpStream`, etc.)
    /// Note that the CSV writer is buffered automatically, so you should not wrap wtr in a buffered writer like `io::BufWriter`.
    pub fn export_wallets<W: Write>(&self, writer: W) -> Result<(), Error> {
        let wallets = self.store.wallets().map_err(LedgerError::Storage)?;
        log::info!("Exporting {} wallets", wallets.len());

        let mut csv_writer = csv::Writer::from_writer(writer);
        for wallet in wallets {
            csv_writer.serialize(wallet)?;
        }
        csv_writer.flush()?;

        log::trace!("Export complete");
        Ok(())
    }
}
