use super::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

pub type UserId = Uuid;
pub type WalletId = Uuid;

/// Serialize Decimal with exactly 2 decimal places
fn serialize_decimal_2dp<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

/// Per-user balance record with cumulative earned/spent counters.
///
/// One wallet per user, created lazily on first access and never deleted.
/// The `version` stamp is internal to the optimistic-concurrency protocol:
/// it is captured at read time and checked by the store at commit time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wallet {
    id: WalletId,
    user_id: UserId,
    #[serde(serialize_with = "serialize_decimal_2dp")]
    balance: Decimal,
    #[serde(serialize_with = "serialize_decimal_2dp")]
    total_earned: Decimal,
    #[serde(serialize_with = "serialize_decimal_2dp")]
    total_spent: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    version: u64,
}

impl Wallet {
    pub(super) fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance: Decimal::ZERO,
            total_earned: Decimal::ZERO,
            total_spent: Decimal::ZERO,
            is_active: true,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Returns the wallet ID
    pub fn id(&self) -> WalletId {
        self.id
    }

    /// Returns the owning user ID
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns the cumulative total credited
    pub fn total_earned(&self) -> Decimal {
        self.total_earned
    }

    /// Returns the cumulative total debited
    pub fn total_spent(&self) -> Decimal {
        self.total_spent
    }

    /// Returns whether the wallet accepts mutations
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the version stamp observed when this wallet was read
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Credit the wallet.
    /// Increases both balance and total earned.
    pub(super) fn credit(&mut self, amount: Decimal) {
        debug_assert!(amount > Decimal::ZERO, "credit with non-positive amount");
        self.balance += amount;
        self.total_earned += amount;
        #[cfg(debug_assertions)]
        self.assert_invariant();
    }

    /// Debit the wallet.
    /// Caller must ensure sufficient balance and an active wallet.
    pub(super) fn debit(&mut self, amount: Decimal) {
        debug_assert!(amount > Decimal::ZERO, "debit with non-positive amount");
        debug_assert!(self.balance >= amount, "debit would overdraw the wallet");
        self.balance -= amount;
        self.total_spent += amount;
        #[cfg(debug_assertions)]
        self.assert_invariant();
    }

    /// Soft-disable the wallet. The row stays, further mutations are refused.
    pub(super) fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Stamp the wallet as committed: bump the version and refresh `updated_at`.
    /// Called by the store when a commit is applied.
    pub(super) fn mark_committed(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Assert the fundamental accounting invariants:
    /// balance = total_earned - total_spent
    /// balance >= 0
    #[cfg(debug_assertions)]
    fn assert_invariant(&self) {
        debug_assert_eq!(
            self.balance,
            self.total_earned - self.total_spent,
            "Invariant violated: balance ({}) != total_earned ({}) - total_spent ({})",
            self.balance,
            self.total_earned,
            self.total_spent
        );
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance ({}) is negative",
            self.balance
        );
    }
}

/// Read-only balance view returned by `LedgerEngine::get_balance`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Balance {
    pub user_id: UserId,
    pub balance: Decimal,
    pub total_earned: Decimal,
    pub total_spent: Decimal,
}

impl From<&Wallet> for Balance {
    fn from(wallet: &Wallet) -> Self {
        Self {
            user_id: wallet.user_id(),
            balance: wallet.balance(),
            total_earned: wallet.total_earned(),
            total_spent: wallet.total_spent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_wallet_has_zero_balances() {
        let user = Uuid::new_v4();
        let wallet = Wallet::new(user);
        assert_eq!(wallet.user_id(), user);
        assert_eq!(wallet.balance(), Decimal::ZERO);
        assert_eq!(wallet.total_earned(), Decimal::ZERO);
        assert_eq!(wallet.total_spent(), Decimal::ZERO);
        assert!(wallet.is_active());
        assert_eq!(wallet.version(), 0);
    }

    #[test]
    fn test_credit_increases_balance_and_total_earned() {
        let mut wallet = Wallet::new(Uuid::new_v4());
        wallet.credit(dec!(100.50));

        assert_eq!(wallet.balance(), dec!(100.50));
        assert_eq!(wallet.total_earned(), dec!(100.50));
        assert_eq!(wallet.total_spent(), Decimal::ZERO);
    }

    #[test]
    fn test_debit_decreases_balance_and_increases_total_spent() {
        let mut wallet = Wallet::new(Uuid::new_v4());
        wallet.credit(dec!(100));
        wallet.debit(dec!(40));

        assert_eq!(wallet.balance(), dec!(60));
        assert_eq!(wallet.total_earned(), dec!(100));
        assert_eq!(wallet.total_spent(), dec!(40));
    }

    #[test]
    fn test_balance_identity_holds_across_mutations() {
        let mut wallet = Wallet::new(Uuid::new_v4());
        wallet.credit(dec!(75.25));
        wallet.debit(dec!(20.25));
        wallet.credit(dec!(5));

        assert_eq!(wallet.balance(), wallet.total_earned() - wallet.total_spent());
    }

    #[test]
    fn test_mark_committed_bumps_version() {
        let mut wallet = Wallet::new(Uuid::new_v4());
        let before = wallet.version();
        wallet.mark_committed();
        assert_eq!(wallet.version(), before + 1);
    }

    #[test]
    fn test_deactivate_soft_disables() {
        let mut wallet = Wallet::new(Uuid::new_v4());
        wallet.deactivate();
        assert!(!wallet.is_active());
    }

    #[test]
    fn test_balance_view_mirrors_wallet() {
        let mut wallet = Wallet::new(Uuid::new_v4());
        wallet.credit(dec!(10));
        let balance = Balance::from(&wallet);
        assert_eq!(balance.user_id, wallet.user_id());
        assert_eq!(balance.balance, dec!(10));
        assert_eq!(balance.total_earned, dec!(10));
        assert_eq!(balance.total_spent, Decimal::ZERO);
    }
}
