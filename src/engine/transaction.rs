use super::wallet::{UserId, WalletId};
use super::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TransactionId = Uuid;

/// The kind of balance change an entry records.
/// A peer-to-peer transfer produces a `TransferOut`/`TransferIn` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
    TransferOut,
    TransferIn,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Credit => write!(f, "credit"),
            TransactionKind::Debit => write!(f, "debit"),
            TransactionKind::TransferOut => write!(f, "transfer_out"),
            TransactionKind::TransferIn => write!(f, "transfer_in"),
        }
    }
}

/// Entry status. Entries are only persisted once fully applied, so every
/// committed entry carries `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Immutable record of a single balance change.
///
/// The amount is signed: positive for credits, negative for debits. Once
/// committed an entry is never mutated or deleted; the append-only history
/// is the audit trail. `seq` is assigned by the store at commit time and
/// makes history ordering deterministic for entries sharing a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    wallet_id: WalletId,
    user_id: UserId,
    amount: Decimal,
    kind: TransactionKind,
    description: String,
    recipient_id: Option<UserId>,
    reference_id: Option<String>,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
    #[serde(default)]
    seq: u64,
}

impl Transaction {
    fn new(
        wallet_id: WalletId,
        user_id: UserId,
        amount: Decimal,
        kind: TransactionKind,
        description: String,
        recipient_id: Option<UserId>,
        reference_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            user_id,
            amount,
            kind,
            description,
            recipient_id,
            reference_id,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
            seq: 0,
        }
    }

    /// A credit entry: positive amount, no counterparty.
    pub(super) fn credit(
        wallet_id: WalletId,
        user_id: UserId,
        amount: Decimal,
        description: String,
        reference_id: Option<String>,
    ) -> Self {
        Self::new(
            wallet_id,
            user_id,
            amount,
            TransactionKind::Credit,
            description,
            None,
            reference_id,
        )
    }

    /// A debit entry: the amount is stored negated.
    pub(super) fn debit(
        wallet_id: WalletId,
        user_id: UserId,
        amount: Decimal,
        description: String,
        reference_id: Option<String>,
    ) -> Self {
        Self::new(
            wallet_id,
            user_id,
            -amount,
            TransactionKind::Debit,
            description,
            None,
            reference_id,
        )
    }

    /// The sender-side half of a transfer: negated amount, recipient as counterparty.
    pub(super) fn transfer_out(
        wallet_id: WalletId,
        user_id: UserId,
        amount: Decimal,
        recipient_id: UserId,
        description: String,
        reference_id: Option<String>,
    ) -> Self {
        Self::new(
            wallet_id,
            user_id,
            -amount,
            TransactionKind::TransferOut,
            description,
            Some(recipient_id),
            reference_id,
        )
    }

    /// The recipient-side half of a transfer: positive amount, sender as counterparty.
    pub(super) fn transfer_in(
        wallet_id: WalletId,
        user_id: UserId,
        amount: Decimal,
        sender_id: UserId,
        description: String,
        reference_id: Option<String>,
    ) -> Self {
        Self::new(
            wallet_id,
            user_id,
            amount,
            TransactionKind::TransferIn,
            description,
            Some(sender_id),
            reference_id,
        )
    }

    pub(super) fn assign_seq(&mut self, seq: u64) {
        self.seq = seq;
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the signed amount (positive = credit, negative = debit)
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the counterparty user for transfer entries
    pub fn recipient_id(&self) -> Option<UserId> {
        self.recipient_id
    }

    /// Returns the caller-supplied correlation token, if any
    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the store-assigned commit sequence number
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.recipient_id {
            Some(counterparty) => write!(
                f,
                "[{}] user={} counterparty={} amount={}",
                self.kind, self.user_id, counterparty, self.amount
            ),
            None => write!(
                f,
                "[{}] user={} amount={}",
                self.kind, self.user_id, self.amount
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_entry_is_positive() {
        let entry = Transaction::credit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            dec!(25.50),
            "Funds added: topup".to_string(),
            None,
        );
        assert_eq!(entry.amount(), dec!(25.50));
        assert_eq!(entry.kind(), TransactionKind::Credit);
        assert_eq!(entry.status(), TransactionStatus::Completed);
        assert!(entry.recipient_id().is_none());
    }

    #[test]
    fn test_debit_entry_is_negated() {
        let entry = Transaction::debit(
            Uuid::new_v4(),
            Uuid::new_v4(),
            dec!(10),
            "Funds deducted: purchase".to_string(),
            None,
        );
        assert_eq!(entry.amount(), dec!(-10));
        assert_eq!(entry.kind(), TransactionKind::Debit);
    }

    #[test]
    fn test_transfer_pair_signs_and_counterparties() {
        let sender = Uuid::new_v4();
        let recipient = Uuid::new_v4();
        let out = Transaction::transfer_out(
            Uuid::new_v4(),
            sender,
            dec!(50),
            recipient,
            "Transfer to user".to_string(),
            Some("ref-1".to_string()),
        );
        let inn = Transaction::transfer_in(
            Uuid::new_v4(),
            recipient,
            dec!(50),
            sender,
            "Transfer from user".to_string(),
            Some("ref-1".to_string()),
        );

        assert_eq!(out.amount(), dec!(-50));
        assert_eq!(inn.amount(), dec!(50));
        assert_eq!(out.recipient_id(), Some(recipient));
        assert_eq!(inn.recipient_id(), Some(sender));
        assert_eq!(out.reference_id(), inn.reference_id());
    }

    #[test]
    fn test_kind_display_matches_wire_names() {
        assert_eq!(TransactionKind::Credit.to_string(), "credit");
        assert_eq!(TransactionKind::TransferOut.to_string(), "transfer_out");
        assert_eq!(TransactionKind::TransferIn.to_string(), "transfer_in");
    }
}
