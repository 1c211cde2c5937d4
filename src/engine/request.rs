mod add_funds;
mod deduct_funds;
mod transfer;

pub use add_funds::AddFunds;
pub use deduct_funds::DeductFunds;
pub use transfer::Transfer;

use super::wallet::UserId;
use super::Decimal;
use crate::engine::error::OpError;
use serde::Deserialize;

/// Money amounts must be positive and carry at most 2 decimal places.
/// Checked before any store access.
pub(super) fn valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount.scale() <= 2
}

/// Raw ledger operation as parsed from CSV input.
/// This is the unvalidated form that needs conversion to a specific request type.
#[derive(Debug, Deserialize, Clone)]
pub struct OpRecord {
    pub op: OpType,
    pub user: UserId,
    /// Recipient: required for Transfer, must be empty otherwise
    pub to_user: Option<UserId>,
    /// Amount: required for every operation
    pub amount: Option<Decimal>,
    /// Source (Add), reason (Deduct) or description (Transfer)
    pub note: Option<String>,
    /// Optional idempotency/correlation token
    pub reference: Option<String>,
}

impl std::fmt::Display for OpRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.to_user, self.amount) {
            (Some(to), Some(amount)) => write!(
                f,
                "{} (user: {}, to: {}, amount: {})",
                self.op, self.user, to, amount
            ),
            (None, Some(amount)) => {
                write!(f, "{} (user: {}, amount: {})", self.op, self.user, amount)
            }
            _ => write!(f, "{} (user: {})", self.op, self.user),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Add,
    Deduct,
    Transfer,
}

impl std::fmt::Display for OpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpType::Add => write!(f, "add"),
            OpType::Deduct => write!(f, "deduct"),
            OpType::Transfer => write!(f, "transfer"),
        }
    }
}

/// A validated ledger operation ready for processing by the engine.
#[derive(Debug, Clone)]
pub enum Op {
    Add(AddFunds),
    Deduct(DeductFunds),
    Transfer(Transfer),
}

impl TryFrom<OpRecord> for Op {
    type Error = OpError;

    fn try_from(record: OpRecord) -> Result<Self, Self::Error> {
        match record.op {
            OpType::Add => Ok(Op::Add(AddFunds::try_from(record)?)),
            OpType::Deduct => Ok(Op::Deduct(DeductFunds::try_from(record)?)),
            OpType::Transfer => Ok(Op::Transfer(Transfer::try_from(record)?)),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Add(a) => write!(f, "[add] user={} amount={}", a.user_id(), a.amount()),
            Op::Deduct(d) => write!(f, "[deduct] user={} amount={}", d.user_id(), d.amount()),
            Op::Transfer(t) => write!(
                f,
                "[transfer] from={} to={} amount={}",
                t.from_user(),
                t.to_user(),
                t.amount()
            ),
        }
    }
}
