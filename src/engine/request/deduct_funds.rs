use crate::engine::{
    error::{LedgerError, OpError},
    request::{valid_amount, OpRecord, OpType},
    wallet::UserId,
    Decimal,
};

/// A validated deduction request.
///
/// Debits the user's wallet, decreasing balance and increasing total spent.
/// Whether the wallet actually holds enough balance is checked by the
/// engine at execution time, not here.
#[derive(Debug, Clone)]
pub struct DeductFunds {
    user_id: UserId,
    amount: Decimal,
    reason: String,
    reference_id: Option<String>,
}

impl DeductFunds {
    /// Build a deduction request, validating the amount up front.
    pub fn new(
        user_id: UserId,
        amount: Decimal,
        reason: impl Into<String>,
        reference_id: Option<String>,
    ) -> Result<Self, LedgerError> {
        if !valid_amount(amount) {
            return Err(LedgerError::InvalidAmount { amount });
        }
        Ok(Self {
            user_id,
            amount,
            reason: reason.into(),
            reference_id,
        })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }
}

impl TryFrom<OpRecord> for DeductFunds {
    type Error = OpError;

    fn try_from(record: OpRecord) -> Result<Self, Self::Error> {
        match record {
            OpRecord {
                op: OpType::Deduct,
                user,
                to_user: None,
                amount: Some(amount),
                note: Some(note),
                reference,
            } if valid_amount(amount) => Ok(DeductFunds {
                user_id: user,
                amount,
                reason: note,
                reference_id: reference,
            }),
            record => Err(OpError::InvalidOp(record)),
        }
    }
}
