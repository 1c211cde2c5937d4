use crate::engine::{
    error::{LedgerError, OpError},
    request::{valid_amount, OpRecord, OpType},
    wallet::UserId,
    Decimal,
};

/// A validated deposit request.
///
/// Credits the user's wallet, increasing balance and total earned.
#[derive(Debug, Clone)]
pub struct AddFunds {
    user_id: UserId,
    amount: Decimal,
    source: String,
    reference_id: Option<String>,
}

impl AddFunds {
    /// Build a deposit request, validating the amount up front.
    pub fn new(
        user_id: UserId,
        amount: Decimal,
        source: impl Into<String>,
        reference_id: Option<String>,
    ) -> Result<Self, LedgerError> {
        if !valid_amount(amount) {
            return Err(LedgerError::InvalidAmount { amount });
        }
        Ok(Self {
            user_id,
            amount,
            source: source.into(),
            reference_id,
        })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }
}

impl TryFrom<OpRecord> for AddFunds {
    type Error = OpError;

    fn try_from(record: OpRecord) -> Result<Self, Self::Error> {
        match record {
            OpRecord {
                op: OpType::Add,
                user,
                to_user: None,
                amount: Some(amount),
                note: Some(note),
                reference,
            } if valid_amount(amount) => Ok(AddFunds {
                user_id: user,
                amount,
                source: note,
                reference_id: reference,
            }),
            record => Err(OpError::InvalidOp(record)),
        }
    }
}
