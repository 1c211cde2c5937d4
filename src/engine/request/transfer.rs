use crate::engine::{
    error::{LedgerError, OpError},
    request::{valid_amount, OpRecord, OpType},
    wallet::UserId,
    Decimal,
};

/// A validated peer-to-peer transfer request.
///
/// Self-transfers are rejected at construction, so the engine only ever
/// sees requests with two distinct wallets.
#[derive(Debug, Clone)]
pub struct Transfer {
    from_user: UserId,
    to_user: UserId,
    amount: Decimal,
    description: String,
    reference_id: Option<String>,
}

impl Transfer {
    /// Build a transfer request, validating amount and counterparties up front.
    pub fn new(
        from_user: UserId,
        to_user: UserId,
        amount: Decimal,
        description: impl Into<String>,
        reference_id: Option<String>,
    ) -> Result<Self, LedgerError> {
        if !valid_amount(amount) {
            return Err(LedgerError::InvalidAmount { amount });
        }
        if from_user == to_user {
            return Err(LedgerError::SelfTransfer { user: from_user });
        }
        Ok(Self {
            from_user,
            to_user,
            amount,
            description: description.into(),
            reference_id,
        })
    }

    pub fn from_user(&self) -> UserId {
        self.from_user
    }

    pub fn to_user(&self) -> UserId {
        self.to_user
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }
}

impl TryFrom<OpRecord> for Transfer {
    type Error = OpError;

    fn try_from(record: OpRecord) -> Result<Self, Self::Error> {
        match record {
            OpRecord {
                op: OpType::Transfer,
                user,
                to_user: Some(to_user),
                amount: Some(amount),
                note,
                reference,
            } if valid_amount(amount) && user != to_user => Ok(Transfer {
                from_user: user,
                to_user,
                amount,
                description: note.unwrap_or_default(),
                reference_id: reference,
            }),
            record => Err(OpError::InvalidOp(record)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn make_record(user: UserId, to_user: Option<UserId>, amount: Option<Decimal>) -> OpRecord {
        OpRecord {
            op: OpType::Transfer,
            user,
            to_user,
            amount,
            note: Some("gift".to_string()),
            reference: Some("xfer-7".to_string()),
        }
    }

    #[test]
    fn test_valid_transfer_converts() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let request = Transfer::try_from(make_record(from, Some(to), Some(dec!(50)))).unwrap();
        assert_eq!(request.from_user(), from);
        assert_eq!(request.to_user(), to);
        assert_eq!(request.amount(), dec!(50));
        assert_eq!(request.description(), "gift");
    }

    #[test]
    fn test_missing_recipient_is_rejected() {
        let record = make_record(Uuid::new_v4(), None, Some(dec!(50)));
        assert!(Transfer::try_from(record).is_err());
    }

    #[test]
    fn test_self_transfer_is_rejected() {
        let user = Uuid::new_v4();
        let record = make_record(user, Some(user), Some(dec!(50)));
        assert!(Transfer::try_from(record).is_err());
    }

    #[test]
    fn test_self_transfer_rejected_by_constructor() {
        let user = Uuid::new_v4();
        assert!(matches!(
            Transfer::new(user, user, dec!(10), "gift", None),
            Err(LedgerError::SelfTransfer { .. })
        ));
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let record = make_record(Uuid::new_v4(), Some(Uuid::new_v4()), Some(dec!(0)));
        assert!(Transfer::try_from(record).is_err());
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let mut record = make_record(Uuid::new_v4(), Some(Uuid::new_v4()), Some(dec!(5)));
        record.note = None;
        let request = Transfer::try_from(record).unwrap();
        assert_eq!(request.description(), "");
    }
}
