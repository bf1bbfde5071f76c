use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a payment by the store when it is first saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub u64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PaymentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Represents a positive monetary amount for a payment.
///
/// This is a wrapper around `rust_decimal::Decimal` so that a payment can never
/// be created for a zero or negative amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The workflow states of a payment.
///
/// `Auth`, `PreAuthError` and `AuthError` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    #[default]
    New,
    PreAuth,
    PreAuthError,
    Auth,
    AuthError,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::PreAuth => "PRE_AUTH",
            Self::PreAuthError => "PRE_AUTH_ERROR",
            Self::Auth => "AUTH",
            Self::AuthError => "AUTH_ERROR",
        }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that drive a payment through its workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentEvent {
    PreAuthorize,
    PreAuthApproved,
    PreAuthDeclined,
    Authorize,
    AuthApproved,
    AuthDeclined,
}

impl PaymentEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreAuthorize => "PRE_AUTHORIZE",
            Self::PreAuthApproved => "PRE_AUTH_APPROVED",
            Self::PreAuthDeclined => "PRE_AUTH_DECLINED",
            Self::Authorize => "AUTHORIZE",
            Self::AuthApproved => "AUTH_APPROVED",
            Self::AuthDeclined => "AUTH_DECLINED",
        }
    }
}

impl fmt::Display for PaymentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted payment record.
///
/// `state` is the single source of truth between state machine invocations.
/// After creation it is only changed by the state change interceptor.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: PaymentId,
    pub state: PaymentState,
    pub amount: Amount,
}

impl Payment {
    /// Creates a payment in the `NEW` state.
    pub fn new(id: PaymentId, amount: Amount) -> Self {
        Self {
            id,
            state: PaymentState::New,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(12.99)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_new_payment_starts_in_new_state() {
        let payment = Payment::new(PaymentId(1), Amount::new(dec!(12.99)).unwrap());
        assert_eq!(payment.state, PaymentState::New);
        assert_eq!(payment.amount.value(), dec!(12.99));
    }

    #[test]
    fn test_state_serializes_by_name() {
        let mut payment = Payment::new(PaymentId(7), Amount::new(dec!(1.5)).unwrap());
        payment.state = PaymentState::PreAuthError;

        let json = serde_json::to_string(&payment).unwrap();
        assert_eq!(json, r#"{"id":7,"state":"PRE_AUTH_ERROR","amount":"1.5"}"#);

        let back: Payment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payment);
    }

    #[test]
    fn test_display_matches_serde_names() {
        for state in [
            PaymentState::New,
            PaymentState::PreAuth,
            PaymentState::PreAuthError,
            PaymentState::Auth,
            PaymentState::AuthError,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
        }
        assert_eq!(PaymentEvent::PreAuthDeclined.to_string(), "PRE_AUTH_DECLINED");
    }
}
