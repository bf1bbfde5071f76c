use crate::domain::payment::{PaymentEvent, PaymentId};
use serde_json::Value;
use std::collections::HashMap;

/// Header under which the payment identifier travels with an event.
pub const PAYMENT_ID_HEADER: &str = "payment_id";

/// An event plus the attributes sent along with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub event: PaymentEvent,
    pub headers: HashMap<String, Value>,
}

impl Message {
    pub fn new(event: PaymentEvent) -> Self {
        Self {
            event,
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_payment_id(self, id: PaymentId) -> Self {
        self.with_header(PAYMENT_ID_HEADER, id.0)
    }

    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }

    /// The payment identifier header, if present and not null.
    pub fn payment_id(&self) -> Option<PaymentId> {
        self.header(PAYMENT_ID_HEADER)
            .and_then(Value::as_u64)
            .map(PaymentId)
    }
}

impl From<PaymentEvent> for Message {
    fn from(event: PaymentEvent) -> Self {
        Self::new(event)
    }
}
