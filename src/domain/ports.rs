use super::payment::{Payment, PaymentId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Key-value persistence boundary for payment records.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Reserves the next unused payment identifier.
    async fn next_id(&self) -> Result<PaymentId>;
    async fn save(&self, payment: Payment) -> Result<()>;
    async fn load(&self, id: PaymentId) -> Result<Option<Payment>>;
    async fn all_payments(&self) -> Result<Vec<Payment>>;
}

/// Outcome reported by an authorization processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Declined,
}

/// The external card processor that approves or declines a payment.
///
/// The id is `None` when the request reached the workflow without one.
#[async_trait]
pub trait AuthorizationProcessor: Send + Sync {
    async fn decide(&self, payment_id: Option<PaymentId>) -> Result<Decision>;
}

pub type PaymentStoreRef = Arc<dyn PaymentStore>;
pub type ProcessorRef = Arc<dyn AuthorizationProcessor>;
