use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::PaymentStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payments.
///
/// Uses `Arc<RwLock<HashMap<PaymentId, Payment>>>` to allow shared concurrent access.
/// Clones share the same records, which is what tests rely on to inspect what
/// the workflow persisted.
#[derive(Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<PaymentId, Payment>>>,
    sequence: Arc<AtomicU64>,
}

impl Default for InMemoryPaymentStore {
    fn default() -> Self {
        Self {
            payments: Arc::default(),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn next_id(&self) -> Result<PaymentId> {
        Ok(PaymentId(self.sequence.fetch_add(1, Ordering::SeqCst)))
    }

    async fn save(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
        Ok(())
    }

    async fn load(&self, id: PaymentId) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn all_payments(&self) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut all: Vec<Payment> = payments.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }
}
