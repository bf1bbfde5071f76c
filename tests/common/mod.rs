#![allow(dead_code)]

use async_trait::async_trait;
use paysm::application::service::PaymentService;
use paysm::config::EngineConfig;
use paysm::domain::payment::{Payment, PaymentId};
use paysm::domain::ports::PaymentStore;
use paysm::error::{PaymentError, Result};
use paysm::infrastructure::in_memory::InMemoryPaymentStore;
use paysm::infrastructure::processor::SimulatedProcessor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A service over `store` whose processor approves 80% of requests, seeded
/// so runs are reproducible.
pub fn seeded_service(store: &InMemoryPaymentStore, seed: u64) -> PaymentService {
    let config = EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    };
    let processor = SimulatedProcessor::seeded(config.approval_rate, seed).unwrap();
    PaymentService::new(Arc::new(store.clone()), Arc::new(processor), &config).unwrap()
}

/// Wraps the in-memory store and fails every save once `fail_saves` is set.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: InMemoryPaymentStore,
    pub fail_saves: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn break_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentStore for FlakyStore {
    async fn next_id(&self) -> Result<PaymentId> {
        self.inner.next_id().await
    }

    async fn save(&self, payment: Payment) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PaymentError::IoError(std::io::Error::other("write refused")));
        }
        self.inner.save(payment).await
    }

    async fn load(&self, id: PaymentId) -> Result<Option<Payment>> {
        self.inner.load(id).await
    }

    async fn all_payments(&self) -> Result<Vec<Payment>> {
        self.inner.all_payments().await
    }
}
