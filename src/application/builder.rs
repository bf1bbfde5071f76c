use super::interceptor::PaymentStateChangeInterceptor;
use crate::domain::payment::PaymentId;
use crate::domain::ports::PaymentStoreRef;
use crate::error::{PaymentError, Result};
use crate::machine::{StateMachine, StateMachineFactory};
use std::sync::Arc;
use tracing::debug;

/// Rehydrates state machines from persisted payments.
///
/// A payment can sit in any state for an arbitrarily long time between calls.
/// Each call builds a fresh machine, resets it to the persisted state and
/// attaches the interceptor that writes every later transition back.
#[derive(Clone)]
pub struct PaymentMachineBuilder {
    store: PaymentStoreRef,
    factory: StateMachineFactory,
    interceptor: Arc<PaymentStateChangeInterceptor>,
}

impl PaymentMachineBuilder {
    pub fn new(store: PaymentStoreRef, factory: StateMachineFactory) -> Self {
        let interceptor = Arc::new(PaymentStateChangeInterceptor::new(Arc::clone(&store)));
        Self {
            store,
            factory,
            interceptor,
        }
    }

    /// Builds a machine for `payment_id` positioned at its persisted state.
    ///
    /// Concurrent builds for the same payment are not serialized here.
    pub async fn build(&self, payment_id: PaymentId) -> Result<StateMachine> {
        let payment = self
            .store
            .load(payment_id)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))?;

        let mut machine = self.factory.get_state_machine(payment_id.to_string());
        machine.add_interceptor(self.interceptor.clone());
        machine.reset(payment.state);

        debug!(payment = %payment_id, "Rehydrated state machine at {}", payment.state);
        Ok(machine)
    }
}
