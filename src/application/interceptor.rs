use crate::domain::payment::PaymentState;
use crate::domain::ports::PaymentStoreRef;
use crate::error::{PaymentError, Result};
use crate::machine::{StateContext, StateMachineInterceptor};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Writes the impending state to the payment record before the machine
/// commits the transition.
///
/// Events without a payment id are let through without persisting anything,
/// so the record can lag the machine in that case.
#[derive(Clone)]
pub struct PaymentStateChangeInterceptor {
    store: PaymentStoreRef,
}

impl PaymentStateChangeInterceptor {
    pub fn new(store: PaymentStoreRef) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StateMachineInterceptor for PaymentStateChangeInterceptor {
    async fn pre_state_change(&self, state: PaymentState, context: &StateContext) -> Result<()> {
        let Some(payment_id) = context.payment_id() else {
            warn!(
                machine = context.machine_id(),
                "No payment id on {}, state {} not persisted",
                context.message().event,
                state
            );
            return Ok(());
        };

        let mut payment = self
            .store
            .load(payment_id)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))?;
        payment.state = state;
        self.store.save(payment).await?;

        debug!(payment = %payment_id, "Persisted state {}", state);
        Ok(())
    }
}
