use super::context::StateContext;
use crate::domain::payment::{PaymentEvent, PaymentState};
use crate::error::Result;
use async_trait::async_trait;

/// Hook run after a transition's actions and before its target state becomes
/// the machine's current state. An error leaves the machine where it was.
#[async_trait]
pub trait StateMachineInterceptor: Send + Sync {
    async fn pre_state_change(&self, state: PaymentState, context: &StateContext) -> Result<()>;
}

/// Observer notified after every committed transition, self-loops included.
#[async_trait]
pub trait StateMachineListener: Send + Sync {
    async fn state_changed(&self, from: PaymentState, to: PaymentState, event: PaymentEvent);
}
