use super::builder::PaymentMachineBuilder;
use super::workflow::{LoggingListener, WorkflowActions, payment_transition_table};
use crate::config::EngineConfig;
use crate::domain::payment::{Amount, Payment, PaymentEvent, PaymentId};
use crate::domain::ports::{PaymentStoreRef, ProcessorRef};
use crate::error::Result;
use crate::machine::{Message, StateMachine, StateMachineFactory};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// The entry point for driving payments through the authorization workflow.
///
/// Every operation runs to completion on the caller's task: the machine is
/// rehydrated, the event and all follow-ups are dispatched, and the machine is
/// handed back in whatever state the chain settled in.
pub struct PaymentService {
    store: PaymentStoreRef,
    builder: PaymentMachineBuilder,
}

impl PaymentService {
    /// Creates a service with the default workflow actions for `processor`.
    pub fn new(store: PaymentStoreRef, processor: ProcessorRef, config: &EngineConfig) -> Result<Self> {
        Self::with_actions(store, WorkflowActions::new(processor), config)
    }

    /// Creates a service whose transitions run the given actions.
    pub fn with_actions(
        store: PaymentStoreRef,
        actions: WorkflowActions,
        config: &EngineConfig,
    ) -> Result<Self> {
        let table = payment_transition_table(actions)?;
        let factory = StateMachineFactory::new(table, config.max_chain_length)
            .with_listener(Arc::new(LoggingListener));
        Ok(Self::from_factory(store, factory))
    }

    /// Creates a service over a caller-assembled factory.
    pub fn from_factory(store: PaymentStoreRef, factory: StateMachineFactory) -> Self {
        let builder = PaymentMachineBuilder::new(Arc::clone(&store), factory);
        Self { store, builder }
    }

    /// Creates and persists a payment in the `NEW` state.
    pub async fn new_payment(&self, amount: Decimal) -> Result<Payment> {
        let amount = Amount::new(amount)?;
        let payment = Payment::new(self.store.next_id().await?, amount);
        self.store.save(payment.clone()).await?;
        info!(payment = %payment.id, %amount, "Created payment");
        Ok(payment)
    }

    pub async fn pre_auth(&self, payment_id: PaymentId) -> Result<StateMachine> {
        self.send(payment_id, PaymentEvent::PreAuthorize).await
    }

    /// Only meaningful once pre-authorization succeeded. From any other state
    /// the event is ignored and the machine comes back unchanged.
    pub async fn authorize_payment(&self, payment_id: PaymentId) -> Result<StateMachine> {
        self.send(payment_id, PaymentEvent::Authorize).await
    }

    pub async fn payment(&self, payment_id: PaymentId) -> Result<Option<Payment>> {
        self.store.load(payment_id).await
    }

    pub async fn payments(&self) -> Result<Vec<Payment>> {
        self.store.all_payments().await
    }

    pub fn builder(&self) -> &PaymentMachineBuilder {
        &self.builder
    }

    async fn send(&self, payment_id: PaymentId, event: PaymentEvent) -> Result<StateMachine> {
        let mut machine = self.builder.build(payment_id).await?;
        machine
            .send_event(Message::new(event).with_payment_id(payment_id))
            .await?;
        Ok(machine)
    }
}
