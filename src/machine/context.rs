use super::message::Message;
use crate::domain::payment::{PaymentId, PaymentState};

/// What guards and actions see of the transition being taken.
///
/// Actions post follow-up events through [`StateContext::send_event`]. They are
/// dispatched by the machine once the current transition has committed.
#[derive(Debug)]
pub struct StateContext {
    machine_id: String,
    message: Message,
    source: PaymentState,
    target: PaymentState,
    outbox: Vec<Message>,
}

impl StateContext {
    pub(crate) fn new(
        machine_id: impl Into<String>,
        message: Message,
        source: PaymentState,
        target: PaymentState,
    ) -> Self {
        Self {
            machine_id: machine_id.into(),
            message,
            source,
            target,
            outbox: Vec::new(),
        }
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn source(&self) -> PaymentState {
        self.source
    }

    pub fn target(&self) -> PaymentState {
        self.target
    }

    pub fn payment_id(&self) -> Option<PaymentId> {
        self.message.payment_id()
    }

    /// Queues a follow-up event for the machine handling this transition.
    pub fn send_event(&mut self, message: impl Into<Message>) {
        self.outbox.push(message.into());
    }

    pub(crate) fn take_outbox(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }
}
