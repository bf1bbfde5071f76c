use super::context::StateContext;
use super::interceptor::{StateMachineInterceptor, StateMachineListener};
use super::message::Message;
use super::table::TransitionTable;
use crate::domain::payment::PaymentState;
use crate::error::{PaymentError, Result};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// A live state machine instance.
///
/// Instances are cheap and short-lived: one is built per call, driven with
/// [`StateMachine::send_event`] and dropped. Only the state survives, through
/// whatever interceptors are attached.
pub struct StateMachine {
    id: String,
    state: PaymentState,
    table: Arc<TransitionTable>,
    interceptors: Vec<Arc<dyn StateMachineInterceptor>>,
    listeners: Vec<Arc<dyn StateMachineListener>>,
    max_chain_length: usize,
}

impl StateMachine {
    pub fn new(id: impl Into<String>, table: Arc<TransitionTable>, max_chain_length: usize) -> Self {
        Self {
            id: id.into(),
            state: table.initial(),
            table,
            interceptors: Vec::new(),
            listeners: Vec::new(),
            max_chain_length,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    /// Whether the machine sits in a terminal state.
    pub fn is_complete(&self) -> bool {
        self.table.is_terminal(self.state)
    }

    /// Forces the current state without running guards, actions,
    /// interceptors or listeners. Used to rehydrate persisted progress.
    pub fn reset(&mut self, state: PaymentState) {
        self.state = state;
    }

    pub fn add_interceptor(&mut self, interceptor: Arc<dyn StateMachineInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn add_listener(&mut self, listener: Arc<dyn StateMachineListener>) {
        self.listeners.push(listener);
    }

    /// Sends an event and drains every follow-up event the actions post.
    ///
    /// Returns whether the event itself was accepted. Unhandled events and
    /// guard rejections are not errors: the machine just stays where it is.
    pub async fn send_event(&mut self, message: impl Into<Message>) -> Result<bool> {
        let mut queue = VecDeque::from([message.into()]);
        let mut accepted = None;
        let mut dispatched = 0usize;

        while let Some(message) = queue.pop_front() {
            if dispatched >= self.max_chain_length {
                warn!(
                    machine = %self.id,
                    state = %self.state,
                    "Dropping event {} after {} dispatches",
                    message.event,
                    dispatched
                );
                return Err(PaymentError::DispatchLimitExceeded(self.max_chain_length));
            }
            dispatched += 1;

            let result = self.dispatch(message, &mut queue).await?;
            accepted.get_or_insert(result);
        }

        Ok(accepted.unwrap_or(false))
    }

    async fn dispatch(&mut self, message: Message, queue: &mut VecDeque<Message>) -> Result<bool> {
        let table = Arc::clone(&self.table);
        let Some(transition) = table.find(self.state, message.event) else {
            debug!(machine = %self.id, state = %self.state, "Ignoring unhandled event {}", message.event);
            return Ok(false);
        };

        let event = message.event;
        let mut context = StateContext::new(self.id.as_str(), message, transition.source, transition.target);

        if let Some(guard) = &transition.guard
            && !guard.evaluate(&context)
        {
            debug!(machine = %self.id, state = %self.state, "Guard rejected event {}", event);
            return Ok(false);
        }

        for action in &transition.actions {
            action.execute(&mut context).await?;
        }

        for interceptor in &self.interceptors {
            interceptor.pre_state_change(transition.target, &context).await?;
        }

        let from = self.state;
        self.state = transition.target;
        if transition.is_self_loop() {
            debug!(machine = %self.id, state = %self.state, "Handled {} in place", event);
        }

        for listener in &self.listeners {
            listener.state_changed(from, self.state, event).await;
        }

        queue.extend(context.take_outbox());
        Ok(true)
    }
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("interceptors", &self.interceptors.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
