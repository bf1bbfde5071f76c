//! The two-phase payment authorization workflow: its transition table and
//! the guard, actions and listener wired into it.

use crate::domain::payment::{PaymentEvent, PaymentState};
use crate::domain::ports::{Decision, ProcessorRef};
use crate::error::Result;
use crate::machine::{
    Action, Guard, Message, PAYMENT_ID_HEADER, StateContext, StateMachineListener, Transition,
    TransitionTable,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Blocks a transition unless the event carries a payment id.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentIdGuard;

impl Guard for PaymentIdGuard {
    fn evaluate(&self, context: &StateContext) -> bool {
        context.payment_id().is_some()
    }
}

/// Asks the authorization processor for a decision and posts the matching
/// outcome event back to the machine, carrying the same payment id header.
pub struct ProcessorAction {
    name: &'static str,
    processor: ProcessorRef,
    approved: PaymentEvent,
    declined: PaymentEvent,
}

impl ProcessorAction {
    pub fn pre_auth(processor: ProcessorRef) -> Self {
        Self {
            name: "pre-auth",
            processor,
            approved: PaymentEvent::PreAuthApproved,
            declined: PaymentEvent::PreAuthDeclined,
        }
    }

    pub fn auth(processor: ProcessorRef) -> Self {
        Self {
            name: "auth",
            processor,
            approved: PaymentEvent::AuthApproved,
            declined: PaymentEvent::AuthDeclined,
        }
    }
}

#[async_trait]
impl Action for ProcessorAction {
    async fn execute(&self, context: &mut StateContext) -> Result<()> {
        let payment_id = context.payment_id();
        if payment_id.is_none() {
            warn!(machine = context.machine_id(), "{} requested without a payment id", self.name);
        }

        let outcome = match self.processor.decide(payment_id).await? {
            Decision::Approved => {
                info!(payment = ?payment_id, "{} approved", self.name);
                self.approved
            }
            Decision::Declined => {
                info!(payment = ?payment_id, "{} declined", self.name);
                self.declined
            }
        };

        // Forward the id header as received, even when it is null.
        let mut reply = Message::new(outcome);
        if let Some(header) = context.message().header(PAYMENT_ID_HEADER).cloned() {
            reply = reply.with_header(PAYMENT_ID_HEADER, header);
        }
        context.send_event(reply);
        Ok(())
    }
}

/// Default notification: records the outcome in the log and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct LogNotification(pub &'static str);

#[async_trait]
impl Action for LogNotification {
    async fn execute(&self, context: &mut StateContext) -> Result<()> {
        match context.payment_id() {
            Some(payment_id) => info!(payment = %payment_id, "{}", self.0),
            None => info!(machine = context.machine_id(), "{}", self.0),
        }
        Ok(())
    }
}

/// The actions plugged into the workflow's transitions.
///
/// The notification slots are the place to hang messaging, auditing or
/// downstream triggers; replacing them does not touch the transition table.
#[derive(Clone)]
pub struct WorkflowActions {
    pub pre_auth: Arc<dyn Action>,
    pub auth: Arc<dyn Action>,
    pub pre_auth_approved: Arc<dyn Action>,
    pub pre_auth_declined: Arc<dyn Action>,
    pub auth_approved: Arc<dyn Action>,
    pub auth_declined: Arc<dyn Action>,
}

impl WorkflowActions {
    /// Processor-backed actions with log-only notifications.
    pub fn new(processor: ProcessorRef) -> Self {
        Self {
            pre_auth: Arc::new(ProcessorAction::pre_auth(Arc::clone(&processor))),
            auth: Arc::new(ProcessorAction::auth(processor)),
            pre_auth_approved: Arc::new(LogNotification("Pre-authorization approved")),
            pre_auth_declined: Arc::new(LogNotification("Pre-authorization declined")),
            auth_approved: Arc::new(LogNotification("Authorization approved")),
            auth_declined: Arc::new(LogNotification("Authorization declined")),
        }
    }
}

/// Builds the payment workflow:
///
/// | Source   | Event             | Target         |
/// |----------|-------------------|----------------|
/// | NEW      | PRE_AUTHORIZE     | NEW            |
/// | NEW      | PRE_AUTH_APPROVED | PRE_AUTH       |
/// | NEW      | PRE_AUTH_DECLINED | PRE_AUTH_ERROR |
/// | PRE_AUTH | AUTHORIZE         | PRE_AUTH       |
/// | PRE_AUTH | AUTH_APPROVED     | AUTH           |
/// | PRE_AUTH | AUTH_DECLINED     | AUTH_ERROR     |
///
/// The two self-loops only exist to run the processor actions; the outcome
/// events they post move the payment on.
pub fn payment_transition_table(actions: WorkflowActions) -> Result<TransitionTable> {
    use PaymentEvent::*;
    use PaymentState::*;

    TransitionTable::builder(New)
        .end(Auth)
        .end(PreAuthError)
        .end(AuthError)
        .external(
            Transition::new(New, PreAuthorize, New)
                .guard(PaymentIdGuard)
                .shared_action(actions.pre_auth),
        )
        .external(
            Transition::new(New, PreAuthApproved, PreAuth)
                .shared_action(actions.pre_auth_approved),
        )
        .external(
            Transition::new(New, PreAuthDeclined, PreAuthError)
                .shared_action(actions.pre_auth_declined),
        )
        .external(Transition::new(PreAuth, Authorize, PreAuth).shared_action(actions.auth))
        .external(
            Transition::new(PreAuth, AuthApproved, Auth).shared_action(actions.auth_approved),
        )
        .external(
            Transition::new(PreAuth, AuthDeclined, AuthError).shared_action(actions.auth_declined),
        )
        .build()
}

/// Logs every committed transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

#[async_trait]
impl StateMachineListener for LoggingListener {
    async fn state_changed(&self, from: PaymentState, to: PaymentState, event: PaymentEvent) {
        info!(%event, "State changed from {} to {}", from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentId;
    use crate::infrastructure::processor::FixedProcessor;
    use crate::machine::StateMachineFactory;

    fn factory(decision: Decision) -> StateMachineFactory {
        let actions = WorkflowActions::new(Arc::new(FixedProcessor(decision)));
        StateMachineFactory::new(payment_transition_table(actions).unwrap(), 16)
    }

    #[test]
    fn test_table_shape() {
        let f = factory(Decision::Approved);
        let table = f.table();
        assert_eq!(table.len(), 6);
        assert_eq!(table.initial(), PaymentState::New);
        for state in [PaymentState::Auth, PaymentState::PreAuthError, PaymentState::AuthError] {
            assert!(table.is_terminal(state));
        }
        assert!(!table.is_terminal(PaymentState::PreAuth));
        assert!(table
            .find(PaymentState::New, PaymentEvent::PreAuthorize)
            .unwrap()
            .guard
            .is_some());
    }

    #[tokio::test]
    async fn test_new_state_machine_walkthrough() {
        // No payment id: the guard holds the machine in NEW, then the
        // outcome events are handled directly.
        let mut sm = factory(Decision::Approved).get_state_machine("walkthrough");
        assert_eq!(sm.state(), PaymentState::New);

        assert!(!sm.send_event(PaymentEvent::PreAuthorize).await.unwrap());
        assert_eq!(sm.state(), PaymentState::New);

        assert!(sm.send_event(PaymentEvent::PreAuthApproved).await.unwrap());
        assert_eq!(sm.state(), PaymentState::PreAuth);

        assert!(!sm.send_event(PaymentEvent::PreAuthDeclined).await.unwrap());
        assert_eq!(sm.state(), PaymentState::PreAuth);
    }

    #[tokio::test]
    async fn test_pre_auth_approved_chain() {
        let mut sm = factory(Decision::Approved).get_state_machine("1");
        let msg = Message::new(PaymentEvent::PreAuthorize).with_payment_id(PaymentId(1));
        assert!(sm.send_event(msg).await.unwrap());
        assert_eq!(sm.state(), PaymentState::PreAuth);

        let msg = Message::new(PaymentEvent::Authorize).with_payment_id(PaymentId(1));
        assert!(sm.send_event(msg).await.unwrap());
        assert_eq!(sm.state(), PaymentState::Auth);
        assert!(sm.is_complete());
    }

    #[tokio::test]
    async fn test_declined_chains() {
        let f = factory(Decision::Declined);

        let mut sm = f.get_state_machine("1");
        let msg = Message::new(PaymentEvent::PreAuthorize).with_payment_id(PaymentId(1));
        sm.send_event(msg).await.unwrap();
        assert_eq!(sm.state(), PaymentState::PreAuthError);

        let mut sm = f.get_state_machine("2");
        sm.reset(PaymentState::PreAuth);
        let msg = Message::new(PaymentEvent::Authorize).with_payment_id(PaymentId(2));
        sm.send_event(msg).await.unwrap();
        assert_eq!(sm.state(), PaymentState::AuthError);
    }

    #[tokio::test]
    async fn test_authorize_without_id_still_reaches_outcome() {
        let mut sm = factory(Decision::Approved).get_state_machine("1");
        sm.reset(PaymentState::PreAuth);

        assert!(sm.send_event(PaymentEvent::Authorize).await.unwrap());
        assert_eq!(sm.state(), PaymentState::Auth);
    }

    #[tokio::test]
    async fn test_null_payment_id_is_forwarded() {
        use serde_json::Value;

        let action = ProcessorAction::auth(Arc::new(FixedProcessor(Decision::Declined)));
        let msg = Message::new(PaymentEvent::Authorize).with_header(PAYMENT_ID_HEADER, Value::Null);
        let mut ctx = StateContext::new("1", msg, PaymentState::PreAuth, PaymentState::PreAuth);

        action.execute(&mut ctx).await.unwrap();

        let outbox = ctx.take_outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].event, PaymentEvent::AuthDeclined);
        assert_eq!(outbox[0].header(PAYMENT_ID_HEADER), Some(&Value::Null));
    }
}
