//! A small event-driven state machine engine over the payment workflow
//! vocabulary.
//!
//! A [`TransitionTable`] is built once and shared. Each call gets a fresh
//! [`StateMachine`] from a [`StateMachineFactory`], optionally rehydrated to a
//! persisted state, and drives it with events. Actions may post follow-up
//! events; those are queued and handled after the current transition commits,
//! before `send_event` returns.

pub mod action;
pub mod context;
pub mod factory;
pub mod guard;
pub mod instance;
pub mod interceptor;
pub mod message;
pub mod table;

pub use action::Action;
pub use context::StateContext;
pub use factory::StateMachineFactory;
pub use guard::Guard;
pub use instance::StateMachine;
pub use interceptor::{StateMachineInterceptor, StateMachineListener};
pub use message::{Message, PAYMENT_ID_HEADER};
pub use table::{Transition, TransitionTable};
