use super::action::Action;
use super::guard::Guard;
use crate::domain::payment::{PaymentEvent, PaymentState};
use crate::error::{PaymentError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A single edge of the machine: `source --event--> target`, optionally
/// guarded and carrying an ordered list of actions.
#[derive(Clone)]
pub struct Transition {
    pub source: PaymentState,
    pub event: PaymentEvent,
    pub target: PaymentState,
    pub guard: Option<Arc<dyn Guard>>,
    pub actions: Vec<Arc<dyn Action>>,
}

impl Transition {
    pub fn new(source: PaymentState, event: PaymentEvent, target: PaymentState) -> Self {
        Self {
            source,
            event,
            target,
            guard: None,
            actions: Vec::new(),
        }
    }

    pub fn guard(mut self, guard: impl Guard + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    pub fn action(self, action: impl Action + 'static) -> Self {
        self.shared_action(Arc::new(action))
    }

    /// Appends an action that is shared with other transitions or tables.
    pub fn shared_action(mut self, action: Arc<dyn Action>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("event", &self.event)
            .field("target", &self.target)
            .field("guarded", &self.guard.is_some())
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// The static machine definition shared by every machine instance.
#[derive(Debug)]
pub struct TransitionTable {
    initial: PaymentState,
    terminal: HashSet<PaymentState>,
    transitions: HashMap<(PaymentState, PaymentEvent), Transition>,
}

impl TransitionTable {
    pub fn builder(initial: PaymentState) -> TransitionTableBuilder {
        TransitionTableBuilder {
            initial,
            terminal: HashSet::new(),
            transitions: Vec::new(),
        }
    }

    pub fn initial(&self) -> PaymentState {
        self.initial
    }

    pub fn is_terminal(&self, state: PaymentState) -> bool {
        self.terminal.contains(&state)
    }

    /// Looks up the edge for `event` out of `state`. `None` means the event is
    /// not handled there and must be ignored.
    pub fn find(&self, state: PaymentState, event: PaymentEvent) -> Option<&Transition> {
        self.transitions.get(&(state, event))
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

pub struct TransitionTableBuilder {
    initial: PaymentState,
    terminal: HashSet<PaymentState>,
    transitions: Vec<Transition>,
}

impl TransitionTableBuilder {
    /// Marks `state` as terminal.
    pub fn end(mut self, state: PaymentState) -> Self {
        self.terminal.insert(state);
        self
    }

    pub fn external(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Validates the definition: at least one edge, one edge per
    /// (source, event) pair and no edges leaving a terminal state.
    pub fn build(self) -> Result<TransitionTable> {
        if self.terminal.contains(&self.initial) {
            return Err(PaymentError::InvalidTransitionTable(format!(
                "initial state {} cannot be terminal",
                self.initial
            )));
        }

        let mut transitions = HashMap::with_capacity(self.transitions.len());
        for transition in self.transitions {
            if self.terminal.contains(&transition.source) {
                return Err(PaymentError::InvalidTransitionTable(format!(
                    "terminal state {} has an outgoing transition on {}",
                    transition.source, transition.event
                )));
            }
            let key = (transition.source, transition.event);
            if transitions.insert(key, transition).is_some() {
                return Err(PaymentError::InvalidTransitionTable(format!(
                    "duplicate transition from {} on {}",
                    key.0, key.1
                )));
            }
        }

        let table = TransitionTable {
            initial: self.initial,
            terminal: self.terminal,
            transitions,
        };
        if table.is_empty() {
            return Err(PaymentError::InvalidTransitionTable(
                "table has no transitions".to_string(),
            ));
        }
        Ok(table)
    }
}
