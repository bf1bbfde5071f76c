use super::instance::StateMachine;
use super::interceptor::StateMachineListener;
use super::table::TransitionTable;
use std::sync::Arc;

/// Hands out fresh machine instances over one shared transition table.
#[derive(Clone)]
pub struct StateMachineFactory {
    table: Arc<TransitionTable>,
    listeners: Vec<Arc<dyn StateMachineListener>>,
    max_chain_length: usize,
}

impl StateMachineFactory {
    pub fn new(table: TransitionTable, max_chain_length: usize) -> Self {
        Self {
            table: Arc::new(table),
            listeners: Vec::new(),
            max_chain_length,
        }
    }

    /// Registers a listener attached to every machine built from now on.
    pub fn with_listener(mut self, listener: Arc<dyn StateMachineListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Builds a machine at the table's initial state.
    pub fn get_state_machine(&self, id: impl Into<String>) -> StateMachine {
        let mut machine = StateMachine::new(id, Arc::clone(&self.table), self.max_chain_length);
        for listener in &self.listeners {
            machine.add_listener(Arc::clone(listener));
        }
        machine
    }
}
