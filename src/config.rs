use crate::error::{PaymentError, Result};

pub const DEFAULT_APPROVAL_RATE: f64 = 0.8;
pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 16;

/// Tunables for the workflow engine and the simulated processor.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Probability in `[0, 1]` that the simulated processor approves.
    pub approval_rate: f64,
    /// Upper bound on dispatches triggered by a single `send_event`.
    pub max_chain_length: usize,
    /// Seed for the simulated processor. Random when unset.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            approval_rate: DEFAULT_APPROVAL_RATE,
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.approval_rate) {
            return Err(PaymentError::ValidationError(format!(
                "approval rate must be within [0, 1], got {}",
                self.approval_rate
            )));
        }
        if self.max_chain_length == 0 {
            return Err(PaymentError::ValidationError(
                "max chain length must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}
