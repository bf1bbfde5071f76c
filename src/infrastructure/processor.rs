use crate::domain::payment::PaymentId;
use crate::domain::ports::{AuthorizationProcessor, Decision};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// A stand-in for the card processor that approves with a fixed probability.
pub struct SimulatedProcessor {
    approval_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedProcessor {
    /// Creates a processor seeded from OS entropy.
    pub fn new(approval_rate: f64) -> Result<Self> {
        Self::with_rng(approval_rate, StdRng::from_entropy())
    }

    /// Creates a processor whose sequence of decisions is reproducible.
    pub fn seeded(approval_rate: f64, seed: u64) -> Result<Self> {
        Self::with_rng(approval_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(approval_rate: f64, rng: StdRng) -> Result<Self> {
        if !(0.0..=1.0).contains(&approval_rate) {
            return Err(PaymentError::ValidationError(format!(
                "approval rate must be within [0, 1], got {}",
                approval_rate
            )));
        }
        Ok(Self {
            approval_rate,
            rng: Mutex::new(rng),
        })
    }

    pub fn approval_rate(&self) -> f64 {
        self.approval_rate
    }
}

#[async_trait]
impl AuthorizationProcessor for SimulatedProcessor {
    async fn decide(&self, _payment_id: Option<PaymentId>) -> Result<Decision> {
        let approved = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| PaymentError::InternalError(e.to_string().into()))?;
            rng.gen_bool(self.approval_rate)
        };
        if approved {
            Ok(Decision::Approved)
        } else {
            Ok(Decision::Declined)
        }
    }
}

/// A processor that always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedProcessor(pub Decision);

#[async_trait]
impl AuthorizationProcessor for FixedProcessor {
    async fn decide(&self, _payment_id: Option<PaymentId>) -> Result<Decision> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extreme_rates_are_deterministic() {
        let always = SimulatedProcessor::new(1.0).unwrap();
        let never = SimulatedProcessor::new(0.0).unwrap();
        for i in 0..50 {
            assert_eq!(always.decide(Some(PaymentId(i))).await.unwrap(), Decision::Approved);
            assert_eq!(never.decide(None).await.unwrap(), Decision::Declined);
        }
    }

    #[tokio::test]
    async fn test_seeded_sequence_repeats() {
        let a = SimulatedProcessor::seeded(0.5, 7).unwrap();
        let b = SimulatedProcessor::seeded(0.5, 7).unwrap();
        for i in 0..100 {
            let id = Some(PaymentId(i));
            assert_eq!(a.decide(id).await.unwrap(), b.decide(id).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_approval_ratio() {
        let processor = SimulatedProcessor::seeded(0.8, 42).unwrap();
        let mut approved = 0;
        for i in 0..10_000 {
            if processor.decide(Some(PaymentId(i))).await.unwrap() == Decision::Approved {
                approved += 1;
            }
        }
        let ratio = approved as f64 / 10_000.0;
        assert!((ratio - 0.8).abs() < 0.03, "ratio was {}", ratio);
    }

    #[test]
    fn test_invalid_rate() {
        assert!(SimulatedProcessor::new(1.01).is_err());
        assert!(SimulatedProcessor::seeded(-0.5, 1).is_err());
    }

    #[tokio::test]
    async fn test_fixed_processor() {
        let processor = FixedProcessor(Decision::Declined);
        assert_eq!(processor.decide(None).await.unwrap(), Decision::Declined);
    }
}
