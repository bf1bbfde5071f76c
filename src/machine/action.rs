use super::context::StateContext;
use crate::error::Result;
use async_trait::async_trait;

/// A side-effecting handler run while a transition is taken.
///
/// Returning an error aborts the transition before anything is persisted.
#[async_trait]
pub trait Action: Send + Sync {
    async fn execute(&self, context: &mut StateContext) -> Result<()>;
}
