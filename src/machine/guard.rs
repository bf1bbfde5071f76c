use super::context::StateContext;

/// A pure predicate deciding whether a transition may fire.
pub trait Guard: Send + Sync {
    fn evaluate(&self, context: &StateContext) -> bool;
}

impl<F> Guard for F
where
    F: Fn(&StateContext) -> bool + Send + Sync,
{
    fn evaluate(&self, context: &StateContext) -> bool {
        self(context)
    }
}
