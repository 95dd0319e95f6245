/// Receives run events and optionally steers the run.
///
/// Observers let a caller watch ticks without owning the loop: logging a
/// trace of visited positions, updating a display, or requesting an early
/// stop, all without changing the controller's API.
///
/// `observe` returns `Option<A>`, where `Some(action)` requests a
/// controller-specific action and `None` lets the run continue unchanged.
///
/// Closures implement `Observer` automatically, and `()` is a no-op
/// observer that always returns `None`.
pub trait Observer<E, A> {
    /// Observes a run event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

/// Blanket implementation for observer closures.
impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

/// A no-op observer that always returns `None`.
impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
