use tokio::sync::watch;

/// Clears a controller's loading flag when an in-flight fetch ends.
///
/// A fetch future dropped before it settles still leaves the state
/// not-loading, so the next command is not skipped forever.
pub(crate) struct LoadingGuard<'a, S> {
    state: &'a watch::Sender<S>,
    clear: fn(&mut S),
    armed: bool,
}

impl<'a, S> LoadingGuard<'a, S> {
    pub(crate) fn new(state: &'a watch::Sender<S>, clear: fn(&mut S)) -> Self {
        Self {
            state,
            clear,
            armed: true,
        }
    }

    /// Applies the fetch result and clears loading in one transition, so
    /// observers never see the result while still loading.
    pub(crate) fn settle(mut self, apply: impl FnOnce(&mut S)) {
        let clear = self.clear;
        self.state.send_modify(|state| {
            apply(state);
            clear(state);
        });
        self.armed = false;
    }
}

impl<S> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(self.clear);
        }
    }
}
