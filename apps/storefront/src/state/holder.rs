//! Observable value holder backing every screen's view state.
//!
//! A `StateHolder` owns the current snapshot of one screen. Renderers read
//! [`StateHolder::snapshot`] or wait on a [`watch::Receiver`]; controllers
//! swap the whole snapshot with [`StateHolder::replace`]. Writes go through
//! the channel's lock, so two transitions never interleave.

use tokio::sync::watch;

#[derive(Debug)]
pub struct StateHolder<T> {
    tx: watch::Sender<T>,
}

impl<T: Default> Default for StateHolder<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        StateHolder { tx }
    }

    /// Returns a receiver that observes every replaced snapshot.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Runs `f` against the current snapshot without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Swaps the snapshot for `f(current)` and notifies subscribers.
    pub fn replace(&self, f: impl FnOnce(&T) -> T) {
        self.tx.send_modify(|state| *state = f(state));
    }

    /// Like [`replace`](Self::replace), but `f` may decline by returning
    /// `None`. Subscribers are only notified when a snapshot was written.
    pub fn replace_if(&self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        self.tx.send_if_modified(|state| match f(state) {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        })
    }
}

impl<T: Clone> StateHolder<T> {
    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }
}
