// src/state/mod.rs
//
// Observable fetch state
//
// Two building blocks used by every service in the crate:
// - FetchState<T>: the lifecycle of one asynchronous fetch, as an explicit
//   enum so call sites get exhaustiveness checking.
// - StateCell<T>: a single-producer broadcast cell. Subscribers always see
//   the latest value (new subscribers start from it), and every write wakes
//   all of them.

use std::sync::Arc;

use tokio::sync::watch;

/// Lifecycle of one asynchronous fetch.
///
/// Transitions are monotonic within a fetch cycle:
/// `Idle -> Loading -> (Success | Error)`. A new cycle restarts at `Loading`.
/// Only `Success` and `Error` carry data; `Error` may retain the
/// last-known-good payload for stale display.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(T),
    Error { message: String, stale: Option<T> },
}

impl<T> FetchState<T> {
    /// An `Error` state with no retained data.
    pub fn error(message: impl Into<String>) -> Self {
        FetchState::Error {
            message: message.into(),
            stale: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, FetchState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchState::Error { .. })
    }

    /// The carried payload: `Success` data, or the stale data of an `Error`.
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) => Some(data),
            FetchState::Error { stale, .. } => stale.as_ref(),
            _ => None,
        }
    }

    /// The user-facing message of an `Error`.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// A single-producer observable value.
///
/// Built on `tokio::sync::watch`: writes are atomic, the last value is
/// replayed to new subscribers, and `subscribe()` hands out an independent
/// receiver that can be awaited for changes. Cloning the cell clones the
/// producer handle, not the value; all clones publish to the same channel.
pub struct StateCell<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}

impl<T> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Publish a new value, waking all subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Subscribe; the receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> StateCell<T> {
    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
