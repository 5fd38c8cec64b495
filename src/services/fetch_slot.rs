// src/services/fetch_slot.rs
//
// Supersession primitive for single-outstanding fetches (detail, search).
//
// `JoinHandle::abort` alone is not enough: a task that already passed its
// last await point keeps running until its poll returns, so it could still
// publish a stale result after a newer request started. Every final state
// write therefore goes through `commit()`, which checks the cycle token and
// runs the write under the same lock.

use std::sync::Mutex;

use tokio::task::JoinHandle;

pub(crate) struct FetchSlot {
    inner: Mutex<SlotInner>,
}

struct SlotInner {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl FetchSlot {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                generation: 0,
                handle: None,
            }),
        }
    }

    /// Start a new fetch cycle: abort the in-flight task and return the token
    /// the new task must present to commit its result.
    pub fn begin(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        if let Some(prev) = inner.handle.take() {
            prev.abort();
        }
        inner.generation
    }

    /// Attach the task spawned for the given cycle. If a newer cycle already
    /// began, the task is aborted instead.
    pub fn attach(&self, token: u64, handle: JoinHandle<()>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.generation == token {
            inner.handle = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Run `write` only if `token` still names the current cycle. The check
    /// and the write happen under one lock, so a superseded task can never
    /// interleave its write after the newer cycle's.
    pub fn commit(&self, token: u64, write: impl FnOnce()) {
        let inner = self.inner.lock().unwrap();
        if inner.generation == token {
            write();
        }
    }

    /// Cancel the in-flight task, if any. Safe to call repeatedly; pending
    /// commits from the cancelled cycle are refused.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        if let Some(prev) = inner.handle.take() {
            prev.abort();
        }
    }
}
