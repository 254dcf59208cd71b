//! One-shot completion signal.
//!
//! Backed by a `watch` channel holding `false` until completion. Completing
//! twice is a no-op, and waiters that arrive late see the stored `true`
//! immediately.

use tokio::sync::watch;

/// Shared "loop exited" flag.
#[derive(Debug)]
pub struct Completion {
    tx: watch::Sender<bool>,
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl Completion {
    /// Create an incomplete signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Mark complete. Returns `true` only for the call that flipped the flag.
    pub fn complete(&self) -> bool {
        !self.tx.send_replace(true)
    }

    /// True once [`Completion::complete`] has been called.
    pub fn is_complete(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait for completion.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|done| *done).await;
    }

    /// Guard that completes the signal when dropped, including on unwind.
    pub fn guard(&self) -> CompletionGuard<'_> {
        CompletionGuard { completion: self }
    }
}

/// Completes its [`Completion`] on drop.
#[must_use = "dropping the guard immediately completes the signal"]
pub struct CompletionGuard<'a> {
    completion: &'a Completion,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.completion.complete();
    }
}
