//! Single-flight bookkeeping for access-token refreshes.
//!
//! One [`RefreshState`] belongs to each gateway. The first caller that needs a
//! refresh becomes the leader and receives a [`RefreshLease`]; every caller that
//! arrives while the lease is held is queued as a follower and receives the
//! leader's outcome when the lease is settled.
//!
//! Invariant: the waiter queue is non-empty only while `refreshing` is true.
//! The check-and-set happens under one lock that is never held across an
//! `.await`.

use super::ApiError;
use secrecy::SecretString;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// Result of one refresh, shared by the leader and every follower.
pub(crate) type RefreshOutcome = Result<SecretString, ApiError>;

#[derive(Default)]
struct Pending {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

#[derive(Default)]
pub(crate) struct RefreshState {
    pending: Mutex<Pending>,
}

/// What a caller that needs a fresh token should do.
pub(crate) enum Ticket<'a> {
    /// No refresh was running; this caller performs it.
    Leader(RefreshLease<'a>),
    /// A refresh is already running; await its outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshState {
    /// Starts a refresh or joins the one in flight.
    pub(crate) fn begin(&self) -> Ticket<'_> {
        let mut pending = self.lock();

        if pending.refreshing {
            let (tx, rx) = oneshot::channel();
            pending.waiters.push(tx);
            Ticket::Follower(rx)
        } else {
            pending.refreshing = true;
            Ticket::Leader(RefreshLease {
                state: self,
                settled: false,
            })
        }
    }

    pub(crate) fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    /// Number of callers waiting on the current refresh.
    pub(crate) fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Clears the flag and hands back the queued waiters.
    fn release(&self) -> Vec<oneshot::Sender<RefreshOutcome>> {
        let mut pending = self.lock();
        pending.refreshing = false;
        std::mem::take(&mut pending.waiters)
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the refresh leader until the outcome is known.
///
/// Dropping an unsettled lease (for example when the leader's future is
/// cancelled) resets the flag and drops every waiter's sender, which followers
/// observe as `ApiError::RefreshInterrupted`.
pub(crate) struct RefreshLease<'a> {
    state: &'a RefreshState,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Ends the refresh and delivers `outcome` to every follower, in queue
    /// order. Returns how many followers were released.
    pub(crate) fn settle(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        let waiters = self.state.release();
        let released = waiters.len();

        for waiter in waiters {
            // A follower that gave up waiting has dropped its receiver.
            let _ = waiter.send(outcome.clone());
        }

        released
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            drop(self.state.release());
        }
    }
}
