//! Pending Call - the caller's handle on an in-flight request.
//!
//! Settles exactly once, when the host invokes either of the call's two
//! slots. There is no cancellation: dropping a `PendingCall` leaves both
//! slots registered and a late response is silently discarded.

use crate::domain::identifier::SlotName;
use crate::error::{CallError, CallResult};
use crate::registry::CallbackRegistry;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{Instant, Sleep};
use tracing::warn;

/// The two slot names allocated for one call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSlots {
    /// Invoked by the host on success
    pub result_id: SlotName,
    /// Invoked by the host on failure
    pub error_id: SlotName,
}

enum State {
    /// Rejected before anything was sent
    Settled(Option<CallResult>),
    /// Envelope posted, waiting for the host
    Waiting(Box<Waiting>),
}

struct Waiting {
    receiver: oneshot::Receiver<CallResult>,
    slots: CallSlots,
    registry: Arc<CallbackRegistry>,
    dispatched_at: Instant,
    timeout: Option<Duration>,
    /// Created on first poll so `invoke` works outside a runtime
    sleep: Option<Pin<Box<Sleep>>>,
}

/// Future resolving to the host's raw result or rejecting with [`CallError`].
#[must_use = "a pending call does nothing useful unless awaited"]
pub struct PendingCall {
    state: State,
}

impl PendingCall {
    pub(crate) fn rejected(error: CallError) -> Self {
        Self {
            state: State::Settled(Some(Err(error))),
        }
    }

    pub(crate) fn waiting(
        receiver: oneshot::Receiver<CallResult>,
        slots: CallSlots,
        registry: Arc<CallbackRegistry>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            state: State::Waiting(Box::new(Waiting {
                receiver,
                slots,
                registry,
                dispatched_at: Instant::now(),
                timeout,
                sleep: None,
            })),
        }
    }

    /// Slots allocated for this call; `None` if it was rejected up front.
    pub fn slots(&self) -> Option<&CallSlots> {
        match &self.state {
            State::Waiting(waiting) => Some(&waiting.slots),
            State::Settled(_) => None,
        }
    }

    /// Reject with [`CallError::Timeout`] if the host has not answered
    /// within `timeout` of dispatch. Both slots are released on expiry.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let State::Waiting(waiting) = &mut self.state {
            waiting.timeout = Some(timeout);
            waiting.sleep = None;
        }
        self
    }
}

impl Future for PendingCall {
    type Output = CallResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let waiting = match &mut self.state {
            State::Settled(result) => {
                return Poll::Ready(result.take().unwrap_or(Err(CallError::Abandoned)));
            }
            State::Waiting(waiting) => waiting,
        };

        match Pin::new(&mut waiting.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => return Poll::Ready(result),
            Poll::Ready(Err(_)) => return Poll::Ready(Err(CallError::Abandoned)),
            Poll::Pending => {}
        }

        let Some(timeout) = waiting.timeout else {
            return Poll::Pending;
        };
        let deadline = waiting.dispatched_at + timeout;
        let sleep = waiting
            .sleep
            .get_or_insert_with(|| Box::pin(tokio::time::sleep_until(deadline)));

        match sleep.as_mut().poll(cx) {
            Poll::Ready(()) => {
                waiting.registry.remove(&waiting.slots.result_id);
                waiting.registry.remove(&waiting.slots.error_id);
                warn!(
                    result_id = %waiting.slots.result_id,
                    error_id = %waiting.slots.error_id,
                    timeout_ms = timeout.as_millis(),
                    "Call timed out, released its slots"
                );
                Poll::Ready(Err(CallError::Timeout(timeout)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCall")
            .field("slots", &self.slots())
            .finish()
    }
}
