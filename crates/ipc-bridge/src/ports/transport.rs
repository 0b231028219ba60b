//! Host transport port.
//!
//! The host channel is one-way: it accepts a message and returns nothing
//! but an acknowledgement that the message left. Responses come back later
//! through the callback registry.

use crate::domain::envelope::CallEnvelope;
use crate::error::TransportError;

/// Outbound, fire-and-forget message channel to the privileged host.
pub trait HostTransport: Send + Sync {
    /// Hand one envelope to the host. Called synchronously, exactly once
    /// per call.
    fn post_message(&self, envelope: CallEnvelope) -> Result<(), TransportError>;
}

impl<F> HostTransport for F
where
    F: Fn(CallEnvelope) -> Result<(), TransportError> + Send + Sync,
{
    fn post_message(&self, envelope: CallEnvelope) -> Result<(), TransportError> {
        self(envelope)
    }
}
