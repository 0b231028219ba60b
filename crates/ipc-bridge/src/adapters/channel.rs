//! Channel-backed host transports.
//!
//! `ChannelTransport` forwards envelopes as values; `JsonChannelTransport`
//! forwards them as JSON text for hosts that only accept strings.

use crate::domain::envelope::CallEnvelope;
use crate::error::TransportError;
use crate::ports::HostTransport;
use tokio::sync::mpsc;

/// Posts envelopes onto an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<CallEnvelope>,
}

impl ChannelTransport {
    pub fn new(sender: mpsc::UnboundedSender<CallEnvelope>) -> Self {
        Self { sender }
    }

    /// Create a transport and the receiving end the host reads from.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CallEnvelope>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl HostTransport for ChannelTransport {
    fn post_message(&self, envelope: CallEnvelope) -> Result<(), TransportError> {
        self.sender
            .send(envelope)
            .map_err(|_| TransportError::ChannelClosed)
    }
}

/// Posts envelopes as JSON strings.
#[derive(Debug, Clone)]
pub struct JsonChannelTransport {
    sender: mpsc::UnboundedSender<String>,
}

impl JsonChannelTransport {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl HostTransport for JsonChannelTransport {
    fn post_message(&self, envelope: CallEnvelope) -> Result<(), TransportError> {
        let encoded = envelope
            .to_json()
            .map_err(|e| TransportError::SendFailed(format!("encode failed: {}", e)))?;
        self.sender
            .send(encoded)
            .map_err(|_| TransportError::ChannelClosed)
    }
}
