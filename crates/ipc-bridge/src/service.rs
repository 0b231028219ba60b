//! Invocation Façade - one async call over the one-way host channel.
//!
//! `invoke` registers a success and an error slot, posts an envelope naming
//! both, and returns a [`PendingCall`] that settles when the host invokes
//! either slot.

use crate::domain::config::BridgeConfig;
use crate::domain::envelope::{normalize_args, CallEnvelope};
use crate::error::{CallError, CallResult, ConfigError};
use crate::pending::{CallSlots, PendingCall};
use crate::ports::HostTransport;
use crate::registry::CallbackRegistry;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Tracing target for the outgoing envelope emission.
pub const ENVELOPE_TARGET: &str = "ipc_bridge::envelope";

type Settle = Arc<Mutex<Option<oneshot::Sender<CallResult>>>>;

/// Request/response façade over a [`HostTransport`].
pub struct IpcBridge {
    /// Namespace holding the response slots
    registry: Arc<CallbackRegistry>,
    /// Host channel; `None` until attached
    transport: RwLock<Option<Arc<dyn HostTransport>>>,
    /// Runtime options
    config: BridgeConfig,
}

impl IpcBridge {
    /// Create a bridge with no transport attached. Calls reject with
    /// [`CallError::BridgeUnavailable`] until one is.
    pub fn new(registry: Arc<CallbackRegistry>) -> Self {
        Self {
            registry,
            transport: RwLock::new(None),
            config: BridgeConfig::default(),
        }
    }

    /// Create a bridge posting to `transport`.
    pub fn with_transport(
        registry: Arc<CallbackRegistry>,
        transport: Arc<dyn HostTransport>,
    ) -> Self {
        let bridge = Self::new(registry);
        bridge.attach_transport(transport);
        bridge
    }

    /// Builder-style method to set the configuration.
    ///
    /// Fails if `config` does not pass [`BridgeConfig::validate`].
    pub fn with_config(mut self, config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Attach (or replace) the host transport.
    pub fn attach_transport(&self, transport: Arc<dyn HostTransport>) {
        *self.transport.write() = Some(transport);
        debug!("Host transport attached");
    }

    /// Detach the host transport, returning it if one was attached.
    pub fn detach_transport(&self) -> Option<Arc<dyn HostTransport>> {
        let previous = self.transport.write().take();
        if previous.is_some() {
            debug!("Host transport detached");
        }
        previous
    }

    /// Tear the bridge down: detach the transport and drop every live slot.
    ///
    /// Every call still waiting rejects with [`CallError::Abandoned`] and new
    /// calls reject with [`CallError::BridgeUnavailable`]. Returns the number
    /// of slots released.
    pub fn shutdown(&self) -> usize {
        self.detach_transport();
        let released = self.registry.clear();
        info!(released = released, "IPC bridge shut down");
        released
    }

    /// Whether a transport is attached
    pub fn is_available(&self) -> bool {
        self.transport.read().is_some()
    }

    /// The registry the host delivers responses to.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Send `cmd` with positional `args` and return the pending result.
    ///
    /// Without a transport the call is rejected immediately and no slot is
    /// allocated. Otherwise both slots are registered, the envelope is
    /// logged at debug level and posted once.
    pub fn invoke(&self, cmd: &str, args: Vec<Value>) -> PendingCall {
        let Some(transport) = self.transport.read().clone() else {
            debug!(cmd = cmd, "No host transport attached");
            return PendingCall::rejected(CallError::BridgeUnavailable);
        };

        let (sender, receiver) = oneshot::channel();
        let settle: Settle = Arc::new(Mutex::new(Some(sender)));

        let on_success = {
            let settle = settle.clone();
            move |value: Value| settle_once(&settle, Ok(value))
        };
        let on_error = move |value: Value| settle_once(&settle, Err(CallError::Host(value)));

        let slots = CallSlots {
            result_id: self.registry.register_once(on_success).slot_name(),
            error_id: self.registry.register_once(on_error).slot_name(),
        };
        let envelope = CallEnvelope::new(
            cmd,
            slots.result_id.clone(),
            slots.error_id.clone(),
            args,
        );

        debug!(target: ENVELOPE_TARGET, envelope = ?envelope, "Posting call envelope");

        if let Err(e) = transport.post_message(envelope) {
            self.registry.remove(&slots.result_id);
            self.registry.remove(&slots.error_id);
            warn!(cmd = cmd, error = %e, "Host transport rejected envelope");
            return PendingCall::rejected(CallError::Transport(e));
        }

        PendingCall::waiting(
            receiver,
            slots,
            self.registry.clone(),
            self.config.call_timeout,
        )
    }

    /// Like [`invoke`](Self::invoke), accepting any serializable arguments.
    ///
    /// `()`/`None` send no arguments, a sequence is sent element by element
    /// and any other value is sent as the single argument.
    pub fn invoke_with<A>(&self, cmd: &str, args: A) -> PendingCall
    where
        A: Serialize,
    {
        match serde_json::to_value(args) {
            Ok(value) => self.invoke(cmd, normalize_args(value)),
            Err(e) => PendingCall::rejected(CallError::Encode(e)),
        }
    }

    /// Await the call and decode the host result into `T`.
    pub async fn invoke_typed<T, A>(&self, cmd: &str, args: A) -> CallResult<T>
    where
        T: DeserializeOwned,
        A: Serialize,
    {
        let raw = self.invoke_with(cmd, args).await?;
        serde_json::from_value(raw).map_err(CallError::Decode)
    }
}

impl std::fmt::Debug for IpcBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcBridge")
            .field("registry", &self.registry)
            .field("available", &self.is_available())
            .field("config", &self.config)
            .finish()
    }
}

/// Settle the call if nobody has yet. A second settlement is dropped.
fn settle_once(settle: &Settle, outcome: CallResult) {
    match settle.lock().take() {
        Some(sender) => {
            // Receiver gone means the caller dropped the pending call.
            if sender.send(outcome).is_err() {
                debug!("Pending call dropped before its response arrived");
            }
        }
        None => debug!("Ignoring second settlement of a finished call"),
    }
}
