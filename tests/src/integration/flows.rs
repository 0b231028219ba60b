//! # Call Flows
//!
//! Single calls through `IpcBridge` and a `MockHost`:
//!
//! 1. **Success**: host invokes `result_id`, call resolves with the raw value
//! 2. **Error**: host invokes `error_id`, call rejects with the raw value
//! 3. **Unknown command**: host reports it through `error_id`
//! 4. **Silent host**: call stays pending, slots stay live
//! 5. **Serialized transport**: same flows over JSON text

#[cfg(test)]
mod tests {
    use crate::harness::{init_test_logging, HostError, MockHost};
    use ipc_bridge::{
        BridgeConfig, CallError, CallbackRegistry, ChannelTransport, IpcBridge,
        JsonChannelTransport,
    };
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Fixture {
        bridge: IpcBridge,
        host: Arc<MockHost>,
        registry: Arc<CallbackRegistry>,
    }

    fn fixture() -> Fixture {
        init_test_logging();

        let registry = Arc::new(CallbackRegistry::new());
        let (transport, rx) = ChannelTransport::channel();
        let bridge = IpcBridge::with_transport(registry.clone(), Arc::new(transport));
        let host = Arc::new(MockHost::new(registry.clone()));

        host.commands()
            .register_fn("ping", |_| Ok(json!("pong")))
            .unwrap();
        host.commands()
            .register_fn("sum", |args| {
                let total: i64 = args.iter().filter_map(Value::as_i64).sum();
                Ok(json!(total))
            })
            .unwrap();
        host.commands()
            .register_fn("fail", |_| Err(HostError::Failed(json!({"code": 7}))))
            .unwrap();
        host.commands()
            .register_fn("echo", |args| Ok(Value::Array(args)))
            .unwrap();

        host.clone().serve(rx);
        Fixture {
            bridge,
            host,
            registry,
        }
    }

    async fn settle(call: ipc_bridge::PendingCall) -> ipc_bridge::CallResult {
        timeout(Duration::from_secs(2), call)
            .await
            .expect("call should settle")
    }

    // =============================================================================
    // SUCCESS / ERROR
    // =============================================================================

    #[tokio::test]
    async fn test_success_resolves_with_host_value() {
        let f = fixture();

        let result = settle(f.bridge.invoke("ping", vec![])).await;

        assert_eq!(result.unwrap(), json!("pong"));
    }

    #[tokio::test]
    async fn test_positional_arguments_reach_host() {
        let f = fixture();

        let result = settle(f.bridge.invoke("sum", vec![json!(1), json!(2), json!(39)])).await;

        assert_eq!(result.unwrap(), json!(42));
        let received = f.host.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].cmd, "sum");
        assert_eq!(received[0].payload, vec![json!(1), json!(2), json!(39)]);
    }

    #[tokio::test]
    async fn test_error_rejects_with_host_value() {
        let f = fixture();

        let err = settle(f.bridge.invoke("fail", vec![])).await.unwrap_err();

        assert_eq!(err.into_host_value(), Some(json!({"code": 7})));
    }

    #[tokio::test]
    async fn test_unknown_command_rejects_with_message() {
        let f = fixture();

        let err = settle(f.bridge.invoke("missing", vec![])).await.unwrap_err();

        assert_eq!(
            err.host_value(),
            Some(&json!("Command \"missing\" not found."))
        );
    }

    #[tokio::test]
    async fn test_answered_call_frees_both_slots_except_sibling() {
        let f = fixture();

        let call = f.bridge.invoke("ping", vec![]);
        let slots = call.slots().cloned().unwrap();
        assert!(f.registry.contains(&slots.result_id));
        assert!(f.registry.contains(&slots.error_id));

        settle(call).await.unwrap();

        // The invoked slot is gone; its unused sibling stays registered.
        assert!(!f.registry.contains(&slots.result_id));
        assert!(f.registry.contains(&slots.error_id));
    }

    #[tokio::test]
    async fn test_envelope_names_slots_by_prefix() {
        let f = fixture();

        let call = f.bridge.invoke("ping", vec![]);
        let slots = call.slots().cloned().unwrap();
        settle(call).await.unwrap();

        let envelope = &f.host.received()[0];
        assert_eq!(envelope.result_id, slots.result_id);
        assert_eq!(envelope.error_id, slots.error_id);
        assert!(envelope.result_id.as_str().starts_with('_'));
        assert_ne!(envelope.result_id, envelope.error_id);
    }

    // =============================================================================
    // MISBEHAVING HOST
    // =============================================================================

    #[tokio::test]
    async fn test_silent_host_leaves_call_pending() {
        let f = fixture();
        f.host.silence("ping");

        let call = f.bridge.invoke("ping", vec![]);
        let slots = call.slots().cloned().unwrap();

        let outcome = timeout(Duration::from_millis(50), call).await;

        assert!(outcome.is_err(), "call should still be pending");
        assert!(f.registry.contains(&slots.result_id));
        assert!(f.registry.contains(&slots.error_id));
    }

    #[tokio::test]
    async fn test_silent_host_with_configured_timeout() {
        init_test_logging();
        let registry = Arc::new(CallbackRegistry::new());
        let (transport, rx) = ChannelTransport::channel();
        let bridge = IpcBridge::with_transport(registry.clone(), Arc::new(transport))
            .with_config(BridgeConfig::default().with_call_timeout(Duration::from_millis(30)))
            .unwrap();
        let host = Arc::new(MockHost::new(registry.clone()));
        host.silence("ping");
        host.clone().serve(rx);

        let result = settle(bridge.invoke("ping", vec![])).await;

        assert!(matches!(result, Err(CallError::Timeout(_))));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_releases_silent_calls() {
        let f = fixture();
        f.host.silence("ping");

        let first = f.bridge.invoke("ping", vec![]);
        let second = f.bridge.invoke("ping", vec![json!(2)]);
        assert_eq!(f.registry.len(), 4);

        f.bridge.shutdown();

        assert!(matches!(settle(first).await, Err(CallError::Abandoned)));
        assert!(matches!(settle(second).await, Err(CallError::Abandoned)));
        assert!(f.registry.is_empty());
    }

    #[tokio::test]
    async fn test_double_reply_settles_once() {
        let f = fixture();
        f.host.set_double_reply(true);

        let result = settle(f.bridge.invoke("ping", vec![])).await;

        assert_eq!(result.unwrap(), json!("pong"));
        // Both one-shot slots were consumed by the two replies.
        assert!(f.registry.is_empty());
    }

    // =============================================================================
    // TYPED AND SERIALIZED CALLS
    // =============================================================================

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[tokio::test]
    async fn test_typed_call_with_single_argument() {
        let f = fixture();

        let echoed: Vec<Point> = f
            .bridge
            .invoke_typed("echo", Point { x: 1, y: 2 })
            .await
            .unwrap();

        assert_eq!(echoed, vec![Point { x: 1, y: 2 }]);
    }

    #[tokio::test]
    async fn test_typed_call_without_arguments() {
        let f = fixture();

        let echoed: Vec<Value> = f.bridge.invoke_typed("echo", ()).await.unwrap();

        assert!(echoed.is_empty());
    }

    #[tokio::test]
    async fn test_typed_call_rejects_mismatched_result() {
        let f = fixture();

        let result: Result<i64, _> = f.bridge.invoke_typed("ping", ()).await;

        assert!(matches!(result, Err(CallError::Decode(_))));
    }

    #[tokio::test]
    async fn test_json_transport_flow() {
        init_test_logging();
        let registry = Arc::new(CallbackRegistry::new());
        let (transport, rx) = JsonChannelTransport::channel();
        let bridge = IpcBridge::with_transport(registry.clone(), Arc::new(transport));
        let host = Arc::new(MockHost::new(registry));
        host.commands()
            .register_fn("ping", |_| Ok(json!("pong")))
            .unwrap();
        host.clone().serve_json(rx);

        let result = settle(bridge.invoke_with("ping", json!(null))).await;

        assert_eq!(result.unwrap(), json!("pong"));
        assert!(host.received()[0].payload.is_empty());
    }

    #[tokio::test]
    async fn test_detached_bridge_never_reaches_host() {
        let f = fixture();
        f.bridge.detach_transport();

        let result = f.bridge.invoke("ping", vec![]).await;

        assert!(matches!(result, Err(CallError::BridgeUnavailable)));
        assert!(f.host.received().is_empty());
        assert!(f.registry.is_empty());
    }
}
