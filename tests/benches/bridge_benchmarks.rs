//! # IPC Bridge Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | Identifier draw | < 1µs |
//! | Register + invoke one-shot slot | < 5µs |
//! | Invoke + host reply + settle | < 20µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::executor::block_on;
use ipc_bridge::{
    generate_id, CallEnvelope, CallbackRegistry, HostTransport, IpcBridge, TransportError,
};
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock, Weak};

// ============================================================================
// Identifier Generator
// ============================================================================

fn bench_identifier_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifier");

    group.bench_function("generate_id", |b| b.iter(|| black_box(generate_id())));
    group.bench_function("slot_name", |b| {
        let id = generate_id();
        b.iter(|| black_box(id.slot_name()))
    });

    group.finish();
}

// ============================================================================
// Callback Registry
// ============================================================================

fn bench_registry_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    group.bench_function("register_invoke_once", |b| {
        let registry = CallbackRegistry::new();
        b.iter(|| {
            let name = registry.register_once(|v| drop(black_box(v))).slot_name();
            registry.invoke_slot(&name, Value::Null).is_ok()
        })
    });

    // Lookup cost with many live slots
    for live in [100usize, 10_000] {
        let registry = CallbackRegistry::new();
        for _ in 0..live {
            registry.register(None, false);
        }
        let name = registry.register_persistent(|v| drop(black_box(v))).slot_name();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("invoke_persistent", live), &live, |b, _| {
            b.iter(|| registry.invoke_slot(&name, Value::Null).is_ok())
        });
    }

    group.finish();
}

// ============================================================================
// Full call through an in-process host
// ============================================================================

/// Replies on the posting thread, echoing the payload. Drops the unused
/// error slot so the namespace stays flat across iterations.
struct EchoHost {
    registry: OnceLock<Weak<CallbackRegistry>>,
}

impl HostTransport for EchoHost {
    fn post_message(&self, envelope: CallEnvelope) -> Result<(), TransportError> {
        let registry = self
            .registry
            .get()
            .and_then(Weak::upgrade)
            .ok_or(TransportError::ChannelClosed)?;
        registry.remove(&envelope.error_id);
        let _ = registry.invoke_slot(&envelope.result_id, Value::Array(envelope.payload));
        Ok(())
    }
}

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round-trip");

    let registry = Arc::new(CallbackRegistry::new());
    let host = Arc::new(EchoHost {
        registry: OnceLock::new(),
    });
    let _ = host.registry.set(Arc::downgrade(&registry));
    let bridge = IpcBridge::with_transport(registry, host);

    for args in [0usize, 8, 64] {
        let payload: Vec<Value> = (0..args).map(|i| json!(i)).collect();
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("invoke_settle", args), &payload, |b, payload| {
            b.iter(|| black_box(block_on(bridge.invoke("echo", payload.clone())).is_ok()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_identifier_generation,
    bench_registry_operations,
    bench_round_trip,
);

criterion_main!(benches);
