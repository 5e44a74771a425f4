use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Steady-state instrumentation for one engine instance. All counters are
/// plain atomics so a concurrent sampler never blocks `learn`/`predict` —
/// correctness does not depend on this, since at most one of those is ever
/// in flight per engine, but observability overhead should stay off
/// that hot path regardless.
#[derive(Debug, Default)]
pub struct Metrics {
    learn_calls: AtomicU64,
    predict_calls: AtomicU64,
    categories_created: AtomicU64,
    vigilance_rejections: AtomicU64,
    match_tracking_escalations: AtomicU64,
    chunks_emitted: AtomicU64,
    total_learn_nanos: AtomicU64,
}

/// Point-in-time read of `Metrics`, safe to hand to a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    pub learn_calls: u64,
    pub predict_calls: u64,
    pub categories_created: u64,
    pub vigilance_rejections: u64,
    pub match_tracking_escalations: u64,
    pub chunks_emitted: u64,
    pub mean_learn_latency: Duration,
}

impl Metrics {
    pub fn record_learn(&self, elapsed: Duration) {
        self.learn_calls.fetch_add(1, Ordering::Relaxed);
        self.total_learn_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_predict(&self) {
        self.predict_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_category_created(&self) {
        self.categories_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_vigilance_rejection(&self) {
        self.vigilance_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_match_tracking_escalation(&self) {
        self.match_tracking_escalations
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_chunk_emitted(&self) {
        self.chunks_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Snapshot {
        let learn_calls = self.learn_calls.load(Ordering::Relaxed);
        let total_nanos = self.total_learn_nanos.load(Ordering::Relaxed);
        let mean_learn_latency = if learn_calls > 0 {
            Duration::from_nanos(total_nanos / learn_calls)
        } else {
            Duration::ZERO
        };
        Snapshot {
            learn_calls,
            predict_calls: self.predict_calls.load(Ordering::Relaxed),
            categories_created: self.categories_created.load(Ordering::Relaxed),
            vigilance_rejections: self.vigilance_rejections.load(Ordering::Relaxed),
            match_tracking_escalations: self.match_tracking_escalations.load(Ordering::Relaxed),
            chunks_emitted: self.chunks_emitted.load(Ordering::Relaxed),
            mean_learn_latency,
        }
    }
}
