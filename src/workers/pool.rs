use std::sync::Arc;

/// An explicit, injectable worker pool collaborator. An engine either
/// builds its own (and must shut it down) or borrows one a caller built
/// (and must never shut it down) — the `owned` flag is exactly the
/// bookkeeping `close()` needs to tell the two apart.
pub struct Pool {
    inner: Arc<rayon::ThreadPool>,
    owned: bool,
}

impl Pool {
    /// Builds a new pool with `threads` workers (0 defers to rayon's own
    /// default, which is the number of logical CPUs).
    pub fn build(threads: usize) -> Self {
        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("failed to build worker pool");
        Self {
            inner: Arc::new(inner),
            owned: true,
        }
    }

    /// Wraps a pool the caller owns; this `Pool` will never shut it down.
    pub fn borrowed(inner: Arc<rayon::ThreadPool>) -> Self {
        Self {
            inner,
            owned: false,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn install<R>(&self, f: impl FnOnce() -> R + Send) -> R
    where
        R: Send,
    {
        self.inner.install(f)
    }

    /// Drains outstanding work. Rayon pools have no queue to drain beyond
    /// the scope of `install`, so this is a no-op kept for interface
    /// symmetry with `close()`'s (a) drain, (b) release, (c) clear-caches
    /// sequence; a future pool backend with a real task queue would do real
    /// work here.
    pub fn drain(&self) {}
}

impl Drop for Pool {
    fn drop(&mut self) {
        // rayon::ThreadPool shuts its threads down on drop of the last Arc;
        // nothing extra is required, but we only ever hold the owning Arc
        // here when `owned` is true — a borrowed pool's Arc is shared with
        // its builder and dropping our clone doesn't tear it down.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_pool_reports_ownership() {
        let pool = Pool::build(2);
        assert!(pool.is_owned());
    }

    #[test]
    fn borrowed_pool_reports_non_ownership() {
        let shared = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap());
        let pool = Pool::borrowed(shared);
        assert!(!pool.is_owned());
    }

    #[test]
    fn install_runs_closure_and_returns_value() {
        let pool = Pool::build(2);
        let result = pool.install(|| 2 + 2);
        assert_eq!(result, 4);
    }
}
