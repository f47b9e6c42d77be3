use std::sync::Mutex;

/// Counters for the progressive admission path. Shared between the
/// loader task and whoever reads the diagnostics.
pub struct AdmissionMetrics {
    inner: Mutex<Metrics>,
}

struct Metrics {
    admitted: usize,
    skipped: usize,
    teardowns: usize,
}

impl AdmissionMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                admitted: 0,
                skipped: 0,
                teardowns: 0,
            }),
        }
    }

    pub fn record_admitted(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.admitted += count;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    pub fn record_teardown(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.teardowns += 1;
        }
    }

    /// (admitted, skipped, teardowns)
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.admitted, metrics.skipped, metrics.teardowns)
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for AdmissionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
