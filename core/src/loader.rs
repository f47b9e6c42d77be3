//! Progressive marker admission: feeds large record sets into a
//! clustering index in bounded batches, yielding to the scheduler
//! between batches so a render loop never starves.
//!
//! Every admission carries a generation number taken synchronously at
//! the call site. A newer call supersedes any older in-flight loop,
//! which aborts at its next batch boundary.

use crate::prelude::MarkerSink;
use crate::records::AccessPointRecord;
use crate::telemetry::{AdmissionMetrics, LogManager};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 200;
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(250);

/// What one admission call ended up doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmitOutcome {
    pub admitted: usize,
    pub skipped: usize,
    /// A newer admission arrived; this one stopped early (or, for a
    /// debounced call, never started).
    pub superseded: bool,
}

pub struct ProgressiveLoader<S> {
    sink: Arc<Mutex<S>>,
    metrics: Arc<AdmissionMetrics>,
    generation: Arc<AtomicU64>,
    logger: LogManager,
    batch_size: usize,
    quiet_window: Duration,
}

impl<S: MarkerSink> ProgressiveLoader<S> {
    pub fn new(sink: Arc<Mutex<S>>) -> Self {
        Self {
            sink,
            metrics: Arc::new(AdmissionMetrics::new()),
            generation: Arc::new(AtomicU64::new(0)),
            logger: LogManager::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            quiet_window: DEFAULT_QUIET_WINDOW,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_quiet_window(mut self, quiet_window: Duration) -> Self {
        self.quiet_window = quiet_window;
        self
    }

    pub fn metrics(&self) -> Arc<AdmissionMetrics> {
        self.metrics.clone()
    }

    fn register(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Replaces the sink's contents with `records`.
    ///
    /// The generation is claimed before the returned future runs, so
    /// call order alone decides which admission wins.
    pub fn admit(
        &self,
        records: Vec<AccessPointRecord>,
    ) -> impl Future<Output = AdmitOutcome> + '_ {
        let generation = self.register();
        self.run_admission(generation, records)
    }

    /// Like [`admit`](Self::admit), but waits out a quiet window first;
    /// only the newest call within the window touches the index at all.
    /// Rapid filter typing collapses into one teardown and rebuild.
    pub fn admit_debounced(
        &self,
        records: Vec<AccessPointRecord>,
    ) -> impl Future<Output = AdmitOutcome> + '_ {
        let generation = self.register();
        async move {
            tokio::time::sleep(self.quiet_window).await;
            if !self.is_current(generation) {
                return AdmitOutcome {
                    superseded: true,
                    ..Default::default()
                };
            }
            self.run_admission(generation, records).await
        }
    }

    async fn run_admission(&self, generation: u64, records: Vec<AccessPointRecord>) -> AdmitOutcome {
        let mut outcome = AdmitOutcome::default();

        {
            let mut sink = self.sink.lock().await;
            sink.clear();
        }
        self.metrics.record_teardown();

        for batch in records.chunks(self.batch_size) {
            if !self.is_current(generation) {
                outcome.superseded = true;
                self.logger.record(&format!(
                    "admission {} superseded after {} records",
                    generation, outcome.admitted
                ));
                return outcome;
            }

            {
                let mut sink = self.sink.lock().await;
                let mut admitted = 0usize;
                for record in batch {
                    match sink.insert(record) {
                        Ok(()) => admitted += 1,
                        Err(err) => {
                            self.logger.alert(&format!("skipping marker: {}", err));
                            self.metrics.record_skipped();
                            outcome.skipped += 1;
                        }
                    }
                }
                outcome.admitted += admitted;
                self.metrics.record_admitted(admitted);
            }

            // The lock is released before yielding so a render pass can
            // read the partially built index between batches.
            tokio::task::yield_now().await;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{ClusterError, ClusterResult};

    #[derive(Default)]
    struct CountingSink {
        bssids: Vec<String>,
        clears: usize,
    }

    impl MarkerSink for CountingSink {
        fn insert(&mut self, record: &AccessPointRecord) -> ClusterResult<()> {
            if record.bssid == "bad" {
                return Err(ClusterError::InvalidMarker("bad marker".into()));
            }
            self.bssids.push(record.bssid.clone());
            Ok(())
        }

        fn clear(&mut self) {
            self.bssids.clear();
            self.clears += 1;
        }

        fn len(&self) -> usize {
            self.bssids.len()
        }
    }

    fn record(bssid: &str) -> AccessPointRecord {
        AccessPointRecord {
            ssid: "net".into(),
            bssid: bssid.into(),
            manufacturer: None,
            signal_dbm: Some(-60.0),
            authentication: "WPA2".into(),
            encryption: None,
            radio_type: None,
            channel: None,
            frequency_mhz: None,
            latitude: 17.9,
            longitude: 102.6,
            source: None,
        }
    }

    fn batch(prefix: &str, count: usize) -> Vec<AccessPointRecord> {
        (0..count).map(|i| record(&format!("{prefix}-{i}"))).collect()
    }

    #[tokio::test]
    async fn admit_replaces_previous_contents() {
        let sink = Arc::new(Mutex::new(CountingSink::default()));
        let loader = ProgressiveLoader::new(sink.clone()).with_batch_size(3);

        loader.admit(batch("first", 10)).await;
        let outcome = loader.admit(batch("second", 4)).await;

        assert_eq!(outcome.admitted, 4);
        let sink = sink.lock().await;
        assert_eq!(sink.len(), 4);
        assert_eq!(sink.clears, 2);
        assert!(sink.bssids.iter().all(|b| b.starts_with("second")));
    }

    #[tokio::test]
    async fn bad_markers_are_skipped_not_fatal() {
        let sink = Arc::new(Mutex::new(CountingSink::default()));
        let loader = ProgressiveLoader::new(sink.clone());

        let mut records = batch("ok", 3);
        records.insert(1, record("bad"));
        let outcome = loader.admit(records).await;

        assert_eq!(outcome.admitted, 3);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(loader.metrics().snapshot(), (3, 1, 1));
    }

    #[tokio::test]
    async fn newer_admission_supersedes_an_in_flight_one() {
        let sink = Arc::new(Mutex::new(CountingSink::default()));
        let loader = ProgressiveLoader::new(sink.clone()).with_batch_size(1);

        // Generation is claimed at call time, before either future runs.
        let slow = loader.admit(batch("slow", 500));
        let fast = async { loader.admit(batch("fast", 5)).await };
        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);

        assert!(slow_outcome.superseded);
        assert!(!fast_outcome.superseded);
        assert_eq!(fast_outcome.admitted, 5);

        let sink = sink.lock().await;
        assert_eq!(sink.len(), 5);
        assert!(sink.bssids.iter().all(|b| b.starts_with("fast")));
    }

    #[tokio::test]
    async fn debounce_lets_only_the_newest_input_rebuild() {
        let sink = Arc::new(Mutex::new(CountingSink::default()));
        let loader = ProgressiveLoader::new(sink.clone())
            .with_quiet_window(Duration::from_millis(10));

        let first = loader.admit_debounced(batch("stale", 50));
        let second = loader.admit_debounced(batch("final", 7));
        let (first_outcome, second_outcome) = tokio::join!(first, second);

        assert!(first_outcome.superseded);
        assert_eq!(first_outcome.admitted, 0);
        assert_eq!(second_outcome.admitted, 7);

        let sink = sink.lock().await;
        // The superseded call never tore the index down.
        assert_eq!(sink.clears, 1);
        assert_eq!(sink.len(), 7);
    }
}
