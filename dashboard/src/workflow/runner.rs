use crate::workflow::config::DashboardConfig;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use wardrivecore::analysis::{
    authentication_distribution, channel_distribution, device_type_split,
    encryption_distribution, frequency_band_split, radio_type_distribution, signal_histogram,
    Bucket,
};
use wardrivecore::cluster::{ClusterEngine, EngineConfig, RenderPlan};
use wardrivecore::filter::{filter_records, AuthFilter};
use wardrivecore::ingest::{load_all, CsvSource, IngestReport};
use wardrivecore::loader::ProgressiveLoader;
use wardrivecore::records::AccessPointRecord;

/// Map view state a client can change at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewRequest {
    pub zoom: Option<u8>,
    pub auth_filter: AuthFilter,
    pub search: String,
}

impl ViewRequest {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            zoom: Some(config.map.zoom),
            auth_filter: config.map.auth_filter,
            search: config.map.search_query.clone(),
        }
    }
}

/// Every chart aggregate in one bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSet {
    pub authentication: Vec<Bucket>,
    pub encryption: Vec<Bucket>,
    pub channels: Vec<Bucket>,
    pub signal_strength: Vec<Bucket>,
    pub device_type: Vec<Bucket>,
    pub frequency_band: Vec<Bucket>,
    pub radio_type: Vec<Bucket>,
}

pub fn analyze(records: &[AccessPointRecord]) -> AnalysisSet {
    AnalysisSet {
        authentication: authentication_distribution(records),
        encryption: encryption_distribution(records),
        channels: channel_distribution(records),
        signal_strength: signal_histogram(records),
        device_type: device_type_split(records),
        frequency_band: frequency_band_split(records),
        radio_type: radio_type_distribution(records),
    }
}

pub struct WorkflowResult {
    pub total_networks: usize,
    pub filtered_networks: usize,
    pub rows_rejected: usize,
    pub sources_failed: usize,
    pub skipped_markers: usize,
    pub analysis: AnalysisSet,
    pub plan: RenderPlan,
}

/// Owns one ingestion pass and rebuilds views over it. The record
/// collection lives for the lifetime of the runner; `ingest` replaces
/// it wholesale.
#[derive(Clone)]
pub struct Runner {
    config: DashboardConfig,
    report: Arc<RwLock<IngestReport>>,
}

impl Runner {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            report: Arc::new(RwLock::new(IngestReport::default())),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Loads every configured CSV source and replaces the held
    /// collection. Returns (records, rejected rows, failed sources).
    pub async fn ingest(&self) -> (usize, usize, usize) {
        let sources: Vec<CsvSource> = self
            .config
            .sources
            .iter()
            .map(|path| CsvSource::Path(path.clone()))
            .collect();
        let report = load_all(&sources).await;
        let summary = (
            report.records.len(),
            report.rows_rejected,
            report.sources_failed,
        );
        if let Ok(mut guard) = self.report.write() {
            *guard = report;
        }
        summary
    }

    /// Replaces the held collection directly; used for generated data.
    pub fn seed(&self, records: Vec<AccessPointRecord>) {
        if let Ok(mut guard) = self.report.write() {
            *guard = IngestReport {
                records,
                ..Default::default()
            };
        }
    }

    /// Builds the dashboard state for one view: aggregates over the
    /// whole collection, filter and cluster for the map.
    pub async fn execute(&self, view: &ViewRequest) -> anyhow::Result<WorkflowResult> {
        let (records, rows_rejected, sources_failed) = {
            let guard = self
                .report
                .read()
                .map_err(|_| anyhow::anyhow!("ingest collection lock poisoned"))?;
            (
                guard.records.clone(),
                guard.rows_rejected,
                guard.sources_failed,
            )
        };

        let analysis = analyze(&records);
        let filtered = filter_records(&records, view.auth_filter, &view.search);

        let engine_config = EngineConfig {
            zoom: view.zoom.unwrap_or(self.config.map.zoom),
            ..self.config.to_engine_config()
        };
        let engine = Arc::new(Mutex::new(ClusterEngine::new(engine_config)));
        let loader =
            ProgressiveLoader::new(engine.clone()).with_batch_size(self.config.batch_size);
        let outcome = loader.admit(filtered.clone()).await;

        let plan = engine.lock().await.render_plan();

        Ok(WorkflowResult {
            total_networks: records.len(),
            filtered_networks: filtered.len(),
            rows_rejected,
            sources_failed,
            skipped_markers: outcome.skipped,
            analysis,
            plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn end_to_end_partial_failure_keeps_row_order() {
        let mut good = NamedTempFile::new().unwrap();
        good.write_all(
            b"SSID,BSSID,SIGNAL,AUTHENTICATION,LATITUDE,LONGITUDE\n\
              one,aa:bb:cc:dd:ee:01,-45,WPA2,17.90,102.60\n\
              two,aa:bb:cc:dd:ee:02,-55,WPA2,17.91,102.61\n\
              dead,aa:bb:cc:dd:ee:03,-65,WPA2,0,0\n\
              three,aa:bb:cc:dd:ee:04,-75,Open,17.92,102.62\n",
        )
        .unwrap();

        let mut config = DashboardConfig::from_args(
            vec![
                good.path().to_path_buf(),
                PathBuf::from("/nonexistent/zone-b.csv"),
            ],
            Some(7),
        );
        config.batch_size = 2;
        let runner = Runner::new(config);

        let (total, rejected, failed) = runner.ingest().await;
        assert_eq!((total, rejected, failed), (3, 1, 1));

        let result = runner.execute(&ViewRequest::default()).await.unwrap();
        assert_eq!(result.total_networks, 3);
        assert_eq!(result.filtered_networks, 3);
        assert_eq!(result.sources_failed, 1);
        assert_eq!(result.plan.zoom, 7);
    }

    #[tokio::test]
    async fn view_filter_narrows_the_plan_but_not_the_charts() {
        let runner = Runner::new(DashboardConfig::default());
        let mut records = Vec::new();
        for i in 0..6 {
            records.push(AccessPointRecord {
                ssid: format!("net-{i}"),
                bssid: format!("aa:bb:cc:dd:ee:{i:02}"),
                manufacturer: None,
                signal_dbm: Some(-60.0),
                authentication: if i % 2 == 0 { "WPA2" } else { "Open" }.into(),
                encryption: None,
                radio_type: None,
                channel: Some(6),
                frequency_mhz: None,
                latitude: 17.9 + i as f64 * 0.001,
                longitude: 102.6,
                source: None,
            });
        }
        runner.seed(records);

        let view = ViewRequest {
            zoom: Some(8),
            auth_filter: AuthFilter::Wpa2,
            search: String::new(),
        };
        let result = runner.execute(&view).await.unwrap();
        assert_eq!(result.total_networks, 6);
        assert_eq!(result.filtered_networks, 3);
        // Charts still cover the whole collection.
        assert_eq!(
            result.analysis.authentication.iter().map(|b| b.count).sum::<usize>(),
            6
        );
    }
}
