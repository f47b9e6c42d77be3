use crate::workflow::runner::{AnalysisSet, WorkflowResult};
use serde::{Deserialize, Serialize};
use wardrivecore::cluster::RenderPlan;

/// Snapshot the map and chart front ends render from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardModel {
    pub total_networks: usize,
    pub filtered_networks: usize,
    pub rows_rejected: usize,
    pub sources_failed: usize,
    pub skipped_markers: usize,
    pub analysis: AnalysisSet,
    pub plan: RenderPlan,
}

impl From<&WorkflowResult> for DashboardModel {
    fn from(result: &WorkflowResult) -> Self {
        Self {
            total_networks: result.total_networks,
            filtered_networks: result.filtered_networks,
            rows_rejected: result.rows_rejected,
            sources_failed: result.sources_failed,
            skipped_markers: result.skipped_markers,
            analysis: result.analysis.clone(),
            plan: result.plan.clone(),
        }
    }
}

impl DashboardModel {
    /// The view layer shows a "no data" notice instead of a map when
    /// every source failed or yielded nothing.
    pub fn has_data(&self) -> bool {
        self.total_networks > 0
    }
}
