//! Headless clustering engine: consumes the filtered record set and
//! produces a render plan of cluster glyphs plus, for the one expanded
//! cluster, individual markers.
//!
//! Expansion is an explicit two-state machine rather than a tracked
//! "currently expanded" marker reference; every event resolves to a
//! single authoritative state value.

use crate::cluster::icons::{glyph_size_px, IconCache, MarkerIcon};
use crate::cluster::index::{ClusterId, ClusterIndex, ClusterNode, GeoBounds};
use crate::cluster::projection::{project, unproject, PixelPoint};
use crate::prelude::{ClusterError, ClusterResult, MarkerSink};
use crate::records::{AccessPointRecord, SecurityLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Engine knobs, one instance per map view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Clusters above this member count zoom to bounds instead of
    /// expanding; expanding hundreds of markers at once is useless.
    pub expand_ceiling: usize,
    /// Radius in pixels of the circle coincident markers spread onto.
    pub spiderfy_leg_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zoom: 7,
            min_zoom: 5,
            max_zoom: 18,
            expand_ceiling: 500,
            spiderfy_leg_px: 20.0,
        }
    }
}

/// At most one cluster is expanded at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandState {
    Collapsed,
    Expanded(ClusterId),
}

/// What a cluster click resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineAction {
    Expanded(ClusterId),
    Collapsed,
    ZoomToBounds(GeoBounds),
}

/// Visible cluster glyph, sized by member count tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterGlyph {
    pub id: ClusterId,
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
    pub size_px: u32,
}

/// Individual marker, visible for singletons and the expanded cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerGlyph {
    pub latitude: f64,
    pub longitude: f64,
    pub ssid: String,
    pub bssid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_dbm: Option<f64>,
    pub security: SecurityLevel,
    pub icon: MarkerIcon,
}

/// Everything a map front end needs to draw one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderPlan {
    pub zoom: u8,
    pub glyphs: Vec<ClusterGlyph>,
    pub markers: Vec<MarkerGlyph>,
}

pub struct ClusterEngine {
    config: EngineConfig,
    index: ClusterIndex,
    expand: ExpandState,
    icons: IconCache,
}

impl ClusterEngine {
    pub fn new(config: EngineConfig) -> Self {
        let zoom = config.zoom.clamp(config.min_zoom, config.max_zoom);
        Self {
            index: ClusterIndex::new(zoom),
            expand: ExpandState::Collapsed,
            icons: IconCache::new(),
            config,
        }
    }

    pub fn zoom(&self) -> u8 {
        self.index.zoom()
    }

    pub fn expand_state(&self) -> ExpandState {
        self.expand
    }

    /// Zoom change collapses any expansion and rebuilds the index at
    /// the new clustering radius.
    pub fn set_zoom(&mut self, zoom: u8) {
        let zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        if zoom == self.index.zoom() {
            return;
        }
        self.expand = ExpandState::Collapsed;
        self.index.rebuild_at_zoom(zoom);
    }

    /// Resolves a click on a cluster glyph.
    ///
    /// Clicking the expanded cluster collapses it. Clicking another
    /// cluster collapses the old expansion first, then expands the new
    /// one, unless its member count exceeds the ceiling, in which case
    /// the caller is told to zoom into the cluster's bounds instead.
    pub fn click_cluster(&mut self, id: ClusterId) -> ClusterResult<EngineAction> {
        let node = self
            .index
            .cluster(id)
            .ok_or(ClusterError::UnknownCluster(id))?;

        if self.expand == ExpandState::Expanded(id) {
            self.expand = ExpandState::Collapsed;
            return Ok(EngineAction::Collapsed);
        }

        if node.count() > self.config.expand_ceiling {
            let bounds = node.bounds;
            self.expand = ExpandState::Collapsed;
            return Ok(EngineAction::ZoomToBounds(bounds));
        }

        self.expand = ExpandState::Expanded(id);
        Ok(EngineAction::Expanded(id))
    }

    /// An off-marker click collapses the current expansion.
    pub fn click_elsewhere(&mut self) {
        self.expand = ExpandState::Collapsed;
    }

    fn marker_glyph(&mut self, record: &AccessPointRecord, latitude: f64, longitude: f64) -> MarkerGlyph {
        let icon = self.icons.get_or_create(record.signal_tier());
        MarkerGlyph {
            latitude,
            longitude,
            ssid: record.ssid.clone(),
            bssid: record.bssid.clone(),
            signal_dbm: record.signal_dbm,
            security: SecurityLevel::classify(&record.authentication),
            icon: (*icon).clone(),
        }
    }

    /// Spreads members sharing a position (rounded to 6 decimal places)
    /// onto a small circle so each marker stays individually clickable.
    fn spiderfied_positions(&self, node: &ClusterNode) -> Vec<(f64, f64)> {
        let zoom = self.index.zoom();
        let mut groups: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (slot, record) in node.members.iter().enumerate() {
            let key = (
                (record.latitude * 1e6).round() as i64,
                (record.longitude * 1e6).round() as i64,
            );
            groups.entry(key).or_default().push(slot);
        }

        let mut positions = vec![(0.0, 0.0); node.members.len()];
        for slots in groups.values() {
            if slots.len() == 1 {
                let record = &node.members[slots[0]];
                positions[slots[0]] = (record.latitude, record.longitude);
                continue;
            }
            let record = &node.members[slots[0]];
            let center = project(record.latitude, record.longitude, zoom);
            let step = std::f64::consts::TAU / slots.len() as f64;
            for (leg, &slot) in slots.iter().enumerate() {
                let angle = step * leg as f64;
                let offset = PixelPoint {
                    x: center.x + self.config.spiderfy_leg_px * angle.cos(),
                    y: center.y + self.config.spiderfy_leg_px * angle.sin(),
                };
                positions[slot] = unproject(&offset, zoom);
            }
        }
        positions
    }

    /// Builds the current frame: glyphs for collapsed clusters, markers
    /// for singletons and the expanded cluster.
    pub fn render_plan(&mut self) -> RenderPlan {
        let mut plan = RenderPlan {
            zoom: self.index.zoom(),
            ..Default::default()
        };

        let nodes: Vec<ClusterNode> = self.index.clusters().to_vec();
        for node in &nodes {
            if self.expand == ExpandState::Expanded(node.id) {
                let positions = self.spiderfied_positions(node);
                for (record, (latitude, longitude)) in node.members.iter().zip(positions) {
                    plan.markers.push(self.marker_glyph(record, latitude, longitude));
                }
            } else if node.count() == 1 {
                let record = &node.members[0];
                plan.markers
                    .push(self.marker_glyph(record, record.latitude, record.longitude));
            } else {
                let (latitude, longitude) = node.centroid();
                plan.glyphs.push(ClusterGlyph {
                    id: node.id,
                    latitude,
                    longitude,
                    count: node.count(),
                    size_px: glyph_size_px(node.count()),
                });
            }
        }
        plan
    }
}

impl MarkerSink for ClusterEngine {
    fn insert(&mut self, record: &AccessPointRecord) -> ClusterResult<()> {
        self.index.insert(record)
    }

    fn clear(&mut self) {
        self.expand = ExpandState::Collapsed;
        self.index.clear();
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
