//! Greedy grid clustering of admitted records at one zoom level.
//!
//! Each incoming point joins the nearest existing cluster whose centre
//! lies within the zoom-dependent pixel radius, or founds a new cluster.
//! Clusters are never mutated individually after a zoom change; the
//! index rebuilds from scratch instead.

use crate::cluster::projection::{project, PixelPoint};
use crate::prelude::{ClusterError, ClusterResult, MarkerSink};
use crate::records::AccessPointRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ClusterId = u64;

/// Geographic bounding box of a cluster's members.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    fn around(latitude: f64, longitude: f64) -> Self {
        Self {
            south: latitude,
            west: longitude,
            north: latitude,
            east: longitude,
        }
    }

    fn extend(&mut self, latitude: f64, longitude: f64) {
        self.south = self.south.min(latitude);
        self.west = self.west.min(longitude);
        self.north = self.north.max(latitude);
        self.east = self.east.max(longitude);
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// One cluster: member records, running centroid, and bounds.
#[derive(Debug, Clone)]
pub struct ClusterNode {
    pub id: ClusterId,
    pub members: Vec<AccessPointRecord>,
    pub bounds: GeoBounds,
    centroid_lat: f64,
    centroid_lng: f64,
    anchor: PixelPoint,
}

impl ClusterNode {
    fn found(id: ClusterId, record: AccessPointRecord, anchor: PixelPoint) -> Self {
        let bounds = GeoBounds::around(record.latitude, record.longitude);
        Self {
            id,
            centroid_lat: record.latitude,
            centroid_lng: record.longitude,
            bounds,
            members: vec![record],
            anchor,
        }
    }

    fn absorb(&mut self, record: AccessPointRecord) {
        let n = self.members.len() as f64;
        self.centroid_lat = (self.centroid_lat * n + record.latitude) / (n + 1.0);
        self.centroid_lng = (self.centroid_lng * n + record.longitude) / (n + 1.0);
        self.bounds.extend(record.latitude, record.longitude);
        self.members.push(record);
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn centroid(&self) -> (f64, f64) {
        (self.centroid_lat, self.centroid_lng)
    }
}

/// Pixel radius for a zoom level: wide when zoomed out so clusters
/// coalesce, narrow when zoomed in so they separate.
pub fn radius_for_zoom(zoom: u8) -> f64 {
    match zoom {
        0..=6 => 80.0,
        7..=10 => 60.0,
        11..=14 => 45.0,
        15..=16 => 30.0,
        _ => 15.0,
    }
}

pub struct ClusterIndex {
    zoom: u8,
    radius_px: f64,
    clusters: Vec<ClusterNode>,
    /// Founding-position cell to cluster slot; neighbourhood lookup only
    /// has to scan the 3x3 cells around an incoming point.
    grid: HashMap<(i64, i64), Vec<usize>>,
    next_id: ClusterId,
    total: usize,
}

impl ClusterIndex {
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            radius_px: radius_for_zoom(zoom),
            clusters: Vec::new(),
            grid: HashMap::new(),
            next_id: 0,
            total: 0,
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn clusters(&self) -> &[ClusterNode] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&ClusterNode> {
        self.clusters.iter().find(|node| node.id == id)
    }

    fn cell(&self, point: &PixelPoint) -> (i64, i64) {
        (
            (point.x / self.radius_px).floor() as i64,
            (point.y / self.radius_px).floor() as i64,
        )
    }

    fn nearest_within_radius(&self, point: &PixelPoint) -> Option<usize> {
        let (cx, cy) = self.cell(point);
        let mut best: Option<(usize, f64)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(slots) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &slot in slots {
                    let anchor = &self.clusters[slot].anchor;
                    let distance = anchor.distance(point);
                    if distance <= self.radius_px
                        && best.map_or(true, |(_, d)| distance < d)
                    {
                        best = Some((slot, distance));
                    }
                }
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// Rebuilds the whole index at a new zoom level. The only update
    /// path on zoom change; clusters are not migrated individually.
    pub fn rebuild_at_zoom(&mut self, zoom: u8) {
        let records: Vec<AccessPointRecord> = self
            .clusters
            .drain(..)
            .flat_map(|node| node.members)
            .collect();
        self.zoom = zoom;
        self.radius_px = radius_for_zoom(zoom);
        self.grid.clear();
        self.next_id = 0;
        self.total = 0;
        for record in records {
            // Records already admitted once cannot fail re-insertion.
            let _ = MarkerSink::insert(self, &record);
        }
    }
}

impl MarkerSink for ClusterIndex {
    fn insert(&mut self, record: &AccessPointRecord) -> ClusterResult<()> {
        if !record.latitude.is_finite() || !record.longitude.is_finite() {
            return Err(ClusterError::InvalidMarker(format!(
                "non-finite position for {}",
                record.bssid
            )));
        }

        let point = project(record.latitude, record.longitude, self.zoom);
        match self.nearest_within_radius(&point) {
            Some(slot) => self.clusters[slot].absorb(record.clone()),
            None => {
                let id = self.next_id;
                self.next_id += 1;
                let slot = self.clusters.len();
                self.clusters.push(ClusterNode::found(id, record.clone(), point));
                let cell = self.cell(&point);
                self.grid.entry(cell).or_default().push(slot);
            }
        }
        self.total += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.clusters.clear();
        self.grid.clear();
        self.next_id = 0;
        self.total = 0;
    }

    fn len(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(latitude: f64, longitude: f64) -> AccessPointRecord {
        AccessPointRecord {
            ssid: "net".into(),
            bssid: "aa:bb:cc:dd:ee:ff".into(),
            manufacturer: None,
            signal_dbm: Some(-60.0),
            authentication: "WPA2".into(),
            encryption: None,
            radio_type: None,
            channel: None,
            frequency_mhz: None,
            latitude,
            longitude,
            source: None,
        }
    }

    #[test]
    fn nearby_points_share_a_cluster_at_low_zoom() {
        let mut index = ClusterIndex::new(7);
        index.insert(&record(17.9757, 102.6369)).unwrap();
        index.insert(&record(17.9761, 102.6380)).unwrap();
        assert_eq!(index.clusters().len(), 1);
        assert_eq!(index.clusters()[0].count(), 2);
    }

    #[test]
    fn distant_points_found_separate_clusters() {
        let mut index = ClusterIndex::new(10);
        index.insert(&record(17.9757, 102.6369)).unwrap();
        index.insert(&record(19.8845, 102.1348)).unwrap();
        assert_eq!(index.clusters().len(), 2);
    }

    #[test]
    fn rebuild_at_higher_zoom_separates_a_coalesced_cluster() {
        let mut index = ClusterIndex::new(5);
        index.insert(&record(17.9757, 102.6369)).unwrap();
        index.insert(&record(17.9950, 102.6800)).unwrap();
        assert_eq!(index.clusters().len(), 1);

        index.rebuild_at_zoom(16);
        assert_eq!(index.len(), 2);
        assert_eq!(index.clusters().len(), 2);
    }

    #[test]
    fn non_finite_position_is_rejected_per_marker() {
        let mut index = ClusterIndex::new(10);
        assert!(index.insert(&record(f64::NAN, 102.6369)).is_err());
        index.insert(&record(17.9757, 102.6369)).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn bounds_cover_all_members() {
        let mut index = ClusterIndex::new(7);
        index.insert(&record(17.90, 102.60)).unwrap();
        index.insert(&record(17.98, 102.70)).unwrap();
        let bounds = index.clusters()[0].bounds;
        assert_eq!(bounds.south, 17.90);
        assert_eq!(bounds.north, 17.98);
        assert_eq!(bounds.west, 102.60);
        assert_eq!(bounds.east, 102.70);
    }
}
