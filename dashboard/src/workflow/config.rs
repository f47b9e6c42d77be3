use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use wardrivecore::cluster::EngineConfig;
use wardrivecore::filter::AuthFilter;

/// Screen corner for map controls.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Recognized map view options, mirroring what the map front end
/// accepts.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewOptions {
    pub center: [f64; 2],
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub show_cluster_button: bool,
    pub cluster_button_corner: Corner,
    pub zoom_control_corner: Corner,
    pub auth_filter: AuthFilter,
    pub search_query: String,
}

impl Default for MapViewOptions {
    fn default() -> Self {
        Self {
            center: [17.9757, 102.6369],
            zoom: 7,
            min_zoom: 5,
            max_zoom: 18,
            show_cluster_button: true,
            cluster_button_corner: Corner::BottomLeft,
            zoom_control_corner: Corner::BottomLeft,
            auth_filter: AuthFilter::All,
            search_query: String::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV sources, ingested in order.
    pub sources: Vec<PathBuf>,
    pub map: MapViewOptions,
    pub batch_size: usize,
    pub quiet_window_ms: u64,
    pub expand_ceiling: usize,
    /// Game-result append log.
    pub results_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            map: MapViewOptions::default(),
            batch_size: 200,
            quiet_window_ms: 250,
            expand_ceiling: 500,
            results_path: PathBuf::from("tools/data/result.json"),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(sources: Vec<PathBuf>, zoom: Option<u8>) -> Self {
        let mut config = Self {
            sources,
            ..Default::default()
        };
        if let Some(zoom) = zoom {
            config.map.zoom = zoom;
        }
        config
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            zoom: self.map.zoom,
            min_zoom: self.map.min_zoom,
            max_zoom: self.map.max_zoom,
            expand_ceiling: self.expand_ceiling,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_engine_config() {
        let cfg = DashboardConfig::from_args(vec![PathBuf::from("zone-a.csv")], Some(9));
        let engine = cfg.to_engine_config();
        assert_eq!(engine.zoom, 9);
        assert_eq!(engine.expand_ceiling, 500);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"sources:\n  - data/zone-a.csv\nmap:\n  zoom: 12\n  auth_filter: wpa2\nbatch_size: 64\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.sources.len(), 1);
        assert_eq!(cfg.map.zoom, 12);
        assert_eq!(cfg.map.auth_filter, AuthFilter::Wpa2);
        assert_eq!(cfg.batch_size, 64);
        // Unlisted fields keep their defaults.
        assert_eq!(cfg.map.max_zoom, 18);
    }
}
