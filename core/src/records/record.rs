use serde::{Deserialize, Serialize};

/// Canonical access-point observation produced by the schema normalizer.
///
/// One CSV row maps to at most one record. Repeated observations of the
/// same BSSID are kept as distinct records; wardriving passes revisit the
/// same network at different times and places.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointRecord {
    pub ssid: String,
    pub bssid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Negative dBm. Absent or unparseable readings stay `None` and
    /// classify into the weakest signal tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_dbm: Option<f64>,
    pub authentication: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    /// Originating file, carried for diagnostics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl AccessPointRecord {
    /// SSID as shown on the map; an empty SSID is a hidden network, not
    /// missing data.
    pub fn display_ssid(&self) -> &str {
        if self.ssid.is_empty() {
            "Hidden Network"
        } else {
            &self.ssid
        }
    }

    /// Marker tier for this observation; missing readings fall through
    /// to the weakest tier.
    pub fn signal_tier(&self) -> crate::records::SignalTier {
        crate::records::SignalTier::classify(self.signal_dbm.unwrap_or(f64::NAN))
    }

    /// Both axes finite and neither exactly zero; (0,0) is the "no GPS
    /// fix" sentinel written by several capture tools.
    pub fn has_fix(latitude: f64, longitude: f64) -> bool {
        latitude.is_finite() && longitude.is_finite() && latitude != 0.0 && longitude != 0.0
    }
}
