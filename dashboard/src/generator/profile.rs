use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use wardrivecore::records::AccessPointRecord;

const AUTH_LABELS: [&str; 5] = [
    "WPA2-Personal",
    "WPA2-Enterprise",
    "WPA3-Personal",
    "WPA-PSK",
    "Open",
];
const CHANNELS: [u32; 8] = [1, 6, 11, 36, 40, 44, 149, 153];
const VENDORS: [&str; 4] = ["Huawei Technologies", "TP-Link Systems", "Unknown", "Apple Inc."];

/// Configuration for generating a synthetic survey around a center
/// point; used for demos and load checks without real capture files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub center: [f64; 2],
    /// Uniform jitter applied to both axes, in degrees.
    pub spread_deg: f64,
    /// Extra records stacked exactly on the center, for exercising the
    /// cluster expansion ceiling.
    pub co_located: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            center: [17.9757, 102.6369],
            spread_deg: 0.05,
            co_located: 0,
            seed: 0,
        }
    }
}

pub fn build_survey(config: &GeneratorConfig) -> Vec<AccessPointRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.count + config.co_located);

    for index in 0..config.count + config.co_located {
        let co_located = index >= config.count;
        let (latitude, longitude) = if co_located {
            (config.center[0], config.center[1])
        } else {
            (
                config.center[0] + rng.gen_range(-config.spread_deg..config.spread_deg),
                config.center[1] + rng.gen_range(-config.spread_deg..config.spread_deg),
            )
        };

        records.push(AccessPointRecord {
            ssid: format!("survey-net-{index:05}"),
            bssid: format!(
                "02:00:{:02x}:{:02x}:{:02x}:{:02x}",
                (index >> 24) & 0xff,
                (index >> 16) & 0xff,
                (index >> 8) & 0xff,
                index & 0xff
            ),
            manufacturer: Some(VENDORS[index % VENDORS.len()].to_string()),
            signal_dbm: Some(-(rng.gen_range(30.0..95.0_f64))),
            authentication: AUTH_LABELS[index % AUTH_LABELS.len()].to_string(),
            encryption: Some("CCMP".to_string()),
            radio_type: Some("802.11n".to_string()),
            channel: Some(CHANNELS[index % CHANNELS.len()]),
            frequency_mhz: None,
            latitude,
            longitude,
            source: Some("synthetic".to_string()),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_expected_record_count() {
        let config = GeneratorConfig {
            count: 50,
            co_located: 10,
            ..Default::default()
        };
        let records = build_survey(&config);
        assert_eq!(records.len(), 60);
        let stacked = records
            .iter()
            .filter(|r| r.latitude == config.center[0] && r.longitude == config.center[1])
            .count();
        assert!(stacked >= 10);
    }

    #[test]
    fn same_seed_reproduces_the_survey() {
        let config = GeneratorConfig {
            count: 25,
            seed: 13,
            ..Default::default()
        };
        let a = build_survey(&config);
        let b = build_survey(&config);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.latitude, y.latitude);
            assert_eq!(x.signal_dbm, y.signal_dbm);
        }
    }
}
