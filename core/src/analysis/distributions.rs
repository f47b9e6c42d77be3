//! Pure reducers over the normalized collection, consumed by the chart
//! components. Deterministic given identical input order.

use crate::records::{AccessPointRecord, AuthClass, DeviceClass, EncryptionClass, FrequencyBand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One chart bar: bucket label and member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

impl Bucket {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

fn sorted_descending(mut buckets: Vec<Bucket>) -> Vec<Bucket> {
    buckets.retain(|bucket| bucket.count > 0);
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Authentication mix, strongest-priority substring classification,
/// zero buckets dropped, descending by count.
pub fn authentication_distribution(records: &[AccessPointRecord]) -> Vec<Bucket> {
    let classes = [
        AuthClass::Open,
        AuthClass::Wpa,
        AuthClass::Wpa2,
        AuthClass::Wpa3,
        AuthClass::Wep,
        AuthClass::Unknown,
    ];
    let mut counts = [0usize; 6];
    for record in records {
        let class = AuthClass::classify(&record.authentication);
        let slot = classes.iter().position(|c| *c == class).unwrap_or(5);
        counts[slot] += 1;
    }
    sorted_descending(
        classes
            .iter()
            .zip(counts)
            .map(|(class, count)| Bucket::new(class.label(), count))
            .collect(),
    )
}

/// Encryption cipher mix, same shape as the authentication chart.
pub fn encryption_distribution(records: &[AccessPointRecord]) -> Vec<Bucket> {
    let classes = [
        EncryptionClass::Ccmp,
        EncryptionClass::Tkip,
        EncryptionClass::Wep,
        EncryptionClass::None,
        EncryptionClass::Unknown,
    ];
    let mut counts = [0usize; 5];
    for record in records {
        let class = EncryptionClass::classify(record.encryption.as_deref().unwrap_or(""));
        let slot = classes.iter().position(|c| *c == class).unwrap_or(4);
        counts[slot] += 1;
    }
    sorted_descending(
        classes
            .iter()
            .zip(counts)
            .map(|(class, count)| Bucket::new(class.label(), count))
            .collect(),
    )
}

/// Per-channel histogram. Channels sort ascending numerically and the
/// output keeps the first 15, i.e. the 15 lowest-numbered channels;
/// records without a channel land in an "Unknown" bucket at the end.
pub fn channel_distribution(records: &[AccessPointRecord]) -> Vec<Bucket> {
    let mut by_channel: BTreeMap<u32, usize> = BTreeMap::new();
    let mut unknown = 0usize;
    for record in records {
        match record.channel {
            Some(channel) => *by_channel.entry(channel).or_insert(0) += 1,
            None => unknown += 1,
        }
    }

    let mut buckets: Vec<Bucket> = by_channel
        .into_iter()
        .map(|(channel, count)| Bucket::new(channel.to_string(), count))
        .collect();
    if unknown > 0 {
        buckets.push(Bucket::new("Unknown", unknown));
    }
    buckets.truncate(15);
    buckets
}

const SIGNAL_BIN_LOW: u32 = 20;
const SIGNAL_BIN_HIGH: u32 = 95;
const SIGNAL_BIN_WIDTH: u32 = 5;

/// Histogram of `abs(signal_dbm)` in fixed 5-wide bins over [20, 95).
/// Bins with zero count are omitted, as are readings outside the range.
pub fn signal_histogram(records: &[AccessPointRecord]) -> Vec<Bucket> {
    let bin_count = ((SIGNAL_BIN_HIGH - SIGNAL_BIN_LOW) / SIGNAL_BIN_WIDTH) as usize;
    let mut counts = vec![0usize; bin_count];

    for record in records {
        let signal = match record.signal_dbm {
            Some(value) if value.is_finite() => value.abs(),
            _ => continue,
        };
        if signal < SIGNAL_BIN_LOW as f64 || signal >= SIGNAL_BIN_HIGH as f64 {
            continue;
        }
        let slot = ((signal as u32) - SIGNAL_BIN_LOW) / SIGNAL_BIN_WIDTH;
        counts[slot as usize] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(slot, count)| {
            let low = SIGNAL_BIN_LOW + slot as u32 * SIGNAL_BIN_WIDTH;
            Bucket::new(format!("{}-{}", low, low + SIGNAL_BIN_WIDTH), count)
        })
        .collect()
}

/// Router/mobile split by manufacturer hint. Best-effort heuristic; the
/// label is not authoritative.
pub fn device_type_split(records: &[AccessPointRecord]) -> Vec<Bucket> {
    let mut router = 0usize;
    let mut mobile = 0usize;
    for record in records {
        match DeviceClass::classify(record.manufacturer.as_deref()) {
            DeviceClass::Router => router += 1,
            DeviceClass::Mobile => mobile += 1,
        }
    }
    vec![Bucket::new("router", router), Bucket::new("mobile", mobile)]
}

/// 2.4 GHz vs 5 GHz split, inferred from channel then radio type.
pub fn frequency_band_split(records: &[AccessPointRecord]) -> Vec<Bucket> {
    let mut band24 = 0usize;
    let mut band5 = 0usize;
    for record in records {
        match FrequencyBand::classify(record.channel, record.radio_type.as_deref()) {
            FrequencyBand::Band24Ghz => band24 += 1,
            FrequencyBand::Band5Ghz => band5 += 1,
            FrequencyBand::Unknown => {}
        }
    }
    vec![Bucket::new("2.4GHz", band24), Bucket::new("5.0GHz", band5)]
}

/// Free-form radio-type labels, descending by count.
pub fn radio_type_distribution(records: &[AccessPointRecord]) -> Vec<Bucket> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let label = record
            .radio_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        *counts.entry(label).or_insert(0) += 1;
    }
    sorted_descending(
        counts
            .into_iter()
            .map(|(label, count)| Bucket::new(label, count))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(auth: &str, enc: Option<&str>, channel: Option<u32>, signal: Option<f64>) -> AccessPointRecord {
        AccessPointRecord {
            ssid: "net".into(),
            bssid: "aa:bb:cc:dd:ee:ff".into(),
            manufacturer: None,
            signal_dbm: signal,
            authentication: auth.into(),
            encryption: enc.map(String::from),
            radio_type: None,
            channel,
            frequency_mhz: None,
            latitude: 17.9,
            longitude: 102.6,
            source: None,
        }
    }

    #[test]
    fn authentication_distribution_sorts_descending_and_drops_zero() {
        let records = vec![
            record("WPA2-Personal", None, None, None),
            record("WPA2-Enterprise", None, None, None),
            record("Open", None, None, None),
        ];
        let buckets = authentication_distribution(&records);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], Bucket::new("WPA2", 2));
        assert_eq!(buckets[1], Bucket::new("Open", 1));
    }

    #[test]
    fn channel_distribution_keeps_first_fifteen_ascending() {
        let mut records = Vec::new();
        for channel in 1..=20u32 {
            records.push(record("WPA2", None, Some(channel), None));
        }
        let buckets = channel_distribution(&records);
        assert_eq!(buckets.len(), 15);
        assert_eq!(buckets[0].label, "1");
        assert_eq!(buckets[14].label, "15");
    }

    #[test]
    fn signal_histogram_omits_empty_bins() {
        let records = vec![
            record("WPA2", None, None, Some(-45.0)),
            record("WPA2", None, None, Some(-47.0)),
            record("WPA2", None, None, Some(-88.0)),
            record("WPA2", None, None, None),
        ];
        let buckets = signal_histogram(&records);
        assert_eq!(
            buckets,
            vec![Bucket::new("45-50", 2), Bucket::new("85-90", 1)]
        );
    }

    #[test]
    fn device_split_counts_router_hints() {
        let mut router = record("WPA2", None, None, None);
        router.manufacturer = Some("Huawei Technologies".into());
        let mobile = record("WPA2", None, None, None);
        let buckets = device_type_split(&[router, mobile]);
        assert_eq!(buckets[0], Bucket::new("router", 1));
        assert_eq!(buckets[1], Bucket::new("mobile", 1));
    }

    #[test]
    fn frequency_band_split_uses_channel_ranges() {
        let records = vec![
            record("WPA2", None, Some(6), None),
            record("WPA2", None, Some(11), None),
            record("WPA2", None, Some(44), None),
        ];
        let buckets = frequency_band_split(&records);
        assert_eq!(buckets[0], Bucket::new("2.4GHz", 2));
        assert_eq!(buckets[1], Bucket::new("5.0GHz", 1));
    }

    #[test]
    fn encryption_distribution_classifies_ciphers() {
        let records = vec![
            record("WPA2", Some("CCMP"), None, None),
            record("WPA2", Some("CCMP+TKIP"), None, None),
            record("Open", Some("none"), None, None),
            record("WPA", Some("TKIP"), None, None),
        ];
        let buckets = encryption_distribution(&records);
        assert_eq!(buckets[0], Bucket::new("CCMP", 2));
        assert!(buckets.contains(&Bucket::new("TKIP", 1)));
        assert!(buckets.contains(&Bucket::new("None", 1)));
    }
}
