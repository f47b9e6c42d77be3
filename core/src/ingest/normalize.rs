use crate::records::AccessPointRecord;
use std::collections::HashMap;

/// One parsed CSV row before normalization: header name to cell text,
/// exactly as the source wrote it.
pub type RawRow = HashMap<String, String>;

/// Outcome of normalizing a single row. Rejection is a value, not an
/// error; the pipeline only keeps an aggregate count of rejects.
#[derive(Debug, Clone)]
pub enum Normalized {
    Valid(AccessPointRecord),
    Rejected,
}

impl Normalized {
    pub fn into_record(self) -> Option<AccessPointRecord> {
        match self {
            Normalized::Valid(record) => Some(record),
            Normalized::Rejected => None,
        }
    }
}

/// Looks a field up by canonical (upper-case) header first, then the
/// all-lowercase form, then any documented aliases. Canonical wins when
/// a row carries both spellings.
fn lookup<'a>(row: &'a RawRow, canonical: &str, aliases: &[&str]) -> Option<&'a str> {
    if let Some(value) = row.get(canonical) {
        return Some(value.as_str());
    }
    if let Some(value) = row.get(&canonical.to_lowercase()) {
        return Some(value.as_str());
    }
    aliases.iter().find_map(|alias| row.get(*alias).map(String::as_str))
}

fn lookup_string(row: &RawRow, canonical: &str, aliases: &[&str]) -> Option<String> {
    lookup(row, canonical, aliases).map(|value| value.trim().to_string())
}

/// Permissive numeric parse; anything that does not reach a finite f64
/// counts as absent.
fn lookup_number(row: &RawRow, canonical: &str, aliases: &[&str]) -> Option<f64> {
    lookup(row, canonical, aliases)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Maps one raw row onto the canonical record shape, or rejects it.
///
/// The only rejection cause is an unusable position: latitude or
/// longitude absent, non-finite, or exactly zero. An empty SSID is a
/// hidden network and passes through unchanged.
pub fn normalize(row: &RawRow) -> Normalized {
    let latitude = lookup_number(row, "LATITUDE", &[]);
    let longitude = lookup_number(row, "LONGITUDE", &[]);

    let (latitude, longitude) = match (latitude, longitude) {
        (Some(lat), Some(lng)) if AccessPointRecord::has_fix(lat, lng) => (lat, lng),
        _ => return Normalized::Rejected,
    };

    let record = AccessPointRecord {
        ssid: lookup_string(row, "SSID", &["name"]).unwrap_or_default(),
        bssid: lookup_string(row, "BSSID", &["network_id"]).unwrap_or_default(),
        manufacturer: lookup_string(row, "MANUFACTURER", &[]).filter(|v| !v.is_empty()),
        signal_dbm: lookup_number(row, "SIGNAL", &["RSSI", "rssi"]),
        authentication: lookup_string(row, "AUTHENTICATION", &[]).unwrap_or_default(),
        encryption: lookup_string(row, "ENCRYPTION", &[]).filter(|v| !v.is_empty()),
        radio_type: lookup_string(row, "RADIO TYPE", &["radio type", "radioType"])
            .filter(|v| !v.is_empty()),
        channel: lookup_number(row, "CHANNEL", &[])
            .filter(|ch| *ch >= 0.0)
            .map(|ch| ch as u32),
        frequency_mhz: lookup_number(row, "FREQUENCY", &[]),
        latitude,
        longitude,
        source: None,
    };

    Normalized::Valid(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn canonical_and_lowercase_headers_normalize_identically() {
        let upper = row(&[
            ("LATITUDE", "17.9"),
            ("LONGITUDE", "102.6"),
            ("SSID", "cafe-wifi"),
            ("BSSID", "aa:bb:cc:dd:ee:ff"),
        ]);
        let lower = row(&[
            ("latitude", "17.9"),
            ("longitude", "102.6"),
            ("ssid", "cafe-wifi"),
            ("bssid", "aa:bb:cc:dd:ee:ff"),
        ]);

        let a = normalize(&upper).into_record().unwrap();
        let b = normalize(&lower).into_record().unwrap();
        assert_eq!(a.latitude, b.latitude);
        assert_eq!(a.longitude, b.longitude);
        assert_eq!(a.ssid, b.ssid);
        assert_eq!(a.bssid, b.bssid);
    }

    #[test]
    fn canonical_header_wins_over_lowercase() {
        let mixed = row(&[
            ("LATITUDE", "17.9"),
            ("latitude", "99.9"),
            ("LONGITUDE", "102.6"),
        ]);
        let record = normalize(&mixed).into_record().unwrap();
        assert_eq!(record.latitude, 17.9);
    }

    #[test]
    fn unusable_coordinates_reject_the_row() {
        for (lat, lng) in [("0", "102.6"), ("17.9", "0"), ("not-a-number", "102.6"), ("", "")] {
            let raw = row(&[("LATITUDE", lat), ("LONGITUDE", lng)]);
            assert!(normalize(&raw).into_record().is_none(), "lat={lat} lng={lng}");
        }
        let missing = row(&[("SSID", "lonely")]);
        assert!(normalize(&missing).into_record().is_none());
    }

    #[test]
    fn empty_ssid_is_preserved_as_hidden_network() {
        let raw = row(&[("LATITUDE", "17.9"), ("LONGITUDE", "102.6"), ("SSID", "")]);
        let record = normalize(&raw).into_record().unwrap();
        assert_eq!(record.ssid, "");
        assert_eq!(record.display_ssid(), "Hidden Network");
    }

    #[test]
    fn radio_type_aliases_resolve() {
        for key in ["RADIO TYPE", "radio type", "radioType"] {
            let raw = row(&[("LATITUDE", "1.0"), ("LONGITUDE", "2.0"), (key, "802.11n")]);
            let record = normalize(&raw).into_record().unwrap();
            assert_eq!(record.radio_type.as_deref(), Some("802.11n"));
        }
    }

    #[test]
    fn unparseable_numbers_are_treated_as_absent() {
        let raw = row(&[
            ("LATITUDE", "17.9"),
            ("LONGITUDE", "102.6"),
            ("SIGNAL", "n/a"),
            ("CHANNEL", "eleven"),
        ]);
        let record = normalize(&raw).into_record().unwrap();
        assert!(record.signal_dbm.is_none());
        assert!(record.channel.is_none());
    }

    #[test]
    fn normalizing_canonical_output_is_idempotent() {
        let raw = row(&[
            ("LATITUDE", "17.975700"),
            ("LONGITUDE", "102.636900"),
            ("SSID", "cafe-wifi"),
            ("BSSID", "aa:bb:cc:dd:ee:ff"),
            ("SIGNAL", "-62"),
            ("AUTHENTICATION", "WPA2-Personal"),
            ("CHANNEL", "6"),
        ]);
        let first = normalize(&raw).into_record().unwrap();

        let echoed = row(&[
            ("LATITUDE", &first.latitude.to_string()),
            ("LONGITUDE", &first.longitude.to_string()),
            ("SSID", &first.ssid),
            ("BSSID", &first.bssid),
            ("SIGNAL", &first.signal_dbm.unwrap().to_string()),
            ("AUTHENTICATION", &first.authentication),
            ("CHANNEL", &first.channel.unwrap().to_string()),
        ]);
        let second = normalize(&echoed).into_record().unwrap();

        assert_eq!(first.latitude, second.latitude);
        assert_eq!(first.longitude, second.longitude);
        assert_eq!(first.ssid, second.ssid);
        assert_eq!(first.bssid, second.bssid);
        assert_eq!(first.signal_dbm, second.signal_dbm);
        assert_eq!(first.authentication, second.authentication);
        assert_eq!(first.channel, second.channel);
    }
}
