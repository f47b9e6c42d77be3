//! Authentication and text predicates applied before records reach the
//! clustering engine. Pure and order-preserving; the two predicates
//! compose by logical AND.

use crate::records::AccessPointRecord;
use serde::{Deserialize, Serialize};

/// Authentication tier selector. `Wpa` is the legacy tier only; WPA2
/// and WPA3 records are excluded from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthFilter {
    #[default]
    All,
    Wpa,
    Wpa2,
    Wpa3,
    Open,
}

impl AuthFilter {
    pub fn matches(&self, record: &AccessPointRecord) -> bool {
        let auth = record.authentication.to_lowercase();
        match self {
            AuthFilter::All => true,
            AuthFilter::Wpa => {
                auth.contains("wpa") && !auth.contains("wpa2") && !auth.contains("wpa3")
            }
            AuthFilter::Wpa2 => auth.contains("wpa2"),
            AuthFilter::Wpa3 => auth.contains("wpa3"),
            AuthFilter::Open => auth.is_empty() || auth.contains("open"),
        }
    }
}

fn matches_query(record: &AccessPointRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record.ssid.to_lowercase().contains(&needle) || record.bssid.to_lowercase().contains(&needle)
}

/// Returns the subsequence passing both predicates, in input order.
pub fn filter_records(
    records: &[AccessPointRecord],
    auth: AuthFilter,
    query: &str,
) -> Vec<AccessPointRecord> {
    records
        .iter()
        .filter(|record| auth.matches(record) && matches_query(record, query))
        .cloned()
        .collect()
}
