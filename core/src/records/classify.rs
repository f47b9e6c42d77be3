use serde::{Deserialize, Serialize};

/// Authentication family, matched case-insensitively by substring in
/// priority order WPA3 > WPA2 > WPA > WEP > Open > Unknown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AuthClass {
    Wpa3,
    Wpa2,
    Wpa,
    Wep,
    Open,
    Unknown,
}

impl AuthClass {
    pub fn classify(raw: &str) -> Self {
        let auth = raw.to_uppercase();
        if auth.contains("WPA3") {
            AuthClass::Wpa3
        } else if auth.contains("WPA2") {
            AuthClass::Wpa2
        } else if auth.contains("WPA") {
            AuthClass::Wpa
        } else if auth.contains("WEP") {
            AuthClass::Wep
        } else if auth.contains("OPEN") {
            AuthClass::Open
        } else {
            AuthClass::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthClass::Wpa3 => "WPA3",
            AuthClass::Wpa2 => "WPA2",
            AuthClass::Wpa => "WPA",
            AuthClass::Wep => "WEP",
            AuthClass::Open => "Open",
            AuthClass::Unknown => "Unknown",
        }
    }
}

/// Cipher family, same substring-priority approach as [`AuthClass`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EncryptionClass {
    Ccmp,
    Tkip,
    Wep,
    None,
    Unknown,
}

impl EncryptionClass {
    pub fn classify(raw: &str) -> Self {
        let enc = raw.to_uppercase();
        if enc.contains("CCMP") {
            EncryptionClass::Ccmp
        } else if enc.contains("TKIP") {
            EncryptionClass::Tkip
        } else if enc.contains("WEP") {
            EncryptionClass::Wep
        } else if enc.contains("NONE") {
            EncryptionClass::None
        } else {
            EncryptionClass::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EncryptionClass::Ccmp => "CCMP",
            EncryptionClass::Tkip => "TKIP",
            EncryptionClass::Wep => "WEP",
            EncryptionClass::None => "None",
            EncryptionClass::Unknown => "Unknown",
        }
    }
}

/// Marker tier keyed on received signal strength. Anything non-finite
/// drops to the weakest tier rather than failing marker construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SignalTier {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl SignalTier {
    pub fn classify(signal_dbm: f64) -> Self {
        if signal_dbm >= -50.0 {
            SignalTier::Excellent
        } else if signal_dbm >= -60.0 {
            SignalTier::Good
        } else if signal_dbm >= -70.0 {
            SignalTier::Fair
        } else if signal_dbm >= -80.0 {
            SignalTier::Poor
        } else {
            SignalTier::VeryPoor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalTier::Excellent => "Excellent",
            SignalTier::Good => "Good",
            SignalTier::Fair => "Fair",
            SignalTier::Poor => "Poor",
            SignalTier::VeryPoor => "Very Poor",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SignalTier::Excellent => "#22c55e",
            SignalTier::Good => "#84cc16",
            SignalTier::Fair => "#eab308",
            SignalTier::Poor => "#f97316",
            SignalTier::VeryPoor => "#ef4444",
        }
    }
}

/// Popup badge for how well a network is protected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecurityLevel {
    Open,
    High,
    Medium,
    Low,
}

impl SecurityLevel {
    pub fn classify(authentication: &str) -> Self {
        if authentication == "Open" {
            SecurityLevel::Open
        } else if authentication.to_uppercase().contains("WPA3") {
            SecurityLevel::High
        } else if authentication.to_uppercase().contains("WPA2") {
            SecurityLevel::Medium
        } else {
            SecurityLevel::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SecurityLevel::Open => "#ef4444",
            SecurityLevel::High => "#22c55e",
            SecurityLevel::Medium => "#eab308",
            SecurityLevel::Low => "#f97316",
        }
    }
}

const ROUTER_VENDOR_HINTS: [&str; 6] = ["unknown", "zte", "huawei", "tp-link", "cisco", "netgear"];

/// Coarse router/mobile split by manufacturer name. Best-effort label
/// backed by a short vendor hint list, not an authoritative OUI lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceClass {
    Router,
    Mobile,
}

impl DeviceClass {
    pub fn classify(manufacturer: Option<&str>) -> Self {
        let name = manufacturer.unwrap_or("").to_lowercase();
        if ROUTER_VENDOR_HINTS.iter().any(|hint| name.contains(hint)) {
            DeviceClass::Router
        } else {
            DeviceClass::Mobile
        }
    }
}

/// Operating band inferred from channel number, falling back to the
/// radio-type string when the channel is absent or out of band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FrequencyBand {
    Band24Ghz,
    Band5Ghz,
    Unknown,
}

impl FrequencyBand {
    pub fn classify(channel: Option<u32>, radio_type: Option<&str>) -> Self {
        match channel {
            Some(ch) if (1..=14).contains(&ch) => return FrequencyBand::Band24Ghz,
            Some(ch) if ch >= 36 => return FrequencyBand::Band5Ghz,
            _ => {}
        }
        let radio = radio_type.unwrap_or("").to_uppercase();
        if radio.contains("802.11B") || radio.contains("802.11G") {
            FrequencyBand::Band24Ghz
        } else if radio.contains("802.11A") {
            FrequencyBand::Band5Ghz
        } else {
            FrequencyBand::Unknown
        }
    }
}
