pub mod classify;
pub mod record;

pub use classify::{AuthClass, DeviceClass, EncryptionClass, FrequencyBand, SecurityLevel, SignalTier};
pub use record::AccessPointRecord;
