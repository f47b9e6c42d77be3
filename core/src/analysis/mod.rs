pub mod distributions;

pub use distributions::{
    authentication_distribution, channel_distribution, device_type_split, encryption_distribution,
    frequency_band_split, radio_type_distribution, signal_histogram, Bucket,
};
