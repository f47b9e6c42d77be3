//! Marker icons keyed by signal tier, owned by one engine instance.
//!
//! Icons are immutable once created, so handles are shared freely; the
//! cache is deliberately not a module-level singleton so that two map
//! views in one process keep separate caches.

use crate::records::SignalTier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const MARKER_SIZE_PX: u32 = 12;

/// Rendered-marker description a map front end can draw directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub tier: SignalTier,
    pub label: String,
    pub color: String,
    pub size_px: u32,
}

pub struct IconCache {
    icons: HashMap<SignalTier, Arc<MarkerIcon>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self {
            icons: HashMap::new(),
        }
    }

    /// Lazily builds the icon for a tier and hands out a shared handle.
    pub fn get_or_create(&mut self, tier: SignalTier) -> Arc<MarkerIcon> {
        self.icons
            .entry(tier)
            .or_insert_with(|| {
                Arc::new(MarkerIcon {
                    tier,
                    label: tier.label().to_string(),
                    color: tier.color().to_string(),
                    size_px: MARKER_SIZE_PX,
                })
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl Default for IconCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cluster glyph size in pixels, a step function of member count.
pub fn glyph_size_px(count: usize) -> u32 {
    if count > 1000 {
        80
    } else if count > 500 {
        70
    } else if count > 100 {
        60
    } else if count > 50 {
        50
    } else {
        40
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_reuses_handles_per_tier() {
        let mut cache = IconCache::new();
        let first = cache.get_or_create(SignalTier::Fair);
        let second = cache.get_or_create(SignalTier::Fair);
        assert!(Arc::ptr_eq(&first, &second));
        cache.get_or_create(SignalTier::Excellent);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn glyph_size_escalates_with_count() {
        assert_eq!(glyph_size_px(10), 40);
        assert_eq!(glyph_size_px(51), 50);
        assert_eq!(glyph_size_px(101), 60);
        assert_eq!(glyph_size_px(501), 70);
        assert_eq!(glyph_size_px(1500), 80);
    }
}
