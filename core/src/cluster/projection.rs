//! Web Mercator world-pixel projection. Cluster radii are expressed in
//! screen pixels, so clustering distance checks happen in this space.

use serde::{Deserialize, Serialize};

const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the square Web Mercator world.
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

fn world_scale(zoom: u8) -> f64 {
    TILE_SIZE * f64::powi(2.0, zoom as i32)
}

/// Projects WGS84 degrees onto world pixels at the given zoom.
pub fn project(latitude: f64, longitude: f64, zoom: u8) -> PixelPoint {
    let scale = world_scale(zoom);
    let lat = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (longitude + 180.0) / 360.0 * scale;
    let y = (1.0 - ((lat.tan() + 1.0 / lat.cos()).ln()) / std::f64::consts::PI) / 2.0 * scale;
    PixelPoint { x, y }
}

/// Inverse of [`project`]; used to place spiderfied markers back on the
/// map after offsetting them in pixel space.
pub fn unproject(point: &PixelPoint, zoom: u8) -> (f64, f64) {
    let scale = world_scale(zoom);
    let longitude = point.x / scale * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * point.y / scale);
    let latitude = n.sinh().atan().to_degrees();
    (latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_origin_projects_to_world_center() {
        let point = project(0.0, 0.0, 1);
        assert!((point.x - 256.0).abs() < 1e-9);
        assert!((point.y - 256.0).abs() < 1e-9);
    }

    #[test]
    fn unproject_inverts_project() {
        let (lat, lng) = (17.9757, 102.6369);
        for zoom in [3u8, 9, 16] {
            let point = project(lat, lng, zoom);
            let (lat2, lng2) = unproject(&point, zoom);
            assert!((lat - lat2).abs() < 1e-6, "zoom {zoom}");
            assert!((lng - lng2).abs() < 1e-6, "zoom {zoom}");
        }
    }

    #[test]
    fn pixel_distance_doubles_per_zoom_step() {
        let a = project(17.90, 102.60, 10);
        let b = project(17.95, 102.65, 10);
        let a2 = project(17.90, 102.60, 11);
        let b2 = project(17.95, 102.65, 11);
        let ratio = a2.distance(&b2) / a.distance(&b);
        assert!((ratio - 2.0).abs() < 0.01);
    }
}
