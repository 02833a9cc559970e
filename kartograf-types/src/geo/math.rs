use serde::{Deserialize, Serialize};

/// Minimum zoom level supported by the static map service.
pub const MIN_ZOOM: u8 = 1;
/// Maximum zoom level supported by the static map service.
pub const MAX_ZOOM: u8 = 17;

/// Share of the world extent covered by one pixel at zoom 0.
const PIXEL_EXTENT_K: f64 = 0.44;
/// Empirical degrees-per-kilometer correction of the static map projection.
const DISTORTION_K: f64 = 1.0 / 111.0;

/// Difference between two geographic positions, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoDelta {
    /// Longitude difference.
    pub d_lon: f64,
    /// Latitude difference.
    pub d_lat: f64,
}

impl GeoDelta {
    /// Creates a new delta.
    pub const fn new(d_lon: f64, d_lat: f64) -> Self {
        Self { d_lon, d_lat }
    }
}

/// Converts an offset in screen pixels into the geographic delta it covers at the given zoom.
///
/// Pixel `y` grows downwards while latitude grows northwards, so the sign of the latitude delta is
/// inverted relative to `dy`. The caller is responsible for keeping `zoom` in
/// `[MIN_ZOOM, MAX_ZOOM]`.
pub fn pixel_to_geo_delta(dx: f64, dy: f64, zoom: u8) -> GeoDelta {
    let scale = 2f64.powi(i32::from(zoom));
    let lon_per_px = PIXEL_EXTENT_K * 360.0 / scale * DISTORTION_K;
    let lat_per_px = PIXEL_EXTENT_K * 180.0 / scale * DISTORTION_K;

    GeoDelta::new(dx * lon_per_px, -dy * lat_per_px)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn zero_offset_is_zero_delta() {
        for zoom in MIN_ZOOM..=MAX_ZOOM {
            let delta = pixel_to_geo_delta(0.0, 0.0, zoom);
            assert_eq!(delta.d_lon, 0.0);
            assert_eq!(delta.d_lat, 0.0);
        }
    }

    #[test]
    fn latitude_is_inverted() {
        let delta = pixel_to_geo_delta(10.0, 10.0, 12);
        assert!(delta.d_lon > 0.0);
        assert!(delta.d_lat < 0.0);
        assert_relative_eq!(delta.d_lon, -2.0 * delta.d_lat, max_relative = 1e-12);
    }

    #[test]
    fn one_pixel_at_zoom_12() {
        let delta = pixel_to_geo_delta(1.0, -1.0, 12);
        assert_relative_eq!(delta.d_lon, 0.44 * 360.0 / 4096.0 / 111.0, max_relative = 1e-12);
        assert_relative_eq!(delta.d_lat, 0.44 * 180.0 / 4096.0 / 111.0, max_relative = 1e-12);
    }

    #[test]
    fn each_zoom_level_halves_the_delta() {
        for zoom in MIN_ZOOM..MAX_ZOOM {
            let coarse = pixel_to_geo_delta(100.0, 50.0, zoom);
            let fine = pixel_to_geo_delta(100.0, 50.0, zoom + 1);
            assert_relative_eq!(coarse.d_lon, fine.d_lon * 2.0, max_relative = 1e-12);
            assert_relative_eq!(coarse.d_lat, fine.d_lat * 2.0, max_relative = 1e-12);
        }
    }
}
