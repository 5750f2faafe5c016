// Utility functions for ranking-engine

use crate::models::Coordinates;

/// Mean Earth radius used by the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers.
///
/// Symmetric, returns 0 for identical points. Malformed coordinates are the
/// caller's responsibility; NaN propagates instead of panicking and the geo
/// scorer substitutes a neutral score downstream.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Exponential decay: 1.0 at zero, 1/e at `scale`, approaching zero beyond.
///
/// Used for distance decay in feed-style geo scoring; works for any
/// non-negative quantity with a characteristic scale.
pub fn exponential_decay(value: f64, scale: f64) -> f64 {
    (-value / scale).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_zero() {
        let p = Coordinates::new(40.0, -73.0);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = Coordinates::new(40.7128, -74.0060); // NYC
        let b = Coordinates::new(34.0522, -118.2437); // LA
        let d1 = haversine_km(a, b);
        let d2 = haversine_km(b, a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // NYC to LA is roughly 3936 km
        let a = Coordinates::new(40.7128, -74.0060);
        let b = Coordinates::new(34.0522, -118.2437);
        let d = haversine_km(a, b);
        assert!((d - 3936.0).abs() < 20.0, "got {}", d);
    }

    #[test]
    fn test_nan_propagates() {
        let a = Coordinates::new(f64::NAN, -73.0);
        let b = Coordinates::new(40.0, -73.0);
        assert!(haversine_km(a, b).is_nan());
    }

    #[test]
    fn test_exponential_decay() {
        assert!((exponential_decay(0.0, 25.0) - 1.0).abs() < 1e-9);
        // One scale length decays to 1/e
        assert!((exponential_decay(25.0, 25.0) - (-1.0f64).exp()).abs() < 1e-9);
        assert!(exponential_decay(250.0, 25.0) < 0.001);
    }
}
