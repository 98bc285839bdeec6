//! Geometry primitives shared by the outline reducer and the length fitter.

pub mod fitter;
pub mod resample;

/// A point in abstract 2D space (font design units, before projection).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in the same abstract units.
    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// A geographic point in decimal degrees (WGS84 until converted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in meters using the Haversine formula.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Calculate the distance between two points using the Haversine formula
/// Returns distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0; // Earth's radius in meters

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Cumulative great-circle length of an ordered path, in meters.
pub fn path_length_m(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // Beijing Tiananmen to the Forbidden City north gate, roughly 1km
        let d = haversine_distance(39.903, 116.3975, 39.912, 116.3975);
        assert!(d > 900.0 && d < 1100.0, "unexpected distance {d}");
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        assert_eq!(haversine_distance(39.9, 116.4, 39.9, 116.4), 0.0);
    }

    #[test]
    fn path_length_sums_consecutive_legs() {
        let a = GeoPoint::new(39.90, 116.40);
        let b = GeoPoint::new(39.91, 116.40);
        let c = GeoPoint::new(39.92, 116.40);
        let total = path_length_m(&[a, b, c]);
        let legs = a.distance_to(&b) + b.distance_to(&c);
        assert!((total - legs).abs() < 1e-9);
    }

    #[test]
    fn path_length_of_single_point_is_zero() {
        assert_eq!(path_length_m(&[GeoPoint::new(39.9, 116.4)]), 0.0);
    }
}
