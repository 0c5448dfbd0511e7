use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Axis-aligned rectangle given by its south-west and north-east corners.
///
/// A rectangle whose west edge lies east of its east edge spans the
/// antimeridian; longitude containment wraps around in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Rectangle from its four edges.
    pub fn from_edges(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Degenerate rectangle covering a single point.
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west() > self.east()
    }

    /// Edge-inclusive containment test.
    pub fn contains(&self, point: LatLng) -> bool {
        let lat_inside = point.lat >= self.south() && point.lat <= self.north();
        let lng_inside = if self.crosses_antimeridian() {
            point.lng >= self.west() || point.lng <= self.east()
        } else {
            point.lng >= self.west() && point.lng <= self.east()
        };
        lat_inside && lng_inside
    }

    /// True when both the north-east and south-west corners of `other` lie
    /// inside this rectangle.
    pub fn contains_bounds(&self, other: &LatLngBounds) -> bool {
        self.contains(other.north_east) && self.contains(other.south_west)
    }

    /// Grow the rectangle to cover `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }
}

impl fmt::Display for LatLngBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[west={}, south={}, east={}, north={}]",
            self.west(),
            self.south(),
            self.east(),
            self.north()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_edge_inclusive() {
        let bounds = LatLngBounds::from_edges(-10.0, 0.0, 10.0, 20.0);
        assert!(bounds.contains(LatLng::new(5.0, 5.0)));
        assert!(bounds.contains(LatLng::new(20.0, 10.0)));
        assert!(bounds.contains(LatLng::new(0.0, -10.0)));
        assert!(!bounds.contains(LatLng::new(20.1, 0.0)));
        assert!(!bounds.contains(LatLng::new(5.0, -10.5)));
    }

    #[test]
    fn test_contains_bounds_checks_both_corners() {
        let outer = LatLngBounds::from_edges(-10.0, 0.0, 10.0, 20.0);
        let inner = LatLngBounds::from_edges(-5.0, 1.0, 5.0, 19.0);
        let overlapping = LatLngBounds::from_edges(-5.0, 1.0, 15.0, 19.0);

        assert!(outer.contains_bounds(&inner));
        assert!(outer.contains_bounds(&outer));
        assert!(!outer.contains_bounds(&overlapping));
        assert!(!inner.contains_bounds(&outer));
    }

    #[test]
    fn test_antimeridian_wrap() {
        let pacific = LatLngBounds::from_edges(170.0, -10.0, -170.0, 10.0);
        assert!(pacific.crosses_antimeridian());
        assert!(pacific.contains(LatLng::new(0.0, 179.0)));
        assert!(pacific.contains(LatLng::new(0.0, -175.0)));
        assert!(!pacific.contains(LatLng::new(0.0, 0.0)));
    }

    #[test]
    fn test_extend_grows_to_cover_points() {
        let mut bounds = LatLngBounds::from_point(LatLng::new(5.0, 5.0));
        bounds.extend(LatLng::new(-1.0, 12.0));
        bounds.extend(LatLng::new(3.0, 4.0));

        assert_eq!(bounds, LatLngBounds::from_edges(4.0, -1.0, 12.0, 5.0));
    }
}
