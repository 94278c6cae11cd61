//! Great-circle distance between coordinates

use crate::models::Coordinate;

/// Mean earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Largest possible haversine distance (half the circumference)
pub const MAX_DISTANCE_KM: f64 = std::f64::consts::PI * EARTH_RADIUS_KM;

/// Haversine distance in kilometers between two validated coordinates.
///
/// Symmetric in its arguments, zero for identical points and bounded by
/// [`MAX_DISTANCE_KM`].
#[must_use]
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lng = (d_lng / 2.0).sin();
    let cos_product = a.latitude.to_radians().cos() * b.latitude.to_radians().cos();

    // rounding can push h a hair past 1 near antipodes
    let h = (sin_lat * sin_lat + cos_product * (sin_lng * sin_lng)).clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    #[rstest]
    #[case(coord(0.0, 0.0))]
    #[case(coord(13.0827, 80.2707))]
    #[case(coord(-90.0, 180.0))]
    #[case(coord(51.5, -0.12))]
    fn test_distance_to_self_is_zero(#[case] a: Coordinate) {
        assert_eq!(haversine_km(&a, &a), 0.0);
    }

    #[rstest]
    #[case(coord(13.0, 80.0), coord(13.5, 80.5))]
    #[case(coord(-33.86, 151.2), coord(40.71, -74.0))]
    #[case(coord(89.9, 10.0), coord(-89.9, -170.0))]
    fn test_distance_is_symmetric(#[case] a: Coordinate, #[case] b: Coordinate) {
        assert_eq!(haversine_km(&a, &b), haversine_km(&b, &a));
    }

    #[test]
    fn test_one_hundredth_degree_latitude() {
        let d = haversine_km(&coord(13.0, 80.0), &coord(13.01, 80.0));
        assert!((d - 1.112).abs() < 0.001, "got {d}");
    }

    #[test]
    fn test_antipodes_reach_the_bound() {
        let d = haversine_km(&coord(0.0, 0.0), &coord(0.0, 180.0));
        assert!(d <= MAX_DISTANCE_KM);
        assert!((d - MAX_DISTANCE_KM).abs() < 1e-6);

        let poles = haversine_km(&coord(90.0, 0.0), &coord(-90.0, 0.0));
        assert!(!poles.is_nan());
        assert!(poles <= MAX_DISTANCE_KM);
    }

    #[test]
    fn test_non_negative_and_bounded_over_grid() {
        let points: Vec<Coordinate> = (-6..=6_i32)
            .flat_map(|i| (-6..=6_i32).map(move |j| coord(f64::from(i) * 15.0, f64::from(j) * 30.0)))
            .collect();

        for a in &points {
            for b in &points {
                let d = haversine_km(a, b);
                assert!((0.0..=MAX_DISTANCE_KM).contains(&d), "{a:?} -> {b:?} = {d}");
            }
        }
    }
}
