use std::f64::consts::TAU;

/// Initial great-circle bearing from one point to another.
///
/// Inputs are degrees; the result is degrees clockwise from north in `[0, 360)`.
/// Coincident points give 0.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let d_lon = (lon2 - lon1).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    let degrees = y.atan2(x).rem_euclid(TAU).to_degrees();
    // rem_euclid of a tiny negative angle can round up to exactly TAU.
    if degrees >= 360.0 {
        degrees - 360.0
    } else {
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cardinal_directions() {
        assert!(close(initial_bearing(0.0, 0.0, 1.0, 0.0), 0.0));
        assert!(close(initial_bearing(0.0, 0.0, 0.0, 1.0), 90.0));
        assert!(close(initial_bearing(0.0, 0.0, -1.0, 0.0), 180.0));
        assert!(close(initial_bearing(0.0, 0.0, 0.0, -1.0), 270.0));
    }

    #[test]
    fn coincident_points_are_zero() {
        assert_eq!(initial_bearing(45.0, 7.0, 45.0, 7.0), 0.0);
    }

    #[test]
    fn known_city_pair() {
        // Paris to London heads roughly north-west.
        let b = initial_bearing(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((330.0..335.0).contains(&b), "bearing {b}");
    }
}
