use crate::bearing::initial_bearing;
use crate::waypoint::Waypoint;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RouteError {
    #[error("Route needs at least one waypoint")]
    NoWaypoints,

    #[error("Interpolation step must be finite and positive, got {0}")]
    InvalidStep(f64),

    #[error("Every route segment has zero length; nothing to simulate")]
    Degenerate,

    #[error("Segment starting at waypoint {index} has a non-finite length")]
    NonFiniteSegment { index: usize },

    #[error("Route would exceed {limit} interpolated points")]
    TooManyPoints { limit: usize },
}

/// Upper bound on the interpolated route size.
pub const MAX_ROUTE_POINTS: usize = 10_000_000;

/// A sub-point between two waypoints. Fuel is carried from the segment start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub fuel_level: f64,
}

impl RoutePoint {
    pub fn bearing_to(&self, other: &RoutePoint) -> f64 {
        initial_bearing(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Number of sub-steps for a segment of length `distance`.
///
/// A zero-length segment yields zero steps. `distance / step` must be finite.
pub fn segment_steps(distance: f64, step: f64) -> usize {
    (distance / step).ceil() as usize
}

/// Closed loop of interpolated points, indexed by an unbounded cursor.
#[derive(Debug, Clone)]
pub struct Route {
    points: Vec<RoutePoint>,
}

impl Route {
    pub fn interpolate(waypoints: &[Waypoint], step: f64) -> Result<Self, RouteError> {
        if waypoints.is_empty() {
            return Err(RouteError::NoWaypoints);
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(RouteError::InvalidStep(step));
        }

        let mut points = Vec::new();
        for (i, start) in waypoints.iter().enumerate() {
            let end = &waypoints[(i + 1) % waypoints.len()];
            let d_lat = end.latitude - start.latitude;
            let d_lon = end.longitude - start.longitude;
            let distance = (d_lat * d_lat + d_lon * d_lon).sqrt();
            if !distance.is_finite() {
                return Err(RouteError::NonFiniteSegment { index: i });
            }
            if (distance / step).ceil() > (MAX_ROUTE_POINTS - points.len()) as f64 {
                return Err(RouteError::TooManyPoints {
                    limit: MAX_ROUTE_POINTS,
                });
            }
            let count = segment_steps(distance, step);

            points.extend((0..count).map(|j| RoutePoint {
                latitude: start.latitude + d_lat * j as f64 / count as f64,
                longitude: start.longitude + d_lon * j as f64 / count as f64,
                fuel_level: start.fuel_level,
            }));
        }

        if points.is_empty() {
            return Err(RouteError::Degenerate);
        }

        tracing::debug!(
            waypoints = waypoints.len(),
            points = points.len(),
            step,
            "Interpolated route"
        );
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; construction rejects empty routes.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    /// Index of the point selected by `cursor`.
    pub fn position(&self, cursor: u64) -> usize {
        (cursor % self.points.len() as u64) as usize
    }

    pub fn point_at(&self, cursor: u64) -> &RoutePoint {
        &self.points[self.position(cursor)]
    }

    /// The point following the one selected by `cursor`, wrapping at the end.
    pub fn next_after(&self, cursor: u64) -> &RoutePoint {
        &self.points[(self.position(cursor) + 1) % self.points.len()]
    }
}
