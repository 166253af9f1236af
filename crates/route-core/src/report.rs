//! Synthetic telemetry derived from the route cursor.

use crate::route::Route;
use rand::Rng;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Every tenth point raises an SOS alarm with a precise fix.
const ALARM_INTERVAL: usize = 10;
const ALARM_ACCURACY: f64 = 100.0;
const BATTERY_RANGE: RangeInclusive<u8> = 0..=100;
const RPM_RANGE: RangeInclusive<u32> = 500..=4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alarm {
    Sos,
}

impl Alarm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alarm::Sos => "sos",
        }
    }
}

/// One outgoing location report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(rename = "id")]
    pub device_id: String,
    pub timestamp: u64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub bearing: f64,
    pub speed: f64,
    #[serde(rename = "batt")]
    pub battery: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm: Option<Alarm>,
    pub ignition: bool,
    pub accuracy: f64,
    pub rpm: u32,
    #[serde(rename = "fuel1")]
    pub fuel: f64,
    #[serde(rename = "driverUniqueId", skip_serializing_if = "Option::is_none")]
    pub driver_unique_id: Option<String>,
}

/// Identity and constants of the simulated device.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub device_id: String,
    pub driver_id: String,
    pub speed: f64,
}

impl DeviceProfile {
    /// Build the report for `cursor`.
    ///
    /// The start of the loop (`cursor mod len == 0`) is a parked device: speed 0,
    /// ignition off, and the driver identifier attached.
    pub fn report<R: Rng>(
        &self,
        route: &Route,
        cursor: u64,
        timestamp: u64,
        rng: &mut R,
    ) -> Report {
        let position = route.position(cursor);
        let current = route.point_at(cursor);
        let next = route.next_after(cursor);
        let loop_start = position == 0;
        let alarm_point = position % ALARM_INTERVAL == 0;

        Report {
            device_id: self.device_id.clone(),
            timestamp,
            latitude: current.latitude,
            longitude: current.longitude,
            bearing: current.bearing_to(next),
            speed: if loop_start { 0.0 } else { self.speed },
            battery: rng.random_range(BATTERY_RANGE),
            alarm: alarm_point.then_some(Alarm::Sos),
            ignition: !loop_start,
            accuracy: if alarm_point { ALARM_ACCURACY } else { 0.0 },
            rpm: rng.random_range(RPM_RANGE),
            fuel: current.fuel_level,
            driver_unique_id: loop_start.then(|| self.driver_id.clone()),
        }
    }
}
