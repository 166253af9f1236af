//! Report encoding for the OsmAnd-style GET protocol.
//!
//! Every report becomes one `GET /?key=value&...` request. Field order is
//! fixed; optional fields are left out entirely rather than sent empty.

use route_core::fields;
use reqwest::Url;
use route_core::Report;

/// Treatment of `accuracy`, `rpm` and `fuel1` when their value is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroFields {
    /// Leave zero-valued fields out, as existing tracking servers expect.
    #[default]
    Omit,
    /// Always send them, with an explicit `0`.
    Send,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEncoder {
    zero_fields: ZeroFields,
}

impl QueryEncoder {
    pub fn new(zero_fields: ZeroFields) -> Self {
        Self { zero_fields }
    }

    /// Ordered key/value pairs for `report`.
    pub fn pairs(&self, report: &Report) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (fields::DEVICE_ID, report.device_id.clone()),
            (fields::TIMESTAMP, report.timestamp.to_string()),
            (fields::LATITUDE.key, report.latitude.to_string()),
            (fields::LONGITUDE.key, report.longitude.to_string()),
            (fields::BEARING.key, report.bearing.to_string()),
            (fields::SPEED.key, report.speed.to_string()),
            (fields::BATTERY.key, report.battery.to_string()),
        ];

        if let Some(alarm) = report.alarm {
            pairs.push((fields::ALARM, alarm.as_str().to_string()));
        }
        pairs.push((fields::IGNITION, report.ignition.to_string()));

        if self.keep(report.accuracy != 0.0) {
            pairs.push((fields::ACCURACY.key, report.accuracy.to_string()));
        }
        if self.keep(report.rpm != 0) {
            pairs.push((fields::RPM.key, report.rpm.to_string()));
        }
        if self.keep(report.fuel != 0.0) {
            pairs.push((fields::FUEL.key, report.fuel.to_string()));
        }
        if let Some(driver) = &report.driver_unique_id {
            pairs.push((fields::DRIVER_UNIQUE_ID, driver.clone()));
        }
        pairs
    }

    /// `base` with the report appended as an `application/x-www-form-urlencoded` query.
    pub fn url(&self, base: &Url, report: &Report) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut().extend_pairs(self.pairs(report));
        url
    }

    fn keep(&self, nonzero: bool) -> bool {
        nonzero || self.zero_fields == ZeroFields::Send
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_core::Alarm;

    fn encode(encoder: QueryEncoder, report: &Report) -> String {
        let base = Url::parse("http://localhost:5055/").unwrap();
        encoder.url(&base, report).query().unwrap_or_default().to_string()
    }

    fn moving_report() -> Report {
        Report {
            device_id: "123456789012345".to_string(),
            timestamp: 1_700_000_000,
            latitude: 48.8566,
            longitude: 2.3522,
            bearing: 90.0,
            speed: 40.0,
            battery: 57,
            alarm: None,
            ignition: true,
            accuracy: 0.0,
            rpm: 1200,
            fuel: 12.5,
            driver_unique_id: None,
        }
    }

    #[test]
    fn encodes_moving_report() {
        let query = encode(QueryEncoder::default(), &moving_report());
        assert_eq!(
            query,
            "id=123456789012345&timestamp=1700000000&lat=48.8566&lon=2.3522\
             &bearing=90&speed=40&batt=57&ignition=true&rpm=1200&fuel1=12.5"
        );
    }

    #[test]
    fn encodes_loop_start_report() {
        let report = Report {
            speed: 0.0,
            alarm: Some(Alarm::Sos),
            ignition: false,
            accuracy: 100.0,
            driver_unique_id: Some("123456".to_string()),
            ..moving_report()
        };
        let query = encode(QueryEncoder::default(), &report);
        assert_eq!(
            query,
            "id=123456789012345&timestamp=1700000000&lat=48.8566&lon=2.3522\
             &bearing=90&speed=0&batt=57&alarm=sos&ignition=false&accuracy=100\
             &rpm=1200&fuel1=12.5&driverUniqueId=123456"
        );
    }

    #[test]
    fn zero_fields_omitted_by_default() {
        let report = Report {
            rpm: 0,
            fuel: 0.0,
            ..moving_report()
        };
        let keys: Vec<_> = QueryEncoder::default()
            .pairs(&report)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert!(!keys.contains(&"accuracy"));
        assert!(!keys.contains(&"rpm"));
        assert!(!keys.contains(&"fuel1"));
        // Speed and battery are always sent, even at zero.
        assert!(keys.contains(&"speed"));
        assert!(keys.contains(&"batt"));
    }

    #[test]
    fn zero_fields_sent_when_requested() {
        let report = Report {
            rpm: 0,
            fuel: 0.0,
            ..moving_report()
        };
        let query = encode(QueryEncoder::new(ZeroFields::Send), &report);
        assert!(query.ends_with("&ignition=true&accuracy=0&rpm=0&fuel1=0"));
    }

    #[test]
    fn escapes_reserved_characters() {
        let report = Report {
            device_id: "truck 7/a&b=c".to_string(),
            latitude: -33.9,
            ..moving_report()
        };
        let query = encode(QueryEncoder::default(), &report);
        assert!(query.starts_with("id=truck+7%2Fa%26b%3Dc&"));
        assert!(query.contains("&lat=-33.9&"));
    }

    #[test]
    fn query_goes_to_server_root() {
        let base = Url::parse("http://127.0.0.1:5055/").unwrap();
        let url = QueryEncoder::default().url(&base, &moving_report());
        assert_eq!(url.path(), "/");
        assert!(url.as_str().starts_with("http://127.0.0.1:5055/?id="));
    }
}
