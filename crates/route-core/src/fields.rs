//! Report field names on the wire and in metrics.

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub metric: &'static str,
}

pub const DEVICE_ID: &str = "id";
pub const TIMESTAMP: &str = "timestamp";
pub const ALARM: &str = "alarm";
pub const IGNITION: &str = "ignition";
pub const DRIVER_UNIQUE_ID: &str = "driverUniqueId";

pub const LATITUDE: Field = Field {
    key: "lat",
    metric: "gpssim_latitude_degrees",
};

pub const LONGITUDE: Field = Field {
    key: "lon",
    metric: "gpssim_longitude_degrees",
};

pub const BEARING: Field = Field {
    key: "bearing",
    metric: "gpssim_bearing_degrees",
};

pub const SPEED: Field = Field {
    key: "speed",
    metric: "gpssim_speed",
};

pub const BATTERY: Field = Field {
    key: "batt",
    metric: "gpssim_battery_percent",
};

pub const ACCURACY: Field = Field {
    key: "accuracy",
    metric: "gpssim_accuracy",
};

pub const RPM: Field = Field {
    key: "rpm",
    metric: "gpssim_engine_rpm",
};

pub const FUEL: Field = Field {
    key: "fuel1",
    metric: "gpssim_fuel_level",
};
