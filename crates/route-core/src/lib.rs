pub mod bearing;
pub mod fields;
pub mod report;
pub mod route;
pub mod sender;
pub mod sink;
pub mod timebase;
pub mod waypoint;

pub use bearing::initial_bearing;
pub use report::{Alarm, DeviceProfile, Report};
pub use route::{segment_steps, Route, RouteError, RoutePoint, MAX_ROUTE_POINTS};
pub use sender::{LoopConfig, ReportLoop, SenderStats};
pub use sink::{RecordingSink, ReportSink};
pub use timebase::TimeBase;
pub use waypoint::{load_waypoints, read_waypoints, ParseError, Waypoint};
