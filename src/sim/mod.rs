/// Live battery SOC integration.
pub mod battery;
/// Time sources and the tick schedule.
pub mod clock;
pub mod dispatch;
pub mod forecast;
/// Dispatch-plan aggregation.
pub mod summary;
pub mod telemetry;
pub mod types;
