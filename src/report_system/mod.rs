pub mod report;
pub mod telemetry;
