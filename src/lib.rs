pub mod cli;
pub mod configuration;
pub mod harness;
pub mod platforms;
pub mod probe;
pub mod report;
pub mod results;
pub mod schedule;
pub mod telemetry;
pub mod utilities;
