pub mod config;
pub mod error;
pub mod leads;
pub mod telemetry;
pub mod tools;
