pub mod bom;
pub mod config;
pub mod error;
pub mod origin;
pub mod telemetry;
