//! Daily store sales forecasting: request validation, feature encoding, and
//! inference against pre-fitted scaling and regression artifacts.

pub mod config;
pub mod error;
pub mod prediction;
pub mod telemetry;
