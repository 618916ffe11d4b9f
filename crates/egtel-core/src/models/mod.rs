//! Data models and configuration.

pub mod config;
pub mod phone;

pub use config::{EgtelConfig, ExtractionConfig, ManualFallback, OcrConfig, PreprocessConfig};
pub use phone::{Carrier, CustomerInfo, PhoneRecord, UnknownCarrier};
