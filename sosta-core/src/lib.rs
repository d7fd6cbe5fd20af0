//! Core types and service wiring for the sosta parking-validation hub.

/// Configuration surface consumed by the driver registry.
pub mod config;
/// Domain models and the parking reconciliation logic shared by all providers.
pub mod model;
/// Traits describing the provider interface and the error taxonomy.
pub mod ports;
/// Registry that resolves configured driver names to provider instances.
pub mod registry;
/// High-level service facade used by clients.
pub mod service;

pub use config::*;
pub use model::*;
pub use ports::*;
pub use registry::*;
pub use service::*;
