//! Queue Integration Test Modules

pub mod configuration;
pub mod lifecycle;
pub mod threading;
