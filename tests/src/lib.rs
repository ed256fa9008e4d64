//! Shared fixtures and test doubles for the ecsig integration tests

pub mod doubles;
pub mod logging;
pub mod vectors;
