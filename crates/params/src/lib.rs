//! Constant values for ecsig cryptographic operations
//!
//! Curve domain parameters live here as `const` items so every crate in the
//! workspace reads the same process-wide, immutable values.

#![no_std]
#![forbid(unsafe_code)]

pub mod traditional;
