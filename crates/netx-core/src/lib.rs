//! Core constants shared across netx crates.
//!
//! This crate provides:
//! - Default configuration values
//! - Stable operation and failure strings used in classified errors
//! - Common project metadata

pub mod defaults;
pub mod failures;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use failures::*;

/// Project name.
pub const PROJECT_NAME: &str = "netx";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
