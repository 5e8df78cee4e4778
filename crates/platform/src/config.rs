//! Driver identity and constants
//!
//! Central naming used by the device framework boundary and in log output.
//! Reference these constants rather than hardcoding strings.

/// Driver name as registered with the device framework.
pub const DRIVER_NAME: &str = "ads114s0xb";

/// Device-tree vendor prefix for compatible strings.
pub const VENDOR_PREFIX: &str = "ti";

/// Driver version (synchronized with Cargo.toml)
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the pseudo-attribute that toggles synthetic sampling.
pub const MOCK_MODE_ATTRIBUTE: &str = "SENSOR_MOCK_MODE";
