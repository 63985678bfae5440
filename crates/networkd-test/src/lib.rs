//! Test infrastructure for networkd runtime reconfiguration
//!
//! Provides:
//! - A scriptable mock host implementing the link, module and unit capabilities
//! - Descriptor fixtures for common interface shapes
//! - Runtime directory verification helpers

pub mod fixtures;
mod mock_host;
mod verification;

pub use fixtures::*;
pub use mock_host::{HostCall, MockHost};
pub use verification::*;
