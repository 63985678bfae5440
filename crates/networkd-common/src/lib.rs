//! Common infrastructure for applying systemd-networkd configuration.
//!
//! - [`interface`]: the descriptor view consumed by every step
//! - [`host`]: link, module and unit capabilities plus host-backed impls
//! - [`shell`]: shell command execution with proper quoting
//! - [`config`]: TOML configuration with defaults
//! - [`error`]: error types
//!
//! # Example
//!
//! ```ignore
//! use networkd_common::{host::Modprobe, ModuleLoader, NetResult};
//!
//! async fn load_vlan() -> NetResult<()> {
//!     Modprobe.load_module("8021q", &[]).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod interface;
pub mod shell;

// Re-export commonly used items at crate root
pub use config::ApplyConfig;
pub use error::{NetError, NetResult};
pub use host::{LinkControl, ModuleLoader, SystemInterface, UnitControl};
pub use interface::{ArtifactKind, InterfaceDescriptor, InterfaceKind, NetworkInterface};
