//! networkd-apply - applies generated systemd-networkd configuration
//!
//! Writes rendered `.netdev`/`.link`/`.network` artifacts into the runtime
//! directory, brings the affected links down, loads the VLAN and bonding
//! modules and restarts systemd-networkd.

mod collector;
mod descriptors;
mod prober;
mod restart;
mod writer;

pub use collector::InterfaceCollector;
pub use descriptors::load_descriptors;
pub use prober::{bonding_args, ModuleProber};
pub use restart::{NetworkRestarter, RestartPhase, RESTART_COMMAND};
pub use writer::ConfigWriter;
