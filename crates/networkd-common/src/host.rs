//! Host capabilities used during network reconfiguration.
//!
//! The orchestrator only talks to the host through these traits so that
//! every side effect can be replaced in tests. The host-backed
//! implementations shell out via [`crate::shell`].

use async_trait::async_trait;
use tracing::instrument;

use crate::error::{NetError, NetResult};
use crate::shell::{self, IP_CMD, MODPROBE_CMD, SYSTEMCTL_CMD};

/// A network interface currently known to the kernel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemInterface {
    /// Kernel interface index
    pub index: u32,
    /// Interface name
    pub name: String,
}

impl SystemInterface {
    /// Creates a new SystemInterface
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// Link enumeration and administrative state.
#[async_trait]
pub trait LinkControl: Send + Sync {
    /// Lists the interfaces currently present on the host.
    fn system_interfaces(&self) -> NetResult<Vec<SystemInterface>>;

    /// Sets a live interface administratively down.
    async fn link_down(&self, iface: &SystemInterface) -> NetResult<()>;
}

/// Kernel module loading.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Loads `module`, passing `args` to the loader after the module name.
    async fn load_module(&self, module: &str, args: &[String]) -> NetResult<()>;
}

/// Service manager control.
#[async_trait]
pub trait UnitControl: Send + Sync {
    /// Runs `command` (e.g. "restart") against `unit`.
    async fn run_unit_command(&self, command: &str, unit: &str) -> NetResult<()>;
}

/// [`LinkControl`] backed by `if_nameindex(3)` and iproute2.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostLinks;

#[async_trait]
impl LinkControl for HostLinks {
    #[cfg(unix)]
    fn system_interfaces(&self) -> NetResult<Vec<SystemInterface>> {
        let interfaces = nix::net::if_::if_nameindex()
            .map_err(|e| NetError::enumeration(e.to_string()))?;

        Ok(interfaces
            .iter()
            .map(|iface| {
                SystemInterface::new(iface.index(), iface.name().to_string_lossy().into_owned())
            })
            .collect())
    }

    #[cfg(not(unix))]
    fn system_interfaces(&self) -> NetResult<Vec<SystemInterface>> {
        Err(NetError::enumeration(
            "interface enumeration is not supported on this platform",
        ))
    }

    #[instrument(skip_all, fields(iface = %iface.name))]
    async fn link_down(&self, iface: &SystemInterface) -> NetResult<()> {
        let cmd = shell::command_line(IP_CMD, &["link", "set", "dev", iface.name.as_str(), "down"]);
        shell::exec_or_throw(&cmd).await?;
        Ok(())
    }
}

/// [`ModuleLoader`] backed by `modprobe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modprobe;

#[async_trait]
impl ModuleLoader for Modprobe {
    #[instrument(skip(self))]
    async fn load_module(&self, module: &str, args: &[String]) -> NetResult<()> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(module);
        argv.extend(args.iter().map(String::as_str));

        let cmd = shell::command_line(MODPROBE_CMD, &argv);
        shell::exec_or_throw(&cmd)
            .await
            .map_err(|e| NetError::module_load(module, e))?;
        Ok(())
    }
}

/// [`UnitControl`] backed by `systemctl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Systemctl;

#[async_trait]
impl UnitControl for Systemctl {
    #[instrument(skip(self))]
    async fn run_unit_command(&self, command: &str, unit: &str) -> NetResult<()> {
        let cmd = shell::command_line(SYSTEMCTL_CMD, &[command, unit]);
        shell::exec_or_throw(&cmd)
            .await
            .map_err(|e| NetError::unit(command, unit, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_host_interfaces_include_loopback() {
        let ifaces = HostLinks.system_interfaces().unwrap();
        assert!(!ifaces.is_empty());
        assert!(ifaces.iter().all(|i| i.index > 0 && !i.name.is_empty()));
    }

    #[test]
    fn test_system_interface_new() {
        let iface = SystemInterface::new(2, "eth0");
        assert_eq!(iface.index, 2);
        assert_eq!(iface.name, "eth0");
    }
}
