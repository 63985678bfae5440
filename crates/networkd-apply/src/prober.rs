//! Kernel module prober
//!
//! VLAN and bond interfaces need `8021q` and `bonding` loaded before
//! networkd can create them.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use networkd_common::config::ModulesConfig;
use networkd_common::{InterfaceKind, ModuleLoader, NetError, NetResult, NetworkInterface};

/// Loads the kernel modules required by the requested interface kinds.
pub struct ModuleProber {
    loader: Arc<dyn ModuleLoader>,
    vlan_module: String,
    bonding_module: String,
}

impl ModuleProber {
    /// Creates a prober using the configured module names
    pub fn new(loader: Arc<dyn ModuleLoader>, modules: &ModulesConfig) -> Self {
        Self {
            loader,
            vlan_module: modules.vlan_module.clone(),
            bonding_module: modules.bonding_module.clone(),
        }
    }

    async fn load(&self, module: &str, args: &[String]) -> NetResult<()> {
        self.loader
            .load_module(module, args)
            .await
            .map_err(|e| match e {
                NetError::ModuleLoad { .. } => e,
                other => NetError::module_load(module, other),
            })?;
        info!("Loaded kernel module {} {:?}", module, args);
        Ok(())
    }

    /// Loads the VLAN module if any requested interface is a VLAN.
    #[instrument(skip_all)]
    pub async fn probe_vlan<I: NetworkInterface>(&self, interfaces: &[I]) -> NetResult<()> {
        if !interfaces.iter().any(|i| i.kind() == InterfaceKind::Vlan) {
            debug!("No VLAN interfaces requested, not loading {}", self.vlan_module);
            return Ok(());
        }
        self.load(&self.vlan_module, &[]).await
    }

    /// Always loads the bonding module, with the first bond's parameters.
    #[instrument(skip_all)]
    pub async fn probe_bonding<I: NetworkInterface>(&self, interfaces: &[I]) -> NetResult<()> {
        let args = bonding_args(interfaces);
        self.load(&self.bonding_module, &args).await
    }
}

/// Loader arguments for the bonding module.
///
/// Only the first bond descriptor contributes; later bonds' parameters are
/// ignored, never merged.
pub fn bonding_args<I: NetworkInterface>(interfaces: &[I]) -> Vec<String> {
    interfaces
        .iter()
        .find(|i| i.kind() == InterfaceKind::Bond)
        .map(|bond| {
            bond.modprobe_params()
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
