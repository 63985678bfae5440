//! Restart orchestrator
//!
//! Sequences link teardown and module probing, then always restarts
//! systemd-networkd twice. The restart outcome decides what the caller
//! sees:
//!
//! | first restart | second restart | reported             |
//! |---------------|----------------|----------------------|
//! | fails         | not attempted  | first restart error  |
//! | ok            | fails          | second restart error |
//! | ok            | ok             | earlier step result  |

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use networkd_common::host::{HostLinks, Modprobe, Systemctl};
use networkd_common::{
    ApplyConfig, LinkControl, ModuleLoader, NetError, NetResult, NetworkInterface, UnitControl,
};

use crate::collector::InterfaceCollector;
use crate::prober::ModuleProber;
use crate::writer::ConfigWriter;

/// Unit verb used to apply configuration.
pub const RESTART_COMMAND: &str = "restart";

/// Orchestration phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPhase {
    /// Nothing done yet.
    Start,
    /// Bringing requested links down.
    Deactivating,
    /// Loading the VLAN module.
    ProbingVlan,
    /// Loading the bonding module.
    ProbingBonding,
    /// Restarting the daemon.
    Finalizing,
    /// Outcome settled.
    Done,
}

impl RestartPhase {
    /// Returns the phase name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPhase::Start => "start",
            RestartPhase::Deactivating => "deactivating",
            RestartPhase::ProbingVlan => "probing_vlan",
            RestartPhase::ProbingBonding => "probing_bonding",
            RestartPhase::Finalizing => "finalizing",
            RestartPhase::Done => "done",
        }
    }
}

/// Restarts networkd after bringing links down and loading modules.
pub struct NetworkRestarter {
    collector: InterfaceCollector,
    prober: ModuleProber,
    units: Arc<dyn UnitControl>,
    unit: String,
    restart_delay: Duration,
}

impl NetworkRestarter {
    /// Creates a restarter over explicit host capabilities
    pub fn new(
        links: Arc<dyn LinkControl>,
        loader: Arc<dyn ModuleLoader>,
        units: Arc<dyn UnitControl>,
        config: &ApplyConfig,
    ) -> Self {
        Self {
            collector: InterfaceCollector::new(links),
            prober: ModuleProber::new(loader, &config.modules),
            units,
            unit: config.networkd.unit.clone(),
            restart_delay: config.restart_delay(),
        }
    }

    /// Creates a restarter acting on the local host
    pub fn with_host(config: &ApplyConfig) -> Self {
        Self::new(
            Arc::new(HostLinks),
            Arc::new(Modprobe),
            Arc::new(Systemctl),
            config,
        )
    }

    fn enter(&self, phase: RestartPhase) {
        debug!(phase = phase.as_str(), "Network restart phase");
    }

    /// Brings requested links down, loads modules and restarts networkd.
    ///
    /// The double restart runs no matter how the earlier steps ended. A
    /// restart failure replaces any earlier error; otherwise the first
    /// earlier error (or success) is returned.
    #[instrument(skip_all, fields(unit = %self.unit, interfaces = interfaces.len()))]
    pub async fn restart_network<I: NetworkInterface>(&self, interfaces: &[I]) -> NetResult<()> {
        self.enter(RestartPhase::Start);
        let pending = self.prepare(interfaces).await;
        if let Err(e) = &pending {
            warn!("Network preparation failed, restarting {} anyway: {}", self.unit, e);
        }
        self.finalize(pending).await
    }

    /// Writes all artifacts, then restarts the network.
    ///
    /// A write failure is returned before anything on the host is touched.
    pub async fn apply<I: NetworkInterface>(
        &self,
        writer: &ConfigWriter,
        interfaces: &[I],
    ) -> NetResult<()> {
        writer.write_configs(interfaces)?;
        self.restart_network(interfaces).await
    }

    async fn prepare<I: NetworkInterface>(&self, interfaces: &[I]) -> NetResult<()> {
        self.enter(RestartPhase::Deactivating);
        self.collector.down_interfaces(interfaces).await?;

        self.enter(RestartPhase::ProbingVlan);
        self.prober.probe_vlan(interfaces).await?;

        self.enter(RestartPhase::ProbingBonding);
        self.prober.probe_bonding(interfaces).await
    }

    async fn finalize(&self, pending: NetResult<()>) -> NetResult<()> {
        self.enter(RestartPhase::Finalizing);
        let outcome = match self.restart_twice().await {
            Ok(()) => pending,
            Err(restart_err) => {
                if let Err(superseded) = &pending {
                    warn!("Discarding earlier failure in favor of restart failure: {}", superseded);
                }
                Err(restart_err)
            }
        };
        self.enter(RestartPhase::Done);
        outcome
    }

    async fn restart_twice(&self) -> NetResult<()> {
        self.restart_unit().await?;
        // A single restart can race link setup and leave networkd with a
        // stale view of the links.
        tokio::time::sleep(self.restart_delay).await;
        self.restart_unit().await
    }

    async fn restart_unit(&self) -> NetResult<()> {
        self.units
            .run_unit_command(RESTART_COMMAND, &self.unit)
            .await
            .map_err(|e| match e {
                NetError::Unit { .. } => e,
                other => NetError::unit(RESTART_COMMAND, &self.unit, other),
            })?;
        info!("Restarted {}", self.unit);
        Ok(())
    }
}
