//! Interface state collector
//!
//! Brings requested interfaces down before networkd picks up new
//! configuration.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use networkd_common::{LinkControl, NetResult, NetworkInterface, SystemInterface};

/// Deactivates live interfaces that match requested descriptors.
pub struct InterfaceCollector {
    links: Arc<dyn LinkControl>,
}

impl InterfaceCollector {
    /// Creates a collector over the given link capability
    pub fn new(links: Arc<dyn LinkControl>) -> Self {
        Self { links }
    }

    /// Snapshot of live interfaces keyed by name
    fn live_interfaces(&self) -> NetResult<HashMap<String, SystemInterface>> {
        Ok(self
            .links
            .system_interfaces()?
            .into_iter()
            .map(|iface| (iface.name.clone(), iface))
            .collect())
    }

    /// Brings down every requested interface that currently exists.
    ///
    /// Only enumeration failure is returned. A failed link-down is logged
    /// and the remaining interfaces are still processed; requested
    /// interfaces that do not exist yet are skipped.
    #[instrument(skip_all, fields(requested = interfaces.len()))]
    pub async fn down_interfaces<I: NetworkInterface>(&self, interfaces: &[I]) -> NetResult<()> {
        let live = self.live_interfaces()?;

        for iface in interfaces {
            let Some(system_iface) = live.get(iface.name()) else {
                debug!("Interface {} not present, skipping", iface.name());
                continue;
            };

            match self.links.link_down(system_iface).await {
                Ok(()) => info!("Brought down interface {}", system_iface.name),
                Err(e) => warn!(
                    "Error while downing interface {:?} ({}). Continuing...",
                    system_iface.name, e
                ),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use networkd_common::NetError;
    use networkd_test::{bond, physical, vlan, MockHost};
    use pretty_assertions::assert_eq;

    fn collector(host: &Arc<MockHost>) -> InterfaceCollector {
        InterfaceCollector::new(host.clone())
    }

    #[tokio::test]
    async fn test_no_live_match_issues_no_link_down() {
        let host = Arc::new(MockHost::new().with_interfaces(&["lo", "eth9"]));

        let result = collector(&host)
            .down_interfaces(&[physical("eth0"), vlan("vlan10", 10, "eth0")])
            .await;

        assert!(result.is_ok());
        assert!(host.link_downs().is_empty());
    }

    #[tokio::test]
    async fn test_link_down_failure_is_not_propagated() {
        let host = Arc::new(
            MockHost::new()
                .with_interfaces(&["eth0", "eth1"])
                .failing_link("eth0"),
        );

        let result = collector(&host)
            .down_interfaces(&[physical("eth0"), physical("eth1")])
            .await;

        assert!(result.is_ok());
        assert_eq!(host.link_downs(), vec!["eth0", "eth1"]);
    }

    #[tokio::test]
    async fn test_only_matching_interfaces_downed_in_request_order() {
        let host = Arc::new(MockHost::new().with_interfaces(&["lo", "eth0", "bond0"]));

        collector(&host)
            .down_interfaces(&[bond("bond0", "mode=1"), physical("eth2"), physical("eth0")])
            .await
            .unwrap();

        assert_eq!(host.link_downs(), vec!["bond0", "eth0"]);
    }

    #[tokio::test]
    async fn test_enumeration_failure_aborts_before_link_down() {
        let host = Arc::new(
            MockHost::new()
                .with_interfaces(&["eth0"])
                .failing_enumeration("netlink unavailable"),
        );

        let result = collector(&host).down_interfaces(&[physical("eth0")]).await;

        assert!(matches!(result, Err(NetError::Enumeration { .. })));
        assert!(host.link_downs().is_empty());
    }
}
