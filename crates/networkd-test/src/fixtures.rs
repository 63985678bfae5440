//! Descriptor fixtures for common interface shapes

use networkd_common::InterfaceDescriptor;

/// Physical interface with a DHCP `.network` artifact only
pub fn physical(name: &str) -> InterfaceDescriptor {
    InterfaceDescriptor::new(name, "physical", format!("50-{}", name)).with_artifacts(
        "",
        "",
        format!("[Match]\nName={}\n\n[Network]\nDHCP=yes\n", name),
    )
}

/// VLAN on top of `parent` with `.netdev` and `.network` artifacts
pub fn vlan(name: &str, id: u16, parent: &str) -> InterfaceDescriptor {
    InterfaceDescriptor::new(name, "vlan", format!("40-{}", name)).with_artifacts(
        format!("[NetDev]\nName={}\nKind=vlan\n\n[VLAN]\nId={}\n", name, id),
        "",
        format!("[Match]\nName={}\n\n[Network]\nDHCP=yes\n# parent {}\n", name, parent),
    )
}

/// Bond with module parameters and a `.netdev` artifact
pub fn bond(name: &str, modprobe_params: &str) -> InterfaceDescriptor {
    InterfaceDescriptor::new(name, "bond", format!("30-{}", name))
        .with_modprobe_params(modprobe_params)
        .with_artifacts(
            format!("[NetDev]\nName={}\nKind=bond\n", name),
            "",
            format!("[Match]\nName={}\n", name),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use networkd_common::{InterfaceKind, NetworkInterface};

    #[test]
    fn test_fixture_kinds() {
        assert_eq!(physical("eth0").kind(), InterfaceKind::Other("physical".into()));
        assert_eq!(vlan("vlan10", 10, "eth0").kind(), InterfaceKind::Vlan);
        assert_eq!(bond("bond0", "mode=1").kind(), InterfaceKind::Bond);
    }

    #[test]
    fn test_bond_fixture_params() {
        let b = bond("bond0", "mode=4 miimon=100");
        assert_eq!(b.modprobe_params(), "mode=4 miimon=100");
        assert!(b.netdev().contains("Kind=bond"));
    }
}
