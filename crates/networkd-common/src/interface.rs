//! Interface descriptors produced by the network config generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a descriptor's type tag.
///
/// Only VLAN and bond interfaces need kernel modules; everything else maps
/// to [`InterfaceKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterfaceKind {
    /// 802.1Q VLAN (`vlan`)
    Vlan,
    /// Bonded interface (`bond`)
    Bond,
    /// Any other type tag, kept verbatim
    Other(String),
}

impl InterfaceKind {
    /// Returns the type tag as written by the generator.
    pub fn as_str(&self) -> &str {
        match self {
            InterfaceKind::Vlan => "vlan",
            InterfaceKind::Bond => "bond",
            InterfaceKind::Other(tag) => tag,
        }
    }
}

impl From<&str> for InterfaceKind {
    fn from(tag: &str) -> Self {
        match tag {
            "vlan" => InterfaceKind::Vlan,
            "bond" => InterfaceKind::Bond,
            other => InterfaceKind::Other(other.to_string()),
        }
    }
}

impl From<String> for InterfaceKind {
    fn from(tag: String) -> Self {
        InterfaceKind::from(tag.as_str())
    }
}

impl From<InterfaceKind> for String {
    fn from(kind: InterfaceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three networkd artifact kinds written per interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Virtual device definition (`.netdev`)
    Netdev,
    /// Link matching and renaming (`.link`)
    Link,
    /// Network and addressing (`.network`)
    Network,
}

impl ArtifactKind {
    /// All artifact kinds, in write order.
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Netdev,
        ArtifactKind::Link,
        ArtifactKind::Network,
    ];

    /// Returns the file extension for this artifact kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Netdev => "netdev",
            ArtifactKind::Link => "link",
            ArtifactKind::Network => "network",
        }
    }
}

/// Read-only view of one requested interface.
///
/// Implemented by whatever produces the rendered networkd configuration.
/// Empty rendered text means "no artifact of this kind".
pub trait NetworkInterface: Send + Sync {
    /// Interface name, matched against live system interfaces.
    fn name(&self) -> &str;

    /// Interface type classification.
    fn kind(&self) -> InterfaceKind;

    /// File stem for this interface's artifacts.
    fn filename(&self) -> &str;

    /// Space-delimited module parameters; only read for bonds.
    fn modprobe_params(&self) -> &str;

    /// Rendered `.netdev` text.
    fn netdev(&self) -> &str;

    /// Rendered `.link` text.
    fn link(&self) -> &str;

    /// Rendered `.network` text.
    fn network(&self) -> &str;

    /// Returns the rendered text for `artifact`.
    fn artifact(&self, artifact: ArtifactKind) -> &str {
        match artifact {
            ArtifactKind::Netdev => self.netdev(),
            ArtifactKind::Link => self.link(),
            ArtifactKind::Network => self.network(),
        }
    }
}

/// Plain descriptor as emitted in JSON by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// Interface name
    pub name: String,
    /// Type tag
    #[serde(rename = "type")]
    pub kind: InterfaceKind,
    /// Artifact file stem
    pub filename: String,
    /// Module parameters for bonds
    #[serde(default)]
    pub modprobe_params: String,
    /// `.netdev` text
    #[serde(default)]
    pub netdev: String,
    /// `.link` text
    #[serde(default)]
    pub link: String,
    /// `.network` text
    #[serde(default)]
    pub network: String,
}

impl InterfaceDescriptor {
    /// Creates a descriptor with no rendered artifacts.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<InterfaceKind>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            filename: filename.into(),
            modprobe_params: String::new(),
            netdev: String::new(),
            link: String::new(),
            network: String::new(),
        }
    }

    /// Sets the module parameters.
    pub fn with_modprobe_params(mut self, params: impl Into<String>) -> Self {
        self.modprobe_params = params.into();
        self
    }

    /// Sets the rendered `.netdev`, `.link` and `.network` texts.
    pub fn with_artifacts(
        mut self,
        netdev: impl Into<String>,
        link: impl Into<String>,
        network: impl Into<String>,
    ) -> Self {
        self.netdev = netdev.into();
        self.link = link.into();
        self.network = network.into();
        self
    }
}

impl NetworkInterface for InterfaceDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> InterfaceKind {
        self.kind.clone()
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn modprobe_params(&self) -> &str {
        &self.modprobe_params
    }

    fn netdev(&self) -> &str {
        &self.netdev
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn network(&self) -> &str {
        &self.network
    }
}
