//! Loading generator output from disk

use std::fs;
use std::path::Path;

use networkd_common::{InterfaceDescriptor, NetError, NetResult};

/// Reads a JSON array of interface descriptors, preserving order.
pub fn load_descriptors(path: impl AsRef<Path>) -> NetResult<Vec<InterfaceDescriptor>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| NetError::Descriptor {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| NetError::Descriptor {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use networkd_common::InterfaceKind;

    #[test]
    fn test_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces.json");
        fs::write(
            &path,
            r#"[
                {"name": "bond0", "type": "bond", "filename": "10-bond0", "modprobe_params": "mode=1"},
                {"name": "bond1", "type": "bond", "filename": "11-bond1", "modprobe_params": "mode=4"},
                {"name": "vlan10", "type": "vlan", "filename": "20-vlan10"}
            ]"#,
        )
        .unwrap();

        let descs = load_descriptors(&path).unwrap();

        let names: Vec<_> = descs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["bond0", "bond1", "vlan10"]);
        assert_eq!(descs[2].kind, InterfaceKind::Vlan);
    }

    #[test]
    fn test_missing_file() {
        let err = load_descriptors("/nonexistent/interfaces.json").unwrap_err();
        assert!(matches!(err, NetError::Descriptor { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interfaces.json");
        fs::write(&path, r#"[{"name": "eth0"}]"#).unwrap();

        match load_descriptors(&path) {
            Err(NetError::Descriptor { message, .. }) => assert!(message.contains("type")),
            other => panic!("Expected descriptor error, got {:?}", other),
        }
    }
}
