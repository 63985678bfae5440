//! Config artifact writer
//!
//! Persists each descriptor's rendered `.netdev`, `.link` and `.network`
//! text into the networkd runtime directory.

use std::fs::{self, DirBuilder, Permissions};
use std::io::Write;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use networkd_common::config::NetworkdConfig;
use networkd_common::{ArtifactKind, NetError, NetResult, NetworkInterface};

/// Writes networkd artifacts into a runtime directory.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    runtime_dir: PathBuf,
    dir_mode: u32,
    file_mode: u32,
}

impl ConfigWriter {
    /// Creates a writer for `runtime_dir` with the default 0755/0444 modes
    pub fn new(runtime_dir: impl Into<PathBuf>) -> Self {
        let defaults = NetworkdConfig::default();
        Self {
            runtime_dir: runtime_dir.into(),
            dir_mode: defaults.dir_mode,
            file_mode: defaults.file_mode,
        }
    }

    /// Creates a writer from the `[networkd]` configuration section
    pub fn from_config(config: &NetworkdConfig) -> Self {
        Self {
            runtime_dir: config.runtime_dir.clone(),
            dir_mode: config.dir_mode,
            file_mode: config.file_mode,
        }
    }

    /// Runtime directory artifacts are written to
    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }

    /// Path of the `artifact` file for the stem `filename`
    pub fn artifact_path(&self, filename: &str, artifact: ArtifactKind) -> PathBuf {
        self.runtime_dir
            .join(format!("{}.{}", filename, artifact.extension()))
    }

    /// Writes every non-empty artifact of every descriptor, in order.
    ///
    /// Stops at the first failure. Artifacts already written stay in
    /// place; re-running is safe since each write replaces its target.
    #[instrument(skip_all, fields(dir = %self.runtime_dir.display()))]
    pub fn write_configs<I: NetworkInterface>(&self, interfaces: &[I]) -> NetResult<()> {
        for iface in interfaces {
            for artifact in ArtifactKind::ALL {
                let path = self.artifact_path(iface.filename(), artifact);
                self.write_config(&path, iface.artifact(artifact))?;
            }
        }
        Ok(())
    }

    fn write_config(&self, path: &Path, config: &str) -> NetResult<()> {
        if config.is_empty() {
            debug!("No content for {}, skipping", path.display());
            return Ok(());
        }

        let dir = path.parent().unwrap_or(&self.runtime_dir);
        DirBuilder::new()
            .recursive(true)
            .mode(self.dir_mode)
            .create(dir)
            .map_err(|e| NetError::persist(dir, e))?;

        // Rename over the target so a read-only artifact from a previous run
        // is still replaced.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| NetError::persist(path, e))?;
        tmp.write_all(config.as_bytes())
            .map_err(|e| NetError::persist(path, e))?;
        fs::set_permissions(tmp.path(), Permissions::from_mode(self.file_mode))
            .map_err(|e| NetError::persist(path, e))?;
        tmp.persist(path)
            .map_err(|e| NetError::persist(path, e.error))?;

        info!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use networkd_common::InterfaceDescriptor;
    use networkd_test::{artifact_files, bond, mode_of, physical, read_artifact};
    use pretty_assertions::assert_eq;

    fn writer_in(dir: &tempfile::TempDir) -> ConfigWriter {
        ConfigWriter::new(dir.path().join("run/systemd/network"))
    }

    #[test]
    fn test_artifact_paths() {
        let writer = ConfigWriter::new("/run/systemd/network");
        assert_eq!(
            writer.artifact_path("10-bond0", ArtifactKind::Netdev),
            PathBuf::from("/run/systemd/network/10-bond0.netdev")
        );
        assert_eq!(
            writer.artifact_path("10-bond0", ArtifactKind::Link),
            PathBuf::from("/run/systemd/network/10-bond0.link")
        );
        assert_eq!(
            writer.artifact_path("10-bond0", ArtifactKind::Network),
            PathBuf::from("/run/systemd/network/10-bond0.network")
        );
    }

    #[test]
    fn test_empty_artifacts_are_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        let desc = InterfaceDescriptor::new("eth0", "physical", "eth0").with_artifacts(
            "",
            "link-text",
            "",
        );

        writer.write_configs(&[desc]).unwrap();

        assert_eq!(artifact_files(writer.runtime_dir()), vec!["eth0.link"]);
        assert_eq!(read_artifact(writer.runtime_dir(), "eth0.link"), "link-text");
    }

    #[test]
    fn test_all_empty_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);

        writer
            .write_configs(&[InterfaceDescriptor::new("eth0", "physical", "eth0")])
            .unwrap();

        assert!(!writer.runtime_dir().exists());
    }

    #[test]
    fn test_rewrite_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        let first = InterfaceDescriptor::new("eth0", "physical", "eth0").with_artifacts(
            "",
            "",
            "[Network]\nDHCP=yes\nLLMNR=true\n",
        );
        let second = InterfaceDescriptor::new("eth0", "physical", "eth0").with_artifacts(
            "",
            "",
            "[Network]\nDHCP=no\n",
        );

        writer.write_configs(&[first]).unwrap();
        writer.write_configs(&[second]).unwrap();

        assert_eq!(
            read_artifact(writer.runtime_dir(), "eth0.network"),
            "[Network]\nDHCP=no\n"
        );
    }

    #[test]
    fn test_empty_text_leaves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        let with_link = InterfaceDescriptor::new("eth0", "physical", "eth0").with_artifacts(
            "",
            "old-link",
            "",
        );
        let without_link = InterfaceDescriptor::new("eth0", "physical", "eth0").with_artifacts(
            "",
            "",
            "net",
        );

        writer.write_configs(&[with_link]).unwrap();
        writer.write_configs(&[without_link]).unwrap();

        assert_eq!(read_artifact(writer.runtime_dir(), "eth0.link"), "old-link");
        assert_eq!(
            artifact_files(writer.runtime_dir()),
            vec!["eth0.link", "eth0.network"]
        );
    }

    #[test]
    fn test_modes() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);

        writer.write_configs(&[physical("eth0")]).unwrap();

        assert_eq!(mode_of(&writer.artifact_path("50-eth0", ArtifactKind::Network)), 0o444);
    }

    #[test]
    fn test_content_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        let b = bond("bond0", "mode=4");

        writer.write_configs(&[b.clone()]).unwrap();

        assert_eq!(read_artifact(writer.runtime_dir(), "30-bond0.netdev"), b.netdev);
        assert_eq!(read_artifact(writer.runtime_dir(), "30-bond0.network"), b.network);
        assert_eq!(
            artifact_files(writer.runtime_dir()),
            vec!["30-bond0.netdev", "30-bond0.network"]
        );
    }

    #[test]
    fn test_failure_names_path_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ConfigWriter::new(dir.path());
        // A regular file where a directory is needed
        fs::write(dir.path().join("blocker"), "not a directory").unwrap();

        let ok = InterfaceDescriptor::new("eth0", "physical", "eth0").with_artifacts("", "", "a");
        let blocked = InterfaceDescriptor::new("eth1", "physical", "blocker/eth1")
            .with_artifacts("n", "", "");
        let never = InterfaceDescriptor::new("eth2", "physical", "eth2").with_artifacts("", "", "c");

        let err = writer.write_configs(&[ok, blocked, never]).unwrap_err();

        match err {
            NetError::Persist { path, .. } => assert_eq!(path, dir.path().join("blocker")),
            other => panic!("Expected persist error, got {:?}", other),
        }
        assert_eq!(
            artifact_files(dir.path()),
            vec!["blocker", "eth0.network"]
        );
    }
}
