//! Error types for network reconfiguration.
//!
//! Every failure surfaced to a caller is a [`NetError`]. Per-interface
//! link-down failures are not represented here; they are logged and dropped
//! by the collector.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for network reconfiguration operations.
pub type NetResult<T> = Result<T, NetError>;

/// Errors that can occur while reconfiguring the network stack.
#[derive(Debug, Error)]
pub enum NetError {
    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// The live system interfaces could not be listed.
    #[error("Failed to enumerate system interfaces: {message}")]
    Enumeration {
        /// Error message.
        message: String,
    },

    /// A kernel module could not be loaded.
    #[error("Failed to load kernel module '{module}': {source}")]
    ModuleLoad {
        /// The module name passed to the loader.
        module: String,
        /// The loader invocation failure.
        #[source]
        source: Box<NetError>,
    },

    /// A runtime directory or artifact could not be written.
    #[error("Failed to persist {}: {source}", path.display())]
    Persist {
        /// The directory or file that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A unit command against the network daemon failed.
    #[error("Failed to {command} unit '{unit}': {source}")]
    Unit {
        /// The unit verb (e.g. "restart").
        command: String,
        /// The unit name.
        unit: String,
        /// The service-control failure.
        #[source]
        source: Box<NetError>,
    },

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Interface descriptor input could not be read.
    #[error("Invalid interface descriptors in {}: {message}", path.display())]
    Descriptor {
        /// The descriptor file.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl NetError {
    /// Creates an enumeration error.
    pub fn enumeration(message: impl Into<String>) -> Self {
        Self::Enumeration {
            message: message.into(),
        }
    }

    /// Wraps a loader failure for `module`.
    pub fn module_load(module: impl Into<String>, source: NetError) -> Self {
        Self::ModuleLoad {
            module: module.into(),
            source: Box::new(source),
        }
    }

    /// Creates a persist error for `path`.
    pub fn persist(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }

    /// Wraps a service-control failure for `command` against `unit`.
    pub fn unit(command: impl Into<String>, unit: impl Into<String>, source: NetError) -> Self {
        Self::Unit {
            command: command.into(),
            unit: unit.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if this error came from restarting the network daemon.
    pub fn is_restart_failure(&self) -> bool {
        matches!(self, NetError::Unit { command, .. } if command == "restart")
    }

    /// Returns true if this error came from the kernel module loader.
    pub fn is_module_load_failure(&self) -> bool {
        matches!(self, NetError::ModuleLoad { .. })
    }
}
