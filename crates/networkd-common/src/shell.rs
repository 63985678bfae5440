//! Shell command execution utilities.
//!
//! All host commands (link control, module loading, unit control) are run
//! through `/bin/sh -c` with every caller-supplied argument quoted by
//! [`shellquote`].
//!
//! # Example
//!
//! ```ignore
//! use networkd_common::shell::{self, MODPROBE_CMD, shellquote};
//!
//! let cmd = format!("{} {}", MODPROBE_CMD, shellquote("8021q"));
//! shell::exec_or_throw(&cmd).await?;
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{NetError, NetResult};

/// Path to the `ip` command for link configuration.
pub const IP_CMD: &str = "/sbin/ip";

/// Path to the `modprobe` kernel module loader.
pub const MODPROBE_CMD: &str = "/sbin/modprobe";

/// Path to the `systemctl` service control command.
pub const SYSTEMCTL_CMD: &str = "/bin/systemctl";

/// Regex for characters that need escaping in shell double-quotes.
/// Matches: $, `, ", \, and newline
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Quotes a string for safe use in shell commands.
///
/// The string is wrapped in double quotes and `$`, `` ` ``, `"`, `\` and
/// newline are escaped.
///
/// ```
/// use networkd_common::shell::shellquote;
///
/// assert_eq!(shellquote("8021q"), "\"8021q\"");
/// assert_eq!(shellquote("mode=$x"), "\"mode=\\$x\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Builds a command line from a program path and its arguments, quoting
/// each argument.
pub fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&shellquote(arg.as_ref()));
    }
    line
}

/// Result of a shell command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// The stdout output.
    pub stdout: String,
    /// The stderr output.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Executes a shell command and waits for it to finish.
///
/// There is no timeout: a command that never exits blocks the caller.
///
/// # Returns
///
/// * `Ok(ExecResult)` - The command ran, whatever its exit code
/// * `Err(NetError::ShellExec)` - The shell could not be spawned
pub async fn exec(cmd: &str) -> NetResult<ExecResult> {
    tracing::debug!(command = %cmd, "Executing shell command");

    let output = Command::new("/bin/sh")
        .arg("-c")
        .arg(cmd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| NetError::ShellExec {
            command: cmd.to_string(),
            source: e,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(command = %cmd, exit_code = exit_code, "Command succeeded");
    } else {
        tracing::warn!(
            command = %cmd,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Command failed"
        );
    }

    Ok(result)
}

/// Executes a shell command and turns a non-zero exit into an error.
///
/// # Returns
///
/// * `Ok(String)` - The stdout output on success
/// * `Err(NetError)` - If the command fails to spawn or returns non-zero
pub async fn exec_or_throw(cmd: &str) -> NetResult<String> {
    let result = exec(cmd).await?;
    if result.success() {
        Ok(result.stdout)
    } else {
        Err(NetError::ShellCommandFailed {
            command: cmd.to_string(),
            exit_code: result.exit_code,
            output: result.combined_output(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shellquote_simple() {
        assert_eq!(shellquote("eth0"), "\"eth0\"");
        assert_eq!(shellquote("bonding"), "\"bonding\"");
        assert_eq!(shellquote("miimon=100"), "\"miimon=100\"");
    }

    #[test]
    fn test_shellquote_special_chars() {
        assert_eq!(shellquote("$HOME"), "\"\\$HOME\"");
        assert_eq!(shellquote("`whoami`"), "\"\\`whoami\\`\"");
        assert_eq!(shellquote("say \"hello\""), "\"say \\\"hello\\\"\"");
        assert_eq!(shellquote("path\\to"), "\"path\\\\to\"");
        assert_eq!(shellquote("line1\nline2"), "\"line1\\\nline2\"");
    }

    #[test]
    fn test_shellquote_empty() {
        assert_eq!(shellquote(""), "\"\"");
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            command_line(MODPROBE_CMD, &["bonding", "mode=4", "miimon=100"]),
            "/sbin/modprobe \"bonding\" \"mode=4\" \"miimon=100\""
        );
        let no_args: [&str; 0] = [];
        assert_eq!(command_line(SYSTEMCTL_CMD, &no_args), "/bin/systemctl");
    }

    #[test]
    fn test_command_line_blocks_injection() {
        let line = command_line(IP_CMD, &["link", "set", "dev", "eth0; reboot", "down"]);
        assert!(line.contains("\"eth0; reboot\""));
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "stdout".to_string(),
            stderr: "stderr".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "stdout\nstderr");

        let only_err = ExecResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: "error message".to_string(),
        };
        assert_eq!(only_err.combined_output(), "error message");
    }

    #[tokio::test]
    async fn test_exec_echo() {
        let result = exec("echo hello").await.unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello");
    }

    #[tokio::test]
    async fn test_exec_failure() {
        let result = exec("exit 42").await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }

    #[tokio::test]
    async fn test_exec_or_throw_failure() {
        match exec_or_throw("echo boom >&2; exit 3").await {
            Err(NetError::ShellCommandFailed {
                exit_code, output, ..
            }) => {
                assert_eq!(exit_code, 3);
                assert_eq!(output, "boom");
            }
            other => panic!("Expected ShellCommandFailed error, got {:?}", other),
        }
    }
}
