//! Scriptable host double.
//!
//! `MockHost` implements every host capability, records each call in order
//! and fails exactly the calls it was told to fail. Failures carry the same
//! error shapes the host-backed implementations produce.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use tokio::time::Instant;
use tracing::info;

use networkd_common::{
    LinkControl, ModuleLoader, NetError, NetResult, SystemInterface, UnitControl,
};

/// A single capability invocation seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `link_down` on the named interface
    LinkDown(String),
    /// `load_module` with its extra arguments
    LoadModule {
        /// Module name
        module: String,
        /// Extra loader arguments
        args: Vec<String>,
    },
    /// `run_unit_command`
    UnitCommand {
        /// Unit verb
        command: String,
        /// Unit name
        unit: String,
    },
}

/// Mock host for orchestrator tests.
#[derive(Debug, Default)]
pub struct MockHost {
    interfaces: Vec<SystemInterface>,
    enumeration_error: Option<String>,
    failing_links: HashSet<String>,
    failing_modules: HashSet<String>,
    /// Outcome per unit command, consumed in order; exhausted means success
    unit_outcomes: Mutex<VecDeque<bool>>,
    calls: Mutex<Vec<HostCall>>,
    unit_call_times: Mutex<Vec<Instant>>,
}

impl MockHost {
    /// Creates a host with no interfaces where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the live interfaces, indexed from 1 in the given order.
    pub fn with_interfaces(mut self, names: &[&str]) -> Self {
        self.interfaces = names
            .iter()
            .enumerate()
            .map(|(i, name)| SystemInterface::new(i as u32 + 1, *name))
            .collect();
        self
    }

    /// Makes interface enumeration fail.
    pub fn failing_enumeration(mut self, message: impl Into<String>) -> Self {
        self.enumeration_error = Some(message.into());
        self
    }

    /// Makes `link_down` fail for `name`.
    pub fn failing_link(mut self, name: impl Into<String>) -> Self {
        self.failing_links.insert(name.into());
        self
    }

    /// Makes `load_module` fail for `module`.
    pub fn failing_module(mut self, module: impl Into<String>) -> Self {
        self.failing_modules.insert(module.into());
        self
    }

    /// Scripts unit command outcomes in call order (`true` = success).
    pub fn with_unit_outcomes(self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        *self.unit_outcomes.lock().expect("mock host lock poisoned") =
            outcomes.into_iter().collect();
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().expect("mock host lock poisoned").clone()
    }

    /// Names passed to `link_down`, in order.
    pub fn link_downs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::LinkDown(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// `(module, args)` pairs passed to `load_module`, in order.
    pub fn module_loads(&self) -> Vec<(String, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::LoadModule { module, args } => Some((module, args)),
                _ => None,
            })
            .collect()
    }

    /// Number of times `module` was loaded.
    pub fn module_load_count(&self, module: &str) -> usize {
        self.module_loads()
            .iter()
            .filter(|(m, _)| m == module)
            .count()
    }

    /// `(command, unit)` pairs passed to `run_unit_command`, in order.
    pub fn unit_commands(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::UnitCommand { command, unit } => Some((command, unit)),
                _ => None,
            })
            .collect()
    }

    /// Tokio clock readings taken at each unit command.
    pub fn unit_call_times(&self) -> Vec<Instant> {
        self.unit_call_times
            .lock()
            .expect("mock host lock poisoned")
            .clone()
    }

    fn record(&self, call: HostCall) {
        info!("Mock host call: {:?}", call);
        self.calls.lock().expect("mock host lock poisoned").push(call);
    }

    fn command_failure(command: String) -> NetError {
        NetError::ShellCommandFailed {
            command,
            exit_code: 1,
            output: "mock failure".to_string(),
        }
    }
}

#[async_trait]
impl LinkControl for MockHost {
    fn system_interfaces(&self) -> NetResult<Vec<SystemInterface>> {
        match &self.enumeration_error {
            Some(message) => Err(NetError::enumeration(message.clone())),
            None => Ok(self.interfaces.clone()),
        }
    }

    async fn link_down(&self, iface: &SystemInterface) -> NetResult<()> {
        self.record(HostCall::LinkDown(iface.name.clone()));
        if self.failing_links.contains(&iface.name) {
            return Err(Self::command_failure(format!(
                "ip link set dev {} down",
                iface.name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ModuleLoader for MockHost {
    async fn load_module(&self, module: &str, args: &[String]) -> NetResult<()> {
        self.record(HostCall::LoadModule {
            module: module.to_string(),
            args: args.to_vec(),
        });
        if self.failing_modules.contains(module) {
            return Err(NetError::module_load(
                module,
                Self::command_failure(format!("modprobe {}", module)),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitControl for MockHost {
    async fn run_unit_command(&self, command: &str, unit: &str) -> NetResult<()> {
        self.record(HostCall::UnitCommand {
            command: command.to_string(),
            unit: unit.to_string(),
        });
        self.unit_call_times
            .lock()
            .expect("mock host lock poisoned")
            .push(Instant::now());

        let ok = self
            .unit_outcomes
            .lock()
            .expect("mock host lock poisoned")
            .pop_front()
            .unwrap_or(true);
        if ok {
            Ok(())
        } else {
            Err(NetError::unit(
                command,
                unit,
                Self::command_failure(format!("systemctl {} {}", command, unit)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unit_outcomes_consumed_in_order() {
        let host = MockHost::new().with_unit_outcomes([true, false]);

        assert!(host.run_unit_command("restart", "a.service").await.is_ok());
        assert!(host.run_unit_command("restart", "a.service").await.is_err());
        // Exhausted script defaults to success
        assert!(host.run_unit_command("restart", "a.service").await.is_ok());
        assert_eq!(host.unit_commands().len(), 3);
    }

    #[tokio::test]
    async fn test_failing_module_shape() {
        let host = MockHost::new().failing_module("8021q");

        let err = host.load_module("8021q", &[]).await.unwrap_err();
        assert!(err.is_module_load_failure());
        assert!(host.load_module("bonding", &[]).await.is_ok());
        assert_eq!(host.module_load_count("8021q"), 1);
    }

    #[test]
    fn test_interfaces_indexed_from_one() {
        let host = MockHost::new().with_interfaces(&["lo", "eth0"]);
        let ifaces = host.system_interfaces().unwrap();
        assert_eq!(ifaces[0], SystemInterface::new(1, "lo"));
        assert_eq!(ifaces[1], SystemInterface::new(2, "eth0"));
    }
}
