//! Test utilities: a binder that records every call and fails on demand.

use parking_lot::Mutex;
use registrar_sdk::{AddressDescriptor, BinderClient, BinderError, NetId};

/// One call received by a [`RecordingBinder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinderCall {
    Unregister {
        net_id: Option<NetId>,
        program: u32,
        version: u32,
    },
    Register {
        net_id: NetId,
        program: u32,
        version: u32,
        address: AddressDescriptor,
    },
}

impl BinderCall {
    #[must_use]
    pub fn unregister_all(program: u32, version: u32) -> Self {
        BinderCall::Unregister {
            net_id: None,
            program,
            version,
        }
    }

    #[must_use]
    pub fn register(net_id: NetId, program: u32, version: u32, address: AddressDescriptor) -> Self {
        BinderCall::Register {
            net_id,
            program,
            version,
            address,
        }
    }

    #[must_use]
    pub fn is_register(&self) -> bool {
        matches!(self, BinderCall::Register { .. })
    }
}

/// Matches register calls; `None` fields match anything.
#[derive(Debug, Clone, Copy, Default)]
struct FailRule {
    net_id: Option<NetId>,
    program: Option<u32>,
    version: Option<u32>,
}

impl FailRule {
    fn matches(&self, net_id: NetId, program: u32, version: u32) -> bool {
        self.net_id.is_none_or(|n| n == net_id)
            && self.program.is_none_or(|p| p == program)
            && self.version.is_none_or(|v| v == version)
    }
}

/// Binder double that records calls in order.
///
/// Every call succeeds unless a failure rule matches it.
#[derive(Default)]
pub struct RecordingBinder {
    calls: Mutex<Vec<BinderCall>>,
    register_failures: Vec<FailRule>,
    fail_unregisters: bool,
}

impl RecordingBinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every register call on `net_id`.
    #[must_use]
    pub fn fail_register_on(mut self, net_id: NetId) -> Self {
        self.register_failures.push(FailRule {
            net_id: Some(net_id),
            ..FailRule::default()
        });
        self
    }

    /// Fail the register call for one exact (netid, program, version).
    #[must_use]
    pub fn fail_register(mut self, net_id: NetId, program: u32, version: u32) -> Self {
        self.register_failures.push(FailRule {
            net_id: Some(net_id),
            program: Some(program),
            version: Some(version),
        });
        self
    }

    #[must_use]
    pub fn fail_all_registers(mut self) -> Self {
        self.register_failures.push(FailRule::default());
        self
    }

    #[must_use]
    pub fn fail_all_unregisters(mut self) -> Self {
        self.fail_unregisters = true;
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<BinderCall> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn register_calls(&self) -> Vec<BinderCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.is_register())
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn unregister_calls(&self) -> Vec<BinderCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| !c.is_register())
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl BinderClient for RecordingBinder {
    fn unregister(
        &self,
        net_id: Option<NetId>,
        program: u32,
        version: u32,
    ) -> Result<(), BinderError> {
        self.calls.lock().push(BinderCall::Unregister {
            net_id,
            program,
            version,
        });
        if self.fail_unregisters {
            return Err(BinderError::NotRegistered { program, version });
        }
        Ok(())
    }

    fn register(
        &self,
        net_id: NetId,
        program: u32,
        version: u32,
        address: &AddressDescriptor,
    ) -> Result<(), BinderError> {
        self.calls
            .lock()
            .push(BinderCall::register(net_id, program, version, address.clone()));
        if self
            .register_failures
            .iter()
            .any(|rule| rule.matches(net_id, program, version))
        {
            return Err(BinderError::Rejected {
                program,
                version,
                net_id,
            });
        }
        Ok(())
    }
}
