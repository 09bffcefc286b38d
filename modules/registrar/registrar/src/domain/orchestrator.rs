use std::sync::Arc;

use registrar_sdk::BinderClient;
use tracing::{debug, info, instrument};

use crate::config::RegistrarConfig;
use crate::domain::catalogue::{RegistrationPlan, Withdrawal};
use crate::domain::mode::Mode;
use crate::domain::registrar::{RegistrationOutcome, register_group};

/// Outcome of one group within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub label: &'static str,
    pub outcome: RegistrationOutcome,
}

/// Everything a run did, per group, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: Mode,
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    /// Total register calls issued.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.groups.iter().map(|g| g.outcome.attempted).sum()
    }

    /// Total register calls that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.groups.iter().map(|g| g.outcome.failed).sum()
    }

    /// Groups that emitted a diagnostic.
    pub fn failed_groups(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| !g.outcome.is_success())
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }
}

/// Withdraws stale registrations and announces the managed services.
///
/// A run is a single sequential pass: the withdraw phase completes before
/// the first register call, every group is attempted regardless of earlier
/// failures, and nothing is retried.
pub struct Orchestrator {
    binder: Arc<dyn BinderClient>,
    config: RegistrarConfig,
}

impl Orchestrator {
    #[must_use]
    pub fn new(binder: Arc<dyn BinderClient>, config: RegistrarConfig) -> Self {
        Self { binder, config }
    }

    /// Run the plan for `mode` to completion.
    ///
    /// Failures are reported through diagnostics and the returned report;
    /// the run itself cannot fail.
    #[instrument(skip(self), fields(%mode))]
    pub fn run(&self, mode: Mode) -> RunReport {
        let plan = RegistrationPlan::for_mode(mode, &self.config.local_transports);
        info!(
            withdrawals = plan.withdrawals.len(),
            groups = plan.groups.len(),
            register_calls = plan.register_call_count(),
            "Starting registration pass"
        );

        self.withdraw(&plan.withdrawals);

        let groups = plan
            .groups
            .iter()
            .map(|group| GroupReport {
                label: group.label,
                outcome: register_group(self.binder.as_ref(), group),
            })
            .collect();

        let report = RunReport { mode, groups };
        info!(
            attempted = report.attempted(),
            failed = report.failed(),
            failed_groups = report.failed_groups().count(),
            "Registration pass finished"
        );
        report
    }

    /// Best-effort withdrawal across all networks. A pair that was never
    /// registered fails to unregister, which is expected.
    fn withdraw(&self, withdrawals: &[Withdrawal]) {
        for withdrawal in withdrawals {
            for &version in withdrawal.versions {
                match self.binder.unregister(None, withdrawal.program, version) {
                    Ok(()) => debug!(program = withdrawal.program, version, "withdrawn"),
                    Err(e) => debug!(
                        program = withdrawal.program,
                        version,
                        error = %e,
                        "withdrawal skipped"
                    ),
                }
            }
        }
    }
}
