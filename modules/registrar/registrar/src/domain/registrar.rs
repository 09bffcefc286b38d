use registrar_sdk::BinderClient;
use tracing::{debug, error, instrument};

use crate::domain::address;
use crate::domain::catalogue::ServiceGroup;

/// Result of registering one service group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrationOutcome {
    pub attempted: usize,
    pub failed: usize,
}

impl RegistrationOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Register every (version, binding) pair of `group`.
///
/// Iteration is version-major, binding-minor. A failed call never stops the
/// group; when at least one call failed a single diagnostic naming the group
/// is emitted after the last attempt.
#[instrument(skip_all, fields(group = group.label, program = group.service.program))]
pub fn register_group(binder: &dyn BinderClient, group: &ServiceGroup) -> RegistrationOutcome {
    let mut outcome = RegistrationOutcome::default();

    for &version in group.service.versions {
        for binding in &group.bindings {
            let net_id = binding.net_id();
            let address = address::build(binding);
            outcome.attempted += 1;

            match binder.register(net_id, group.service.program, version, &address) {
                Ok(()) => debug!(%net_id, version, %address, "registered"),
                Err(e) => {
                    outcome.failed += 1;
                    debug!(%net_id, version, %address, error = %e, "register call failed");
                }
            }
        }
    }

    if !outcome.is_success() {
        error!(
            attempted = outcome.attempted,
            failed = outcome.failed,
            "couldn't register {} service.",
            group.label
        );
    }

    outcome
}
