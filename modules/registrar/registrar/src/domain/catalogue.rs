//! Static service catalogue and the per-mode registration policy table.
//!
//! Everything the orchestrator does is driven from here: which
//! program/version pairs are withdrawn, and which service groups are
//! registered on which transports. Local-socket groups come from runtime
//! configuration instead of build-time switches.

use std::path::PathBuf;

use registrar_sdk::TransportBinding;

use crate::config::LocalTransportsConfig;
use crate::domain::mode::Mode;

pub const RPCPROG_NFS: u32 = 100_003;
pub const RPCPROG_MNT: u32 = 100_005;
pub const RPCPROG_STAT: u32 = 100_024;

pub const NFS_PORT: u16 = 2049;
pub const MOUNT_PORT: u16 = 32767;
/// Legacy fixed statd ports, used in statd-only mode.
pub const STATD_UDP_PORT: u16 = 710;
pub const STATD_TCP_PORT: u16 = 904;

/// A registrable RPC service and the versions it is announced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalService {
    pub name: &'static str,
    pub program: u32,
    pub versions: &'static [u32],
}

pub const NFS: LogicalService = LogicalService {
    name: "NFS",
    program: RPCPROG_NFS,
    versions: &[2, 3],
};

pub const MOUNT: LogicalService = LogicalService {
    name: "MOUNT",
    program: RPCPROG_MNT,
    versions: &[1, 3],
};

pub const STAT: LogicalService = LogicalService {
    name: "STAT",
    program: RPCPROG_STAT,
    versions: &[1],
};

/// Program versions withdrawn from every network before registering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    pub program: u32,
    pub versions: &'static [u32],
}

/// Withdrawn in every mode.
pub const MANAGED_WITHDRAWALS: [Withdrawal; 2] = [
    Withdrawal {
        program: RPCPROG_NFS,
        versions: &[3, 4],
    },
    Withdrawal {
        program: RPCPROG_MNT,
        versions: &[1, 2, 3],
    },
];

/// Withdrawn additionally in statd-only mode.
pub const STATD_WITHDRAWAL: Withdrawal = Withdrawal {
    program: RPCPROG_STAT,
    versions: &[1],
};

/// One logical service over one protocol family, reported as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceGroup {
    /// Name used in the failure diagnostic, e.g. `NFS/UDP`.
    pub label: &'static str,
    pub service: LogicalService,
    pub bindings: Vec<TransportBinding>,
}

impl ServiceGroup {
    fn new(label: &'static str, service: LogicalService, bindings: Vec<TransportBinding>) -> Self {
        Self {
            label,
            service,
            bindings,
        }
    }

    /// Group over a single local socket; no bindings when the path is unset.
    fn local(
        label: &'static str,
        service: LogicalService,
        path: Option<&PathBuf>,
        binding: fn(PathBuf) -> TransportBinding,
    ) -> Self {
        let bindings = path.cloned().map(binding).into_iter().collect();
        Self::new(label, service, bindings)
    }

    /// Number of register calls this group issues.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.service.versions.len() * self.bindings.len()
    }
}

/// Ordered withdrawals and registration groups for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPlan {
    pub withdrawals: Vec<Withdrawal>,
    pub groups: Vec<ServiceGroup>,
}

impl RegistrationPlan {
    #[must_use]
    pub fn for_mode(mode: Mode, local: &LocalTransportsConfig) -> Self {
        let mut withdrawals = MANAGED_WITHDRAWALS.to_vec();
        if mode == Mode::StatdOnly {
            withdrawals.push(STATD_WITHDRAWAL);
        }

        let groups = match mode {
            Mode::UnsetOnly => Vec::new(),
            Mode::StatdOnly => vec![statd_group()],
            Mode::Full => full_groups(local),
        };

        Self {
            withdrawals,
            groups,
        }
    }

    /// Total number of register calls the plan issues.
    #[must_use]
    pub fn register_call_count(&self) -> usize {
        self.groups.iter().map(ServiceGroup::call_count).sum()
    }
}

fn statd_group() -> ServiceGroup {
    ServiceGroup::new(
        "STAT",
        STAT,
        vec![
            TransportBinding::udp(STATD_UDP_PORT),
            TransportBinding::udp6(STATD_UDP_PORT),
            TransportBinding::tcp(STATD_TCP_PORT),
            TransportBinding::tcp6(STATD_TCP_PORT),
        ],
    )
}

fn full_groups(local: &LocalTransportsConfig) -> Vec<ServiceGroup> {
    vec![
        ServiceGroup::new("NFS/UDP", NFS, udp_pair(NFS_PORT)),
        ServiceGroup::new("NFS/TCP", NFS, tcp_pair(NFS_PORT)),
        ServiceGroup::local(
            "NFS/TICLTS",
            NFS,
            local.nfsd_ticlts.as_ref(),
            TransportBinding::ticlts,
        ),
        ServiceGroup::local(
            "NFS/TICOTSORD",
            NFS,
            local.nfsd_ticotsord.as_ref(),
            TransportBinding::ticotsord,
        ),
        ServiceGroup::new("MOUNT/UDP", MOUNT, udp_pair(MOUNT_PORT)),
        ServiceGroup::new("MOUNT/TCP", MOUNT, tcp_pair(MOUNT_PORT)),
        ServiceGroup::local(
            "MOUNT/TICLTS",
            MOUNT,
            local.mountd_ticlts.as_ref(),
            TransportBinding::ticlts,
        ),
        ServiceGroup::local(
            "MOUNT/TICOTSORD",
            MOUNT,
            local.mountd_ticotsord.as_ref(),
            TransportBinding::ticotsord,
        ),
    ]
}

fn udp_pair(port: u16) -> Vec<TransportBinding> {
    vec![TransportBinding::udp(port), TransportBinding::udp6(port)]
}

fn tcp_pair(port: u16) -> Vec<TransportBinding> {
    vec![TransportBinding::tcp(port), TransportBinding::tcp6(port)]
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use registrar_sdk::NetId;

    use super::*;

    fn labels(plan: &RegistrationPlan) -> Vec<&'static str> {
        plan.groups.iter().map(|g| g.label).collect()
    }

    #[test]
    fn every_mode_withdraws_nfs_and_mount() {
        for mode in [Mode::Full, Mode::UnsetOnly, Mode::StatdOnly] {
            let plan = RegistrationPlan::for_mode(mode, &LocalTransportsConfig::default());
            assert_eq!(plan.withdrawals[..2], MANAGED_WITHDRAWALS);
        }
    }

    #[test]
    fn only_statd_mode_withdraws_stat() {
        let local = LocalTransportsConfig::default();
        assert!(
            !RegistrationPlan::for_mode(Mode::Full, &local)
                .withdrawals
                .contains(&STATD_WITHDRAWAL)
        );
        assert!(
            !RegistrationPlan::for_mode(Mode::UnsetOnly, &local)
                .withdrawals
                .contains(&STATD_WITHDRAWAL)
        );
        assert_eq!(
            RegistrationPlan::for_mode(Mode::StatdOnly, &local).withdrawals,
            vec![MANAGED_WITHDRAWALS[0], MANAGED_WITHDRAWALS[1], STATD_WITHDRAWAL]
        );
    }

    #[test]
    fn unset_only_plans_no_groups() {
        let plan = RegistrationPlan::for_mode(Mode::UnsetOnly, &LocalTransportsConfig::default());
        assert!(plan.groups.is_empty());
        assert_eq!(plan.register_call_count(), 0);
    }

    #[test]
    fn statd_plan_uses_legacy_ports() {
        let plan = RegistrationPlan::for_mode(Mode::StatdOnly, &LocalTransportsConfig::default());
        assert_eq!(labels(&plan), vec!["STAT"]);

        let group = &plan.groups[0];
        let bindings: Vec<(NetId, Option<u16>)> = group
            .bindings
            .iter()
            .map(|b| (b.net_id(), b.port()))
            .collect();
        assert_eq!(
            bindings,
            vec![
                (NetId::Udp, Some(710)),
                (NetId::Udp6, Some(710)),
                (NetId::Tcp, Some(904)),
                (NetId::Tcp6, Some(904)),
            ]
        );
        assert_eq!(plan.register_call_count(), 4);
    }

    #[test]
    fn full_plan_without_local_sockets() {
        let plan = RegistrationPlan::for_mode(Mode::Full, &LocalTransportsConfig::default());
        assert_eq!(
            labels(&plan),
            vec![
                "NFS/UDP",
                "NFS/TCP",
                "NFS/TICLTS",
                "NFS/TICOTSORD",
                "MOUNT/UDP",
                "MOUNT/TCP",
                "MOUNT/TICLTS",
                "MOUNT/TICOTSORD",
            ]
        );
        assert_eq!(plan.register_call_count(), 16);
        assert!(
            plan.groups
                .iter()
                .filter(|g| g.label.ends_with("TICLTS") || g.label.ends_with("TICOTSORD"))
                .all(|g| g.bindings.is_empty())
        );
    }

    #[test]
    fn configured_local_sockets_add_groups() {
        let local = LocalTransportsConfig {
            nfsd_ticotsord: Some("/var/run/nfsd.ticotsord".into()),
            mountd_ticlts: Some("/var/run/mountd.ticlts".into()),
            ..LocalTransportsConfig::default()
        };
        let plan = RegistrationPlan::for_mode(Mode::Full, &local);
        assert_eq!(plan.register_call_count(), 20);

        let nfs_local = plan
            .groups
            .iter()
            .find(|g| g.label == "NFS/TICOTSORD")
            .unwrap();
        assert_eq!(
            nfs_local.bindings,
            vec![TransportBinding::ticotsord("/var/run/nfsd.ticotsord")]
        );
        assert_eq!(nfs_local.service, NFS);

        let mount_local = plan
            .groups
            .iter()
            .find(|g| g.label == "MOUNT/TICLTS")
            .unwrap();
        assert_eq!(
            mount_local.bindings,
            vec![TransportBinding::ticlts("/var/run/mountd.ticlts")]
        );
    }

    #[test]
    fn inet_groups_use_well_known_ports() {
        let plan = RegistrationPlan::for_mode(Mode::Full, &LocalTransportsConfig::default());
        for group in &plan.groups {
            let expected = if group.service == NFS { 2049 } else { 32767 };
            for binding in &group.bindings {
                assert_eq!(binding.port(), Some(expected));
            }
        }
    }
}
