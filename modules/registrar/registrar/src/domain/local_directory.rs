use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use parking_lot::Mutex;
use registrar_sdk::{AddressDescriptor, BinderClient, BinderError, Mapping, NetId};
use tracing::trace;

type MappingKey = (u32, u32, NetId);

/// In-process port-mapper table.
///
/// Follows rpcbind semantics: a (program, version, netid) triple maps to
/// exactly one address, a second `register` for it is rejected until it is
/// withdrawn, and `unregister` without a netid drops every transport of the
/// program/version pair.
pub struct LocalDirectory {
    owner: String,
    table: Mutex<BTreeMap<MappingKey, AddressDescriptor>>,
}

impl LocalDirectory {
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            table: Mutex::new(BTreeMap::new()),
        }
    }

    /// Snapshot of all mappings, ordered by program, version and netid.
    #[must_use]
    pub fn dump(&self) -> Vec<Mapping> {
        self.table
            .lock()
            .iter()
            .map(|(&(program, version, net_id), address)| Mapping {
                program,
                version,
                net_id,
                address: address.clone(),
                owner: self.owner.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }
}

impl Default for LocalDirectory {
    fn default() -> Self {
        Self::new("superuser")
    }
}

impl BinderClient for LocalDirectory {
    fn unregister(
        &self,
        net_id: Option<NetId>,
        program: u32,
        version: u32,
    ) -> Result<(), BinderError> {
        let mut table = self.table.lock();
        let before = table.len();

        match net_id {
            Some(net_id) => {
                table.remove(&(program, version, net_id));
            }
            None => table.retain(|&(p, v, _), _| (p, v) != (program, version)),
        }

        let removed = before - table.len();
        trace!(program, version, removed, "unregister");
        if removed == 0 {
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
        match self.table.lock().entry((program, version, net_id)) {
            Entry::Occupied(_) => Err(BinderError::Rejected {
                program,
                version,
                net_id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(address.clone());
                trace!(program, version, %net_id, %address, "register");
                Ok(())
            }
        }
    }
}
