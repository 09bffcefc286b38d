use crate::error::BinderError;
use crate::models::{AddressDescriptor, NetId};

/// Client for the system RPC directory service (port mapper / rpcbind).
///
/// Each call is a single blocking request. Implementations report any
/// failure as `Err`; callers in this workspace never branch on the variant,
/// it only feeds diagnostics.
pub trait BinderClient: Send + Sync {
    /// Withdraw the mapping for `(program, version)`.
    ///
    /// `net_id = None` withdraws the pair from every network it is
    /// registered on.
    ///
    /// # Errors
    /// Returns `BinderError::NotRegistered` when nothing matched, or another
    /// variant when the directory could not be reached.
    fn unregister(
        &self,
        net_id: Option<NetId>,
        program: u32,
        version: u32,
    ) -> Result<(), BinderError>;

    /// Announce `(program, version)` as reachable at `address` over `net_id`.
    ///
    /// # Errors
    /// Returns `BinderError::Rejected` for a duplicate mapping, or another
    /// variant when the directory could not be reached or refused the call.
    fn register(
        &self,
        net_id: NetId,
        program: u32,
        version: u32,
        address: &AddressDescriptor,
    ) -> Result<(), BinderError>;
}
