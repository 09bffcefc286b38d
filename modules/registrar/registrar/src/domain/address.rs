use registrar_sdk::{AddressDescriptor, AddressFamily, BindTarget, TransportBinding};

/// Build the descriptor handed to `register` for one binding.
///
/// Inet bindings get the wildcard address of their family bound to the
/// binding's port; local bindings carry their configured socket path.
/// A new value is built for every call.
#[must_use]
pub fn build(binding: &TransportBinding) -> AddressDescriptor {
    match (binding.net_id().family(), binding.target()) {
        (_, BindTarget::Path(path)) => AddressDescriptor::local(path.clone()),
        (AddressFamily::Inet6, BindTarget::Port(port)) => {
            AddressDescriptor::InetV6 { port: *port }
        }
        (AddressFamily::Inet | AddressFamily::Local, BindTarget::Port(port)) => {
            AddressDescriptor::InetV4 { port: *port }
        }
    }
}
