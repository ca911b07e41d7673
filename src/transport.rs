//! Transport abstraction: posting one opaque payload to the host.

/// The single outbound primitive the surface has.
///
/// Posting is fire-and-forget: there is no completion and no delivery
/// confirmation. The channel is assumed reliable and ordered; retry policy, if
/// any, lives on the host side of the boundary.
pub trait Transport: Send + Sync {
    /// Post one already-encoded envelope to the host.
    fn post(&self, message: String);
}
