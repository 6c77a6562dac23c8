use super::*;

/// A bundle together with the local endpoint that received it.
///
/// This is the unit handed from a convergence layer to the rest of the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedBundle {
    pub bundle: Bundle,
    pub receiver: Eid,
}

impl ReceivedBundle {
    pub fn new(bundle: Bundle, receiver: Eid) -> Self {
        Self { bundle, receiver }
    }
}

impl core::fmt::Display for ReceivedBundle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} received by {}", self.bundle.id(), self.receiver)
    }
}
