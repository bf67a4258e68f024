//! Host capability check gating the master switch.

/// Reports whether the host granted what the filter needs to take effect
/// (on Android, the secure-settings permission).
pub trait CapabilityCheck {
    fn has_required_permission(&self) -> bool;
}

/// Capability with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCapability(pub bool);

impl Default for StaticCapability {
    fn default() -> Self {
        Self(true)
    }
}

impl CapabilityCheck for StaticCapability {
    fn has_required_permission(&self) -> bool {
        self.0
    }
}

impl<F: Fn() -> bool> CapabilityCheck for F {
    fn has_required_permission(&self) -> bool {
        self()
    }
}
