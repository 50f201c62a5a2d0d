//! Startup dependency tracking for the readiness endpoint
//!
//! Dependencies register at startup and flip to ready once initialized.
//! The readiness endpoint reports ready only when every registered
//! dependency is.

use std::collections::BTreeMap;

use parking_lot::RwLock;

/// Tracks named startup dependencies and their readiness
#[derive(Debug, Default)]
pub struct Readiness {
    checks: RwLock<BTreeMap<String, bool>>,
}

impl Readiness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dependency as not yet ready
    pub fn register(&self, name: impl Into<String>) {
        self.checks.write().insert(name.into(), false);
    }

    /// Mark a dependency as initialized
    pub fn mark_ready(&self, name: impl Into<String>) {
        self.checks.write().insert(name.into(), true);
    }

    /// Mark a dependency as unavailable again
    pub fn mark_not_ready(&self, name: impl Into<String>) {
        self.checks.write().insert(name.into(), false);
    }

    /// Whether every registered dependency is ready.
    /// With no registered dependencies the service is trivially ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.checks.read().values().all(|ready| *ready)
    }

    /// Snapshot of the per-dependency state
    #[must_use]
    pub fn checks(&self) -> BTreeMap<String, bool> {
        self.checks.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_with_no_dependencies() {
        let readiness = Readiness::new();
        assert!(readiness.is_ready());
        assert!(readiness.checks().is_empty());
    }

    #[test]
    fn registered_dependency_starts_not_ready() {
        let readiness = Readiness::new();
        readiness.register("database");
        assert!(!readiness.is_ready());
        assert_eq!(readiness.checks().get("database"), Some(&false));
    }

    #[test]
    fn ready_once_all_dependencies_are() {
        let readiness = Readiness::new();
        readiness.register("database");
        readiness.register("cache");

        readiness.mark_ready("database");
        assert!(!readiness.is_ready());

        readiness.mark_ready("cache");
        assert!(readiness.is_ready());
    }

    #[test]
    fn dependency_can_become_unready_again() {
        let readiness = Readiness::new();
        readiness.register("database");
        readiness.mark_ready("database");
        assert!(readiness.is_ready());

        readiness.mark_not_ready("database");
        assert!(!readiness.is_ready());
    }

    #[test]
    fn checks_snapshot_lists_every_dependency() {
        let readiness = Readiness::new();
        readiness.register("database");
        readiness.mark_ready("cache");

        let checks = readiness.checks();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks.get("database"), Some(&false));
        assert_eq!(checks.get("cache"), Some(&true));
    }
}
