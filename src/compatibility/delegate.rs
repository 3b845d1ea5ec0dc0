use crate::{ChangeConfig, ChangeId};
use std::sync::Arc;

/// Answers compatibility change queries and receives change reports for a process.
///
/// Both methods have default implementations that log a warning, and the query
/// reports every change as enabled. A real delegate is expected to override both.
///
/// Implementations must be infallible in production use. A panic raised by a delegate
/// reaches the caller of [`Compatibility`](super::Compatibility) unchanged.
pub trait BehaviorChangeDelegate: Send + Sync {
    /// Called when `change_id` is affecting the current execution.
    fn on_change_reported(&self, change_id: ChangeId) {
        log::warn!(
            "No BehaviorChangeDelegate set! Reporting change {}",
            change_id
        );
    }

    /// Returns whether `change_id` is enabled.
    fn is_change_enabled(&self, change_id: ChangeId) -> bool {
        log::warn!("No BehaviorChangeDelegate set! Querying change {}", change_id);
        true
    }
}

/// The delegate installed when nothing else has been.
///
/// Logs a warning for every call and treats every change as enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDelegate;

impl BehaviorChangeDelegate for DefaultDelegate {}

/// Wraps another delegate, forcing the answers listed in a [`ChangeConfig`].
pub(crate) struct OverrideDelegate {
    config: ChangeConfig,
    inner: Arc<dyn BehaviorChangeDelegate>,
    // `None` defers unlisted changes to `inner`.
    unlisted: Option<bool>,
}

impl OverrideDelegate {
    pub(crate) fn new(
        config: ChangeConfig,
        inner: Arc<dyn BehaviorChangeDelegate>,
        unlisted: Option<bool>,
    ) -> Self {
        Self {
            config,
            inner,
            unlisted,
        }
    }
}

impl BehaviorChangeDelegate for OverrideDelegate {
    fn on_change_reported(&self, change_id: ChangeId) {
        self.inner.on_change_reported(change_id)
    }

    fn is_change_enabled(&self, change_id: ChangeId) -> bool {
        if self.config.is_force_enabled(change_id) {
            return true;
        }
        if self.config.is_force_disabled(change_id) {
            return false;
        }

        match self.unlisted {
            Some(enabled) => enabled,
            None => self.inner.is_change_enabled(change_id),
        }
    }
}
