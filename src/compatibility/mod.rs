//! The compatibility change gate.
//!
//! A [`Compatibility`] holds the delegate that answers change queries. Most code
//! uses the process-wide instance from [`global`], through the functions at the crate
//! root. Code that can be handed a context explicitly, including tests, should
//! prefer an owned [`Compatibility`] so it doesn't share state with the rest of
//! the process.

use crate::{ChangeConfig, ChangeId};
use once_cell::sync::Lazy;
use std::mem;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

mod delegate;
pub use delegate::{BehaviorChangeDelegate, DefaultDelegate};
use delegate::OverrideDelegate;

static GLOBAL: Lazy<Compatibility> = Lazy::new(Compatibility::new);

/// Returns the process-wide gate.
///
/// It starts out with a [`DefaultDelegate`]. Platform bootstrap code installs the
/// real delegate with [`Compatibility::set_behavior_change_delegate`]; test
/// scaffolding may swap it at any time.
pub fn global() -> &'static Compatibility {
    &GLOBAL
}

struct State {
    delegate: Arc<dyn BehaviorChangeDelegate>,
    // The delegate that was active before overrides were installed.
    overridden: Option<Arc<dyn BehaviorChangeDelegate>>,
}

/// A replaceable [`BehaviorChangeDelegate`] and the operations that consult it.
///
/// Any number of threads may query and report concurrently while another thread
/// replaces the delegate. Each call sees either the old or the new delegate in full.
/// Delegates are called without any lock held.
pub struct Compatibility {
    state: RwLock<State>,
}

impl Default for Compatibility {
    fn default() -> Self {
        Self::new()
    }
}

impl Compatibility {
    /// Creates a gate using the [`DefaultDelegate`].
    pub fn new() -> Self {
        Self::with_delegate(Arc::new(DefaultDelegate))
    }

    /// Creates a gate using `delegate`.
    pub fn with_delegate(delegate: Arc<dyn BehaviorChangeDelegate>) -> Self {
        Self {
            state: RwLock::new(State {
                delegate,
                overridden: None,
            }),
        }
    }

    /// Reports that `change_id` is affecting the current execution.
    pub fn report_change(&self, change_id: ChangeId) {
        self.delegate().on_change_reported(change_id)
    }

    /// Returns whether `change_id` is enabled.
    ///
    /// When the delegate answers `true`, the change is also reported to that same
    /// delegate, so callers never need to pair this with [`Self::report_change`].
    pub fn is_change_enabled(&self, change_id: ChangeId) -> bool {
        let delegate = self.delegate();
        let enabled = delegate.is_change_enabled(change_id);
        if enabled {
            delegate.on_change_reported(change_id);
        }
        enabled
    }

    /// Replaces the active delegate. Any installed overrides are discarded with it.
    pub fn set_behavior_change_delegate(&self, delegate: Arc<dyn BehaviorChangeDelegate>) {
        let replaced = self.replace(delegate);
        log::debug!("installed a new behavior change delegate");
        drop(replaced);
    }

    /// Restores the [`DefaultDelegate`]. Calling this repeatedly is harmless.
    pub fn clear_behavior_change_delegate(&self) {
        let replaced = self.replace(Arc::new(DefaultDelegate));
        log::debug!("cleared the behavior change delegate");
        drop(replaced);
    }

    /// Forces the changes in `config` on or off on top of the active delegate.
    ///
    /// Changes not named in `config` are answered by the delegate that was active
    /// before. Reports always go to that delegate. If overrides are already installed
    /// they are replaced, not stacked.
    pub fn set_overrides(&self, config: ChangeConfig) {
        self.install_overrides(config, None)
    }

    /// Like [`Self::set_overrides`], but changes not named in `config` are answered
    /// with `unlisted` instead of being deferred.
    pub fn set_overrides_with_default(&self, config: ChangeConfig, unlisted: bool) {
        self.install_overrides(config, Some(unlisted))
    }

    /// Removes overrides installed by [`Self::set_overrides`], restoring the delegate
    /// that was active before. Does nothing if there are none.
    pub fn clear_overrides(&self) {
        let replaced = {
            let mut state = self.write();
            state
                .overridden
                .take()
                .map(|base| mem::replace(&mut state.delegate, base))
        };

        if replaced.is_some() {
            log::debug!("cleared compatibility change overrides");
        }
    }

    /// Returns `true` while overrides are installed.
    pub fn has_overrides(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .overridden
            .is_some()
    }

    /// Exposed for debugging which delegate answers queries.
    #[cfg(feature = "dbg")]
    #[cfg_attr(docsrs, doc(cfg(feature = "dbg")))]
    pub fn active_delegate(&self) -> Arc<dyn BehaviorChangeDelegate> {
        self.delegate()
    }

    fn install_overrides(&self, config: ChangeConfig, unlisted: Option<bool>) {
        log::debug!("overriding compatibility changes: {}", config);

        let replaced = {
            let mut state = self.write();
            let base = match state.overridden.take() {
                Some(base) => base,
                None => state.delegate.clone(),
            };
            let wrapped = Arc::new(OverrideDelegate::new(config, base.clone(), unlisted));
            state.overridden = Some(base);
            mem::replace(&mut state.delegate, wrapped)
        };
        drop(replaced);
    }

    // Old delegates are returned instead of dropped so their `Drop` runs after the
    // write lock is released and may call back into this gate.
    fn replace(
        &self,
        delegate: Arc<dyn BehaviorChangeDelegate>,
    ) -> (
        Arc<dyn BehaviorChangeDelegate>,
        Option<Arc<dyn BehaviorChangeDelegate>>,
    ) {
        let mut state = self.write();
        let overridden = state.overridden.take();
        (mem::replace(&mut state.delegate, delegate), overridden)
    }

    fn delegate(&self) -> Arc<dyn BehaviorChangeDelegate> {
        // The slot always holds a complete `Arc`, so a poisoned lock is still usable.
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .delegate
            .clone()
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
