
use crate::platform::{CompatibilityChangeConfig, PlatformCompat};
use crate::{BehaviorChangeDelegate, ChangeId, RemoteError};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Declares test cases once, producing a `#[test]` for each and, for the FFI
/// runner, a table of all of them.
macro_rules! compat_test_cases {
    { $( $name:ident => $body:block ),+ $(,)? } => {
        $(
            pub(super) fn $name() $body
        )+

        #[cfg(test)]
        mod tests {
            $(
                #[test]
                pub fn $name() {
                    super::$name()
                }
            )+
        }

        #[cfg(feature = "ffi-testing")]
        pub static ALL_TEST_CASES: &'static [fn()] = &[
            $( $name ),+
        ];
    };
}







/// Serializes tests that touch the process-wide gate, and leaves it with the default
/// delegate installed.
pub(crate) fn lock_global() -> MutexGuard<'static, ()> {
    static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

    let guard = GLOBAL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    crate::clear_behavior_change_delegate();
    guard
}

/// A delegate which records every call it receives.
///
/// Changes listed in `disabled` are answered `false`, everything else gets `default`.
pub(crate) struct RecordingDelegate {
    default: bool,
    disabled: BTreeSet<ChangeId>,
    reported: Mutex<Vec<ChangeId>>,
    queried: Mutex<Vec<ChangeId>>,
}

impl RecordingDelegate {
    pub(crate) fn new(default: bool) -> Arc<Self> {
        Self::disabling(default, std::iter::empty())
    }

    pub(crate) fn disabling(
        default: bool,
        disabled: impl IntoIterator<Item = ChangeId>,
    ) -> Arc<Self> {
        Arc::new(Self {
            default,
            disabled: disabled.into_iter().collect(),
            reported: Mutex::new(Vec::new()),
            queried: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn reported(&self) -> Vec<ChangeId> {
        self.reported.lock().unwrap().clone()
    }

    pub(crate) fn queried(&self) -> Vec<ChangeId> {
        self.queried.lock().unwrap().clone()
    }
}

impl BehaviorChangeDelegate for RecordingDelegate {
    fn on_change_reported(&self, change_id: ChangeId) {
        self.reported.lock().unwrap().push(change_id);
    }

    fn is_change_enabled(&self, change_id: ChangeId) -> bool {
        self.queried.lock().unwrap().push(change_id);
        self.default && !self.disabled.contains(&change_id)
    }
}

/// An in-memory stand-in for the platform compat service.
#[derive(Default)]
pub(crate) struct FakePlatformCompat {
    pub(crate) fail_set: bool,
    pub(crate) fail_clear: bool,
    overrides: Mutex<HashMap<String, CompatibilityChangeConfig>>,
    calls: Mutex<Vec<String>>,
}

impl FakePlatformCompat {
    /// The overrides currently installed for `package_name`.
    pub(crate) fn overrides_for(&self, package_name: &str) -> Option<CompatibilityChangeConfig> {
        self.overrides.lock().unwrap().get(package_name).cloned()
    }

    /// Every call made so far, in order, as `"set <package>"` or `"clear <package>"`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PlatformCompat for FakePlatformCompat {
    fn set_overrides(
        &self,
        overrides: &CompatibilityChangeConfig,
        package_name: &str,
    ) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("set {}", package_name));
        if self.fail_set {
            return Err(RemoteError::new("service unavailable"));
        }

        self.overrides
            .lock()
            .unwrap()
            .insert(package_name.to_owned(), overrides.clone());
        Ok(())
    }

    fn clear_overrides(&self, package_name: &str) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("clear {}", package_name));
        if self.fail_clear {
            return Err(RemoteError::new("service unavailable"));
        }

        self.overrides.lock().unwrap().remove(package_name);
        Ok(())
    }
}
