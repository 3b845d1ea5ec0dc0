//! The boundary to the platform compatibility service.
//!
//! The service itself lives in another process and is not implemented here. A
//! [`PlatformCompat`] implementation is expected to wrap whatever IPC mechanism
//! reaches it.

use crate::{ChangeConfig, ChangeId, RemoteError};

/// The form a [`ChangeConfig`] takes when sent to the platform compat service.
///
/// Both lists hold each change once, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatibilityChangeConfig {
    /// Changes forced on.
    pub enabled: Vec<ChangeId>,
    /// Changes forced off.
    pub disabled: Vec<ChangeId>,
}

impl From<&ChangeConfig> for CompatibilityChangeConfig {
    fn from(config: &ChangeConfig) -> Self {
        Self {
            enabled: config.enabled_changes_array(),
            disabled: config.disabled_changes_array(),
        }
    }
}

/// Remote calls into the platform compat service.
///
/// Failures are returned to the caller as-is. Nothing in this crate retries them or
/// falls back to assuming a change's state.
pub trait PlatformCompat: Send + Sync {
    /// Installs `overrides` for the process of `package_name`.
    fn set_overrides(
        &self,
        overrides: &CompatibilityChangeConfig,
        package_name: &str,
    ) -> Result<(), RemoteError>;

    /// Removes any overrides installed for `package_name`.
    fn clear_overrides(&self, package_name: &str) -> Result<(), RemoteError>;
}
