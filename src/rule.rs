use crate::compatibility::{self, Compatibility};
use crate::platform::{CompatibilityChangeConfig, PlatformCompat};
use crate::{ChangeConfig, ChangeId, Error};
use std::sync::Arc;

/// Scopes a compatibility change override to a single test body.
///
/// Each rule must enable or disable at least one change:
///
/// ```rust
/// use platform_compat::{CompatChangeRule, Compatibility};
///
/// let compat = Compatibility::new();
/// let (old, new) = CompatChangeRule::with_context(&compat)
///     .disable([42])
///     .enable([43])
///     .run(|| (compat.is_change_enabled(42), compat.is_change_enabled(43)))
///     .unwrap();
/// assert!(!old && new);
/// ```
///
/// Once the body returns or panics, overrides are removed again, locally and on the
/// platform compat service if one was attached.
pub struct CompatChangeRule<'a> {
    compat: &'a Compatibility,
    enabled: Vec<ChangeId>,
    disabled: Vec<ChangeId>,
    unlisted: Option<bool>,
    platform: Option<(Arc<dyn PlatformCompat>, String)>,
}

impl CompatChangeRule<'static> {
    /// Creates a rule that overrides changes on the process-wide gate.
    pub fn new() -> Self {
        Self::with_context(compatibility::global())
    }
}

impl Default for CompatChangeRule<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompatChangeRule<'a> {
    /// Creates a rule that overrides changes on `compat`.
    pub fn with_context(compat: &'a Compatibility) -> Self {
        Self {
            compat,
            enabled: Vec::new(),
            disabled: Vec::new(),
            unlisted: None,
            platform: None,
        }
    }

    /// Forces `change_ids` on while the body runs.
    pub fn enable(mut self, change_ids: impl IntoIterator<Item = ChangeId>) -> Self {
        self.enabled.extend(change_ids);
        self
    }

    /// Forces `change_ids` off while the body runs.
    pub fn disable(mut self, change_ids: impl IntoIterator<Item = ChangeId>) -> Self {
        self.disabled.extend(change_ids);
        self
    }

    /// Answers `enabled` for changes the rule doesn't name.
    ///
    /// Without this, those changes are answered by whichever delegate was active when
    /// the rule was applied.
    pub fn unlisted_default(mut self, enabled: bool) -> Self {
        self.unlisted = Some(enabled);
        self
    }

    /// Also installs the override on the platform compat service for `package_name`.
    pub fn with_platform_compat(
        mut self,
        service: Arc<dyn PlatformCompat>,
        package_name: impl Into<String>,
    ) -> Self {
        self.platform = Some((service, package_name.into()));
        self
    }

    /// Validates the rule, producing a statement ready to run a body.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyOverride`] if no change was enabled or disabled, and
    /// [`Error::ConflictingChange`] if a change was both.
    pub fn apply(self) -> Result<CompatChangeStatement<'a>, Error> {
        let config = ChangeConfig::new(self.enabled, self.disabled)?;
        if config.is_empty() {
            return Err(Error::EmptyOverride);
        }

        Ok(CompatChangeStatement {
            compat: self.compat,
            config,
            unlisted: self.unlisted,
            platform: self.platform,
        })
    }

    /// Shorthand for `self.apply()?.evaluate(body)`.
    pub fn run<T>(self, body: impl FnOnce() -> T) -> Result<T, Error> {
        self.apply()?.evaluate(body)
    }
}

/// A validated [`CompatChangeRule`].
pub struct CompatChangeStatement<'a> {
    compat: &'a Compatibility,
    config: ChangeConfig,
    unlisted: Option<bool>,
    platform: Option<(Arc<dyn PlatformCompat>, String)>,
}

impl<'a> CompatChangeStatement<'a> {
    /// The changes this statement overrides.
    pub fn config(&self) -> &ChangeConfig {
        &self.config
    }

    /// Runs `body` with the overrides installed.
    ///
    /// Local overrides go in first, then the platform compat service is told. If the
    /// service call fails, `body` doesn't run. Cleanup happens on every exit path; a
    /// panic from `body` continues unwinding afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::Remote`] if the service couldn't install or clear the override.
    pub fn evaluate<T>(self, body: impl FnOnce() -> T) -> Result<T, Error> {
        let local = LocalOverride::install(self.compat, self.config.clone(), self.unlisted);

        let remote = match &self.platform {
            Some((service, package_name)) => Some(RemoteOverride::install(
                service.as_ref(),
                package_name,
                &self.config,
            )?),
            None => None,
        };

        let value = body();

        if let Some(remote) = remote {
            remote.clear()?;
        }
        drop(local);

        Ok(value)
    }
}

struct LocalOverride<'a> {
    compat: &'a Compatibility,
}

impl<'a> LocalOverride<'a> {
    fn install(compat: &'a Compatibility, config: ChangeConfig, unlisted: Option<bool>) -> Self {
        match unlisted {
            Some(enabled) => compat.set_overrides_with_default(config, enabled),
            None => compat.set_overrides(config),
        }
        Self { compat }
    }
}

impl Drop for LocalOverride<'_> {
    fn drop(&mut self) {
        self.compat.clear_overrides();
    }
}

struct RemoteOverride<'a> {
    service: &'a dyn PlatformCompat,
    package_name: &'a str,
    armed: bool,
}

impl<'a> RemoteOverride<'a> {
    fn install(
        service: &'a dyn PlatformCompat,
        package_name: &'a str,
        config: &ChangeConfig,
    ) -> Result<Self, Error> {
        service.set_overrides(&CompatibilityChangeConfig::from(config), package_name)?;
        log::debug!("installed overrides for {}: {}", package_name, config);

        Ok(Self {
            service,
            package_name,
            armed: true,
        })
    }

    fn clear(mut self) -> Result<(), Error> {
        self.armed = false;
        self.service.clear_overrides(self.package_name)?;
        Ok(())
    }
}

impl Drop for RemoteOverride<'_> {
    fn drop(&mut self) {
        // Only reached while unwinding out of the body.
        if self.armed {
            if let Err(err) = self.service.clear_overrides(self.package_name) {
                log::error!(
                    "failed to clear overrides for {}: {}",
                    self.package_name,
                    err
                );
            }
        }
    }
}
