use crate::{ChangeId, Error};
use std::collections::BTreeSet;
use std::fmt;

/// An immutable set of changes to force on and changes to force off.
///
/// A change can't be in both sets; [`ChangeConfig::new`] rejects that.
/// The array forms are sorted ascending, so identical sets always encode identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeConfig {
    enabled: BTreeSet<ChangeId>,
    disabled: BTreeSet<ChangeId>,
}

impl ChangeConfig {
    /// Creates a config from the changes to enable and the changes to disable.
    ///
    /// Duplicate IDs collapse. Returns [`Error::ConflictingChange`] with the smallest
    /// offending ID if a change appears in both.
    pub fn new(
        enabled: impl IntoIterator<Item = ChangeId>,
        disabled: impl IntoIterator<Item = ChangeId>,
    ) -> Result<Self, Error> {
        let enabled: BTreeSet<ChangeId> = enabled.into_iter().collect();
        let disabled: BTreeSet<ChangeId> = disabled.into_iter().collect();

        if let Some(id) = enabled.intersection(&disabled).next() {
            return Err(Error::ConflictingChange(*id));
        }

        Ok(Self { enabled, disabled })
    }

    /// Returns `true` if the config neither enables nor disables anything.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty() && self.disabled.is_empty()
    }

    /// Returns `true` if `change_id` is forced on.
    pub fn is_force_enabled(&self, change_id: ChangeId) -> bool {
        self.enabled.contains(&change_id)
    }

    /// Returns `true` if `change_id` is forced off.
    pub fn is_force_disabled(&self, change_id: ChangeId) -> bool {
        self.disabled.contains(&change_id)
    }

    /// The changes forced on.
    pub fn enabled_changes(&self) -> &BTreeSet<ChangeId> {
        &self.enabled
    }

    /// The changes forced off.
    pub fn disabled_changes(&self) -> &BTreeSet<ChangeId> {
        &self.disabled
    }

    /// The changes forced on, in ascending order.
    pub fn enabled_changes_array(&self) -> Vec<ChangeId> {
        self.enabled.iter().copied().collect()
    }

    /// The changes forced off, in ascending order.
    pub fn disabled_changes_array(&self) -> Vec<ChangeId> {
        self.disabled.iter().copied().collect()
    }
}

impl fmt::Display for ChangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChangeConfig{{enabled={:?}, disabled={:?}}}",
            self.enabled_changes_array(),
            self.disabled_changes_array()
        )
    }
}
