#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use std::sync::Arc;

mod change_config;
pub use change_config::ChangeConfig;

pub mod compatibility;
pub use compatibility::{BehaviorChangeDelegate, Compatibility, DefaultDelegate};

mod error;
pub use error::{Error, RemoteError};

pub mod platform;
pub use platform::{CompatibilityChangeConfig, PlatformCompat};

mod rule;
pub use rule::{CompatChangeRule, CompatChangeStatement};

pub mod version_codes;

/// Fixtures and test cases for the gate, the overrides and the
/// change rule.
#[cfg(any(test, feature = "ffi-testing"))]
mod tests;

// Re-export any exported functions that are required for
// tests to run in a platform-native environment.
#[cfg(feature = "ffi-testing")]
#[cfg_attr(feature = "ffi-testing", allow(unused_imports))]
pub use tests::ffi::*;

/// Identifies a single behavior change.
///
/// IDs are assigned by whoever introduces the change. Nothing in this crate checks
/// that they are globally unique.
pub type ChangeId = i64;

/// Reports that the change `change_id` is affecting the current process now.
///
/// Changes gated with [`is_change_enabled`] don't need this, they are reported
/// automatically whenever the query returns `true`.
///
/// This uses the process-wide [`Compatibility`] returned by [`compatibility::global`].
pub fn report_change(change_id: ChangeId) {
    compatibility::global().report_change(change_id)
}

/// Returns whether the change `change_id` is enabled for the current process.
///
/// If this returns `true` the calling code should implement the new behavior, and the
/// change has also been reported as with [`report_change`]. If it returns `false` the
/// calling code should behave as it did before the change.
///
/// This uses the process-wide [`Compatibility`] returned by [`compatibility::global`].
pub fn is_change_enabled(change_id: ChangeId) -> bool {
    compatibility::global().is_change_enabled(change_id)
}

/// Replaces the process-wide delegate.
///
/// Intended for platform bootstrap and test scaffolding. The previous delegate is
/// discarded.
pub fn set_behavior_change_delegate(delegate: Arc<dyn BehaviorChangeDelegate>) {
    compatibility::global().set_behavior_change_delegate(delegate)
}

/// Resets the process-wide delegate to [`DefaultDelegate`].
pub fn clear_behavior_change_delegate() {
    compatibility::global().clear_behavior_change_delegate()
}
