//! Android SDK API levels.
//!
//! Changes are commonly enabled only for apps targeting at least one of these
//! levels. The values match `android.os.Build.VERSION_CODES`.
//!
//! ```rust
//! use platform_compat::version_codes;
//!
//! let target_sdk = 33;
//! assert!(target_sdk >= version_codes::TIRAMISU && target_sdk < version_codes::UPSIDE_DOWN_CAKE);
//! ```

/// Android 10.
pub const Q: u32 = 29;
/// Android 11.
pub const R: u32 = 30;
/// Android 12.
pub const S: u32 = 31;
/// Android 12L.
pub const S_V2: u32 = 32;
/// Android 13.
pub const TIRAMISU: u32 = 33;
/// Android 14.
pub const UPSIDE_DOWN_CAKE: u32 = 34;
/// Android 15.
pub const VANILLA_ICE_CREAM: u32 = 35;

/// The level used by builds that haven't been assigned a release level yet.
pub const CUR_DEVELOPMENT: u32 = 10_000;
