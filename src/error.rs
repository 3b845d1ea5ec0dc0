use crate::ChangeId;
use std::fmt;

/// Errors raised while building or applying a compatibility change override.
///
/// Querying and reporting changes never fails; these only come from override setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An override was requested without enabling or disabling any change.
    EmptyOverride,
    /// The same change was asked to be both enabled and disabled.
    ConflictingChange(ChangeId),
    /// The platform compat service could not be reached or refused the call.
    Remote(RemoteError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyOverride => f.write_str(
                "compatibility change override specifies no enabled or disabled changes",
            ),
            Error::ConflictingChange(id) => {
                write!(f, "change {} is both enabled and disabled", id)
            }
            Error::Remote(_) => f.write_str("could not call the platform compat service"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        Error::Remote(err)
    }
}

/// A failed call to a [`PlatformCompat`](crate::PlatformCompat) service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    /// Creates an error describing why the service call failed.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure reason given by the service.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform compat call failed: {}", self.message)
    }
}

impl std::error::Error for RemoteError {}
