//! Error types and host status codes.

use std::fmt;

use thiserror::Error;

use crate::extent::Extent3;
use crate::lifecycle::LifecycleState;
use crate::scene::SceneId;

/// Opaque failure reported by a host-side service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ServiceError(pub String);

impl ServiceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Resource released during teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    SceneManager,
    Volume,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SceneManager => f.write_str("scene manager"),
            Self::Volume => f.write_str("volume"),
        }
    }
}

/// Lifecycle error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The host could not allocate the bounded volume.
    #[error("Volume allocation failed for {size}: {reason}")]
    VolumeAllocation { size: Extent3, reason: String },

    /// A scene failed to instantiate; carries the first failing descriptor.
    #[error("Scene '{scene}' failed to spawn: {reason}")]
    SceneSpawn { scene: SceneId, reason: String },

    /// Releasing a resource during teardown failed.
    #[error("Failed to release {resource}: {reason}")]
    ResourceRelease { resource: Resource, reason: String },

    /// A scene descriptor is malformed.
    #[error("Invalid scene descriptor '{scene}': {reason}")]
    InvalidDescriptor { scene: SceneId, reason: String },

    /// A lifecycle operation was called in the wrong state.
    #[error("Cannot {op} while {state}")]
    InvalidState {
        op: &'static str,
        state: LifecycleState,
    },

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Nonzero status code reported to the host for this error.
    pub const fn status_code(&self) -> i32 {
        match self {
            Self::VolumeAllocation { .. } => 1,
            Self::SceneSpawn { .. } => 2,
            Self::ResourceRelease { .. } => 3,
            Self::InvalidDescriptor { .. } => 4,
            Self::InvalidState { .. } => 5,
            Self::Config(_) => 6,
        }
    }

    /// Identifier of the scene this error concerns, if any.
    pub const fn scene(&self) -> Option<&SceneId> {
        match self {
            Self::SceneSpawn { scene, .. } | Self::InvalidDescriptor { scene, .. } => Some(scene),
            _ => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Status code returned to the host by lifecycle calls.
///
/// `0` means success, anything else is a failure the host surfaces as an
/// application start or stop failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<&Error> for Status {
    fn from(err: &Error) -> Self {
        Self(err.status_code())
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::SUCCESS,
            Err(err) => Self::from(err),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
