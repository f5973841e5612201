//! Application lifecycle states.

use std::fmt;

/// State of a spatial application as driven by the host.
///
/// ```text
/// Uninitialized ─init()─> Initializing ─ok─> Running ─deinit()─> Deinitializing ─> Terminated
///                              │                                        ^
///                              └──────────────failed, deinit()──────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Constructed by the host, `init` not yet called.
    #[default]
    Uninitialized,
    /// `init` in progress, or `init` failed and cleanup is pending.
    Initializing,
    /// Receiving ticks and events.
    Running,
    /// `deinit` in progress.
    Deinitializing,
    /// Torn down; no further calls are accepted.
    Terminated,
}

impl LifecycleState {
    #[inline]
    #[must_use]
    pub const fn can_init(self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    #[inline]
    #[must_use]
    pub const fn can_deinit(self) -> bool {
        matches!(self, Self::Running | Self::Initializing)
    }

    #[inline]
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    #[inline]
    #[must_use]
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Deinitializing => "deinitializing",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
