//! Host-facing lifecycle contract and the application logic hooks.

use landscape_core::{Extent3, LifecycleState, ServerEvent, Status};

use crate::scene_manager::SpawnedScene;
use crate::volume::BoundedVolume;

/// Capability the host runtime drives.
///
/// The host calls `init` once, then interleaves `update` and `handle_event`
/// on a single thread, then calls `deinit` once. None of these calls may
/// overlap.
pub trait SpatialApplicationLifecycle {
    /// Allocate the volume and spawn startup scenes. `0` on success.
    fn init(&mut self) -> Status;

    /// Release scenes, then the volume. `0` on success.
    fn deinit(&mut self) -> Status;

    /// Per-tick hook. Returning `false` asks the host to shut down.
    fn update(&mut self, elapsed_seconds: f32) -> bool;

    /// Server event hook. Returns `true` if the event was consumed.
    fn handle_event(&mut self, event: &ServerEvent) -> bool;

    /// Current lifecycle state.
    fn state(&self) -> LifecycleState;
}

/// Read-only view of the running application passed to [`AppLogic`] hooks.
///
/// Hooks can inspect the volume and attached scenes but cannot create or
/// destroy either; that only happens in `init`/`deinit`.
#[derive(Debug, Clone, Copy)]
pub struct AppContext<'a> {
    /// The allocated volume.
    pub volume: &'a BoundedVolume,
    /// Scenes attached during `init`, in attach order.
    pub scenes: &'a [SpawnedScene],
    /// Ticks delivered so far, including the current one.
    pub ticks: u64,
    /// Total elapsed seconds across delivered ticks.
    pub elapsed: f64,
}

/// Application-specific behavior plugged into [`crate::Application`].
pub trait AppLogic {
    /// Size of the volume requested at startup.
    ///
    /// Must be pure: it is queried once, before the volume is created, and
    /// the volume is never resized afterwards.
    fn initial_volume_size(&self) -> Extent3 {
        Extent3::DEFAULT_PRISM
    }

    /// Advance application state. Must not block.
    ///
    /// Default implementation keeps running.
    #[allow(unused_variables)]
    fn update(&mut self, ctx: &AppContext<'_>, dt: f32) -> bool {
        true
    }

    /// Handle a server event. Return `true` if the event was consumed.
    ///
    /// Default implementation consumes nothing.
    #[allow(unused_variables)]
    fn on_event(&mut self, ctx: &AppContext<'_>, event: &ServerEvent) -> bool {
        false
    }
}

impl<T: SpatialApplicationLifecycle + ?Sized> SpatialApplicationLifecycle for Box<T> {
    fn init(&mut self) -> Status {
        (**self).init()
    }

    fn deinit(&mut self) -> Status {
        (**self).deinit()
    }

    fn update(&mut self, elapsed_seconds: f32) -> bool {
        (**self).update(elapsed_seconds)
    }

    fn handle_event(&mut self, event: &ServerEvent) -> bool {
        (**self).handle_event(event)
    }

    fn state(&self) -> LifecycleState {
        (**self).state()
    }
}
