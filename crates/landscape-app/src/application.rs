//! The lifecycle controller.

use std::rc::Rc;

use landscape_core::{Error, LifecycleState, Result, SceneDescriptorSet, ServerEvent, Status};
use tracing::{debug, error, info, trace, warn};

use crate::lifecycle::{AppContext, AppLogic, SpatialApplicationLifecycle};
use crate::scene_manager::{SceneInstantiationManager, SceneSpawner, SpawnedScene};
use crate::volume::{BoundedVolume, VolumeService};

/// Drives a spatial application through
/// `Uninitialized → Initializing → Running → Deinitializing → Terminated`.
///
/// Owns the volume and the scene manager exclusively. Neither is reachable
/// mutably from outside, and teardown order is fixed by [`Self::try_deinit`]
/// rather than by field drop order.
///
/// The descriptor set is shared read-only with the host's resource
/// subsystem through an `Rc`, which also keeps the controller on the host's
/// thread.
pub struct Application<L, V, S> {
    logic: L,
    volume_service: V,
    volume: Option<BoundedVolume>,
    scene_manager: SceneInstantiationManager<S>,
    state: LifecycleState,
    ticks: u64,
    elapsed: f64,
}

impl<L, V, S> Application<L, V, S>
where
    L: AppLogic,
    V: VolumeService,
    S: SceneSpawner,
{
    /// Construct an uninitialized application. No host calls are made.
    pub fn new(
        logic: L,
        volume_service: V,
        spawner: S,
        descriptors: Rc<SceneDescriptorSet>,
    ) -> Self {
        Self {
            logic,
            volume_service,
            volume: None,
            scene_manager: SceneInstantiationManager::new(spawner, descriptors),
            state: LifecycleState::Uninitialized,
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Allocate the volume, then spawn every startup scene into it.
    ///
    /// On failure any volume allocated here is released before returning.
    /// Scenes spawned before a failing one stay attached and the state stays
    /// `Initializing`, so a following [`Self::try_deinit`] detaches them.
    pub fn try_init(&mut self) -> Result<()> {
        if !self.state.can_init() {
            return Err(Error::InvalidState {
                op: "init",
                state: self.state,
            });
        }
        self.state = LifecycleState::Initializing;

        let size = self.logic.initial_volume_size();
        info!("Initializing application with a {size} volume");

        let volume = BoundedVolume::create(&mut self.volume_service, size)
            .inspect_err(|e| error!("{e}"))?;
        let volume = self.volume.insert(volume);

        if let Err(err) = self.scene_manager.spawn_initial(volume) {
            error!("Initial scene spawning failed: {err}");
            self.release_partial_volume();
            return Err(err);
        }

        self.state = LifecycleState::Running;
        info!("Application running");
        Ok(())
    }

    fn release_partial_volume(&mut self) {
        if let Some(volume) = self.volume.take() {
            if let Err(err) = volume.release(&mut self.volume_service) {
                warn!("Failed to release volume after init failure: {err}");
            }
        }
    }

    /// Release the scene manager, then the volume.
    ///
    /// Both releases are attempted regardless of the other's outcome; the
    /// first failure is returned. The state ends `Terminated` either way.
    pub fn try_deinit(&mut self) -> Result<()> {
        if !self.state.can_deinit() {
            return Err(Error::InvalidState {
                op: "deinit",
                state: self.state,
            });
        }
        self.state = LifecycleState::Deinitializing;
        info!("Deinitializing application after {} tick(s)", self.ticks);

        let mut first_err = None;

        if let Err(err) = self.scene_manager.release() {
            error!("{err}");
            first_err.get_or_insert(err);
        }

        if let Some(volume) = self.volume.take() {
            if let Err(err) = volume.release(&mut self.volume_service) {
                error!("{err}");
                first_err.get_or_insert(err);
            }
        }

        self.state = LifecycleState::Terminated;
        info!("Application terminated");
        first_err.map_or(Ok(()), Err)
    }

    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// The allocated volume, while one is held.
    pub const fn volume(&self) -> Option<&BoundedVolume> {
        self.volume.as_ref()
    }

    /// Scenes attached to the volume, in attach order.
    pub fn spawned_scenes(&self) -> &[SpawnedScene] {
        self.scene_manager.spawned()
    }

    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total seconds reported by delivered ticks.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub const fn logic(&self) -> &L {
        &self.logic
    }
}

impl<L, V, S> SpatialApplicationLifecycle for Application<L, V, S>
where
    L: AppLogic,
    V: VolumeService,
    S: SceneSpawner,
{
    fn init(&mut self) -> Status {
        Status::from(&self.try_init())
    }

    fn deinit(&mut self) -> Status {
        Status::from(&self.try_deinit())
    }

    fn update(&mut self, elapsed_seconds: f32) -> bool {
        if !self.state.is_running() {
            warn!("Tick ignored while {}", self.state);
            return false;
        }

        self.ticks += 1;
        self.elapsed += f64::from(elapsed_seconds);
        trace!("Tick {} ({elapsed_seconds:.4}s)", self.ticks);

        let Some(volume) = self.volume.as_ref() else {
            return false;
        };
        let ctx = AppContext {
            volume,
            scenes: self.scene_manager.spawned(),
            ticks: self.ticks,
            elapsed: self.elapsed,
        };
        let keep_running = self.logic.update(&ctx, elapsed_seconds);
        if !keep_running {
            info!("Application requested shutdown at tick {}", self.ticks);
        }
        keep_running
    }

    fn handle_event(&mut self, event: &ServerEvent) -> bool {
        if !self.state.is_running() {
            warn!("Event {:?} ignored while {}", event.kind(), self.state);
            return false;
        }

        let Some(volume) = self.volume.as_ref() else {
            return false;
        };
        let ctx = AppContext {
            volume,
            scenes: self.scene_manager.spawned(),
            ticks: self.ticks,
            elapsed: self.elapsed,
        };
        let consumed = self.logic.on_event(&ctx, event);
        debug!("Event {:?} consumed: {consumed}", event.kind());
        consumed
    }

    fn state(&self) -> LifecycleState {
        self.state
    }
}
