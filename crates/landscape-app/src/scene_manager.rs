//! Instantiation of startup scenes into a bounded volume.

use std::rc::Rc;

use landscape_core::{
    Error, Resource, Result, SceneDescriptor, SceneDescriptorSet, SceneId, ServiceError,
};
use tracing::{debug, error, info, warn};

use crate::volume::BoundedVolume;

/// Host-side identifier of an instantiated scene graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// A scene attached to the volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnedScene {
    pub id: SceneId,
    pub handle: SceneHandle,
}

/// Scene spawn service provided by the host's scene subsystem.
pub trait SceneSpawner {
    /// Instantiate `descriptor` and attach it to `volume`.
    fn spawn(
        &mut self,
        descriptor: &SceneDescriptor,
        volume: &BoundedVolume,
    ) -> std::result::Result<SceneHandle, ServiceError>;

    /// Detach and destroy a previously spawned scene.
    fn despawn(&mut self, scene: &SpawnedScene) -> std::result::Result<(), ServiceError>;

    /// Spawn attempt for `descriptor` refused before instantiation because
    /// the descriptor is malformed. Nothing is attached.
    ///
    /// Default implementation does nothing.
    #[allow(unused_variables)]
    fn reject(&mut self, descriptor: &SceneDescriptor, volume: &BoundedVolume, error: &Error) {}
}

impl<T: SceneSpawner + ?Sized> SceneSpawner for Box<T> {
    fn spawn(
        &mut self,
        descriptor: &SceneDescriptor,
        volume: &BoundedVolume,
    ) -> std::result::Result<SceneHandle, ServiceError> {
        (**self).spawn(descriptor, volume)
    }

    fn despawn(&mut self, scene: &SpawnedScene) -> std::result::Result<(), ServiceError> {
        (**self).despawn(scene)
    }

    fn reject(&mut self, descriptor: &SceneDescriptor, volume: &BoundedVolume, error: &Error) {
        (**self).reject(descriptor, volume, error);
    }
}

/// Spawns the descriptors flagged "instanced at startup" and tracks what it
/// attached so teardown can detach it.
///
/// Spawning is a fail-fast batch: the first malformed descriptor or failed
/// spawn stops processing, and scenes attached before it stay attached.
pub struct SceneInstantiationManager<S> {
    spawner: S,
    descriptors: Rc<SceneDescriptorSet>,
    spawned: Vec<SpawnedScene>,
}

impl<S: SceneSpawner> SceneInstantiationManager<S> {
    pub fn new(spawner: S, descriptors: Rc<SceneDescriptorSet>) -> Self {
        Self {
            spawner,
            descriptors,
            spawned: Vec::new(),
        }
    }

    /// Spawn every startup descriptor into `volume`, in descriptor-set order.
    ///
    /// Every descriptor reaches the spawner: valid ones through `spawn`,
    /// malformed ones through `reject`. Returns the first failure, naming the
    /// failing descriptor.
    pub fn spawn_initial(&mut self, volume: &BoundedVolume) -> Result<()> {
        let descriptors = Rc::clone(&self.descriptors);
        let mut count = 0usize;

        for descriptor in descriptors.initially_instanced() {
            if let Err(err) = descriptor.validate() {
                warn!("Stopping scene batch: {err}");
                self.spawner.reject(descriptor, volume, &err);
                return Err(err);
            }

            let handle = self.spawner.spawn(descriptor, volume).map_err(|e| {
                error!("Scene '{}' failed to spawn: {e}", descriptor.id);
                Error::SceneSpawn {
                    scene: descriptor.id.clone(),
                    reason: e.to_string(),
                }
            })?;

            debug!(
                "Spawned scene '{}' into volume {}",
                descriptor.id,
                volume.handle().0
            );
            self.spawned.push(SpawnedScene {
                id: descriptor.id.clone(),
                handle,
            });
            count += 1;
        }

        info!("Spawned {count} initial scene(s)");
        Ok(())
    }

    /// Scenes currently attached, in attach order.
    pub fn spawned(&self) -> &[SpawnedScene] {
        &self.spawned
    }

    pub fn descriptors(&self) -> &SceneDescriptorSet {
        &self.descriptors
    }

    /// Detach every spawned scene, newest first.
    ///
    /// All scenes are attempted and none stay tracked afterwards; the first
    /// failure is returned.
    pub fn release(&mut self) -> Result<()> {
        let mut first_err = None;

        while let Some(scene) = self.spawned.pop() {
            match self.spawner.despawn(&scene) {
                Ok(()) => debug!("Despawned scene '{}'", scene.id),
                Err(e) => {
                    warn!("Failed to despawn scene '{}': {e}", scene.id);
                    first_err.get_or_insert(Error::ResourceRelease {
                        resource: Resource::SceneManager,
                        reason: format!("scene '{}': {e}", scene.id),
                    });
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }
}
