//! In-process stand-ins for the host runtime's services.

use landscape_app::{
    BoundedVolume, FixedTickSource, HostMessage, HostSource, SceneHandle, SceneSpawner,
    SpawnedScene, VolumeHandle, VolumeService,
};
use landscape_core::{
    Error, Extent3, SceneDescriptor, SceneId, ServerEvent, ServerEventKind, ServiceError,
};
use tracing::{debug, info, warn};

/// Volume service that tracks allocations in memory.
#[derive(Debug, Default)]
pub struct SimulatedVolumes {
    next: u64,
    live: Vec<(VolumeHandle, Extent3)>,
}

impl VolumeService for SimulatedVolumes {
    fn create_volume(&mut self, size: Extent3) -> Result<VolumeHandle, ServiceError> {
        self.next += 1;
        let handle = VolumeHandle(self.next);
        self.live.push((handle, size));
        info!("[host] prism {} allocated ({size})", handle.0);
        Ok(handle)
    }

    fn destroy_volume(&mut self, handle: VolumeHandle) -> Result<(), ServiceError> {
        let before = self.live.len();
        self.live.retain(|(h, _)| *h != handle);
        if self.live.len() == before {
            return Err(ServiceError::new(format!("unknown prism {}", handle.0)));
        }
        info!("[host] prism {} destroyed", handle.0);
        Ok(())
    }
}

/// Scene spawner that logs instead of building scene graphs.
#[derive(Debug, Default)]
pub struct SimulatedScenes {
    next: u64,
    attached: Vec<SceneHandle>,
    fail_on: Option<SceneId>,
}

impl SimulatedScenes {
    /// Fail when asked to spawn `scene`.
    pub fn failing_on(mut self, scene: SceneId) -> Self {
        self.fail_on = Some(scene);
        self
    }
}

impl SceneSpawner for SimulatedScenes {
    fn spawn(
        &mut self,
        descriptor: &SceneDescriptor,
        volume: &BoundedVolume,
    ) -> Result<SceneHandle, ServiceError> {
        if self.fail_on.as_ref() == Some(&descriptor.id) {
            return Err(ServiceError::new(format!(
                "could not load '{}'",
                descriptor.source
            )));
        }
        self.next += 1;
        let handle = SceneHandle(self.next);
        self.attached.push(handle);
        info!(
            "[host] scene '{}' from {} attached to prism {}",
            descriptor.id,
            descriptor.source,
            volume.handle().0
        );
        Ok(handle)
    }

    fn despawn(&mut self, scene: &SpawnedScene) -> Result<(), ServiceError> {
        self.attached.retain(|h| *h != scene.handle);
        info!("[host] scene '{}' detached", scene.id);
        Ok(())
    }

    fn reject(&mut self, descriptor: &SceneDescriptor, volume: &BoundedVolume, error: &Error) {
        warn!(
            "[host] scene '{}' refused for prism {}: {error}",
            descriptor.id,
            volume.handle().0
        );
    }
}

/// Tick source that also delivers a completion event every `interval` ticks.
pub struct ViewerSource {
    ticks: FixedTickSource,
    interval: u64,
}

impl ViewerSource {
    pub fn new(ticks: FixedTickSource, interval: u64) -> Self {
        Self {
            ticks,
            interval: interval.max(1),
        }
    }
}

impl HostSource for ViewerSource {
    fn next_message(&mut self) -> Option<HostMessage> {
        let message = self.ticks.next_message()?;
        if matches!(message, HostMessage::Tick(_)) {
            let tick = self.ticks.emitted();
            if tick % self.interval == 0 {
                self.ticks.push_event(ServerEvent::new(
                    ServerEventKind::Completion,
                    format!("batch {}", tick / self.interval),
                ));
            }
        }
        Some(message)
    }

    fn unhandled_event(&mut self, event: ServerEvent) {
        debug!("[host] default handling for {:?}", event.kind());
    }
}
