//! Recording implementations of the host collaborator traits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use landscape_app::{
    AppContext, AppLogic, Application, BoundedVolume, HostMessage, HostSource, SceneHandle,
    SceneSpawner, SpatialApplicationLifecycle, SpawnedScene, VolumeHandle, VolumeService,
};
use landscape_core::{
    Error, Extent3, LifecycleState, SceneDescriptor, SceneDescriptorSet, SceneId, ServerEvent,
    ServiceError, Status,
};
use tracing::trace;

/// One observed call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init,
    Deinit,
    Update(f32),
    Event(ServerEvent),
    CreateVolume(Extent3),
    DestroyVolume(VolumeHandle),
    Spawn { scene: SceneId, volume: VolumeHandle },
    Reject { scene: SceneId, volume: VolumeHandle },
    Despawn(SceneId),
}

/// Shared, ordered log of calls across collaborators.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        trace!("{call:?}");
        self.0.borrow_mut().push(call);
    }

    /// Copy of every call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }

    /// Identifiers passed to `spawn`, in call order.
    pub fn spawned_ids(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Spawn { scene, .. } => Some(scene.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Identifiers passed to `reject`, in call order.
    pub fn rejected_ids(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Reject { scene, .. } => Some(scene.to_string()),
                _ => None,
            })
            .collect()
    }

    /// Identifiers passed to `despawn`, in call order.
    pub fn despawned_ids(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Despawn(scene) => Some(scene.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Volume service that hands out sequential handles.
#[derive(Debug)]
pub struct RecordingVolumeService {
    log: CallLog,
    next_handle: u64,
    live: Rc<RefCell<Vec<VolumeHandle>>>,
    fail_create: bool,
    fail_destroy: bool,
}

impl RecordingVolumeService {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            next_handle: 1,
            live: Rc::default(),
            fail_create: false,
            fail_destroy: false,
        }
    }

    /// Refuse every allocation.
    #[must_use]
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Refuse every destruction.
    #[must_use]
    pub fn failing_destroy(mut self) -> Self {
        self.fail_destroy = true;
        self
    }

    /// Shared view of volumes allocated and not yet destroyed.
    pub fn live(&self) -> Rc<RefCell<Vec<VolumeHandle>>> {
        Rc::clone(&self.live)
    }
}

impl VolumeService for RecordingVolumeService {
    fn create_volume(&mut self, size: Extent3) -> Result<VolumeHandle, ServiceError> {
        self.log.push(Call::CreateVolume(size));
        if self.fail_create {
            return Err(ServiceError::new("no prism available"));
        }
        let handle = VolumeHandle(self.next_handle);
        self.next_handle += 1;
        self.live.borrow_mut().push(handle);
        Ok(handle)
    }

    fn destroy_volume(&mut self, handle: VolumeHandle) -> Result<(), ServiceError> {
        self.log.push(Call::DestroyVolume(handle));
        if self.fail_destroy {
            return Err(ServiceError::new("prism in use"));
        }
        self.live.borrow_mut().retain(|h| *h != handle);
        Ok(())
    }
}

/// Scene spawner that can be told to fail on specific scenes.
#[derive(Debug)]
pub struct RecordingSceneSpawner {
    log: CallLog,
    next_handle: u64,
    fail_spawn: Vec<SceneId>,
    fail_despawn: Vec<SceneId>,
}

impl RecordingSceneSpawner {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            next_handle: 1,
            fail_spawn: Vec::new(),
            fail_despawn: Vec::new(),
        }
    }

    /// Fail when spawning `scene`.
    #[must_use]
    pub fn failing_spawn_of(mut self, scene: &str) -> Self {
        self.fail_spawn.push(SceneId::new(scene));
        self
    }

    /// Fail when despawning `scene`.
    #[must_use]
    pub fn failing_despawn_of(mut self, scene: &str) -> Self {
        self.fail_despawn.push(SceneId::new(scene));
        self
    }
}

impl SceneSpawner for RecordingSceneSpawner {
    fn spawn(
        &mut self,
        descriptor: &SceneDescriptor,
        volume: &BoundedVolume,
    ) -> Result<SceneHandle, ServiceError> {
        self.log.push(Call::Spawn {
            scene: descriptor.id.clone(),
            volume: volume.handle(),
        });
        if self.fail_spawn.contains(&descriptor.id) {
            return Err(ServiceError::new(format!(
                "cannot build scene graph from '{}'",
                descriptor.source
            )));
        }
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        Ok(handle)
    }

    fn despawn(&mut self, scene: &SpawnedScene) -> Result<(), ServiceError> {
        self.log.push(Call::Despawn(scene.id.clone()));
        if self.fail_despawn.contains(&scene.id) {
            return Err(ServiceError::new("scene still referenced"));
        }
        Ok(())
    }

    fn reject(&mut self, descriptor: &SceneDescriptor, volume: &BoundedVolume, _error: &Error) {
        self.log.push(Call::Reject {
            scene: descriptor.id.clone(),
            volume: volume.handle(),
        });
    }
}

/// Application logic that records ticks and events.
#[derive(Debug)]
pub struct RecordingLogic {
    log: CallLog,
    size: Extent3,
    stop_at_tick: Option<u64>,
    consume_events: bool,
}

impl RecordingLogic {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            size: Extent3::DEFAULT_PRISM,
            stop_at_tick: None,
            consume_events: true,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: Extent3) -> Self {
        self.size = size;
        self
    }

    /// Return `false` from `update` on this tick.
    #[must_use]
    pub fn stopping_at(mut self, tick: u64) -> Self {
        self.stop_at_tick = Some(tick);
        self
    }

    #[must_use]
    pub fn consuming_events(mut self, consume: bool) -> Self {
        self.consume_events = consume;
        self
    }
}

impl AppLogic for RecordingLogic {
    fn initial_volume_size(&self) -> Extent3 {
        self.size
    }

    fn update(&mut self, ctx: &AppContext<'_>, dt: f32) -> bool {
        self.log.push(Call::Update(dt));
        self.stop_at_tick.map_or(true, |stop| ctx.ticks < stop)
    }

    fn on_event(&mut self, _ctx: &AppContext<'_>, event: &ServerEvent) -> bool {
        self.log.push(Call::Event(event.clone()));
        self.consume_events
    }
}

/// Lifecycle wrapper that records host-level calls before forwarding them.
pub struct RecordingLifecycle<A> {
    inner: A,
    log: CallLog,
}

impl<A> RecordingLifecycle<A> {
    pub fn new(inner: A, log: &CallLog) -> Self {
        Self {
            inner,
            log: log.clone(),
        }
    }

    pub const fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: SpatialApplicationLifecycle> SpatialApplicationLifecycle for RecordingLifecycle<A> {
    fn init(&mut self) -> Status {
        self.log.push(Call::Init);
        self.inner.init()
    }

    fn deinit(&mut self) -> Status {
        self.log.push(Call::Deinit);
        self.inner.deinit()
    }

    fn update(&mut self, elapsed_seconds: f32) -> bool {
        self.inner.update(elapsed_seconds)
    }

    fn handle_event(&mut self, event: &ServerEvent) -> bool {
        self.inner.handle_event(event)
    }

    fn state(&self) -> LifecycleState {
        self.inner.state()
    }
}

/// Host source replaying a fixed message script.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    messages: VecDeque<HostMessage>,
    unhandled: Vec<ServerEvent>,
}

impl ScriptedSource {
    pub fn new(messages: impl IntoIterator<Item = HostMessage>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
            unhandled: Vec::new(),
        }
    }

    /// Messages not yet delivered.
    pub fn remaining(&self) -> usize {
        self.messages.len()
    }

    pub fn unhandled(&self) -> &[ServerEvent] {
        &self.unhandled
    }
}

impl HostSource for ScriptedSource {
    fn next_message(&mut self) -> Option<HostMessage> {
        self.messages.pop_front()
    }

    fn unhandled_event(&mut self, event: ServerEvent) {
        self.unhandled.push(event);
    }
}

/// Application wired to recording collaborators.
pub type RecordingApp = Application<RecordingLogic, RecordingVolumeService, RecordingSceneSpawner>;

/// Builder for a [`RecordingApp`] sharing one [`CallLog`].
pub struct Fixture {
    pub log: CallLog,
    pub logic: RecordingLogic,
    pub volumes: RecordingVolumeService,
    pub spawner: RecordingSceneSpawner,
}

impl Fixture {
    pub fn new() -> Self {
        let log = CallLog::new();
        Self {
            logic: RecordingLogic::new(&log),
            volumes: RecordingVolumeService::new(&log),
            spawner: RecordingSceneSpawner::new(&log),
            log,
        }
    }

    /// Startup descriptors `ids`, each with source `<id>.scene`.
    ///
    /// Panics on duplicate ids; intended for tests.
    pub fn startup_scenes(ids: &[&str]) -> SceneDescriptorSet {
        SceneDescriptorSet::from_descriptors(
            ids.iter()
                .map(|id| SceneDescriptor::new(*id, format!("{id}.scene")).instanced(true)),
        )
        .expect("fixture scene ids must be unique")
    }

    pub fn build(self, descriptors: SceneDescriptorSet) -> (RecordingApp, CallLog) {
        let app = Application::new(
            self.logic,
            self.volumes,
            self.spawner,
            Rc::new(descriptors),
        );
        (app, self.log)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
