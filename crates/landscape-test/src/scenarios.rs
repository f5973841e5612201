//! End-to-end lifecycle scenarios against recording collaborators.

use landscape_app::{
    run_host, HostMessage, SpatialApplicationLifecycle, StopReason, VolumeHandle,
};
use landscape_core::{
    Error, Extent3, LifecycleState, Resource, SceneDescriptor, SceneDescriptorSet, SceneId,
    ServerEvent, ServerEventKind, Status,
};

use crate::recording::{Call, Fixture, RecordingLifecycle, ScriptedSource};

/// Any call that hands a descriptor to the spawn service.
fn is_spawn_attempt(call: &Call) -> bool {
    matches!(call, Call::Spawn { .. } | Call::Reject { .. })
}

#[test]
fn three_startup_scenes_spawn_in_order() {
    let (mut app, log) = Fixture::new().build(Fixture::startup_scenes(&["a", "b", "c"]));

    assert_eq!(app.init(), Status::SUCCESS);
    assert_eq!(app.state(), LifecycleState::Running);
    assert_eq!(log.spawned_ids(), ["a", "b", "c"]);
    assert_eq!(log.count(is_spawn_attempt), 3);
}

#[test]
fn spawn_order_is_stable_across_runs() {
    let run = || {
        let (mut app, log) =
            Fixture::new().build(Fixture::startup_scenes(&["zeta", "alpha", "mid", "beta"]));
        assert!(app.init().is_success());
        log.spawned_ids()
    };
    let first = run();
    assert_eq!(first, ["zeta", "alpha", "mid", "beta"]);
    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

#[test]
fn no_scene_spawns_before_volume_exists() {
    let (mut app, log) = Fixture::new().build(Fixture::startup_scenes(&["a", "b"]));
    assert!(app.init().is_success());

    let created = log
        .position(|c| matches!(c, Call::CreateVolume(_)))
        .unwrap();
    let first_spawn = log.position(is_spawn_attempt).unwrap();
    assert!(created < first_spawn);

    // Every spawn targets the volume that was created.
    let handle = app.volume().unwrap().handle();
    assert!(log.calls().iter().all(|c| match c {
        Call::Spawn { volume, .. } => *volume == handle,
        _ => true,
    }));
}

#[test]
fn requested_size_comes_from_logic() {
    let mut fixture = Fixture::new();
    fixture.logic = fixture.logic.with_size(Extent3::new(1.5, 0.75, 0.5));
    let (mut app, log) = fixture.build(SceneDescriptorSet::new());

    assert!(app.init().is_success());
    assert_eq!(log.calls(), [Call::CreateVolume(Extent3::new(1.5, 0.75, 0.5))]);
}

#[test]
fn volume_failure_spawns_nothing() {
    let mut fixture = Fixture::new();
    fixture.volumes = fixture.volumes.failing_create();
    let (mut app, log) = fixture.build(Fixture::startup_scenes(&["a", "b"]));

    let status = app.init();
    assert_eq!(status.code(), 1);
    assert_eq!(log.count(is_spawn_attempt), 0);
    assert!(app.volume().is_none());
}

#[test]
fn invalid_size_fails_without_allocation() {
    let mut fixture = Fixture::new();
    fixture.logic = fixture.logic.with_size(Extent3::new(1.0, f32::NAN, 1.0));
    let (mut app, log) = fixture.build(Fixture::startup_scenes(&["a"]));

    assert!(matches!(app.try_init(), Err(Error::VolumeAllocation { .. })));
    assert!(log.calls().is_empty());
}

#[test]
fn spawn_failure_keeps_earlier_scenes_and_releases_volume() {
    let mut fixture = Fixture::new();
    fixture.spawner = fixture.spawner.failing_spawn_of("c");
    let live = fixture.volumes.live();
    let (mut app, log) = fixture.build(Fixture::startup_scenes(&["a", "b", "c", "d"]));

    let err = app.try_init().unwrap_err();
    assert_eq!(err.scene(), Some(&SceneId::new("c")));
    assert_eq!(err.status_code(), 2);

    assert_eq!(log.spawned_ids(), ["a", "b", "c"]);
    let attached: Vec<&str> = app.spawned_scenes().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(attached, ["a", "b"]);
    assert!(log.despawned_ids().is_empty());

    // The partially created volume does not leak.
    assert!(live.borrow().is_empty());
    assert_eq!(log.calls().last(), Some(&Call::DestroyVolume(VolumeHandle(1))));
    assert_eq!(app.state(), LifecycleState::Initializing);
}

#[test]
fn invalid_second_descriptor_stops_after_two_attempts() {
    let descriptors = SceneDescriptorSet::from_descriptors([
        SceneDescriptor::new("first", "first.scene").instanced(true),
        SceneDescriptor::new("second", "").instanced(true),
        SceneDescriptor::new("third", "third.scene").instanced(true),
    ])
    .unwrap();
    let (mut app, log) = Fixture::new().build(descriptors);

    let status = app.init();
    assert_eq!(status.code(), 4);
    assert_eq!(log.count(is_spawn_attempt), 2);
    assert_eq!(log.spawned_ids(), ["first"]);
    assert_eq!(log.rejected_ids(), ["second"]);
    assert_eq!(app.spawned_scenes().len(), 1);
    assert_eq!(app.spawned_scenes()[0].id, SceneId::new("first"));
}

#[test]
fn failing_second_spawn_stops_after_two_attempts() {
    let mut fixture = Fixture::new();
    fixture.spawner = fixture.spawner.failing_spawn_of("second");
    let (mut app, log) = fixture.build(Fixture::startup_scenes(&["first", "second", "third"]));

    let err = app.try_init().unwrap_err();
    assert!(matches!(err, Error::SceneSpawn { .. }));
    assert_eq!(err.scene(), Some(&SceneId::new("second")));
    assert_eq!(log.count(is_spawn_attempt), 2);
    assert!(log.rejected_ids().is_empty());
    assert_eq!(app.spawned_scenes().len(), 1);
    assert_eq!(app.spawned_scenes()[0].id, SceneId::new("first"));
}

#[test]
fn deinit_after_failed_init_detaches_remaining_scenes() {
    let mut fixture = Fixture::new();
    fixture.spawner = fixture.spawner.failing_spawn_of("b");
    let (mut app, log) = fixture.build(Fixture::startup_scenes(&["a", "b"]));

    assert!(!app.init().is_success());
    assert_eq!(app.deinit(), Status::SUCCESS);
    assert_eq!(log.despawned_ids(), ["a"]);
    assert_eq!(log.count(|c| matches!(c, Call::DestroyVolume(_))), 1);
    assert_eq!(app.state(), LifecycleState::Terminated);
}

#[test]
fn deinit_releases_scenes_before_volume() {
    let (mut app, log) = Fixture::new().build(Fixture::startup_scenes(&["a", "b", "c"]));
    assert!(app.init().is_success());

    assert_eq!(app.deinit(), Status::SUCCESS);

    let calls = log.calls();
    let teardown = &calls[calls.len() - 4..];
    assert_eq!(
        teardown,
        [
            Call::Despawn(SceneId::new("c")),
            Call::Despawn(SceneId::new("b")),
            Call::Despawn(SceneId::new("a")),
            Call::DestroyVolume(VolumeHandle(1)),
        ]
    );
}

#[test]
fn deinit_reports_volume_failure_but_still_releases_scenes() {
    let mut fixture = Fixture::new();
    fixture.volumes = fixture.volumes.failing_destroy();
    let (mut app, log) = fixture.build(Fixture::startup_scenes(&["a", "b"]));
    assert!(app.init().is_success());

    let err = app.try_deinit().unwrap_err();
    assert!(matches!(
        err,
        Error::ResourceRelease {
            resource: Resource::Volume,
            ..
        }
    ));
    assert_eq!(log.despawned_ids(), ["b", "a"]);
    assert_eq!(app.state(), LifecycleState::Terminated);
}

#[test]
fn deinit_attempts_volume_after_scene_failure() {
    let mut fixture = Fixture::new();
    fixture.spawner = fixture.spawner.failing_despawn_of("b");
    let live = fixture.volumes.live();
    let (mut app, log) = fixture.build(Fixture::startup_scenes(&["a", "b"]));
    assert!(app.init().is_success());

    let status = app.deinit();
    assert_eq!(status.code(), 3);
    assert_eq!(log.despawned_ids(), ["b", "a"]);
    assert!(live.borrow().is_empty());
}

#[test]
fn second_deinit_touches_nothing() {
    let (mut app, log) = Fixture::new().build(Fixture::startup_scenes(&["a"]));
    assert!(app.init().is_success());
    assert!(app.deinit().is_success());
    let before = log.calls().len();

    assert!(!app.deinit().is_success());
    assert_eq!(log.calls().len(), before);
}

#[test]
fn update_false_leads_to_exactly_one_deinit() {
    let mut fixture = Fixture::new();
    fixture.logic = fixture.logic.stopping_at(2);
    let (app, log) = fixture.build(Fixture::startup_scenes(&["a"]));
    let mut app = RecordingLifecycle::new(app, &log);

    let mut source = ScriptedSource::new([
        HostMessage::Tick(0.1),
        HostMessage::Tick(0.1),
        HostMessage::Tick(0.1),
        HostMessage::Event(ServerEvent::bare(ServerEventKind::Completion)),
        HostMessage::Tick(0.1),
    ]);

    let outcome = run_host(&mut app, &mut source);

    assert_eq!(outcome.stop, StopReason::AppRequested);
    assert!(outcome.is_success());
    assert_eq!(source.remaining(), 3);

    let calls = log.calls();
    let deinit = calls.iter().position(|c| *c == Call::Deinit).unwrap();
    assert_eq!(log.count(|c| *c == Call::Deinit), 1);
    assert!(calls[deinit..]
        .iter()
        .all(|c| !matches!(c, Call::Update(_) | Call::Event(_))));
    assert_eq!(log.count(|c| matches!(c, Call::Update(_))), 2);
    assert_eq!(app.state(), LifecycleState::Terminated);
}

#[test]
fn host_delivers_init_before_any_tick_or_event() {
    let (app, log) = Fixture::new().build(Fixture::startup_scenes(&["a", "b"]));
    let mut app = RecordingLifecycle::new(app, &log);
    let mut source = ScriptedSource::new([
        HostMessage::Event(ServerEvent::bare(ServerEventKind::Lifecycle)),
        HostMessage::Tick(0.016),
        HostMessage::Shutdown,
        HostMessage::Tick(0.016),
    ]);

    let outcome = run_host(&mut app, &mut source);
    assert_eq!(outcome.stop, StopReason::Shutdown);

    let calls = log.calls();
    let last_spawn = calls.iter().rposition(is_spawn_attempt).unwrap();
    let first_event = calls
        .iter()
        .position(|c| matches!(c, Call::Event(_)))
        .unwrap();
    assert_eq!(calls[0], Call::Init);
    assert!(last_spawn < first_event);
    assert_eq!(log.count(|c| matches!(c, Call::Update(_))), 1);
    assert_eq!(app.inner().ticks(), 1);
}

#[test]
fn unconsumed_events_fall_back_to_host() {
    let mut fixture = Fixture::new();
    fixture.logic = fixture.logic.consuming_events(false);
    let (mut app, _log) = fixture.build(SceneDescriptorSet::new());
    let event = ServerEvent::new(ServerEventKind::Custom(9), b"ping".to_vec());
    let mut source = ScriptedSource::new([HostMessage::Event(event.clone())]);

    let outcome = run_host(&mut app, &mut source);

    assert_eq!(outcome.stop, StopReason::SourceExhausted);
    assert_eq!(outcome.events, 1);
    assert_eq!(outcome.events_consumed, 0);
    assert_eq!(source.unhandled(), [event]);
}

#[test]
fn failed_init_is_cleaned_up_by_host() {
    let mut fixture = Fixture::new();
    fixture.spawner = fixture.spawner.failing_spawn_of("b");
    let (app, log) = fixture.build(Fixture::startup_scenes(&["a", "b", "c"]));
    let mut app = RecordingLifecycle::new(app, &log);
    let mut source = ScriptedSource::new([HostMessage::Tick(0.1)]);

    let outcome = run_host(&mut app, &mut source);

    assert_eq!(outcome.stop, StopReason::InitFailed);
    assert_eq!(outcome.init.code(), 2);
    assert!(outcome.deinit.is_success());
    assert_eq!(source.remaining(), 1);
    assert_eq!(log.despawned_ids(), ["a"]);
    assert_eq!(log.count(|c| matches!(c, Call::Update(_))), 0);
}
