//! Test harness for Landscape applications.
//!
//! Provides host collaborators that record every call into one shared,
//! ordered [`CallLog`], so tests can assert on cross-collaborator ordering
//! (volume before scenes, scenes released before the volume).

pub mod recording;

#[cfg(test)]
mod scenarios;

pub use recording::{
    Call, CallLog, Fixture, RecordingApp, RecordingLifecycle, RecordingLogic,
    RecordingSceneSpawner, RecordingVolumeService, ScriptedSource,
};
