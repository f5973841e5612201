//! Lifecycle framework for spatial applications hosted by a compositing
//! runtime.
//!
//! The host allocates a bounded render volume (a "prism"), the application
//! spawns its startup scenes into it, and then receives ticks and server
//! events until the host tears it down. This crate provides:
//! - The [`SpatialApplicationLifecycle`] contract the host drives
//! - [`Application`], the controller that enforces create-before-spawn and
//!   scenes-before-volume teardown
//! - [`BoundedVolume`] and [`SceneInstantiationManager`] over host services
//! - [`run_host`], a single-threaded host loop driver
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use landscape_app::{AppContext, AppLogic, Application, FixedTickSource, run_host};
//! # use landscape_app::{BoundedVolume, SceneSpawner, SceneHandle, SpawnedScene, VolumeHandle, VolumeService};
//! # use landscape_core::{Extent3, SceneDescriptor, SceneDescriptorSet, ServiceError};
//! # struct Volumes;
//! # impl VolumeService for Volumes {
//! #     fn create_volume(&mut self, _: Extent3) -> Result<VolumeHandle, ServiceError> { Ok(VolumeHandle(1)) }
//! #     fn destroy_volume(&mut self, _: VolumeHandle) -> Result<(), ServiceError> { Ok(()) }
//! # }
//! # struct Scenes;
//! # impl SceneSpawner for Scenes {
//! #     fn spawn(&mut self, _: &SceneDescriptor, _: &BoundedVolume) -> Result<SceneHandle, ServiceError> { Ok(SceneHandle(1)) }
//! #     fn despawn(&mut self, _: &SpawnedScene) -> Result<(), ServiceError> { Ok(()) }
//! # }
//!
//! struct MyApp;
//!
//! impl AppLogic for MyApp {
//!     fn update(&mut self, ctx: &AppContext<'_>, _dt: f32) -> bool {
//!         ctx.ticks < 600
//!     }
//! }
//!
//! let scenes = Rc::new(SceneDescriptorSet::new());
//! let mut app = Application::new(MyApp, Volumes, Scenes, scenes);
//! let outcome = run_host(&mut app, &mut FixedTickSource::new(1.0 / 60.0));
//! assert!(outcome.is_success());
//! ```

mod application;
mod config;
mod lifecycle;
mod logging;
mod runner;
mod scene_manager;
mod volume;

pub use application::Application;
pub use config::HostConfig;
pub use lifecycle::{AppContext, AppLogic, SpatialApplicationLifecycle};
pub use logging::init_logging;
pub use runner::{run_host, FixedTickSource, HostMessage, HostOutcome, HostSource, StopReason};
pub use scene_manager::{SceneHandle, SceneInstantiationManager, SceneSpawner, SpawnedScene};
pub use volume::{BoundedVolume, VolumeHandle, VolumeService};

// Re-export commonly used types for convenience
pub use landscape_core::{
    Error, Extent3, LifecycleState, Result, SceneDescriptor, SceneDescriptorSet, SceneId,
    ServerEvent, ServerEventKind, ServiceError, Status,
};
