//! Core types for Landscape spatial applications.
//!
//! This crate provides the vocabulary shared by the lifecycle controller,
//! its host-side collaborators and the test harness:
//! - 3D extents for bounded render volumes
//! - Scene descriptors and descriptor sets
//! - Server events delivered by the host
//! - The lifecycle state enum, error taxonomy and status codes

pub mod error;
pub mod event;
pub mod extent;
pub mod lifecycle;
pub mod scene;

pub use error::{Error, Resource, Result, ServiceError, Status};
pub use event::{ServerEvent, ServerEventKind};
pub use extent::Extent3;
pub use lifecycle::LifecycleState;
pub use scene::{SceneDescriptor, SceneDescriptorSet, SceneId};
