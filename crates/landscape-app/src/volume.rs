//! Bounded render volume ("prism") allocated by the host.

use glam::Vec3;
use landscape_core::{Error, Extent3, Resource, Result, ServiceError};
use tracing::{debug, info};

/// Host-side identifier of an allocated volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VolumeHandle(pub u64);

/// Volume allocation service provided by the host runtime.
pub trait VolumeService {
    /// Allocate a volume of the given size.
    fn create_volume(&mut self, size: Extent3) -> std::result::Result<VolumeHandle, ServiceError>;

    /// Destroy a previously allocated volume.
    fn destroy_volume(&mut self, handle: VolumeHandle) -> std::result::Result<(), ServiceError>;
}

impl<T: VolumeService + ?Sized> VolumeService for Box<T> {
    fn create_volume(&mut self, size: Extent3) -> std::result::Result<VolumeHandle, ServiceError> {
        (**self).create_volume(size)
    }

    fn destroy_volume(&mut self, handle: VolumeHandle) -> std::result::Result<(), ServiceError> {
        (**self).destroy_volume(handle)
    }
}

/// A fixed-size 3D region the application renders into.
///
/// Only obtainable through a successful [`BoundedVolume::create`], so holding
/// one proves the host allocated it. Not `Clone`: the owner is the only
/// party that can release it, and releasing consumes it.
#[derive(Debug)]
pub struct BoundedVolume {
    handle: VolumeHandle,
    size: Extent3,
}

impl BoundedVolume {
    /// Ask the host to allocate a volume of `size`.
    ///
    /// Non-finite or non-positive sizes are rejected without calling the
    /// service.
    pub fn create<V: VolumeService + ?Sized>(service: &mut V, size: Extent3) -> Result<Self> {
        if !size.is_valid() {
            return Err(Error::VolumeAllocation {
                size,
                reason: "extent must be finite and positive on every axis".to_string(),
            });
        }

        let handle = service
            .create_volume(size)
            .map_err(|e| Error::VolumeAllocation {
                size,
                reason: e.to_string(),
            })?;

        info!("Volume {} created ({size})", handle.0);
        Ok(Self { handle, size })
    }

    #[inline]
    pub const fn handle(&self) -> VolumeHandle {
        self.handle
    }

    /// Size fixed at creation.
    #[inline]
    pub const fn size(&self) -> Extent3 {
        self.size
    }

    /// Half the size along each axis. The volume's local space is centred on
    /// the origin, so content must stay within `[-half, half]`.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size.to_vec3() * 0.5
    }

    /// Returns `true` if a local-space point lies inside the volume.
    pub fn contains(&self, point: Vec3) -> bool {
        point.abs().cmple(self.half_extents()).all()
    }

    /// Return the volume to the host.
    pub fn release<V: VolumeService + ?Sized>(self, service: &mut V) -> Result<()> {
        debug!("Releasing volume {}", self.handle.0);
        service
            .destroy_volume(self.handle)
            .map_err(|e| Error::ResourceRelease {
                resource: Resource::Volume,
                reason: e.to_string(),
            })
    }
}
