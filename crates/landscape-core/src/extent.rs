//! 3D extents for bounded render volumes.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Size of a bounded volume in metres along each axis.
///
/// Laid out as three `f32`s so it can be passed to a host ABI unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Extent3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Extent3 {
    /// Default prism size: a one metre cube.
    pub const DEFAULT_PRISM: Self = Self::splat(1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Volume in cubic metres.
    #[inline]
    pub fn volume(self) -> f32 {
        self.x * self.y * self.z
    }

    /// Returns `true` if every axis is finite and strictly positive.
    pub fn is_valid(self) -> bool {
        let v = self.to_vec3();
        v.is_finite() && v.cmpgt(Vec3::ZERO).all()
    }
}

impl Default for Extent3 {
    fn default() -> Self {
        Self::DEFAULT_PRISM
    }
}

impl From<Vec3> for Extent3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Extent3> for Vec3 {
    fn from(e: Extent3) -> Self {
        e.to_vec3()
    }
}

impl fmt::Display for Extent3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn validity() {
        assert!(Extent3::DEFAULT_PRISM.is_valid());
        assert!(Extent3::new(2.0, 1.5, 0.25).is_valid());
        assert!(!Extent3::new(0.0, 1.0, 1.0).is_valid());
        assert!(!Extent3::new(1.0, -1.0, 1.0).is_valid());
        assert!(!Extent3::new(1.0, 1.0, f32::NAN).is_valid());
        assert!(!Extent3::new(f32::INFINITY, 1.0, 1.0).is_valid());
    }

    #[test]
    fn vec3_conversion() {
        let e = Extent3::new(1.0, 2.0, 3.0);
        let v: Vec3 = e.into();
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Extent3::from(v), e);
        assert_relative_eq!(e.volume(), 6.0);
    }

    #[test]
    fn pod_layout() {
        let e = Extent3::new(1.0, 2.0, 3.0);
        let floats: &[f32; 3] = bytemuck::cast_ref(&e);
        assert_eq!(floats, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn display() {
        assert_eq!(Extent3::new(1.0, 0.5, 2.0).to_string(), "1x0.5x2");
    }
}
