use bytemuck::{Pod, Zeroable};

pub const NEAR: f32 = -10_000.0;
pub const FAR: f32 = 10_000.0;

/// Orthographic camera spanning `[0, width] x [0, height]` in logical
/// pixels with y pointing down, matching screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthographicCamera {
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// width, height, near, far
    pub viewport: [f32; 4],
    /// x: 1.0 when the render target expects linear colour
    pub flags: [f32; 4],
}

impl OrthographicCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            near: NEAR,
            far: FAR,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    pub fn uniform(&self, linear_target: bool) -> CameraUniform {
        CameraUniform {
            viewport: [self.width, self.height, self.near, self.far],
            flags: [if linear_target { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}
