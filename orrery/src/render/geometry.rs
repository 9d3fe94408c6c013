use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

use crate::framework::math::{Rgba, Vec3, rotate_xy};
use crate::scene::controller::SceneController;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: Vec3,
    pub color: Rgba,
}

impl LineVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Latitude rings and meridians of a unit sphere, as line segments.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    edges: Vec<[Vec3; 2]>,
}

impl SphereMesh {
    pub fn new(width_segments: u32, height_segments: u32) -> Self {
        let w = width_segments.max(3);
        let h = height_segments.max(2);

        let point = |ix: u32, iy: u32| -> Vec3 {
            let u = ix as f32 / w as f32 * 2.0 * PI;
            let v = iy as f32 / h as f32 * PI;
            [-u.cos() * v.sin(), v.cos(), u.sin() * v.sin()]
        };

        let mut edges = Vec::with_capacity(((h - 1) * w + h * w) as usize);

        // Rings, skipping the degenerate ones at the poles.
        for iy in 1..h {
            for ix in 0..w {
                edges.push([point(ix, iy), point(ix + 1, iy)]);
            }
        }

        for ix in 0..w {
            for iy in 0..h {
                edges.push([point(ix, iy), point(ix, iy + 1)]);
            }
        }

        Self { edges }
    }

    pub fn edges(&self) -> &[[Vec3; 2]] {
        &self.edges
    }
}

/// Flatten a scene into line-list vertices in this window's screen space.
pub fn scene_vertices(
    scene: &SceneController,
    mesh: &SphereMesh,
) -> Vec<LineVertex> {
    let [ox, oy] = scene.world_offset();
    let planets = scene.planets();
    let lines = scene.lines();

    let mut vertices = Vec::with_capacity(
        planets.len() * mesh.edges.len() * 2 + lines.len() * 2,
    );

    for planet in planets {
        let [px, py] = planet.position;
        let [rx, ry] = planet.rotation;
        let r = planet.radius;

        for edge in &mesh.edges {
            for p in edge {
                let scaled = [p[0] * r, p[1] * r, p[2] * r];
                let [x, y, z] = rotate_xy(scaled, rx, ry);
                vertices.push(LineVertex {
                    position: [x + px + ox, y + py + oy, z],
                    color: planet.color,
                });
            }
        }
    }

    for line in lines {
        for [x, y] in [line.start, line.end] {
            vertices.push(LineVertex {
                position: [x + ox, y + oy, 0.0],
                color: line.color,
            });
        }
    }

    vertices
}
