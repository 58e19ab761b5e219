//! Caller-owned vertex accumulator.

use glam::{Mat4, Vec4};

use crate::vertex::Vertex;

/// Triangle-list vertices for one draw call.
///
/// Each batch is owned by whoever lays text into it; layout calls writing to
/// different batches share nothing and may run concurrently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(glyphs: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(glyphs * 6),
        }
    }

    /// Append two triangles covering the screen rectangle `quad`
    /// (`[x0, y0, x1, y1]`) textured with `uv` (`[u0, v0, u1, v1]`).
    /// Corners pass through `transform` before they are stored.
    pub fn push_quad(&mut self, quad: [f32; 4], uv: [f32; 4], color: [f32; 4], transform: &Mat4) {
        let [x0, y0, x1, y1] = quad;
        let [u0, v0, u1, v1] = uv;
        let corner = |x: f32, y: f32, u: f32, v: f32| {
            let p = *transform * Vec4::new(x, y, 0.0, 1.0);
            Vertex {
                position: [p.x, p.y, p.z],
                color,
                tex_coords: [u, v],
            }
        };
        let top_left = corner(x0, y0, u0, v0);
        let top_right = corner(x1, y0, u1, v0);
        let bottom_right = corner(x1, y1, u1, v1);
        let bottom_left = corner(x0, y1, u0, v1);
        self.vertices.extend_from_slice(&[
            top_left,
            top_right,
            bottom_right,
            top_left,
            bottom_right,
            bottom_left,
        ]);
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw bytes for `Queue::write_buffer`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
