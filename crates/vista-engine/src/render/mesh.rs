use std::fmt;

use wgpu::util::DeviceExt;

/// Errors raised while building a `MeshBuffer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Components per vertex outside `1..=4`.
    InvalidComponents(u32),
    /// Zero vertices requested.
    Empty,
    /// `vertices.len()` disagrees with `components * vertex_count`.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::InvalidComponents(n) => {
                write!(f, "vertex must have 1 to 4 float components, got {n}")
            }
            MeshError::Empty => write!(f, "mesh has no vertices"),
            MeshError::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} floats of vertex data, got {actual}")
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// Layout of a tightly packed `f32` position attribute at location 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    components: u32,
    attributes: [wgpu::VertexAttribute; 1],
}

impl VertexLayout {
    pub fn new(components: u32) -> Result<Self, MeshError> {
        let format = match components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            4 => wgpu::VertexFormat::Float32x4,
            n => return Err(MeshError::InvalidComponents(n)),
        };

        Ok(Self {
            components,
            attributes: [wgpu::VertexAttribute {
                format,
                offset: 0,
                shader_location: 0,
            }],
        })
    }

    /// 2D positions, the layout the built-in shader reads.
    pub fn position_2d() -> Self {
        Self {
            components: 2,
            attributes: wgpu::vertex_attr_array![0 => Float32x2],
        }
    }

    #[inline]
    pub fn components(&self) -> u32 {
        self.components
    }

    #[inline]
    pub fn format(&self) -> wgpu::VertexFormat {
        self.attributes[0].format
    }

    /// Bytes between consecutive vertices.
    #[inline]
    pub fn stride(&self) -> u64 {
        self.components as u64 * std::mem::size_of::<f32>() as u64
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    /// Checks that `len` floats hold exactly `vertex_count` vertices.
    pub fn validate(&self, vertex_count: u32, len: usize) -> Result<(), MeshError> {
        if vertex_count == 0 {
            return Err(MeshError::Empty);
        }

        let expected = self.components as usize * vertex_count as usize;
        if expected != len {
            return Err(MeshError::LengthMismatch { expected, actual: len });
        }

        Ok(())
    }
}

/// Immutable GPU vertex data: the buffer plus the layout used to read it.
///
/// Uploaded once at construction and never written again. Not `Clone`: the
/// buffer is released exactly once when the owner drops. Share it between
/// drawables through `Rc<MeshBuffer>`.
#[derive(Debug)]
pub struct MeshBuffer {
    buffer: wgpu::Buffer,
    layout: VertexLayout,
    vertex_count: u32,
}

impl MeshBuffer {
    /// Uploads `vertices` (`components_per_vertex` floats each) as a static
    /// vertex buffer bound at slot 0.
    pub fn new(
        device: &wgpu::Device,
        components_per_vertex: u32,
        vertex_count: u32,
        vertices: &[f32],
    ) -> Result<Self, MeshError> {
        let layout = VertexLayout::new(components_per_vertex)?;
        layout.validate(vertex_count, vertices.len())?;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vista mesh vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!(
            "uploaded mesh: {vertex_count} vertices x {components_per_vertex} components ({} bytes)",
            buffer.size()
        );

        Ok(Self {
            buffer,
            layout,
            vertex_count,
        })
    }

    /// Convenience for 2D point lists.
    pub fn from_points(device: &wgpu::Device, points: &[[f32; 2]]) -> Result<Self, MeshError> {
        Self::new(device, 2, points.len() as u32, bytemuck::cast_slice(points))
    }

    /// Makes this buffer the active vertex source (slot 0) for `pass`.
    #[inline]
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.buffer.slice(..));
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

impl Drop for MeshBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
        log::trace!("released mesh buffer ({} vertices)", self.vertex_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_formats_follow_component_count() {
        assert_eq!(VertexLayout::new(1).unwrap().format(), wgpu::VertexFormat::Float32);
        assert_eq!(VertexLayout::new(2).unwrap().format(), wgpu::VertexFormat::Float32x2);
        assert_eq!(VertexLayout::new(4).unwrap().format(), wgpu::VertexFormat::Float32x4);
        assert_eq!(VertexLayout::new(3).unwrap().stride(), 12);
    }

    #[test]
    fn position_2d_matches_generic_layout() {
        assert_eq!(VertexLayout::position_2d(), VertexLayout::new(2).unwrap());

        let layout = VertexLayout::position_2d();
        let buf = layout.buffer_layout();
        assert_eq!(buf.array_stride, 8);
        assert_eq!(buf.attributes.len(), 1);
        assert_eq!(buf.attributes[0].shader_location, 0);
        assert_eq!(buf.attributes[0].offset, 0);
    }

    #[test]
    fn rejects_bad_component_counts() {
        assert_eq!(VertexLayout::new(0), Err(MeshError::InvalidComponents(0)));
        assert_eq!(VertexLayout::new(5), Err(MeshError::InvalidComponents(5)));
    }

    #[test]
    fn validates_vertex_data_length() {
        let layout = VertexLayout::position_2d();
        assert_eq!(layout.validate(4, 8), Ok(()));
        assert_eq!(layout.validate(0, 0), Err(MeshError::Empty));
        assert_eq!(
            layout.validate(4, 7),
            Err(MeshError::LengthMismatch { expected: 8, actual: 7 })
        );
    }

    #[test]
    fn error_messages_name_the_problem() {
        let msg = MeshError::LengthMismatch { expected: 8, actual: 6 }.to_string();
        assert!(msg.contains('8') && msg.contains('6'));
        assert!(MeshError::InvalidComponents(7).to_string().contains('7'));
    }
}
