use std::rc::Rc;

use wgpu::util::DeviceExt;

use super::mesh::{MeshBuffer, VertexLayout};

/// Something that can issue a draw call against GPU-resident vertices.
///
/// The renderer picks (or builds) a pipeline for `topology` and
/// `vertex_layout`, binds the view uniforms, then calls `draw`.
pub trait Drawable {
    fn topology(&self) -> wgpu::PrimitiveTopology;

    fn vertex_layout(&self) -> VertexLayout;

    /// Number of vertices in the underlying mesh.
    fn vertex_count(&self) -> u32;

    /// Binds the mesh and records the draw into `pass`.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Shape variants selectable at construction time.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ShapeKind {
    /// Closed outline through every vertex.
    #[default]
    Outline,
    /// Filled convex polygon.
    Filled,
    /// Open polyline.
    Strip,
}

impl std::str::FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outline" => Ok(ShapeKind::Outline),
            "filled" => Ok(ShapeKind::Filled),
            "strip" => Ok(ShapeKind::Strip),
            other => Err(format!("unknown shape kind `{other}` (expected outline, filled or strip)")),
        }
    }
}

/// Builds the drawable for `kind` over a shared mesh.
pub fn build_shape(kind: ShapeKind, device: &wgpu::Device, mesh: Rc<MeshBuffer>) -> Box<dyn Drawable> {
    match kind {
        ShapeKind::Outline => Box::new(OutlineShape::new(device, mesh)),
        ShapeKind::Filled => Box::new(FilledShape::new(device, mesh)),
        ShapeKind::Strip => Box::new(StripShape::new(mesh)),
    }
}

/// `0, 1, .., n-1, 0`: a line strip that closes back on the first vertex.
pub fn loop_indices(vertex_count: u32) -> Vec<u32> {
    if vertex_count == 0 {
        return Vec::new();
    }
    (0..vertex_count).chain(std::iter::once(0)).collect()
}

/// Triangle-list fan around vertex 0. Empty for fewer than three vertices.
pub fn fan_indices(vertex_count: u32) -> Vec<u32> {
    (1..vertex_count.saturating_sub(1))
        .flat_map(|i| [0, i, i + 1])
        .collect()
}

fn index_buffer(device: &wgpu::Device, label: &str, indices: &[u32]) -> Option<wgpu::Buffer> {
    if indices.is_empty() {
        return None;
    }

    Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    }))
}

// ── outline ───────────────────────────────────────────────────────────────

/// Closed outline of the mesh (the shape's edge loop).
///
/// wgpu has no line-loop topology; the loop is a line strip over an index
/// list that repeats the first vertex.
pub struct OutlineShape {
    mesh: Rc<MeshBuffer>,
    indices: Option<wgpu::Buffer>,
    index_count: u32,
}

impl OutlineShape {
    pub fn new(device: &wgpu::Device, mesh: Rc<MeshBuffer>) -> Self {
        let indices = loop_indices(mesh.vertex_count());
        Self {
            index_count: indices.len() as u32,
            indices: index_buffer(device, "vista outline ibo", &indices),
            mesh,
        }
    }
}

impl Drawable for OutlineShape {
    fn topology(&self) -> wgpu::PrimitiveTopology {
        wgpu::PrimitiveTopology::LineStrip
    }

    fn vertex_layout(&self) -> VertexLayout {
        self.mesh.layout()
    }

    fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(indices) = self.indices.as_ref() else { return };
        self.mesh.bind(pass);
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

// ── filled ────────────────────────────────────────────────────────────────

/// Filled polygon, triangulated as a fan. Correct for convex outlines.
pub struct FilledShape {
    mesh: Rc<MeshBuffer>,
    indices: Option<wgpu::Buffer>,
    index_count: u32,
}

impl FilledShape {
    pub fn new(device: &wgpu::Device, mesh: Rc<MeshBuffer>) -> Self {
        let indices = fan_indices(mesh.vertex_count());
        if indices.is_empty() {
            log::warn!("filled shape needs at least 3 vertices; nothing will be drawn");
        }
        Self {
            index_count: indices.len() as u32,
            indices: index_buffer(device, "vista fill ibo", &indices),
            mesh,
        }
    }
}

impl Drawable for FilledShape {
    fn topology(&self) -> wgpu::PrimitiveTopology {
        wgpu::PrimitiveTopology::TriangleList
    }

    fn vertex_layout(&self) -> VertexLayout {
        self.mesh.layout()
    }

    fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(indices) = self.indices.as_ref() else { return };
        self.mesh.bind(pass);
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

// ── strip ─────────────────────────────────────────────────────────────────

/// Open polyline through the vertices in order.
pub struct StripShape {
    mesh: Rc<MeshBuffer>,
}

impl StripShape {
    pub fn new(mesh: Rc<MeshBuffer>) -> Self {
        Self { mesh }
    }
}

impl Drawable for StripShape {
    fn topology(&self) -> wgpu::PrimitiveTopology {
        wgpu::PrimitiveTopology::LineStrip
    }

    fn vertex_layout(&self) -> VertexLayout {
        self.mesh.layout()
    }

    fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.mesh.bind(pass);
        pass.draw(0..self.mesh.vertex_count(), 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_closes_on_first_vertex() {
        assert_eq!(loop_indices(4), vec![0, 1, 2, 3, 0]);
        assert_eq!(loop_indices(1), vec![0, 0]);
        assert!(loop_indices(0).is_empty());
    }

    #[test]
    fn fan_covers_convex_polygon() {
        assert_eq!(fan_indices(4), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(fan_indices(3), vec![0, 1, 2]);
        assert_eq!(fan_indices(6).len(), 3 * 4);
    }

    #[test]
    fn fan_is_empty_below_a_triangle() {
        assert!(fan_indices(0).is_empty());
        assert!(fan_indices(1).is_empty());
        assert!(fan_indices(2).is_empty());
    }

    #[test]
    fn shape_kind_parses_names() {
        assert_eq!("filled".parse::<ShapeKind>(), Ok(ShapeKind::Filled));
        assert_eq!("outline".parse::<ShapeKind>(), Ok(ShapeKind::Outline));
        assert!("hexagon".parse::<ShapeKind>().is_err());
        assert_eq!(ShapeKind::default(), ShapeKind::Outline);
    }
}
