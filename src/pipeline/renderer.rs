use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Vector3};

/// How to reset the framebuffer before a pass.
#[derive(Debug, Clone, Copy)]
pub struct ClearOptions {
    pub color: Vector3<f32>,
    /// `(top, bottom)`. Takes precedence over `color`.
    pub gradient: Option<(Vector3<f32>, Vector3<f32>)>,
    pub depth: f32,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            color: Vector3::zeros(),
            gradient: None,
            depth: f32::INFINITY,
        }
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    /// Creates a new renderer.
    /// sample_count: 1 for no AA, 2 for 2x2 SSAA, etc.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height, sample_count),
        }
    }

    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color, f32::INFINITY);
    }

    pub fn clear_with_options(&mut self, options: ClearOptions) {
        match options.gradient {
            Some((top, bottom)) => self.framebuffer.clear_gradient(top, bottom, options.depth),
            None => self.framebuffer.clear(options.color, options.depth),
        }
    }

    /// Draws a mesh using the provided shader and material.
    pub fn draw_mesh<S: Shader>(&self, mesh: &Mesh, shader: &S, material: Option<&Material>) {
        let vertex_count = mesh.vertices.len();
        for chunk in mesh.indices.chunks_exact(3) {
            let (i0, i1, i2) = (chunk[0] as usize, chunk[1] as usize, chunk[2] as usize);
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                log::warn!("Skipping triangle with out-of-range index");
                continue;
            }

            let (pos0, var0) = shader.vertex(&mesh.vertices[i0]);
            let (pos1, var1) = shader.vertex(&mesh.vertices[i1]);
            let (pos2, var2) = shader.vertex(&mesh.vertices[i2]);

            self.rasterizer.rasterize_triangle(
                &self.framebuffer,
                shader,
                &[pos0, pos1, pos2],
                &[var0, var1, var2],
                material,
            );
        }
    }

    /// Splats every vertex of `mesh` as an additive point sprite.
    ///
    /// Sprites shrink with distance: `size` is the diameter in pixels at a
    /// view depth of half the output height.
    pub fn draw_points(
        &self,
        mesh: &Mesh,
        mvp: &Matrix4<f32>,
        size: f32,
        color: Vector3<f32>,
        opacity: f32,
    ) {
        let scale = self.framebuffer.height as f32 * 0.5;
        for vertex in &mesh.vertices {
            let clip = mvp * vertex.position.to_homogeneous();
            if clip.w <= 1e-6 {
                continue;
            }
            let size_px = size * scale / clip.w;
            let tint = color.component_mul(&vertex.color) * opacity;
            self.rasterizer
                .rasterize_point(&self.framebuffer, &clip, size_px, tint);
        }
    }
}
