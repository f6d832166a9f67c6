use crate::core::geometry::Vertex;
use crate::scene::material::Material;
use nalgebra::{Point2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination (a + b * t) used by barycentric interpolation.
/// - Send + Sync: safe to use from multiple threads during parallel rasterization.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl Interpolatable for Vector3<f32> {}

/// How a shaded fragment is combined with what is already in the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendMode {
    /// Overwrite color, write depth.
    Opaque,
    /// Source-over with a constant alpha, write depth.
    Alpha(f32),
    /// Add to the stored color, depth-tested but not written.
    Additive,
}

/// Shader represents the programmable stages of the pipeline.
///
/// Implementations must be thread-safe (Send + Sync) because shading may be invoked
/// concurrently across fragments.
///
/// Associated types:
/// - Varying: per-vertex outputs from the vertex stage that will be interpolated
///   for each fragment. Varying must be Interpolatable to support barycentric interpolation.
pub trait Shader: Send + Sync {
    /// Per-vertex varying data to be interpolated and provided to the fragment shader.
    type Varying: Interpolatable;

    /// Vertex shader stage.
    ///
    /// Transforms the given vertex into homogeneous clip space (Vector4<f32>) used by
    /// clipping and perspective divide. Also returns the varying data associated with
    /// that vertex which will be interpolated across the primitive.
    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying);

    /// Fragment shader stage.
    ///
    /// Computes the final linear RGB color for the current fragment.
    ///
    /// `frag_coord` is the fragment's window position in output pixels (sample
    /// centers divided by the supersampling factor), matching what a GPU exposes
    /// as the fragment coordinate.
    fn fragment(
        &self,
        varying: Self::Varying,
        material: Option<&Material>,
        frag_coord: Point2<f32>,
    ) -> Vector3<f32>;

    fn blend_mode(&self) -> BlendMode {
        BlendMode::Opaque
    }
}
