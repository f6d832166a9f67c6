use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, is_inside_triangle, perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::{BlendMode, Interpolatable, Shader};
use crate::scene::material::Material;
use nalgebra::{Point2, Vector3, Vector4};
use rayon::prelude::*;

/// The Rasterizer is responsible for drawing geometric primitives onto the FrameBuffer.
pub struct Rasterizer {
    pub cull_mode: CullMode,
    pub wireframe: bool,
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum CullMode {
    Back,
    Front,
    None,
}

impl CullMode {
    /// Parses the config spelling ("back", "front", "none"); anything else is `Back`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "front" => CullMode::Front,
            "none" => CullMode::None,
            _ => CullMode::Back,
        }
    }
}

type ClipVertex<V> = (Vector4<f32>, V);

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
            wireframe: false,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Rasterize a single triangle given clip-space coordinates and corresponding varyings.
    ///
    /// Performs Sutherland–Hodgman clipping against the six `|x|,|y|,|z| <= w`
    /// planes in homogeneous clip space, then fans the clipped polygon.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
        material: Option<&Material>,
    ) {
        // A triangle clipped by a cube has at most 9 vertices.
        let mut current_poly: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);
        let mut clip_buffer: Vec<ClipVertex<S::Varying>> = Vec::with_capacity(16);

        for i in 0..3 {
            current_poly.push((clip_coords[i], varyings[i]));
        }

        // (Axis Index, Sign): Sign * P[Axis] <= P.w
        let planes = [
            (0, 1.0),
            (0, -1.0),
            (1, 1.0),
            (1, -1.0),
            (2, 1.0),
            (2, -1.0),
        ];

        for &(axis, sign) in &planes {
            if current_poly.is_empty() {
                return;
            }
            Self::clip_polygon_against_plane(&current_poly, &mut clip_buffer, axis, sign);
            std::mem::swap(&mut current_poly, &mut clip_buffer);
        }

        if current_poly.len() < 3 {
            return;
        }

        let v0 = current_poly[0];
        for i in 1..(current_poly.len() - 1) {
            let v1 = current_poly[i];
            let v2 = current_poly[i + 1];

            self.rasterize_triangle_clipped(
                framebuffer,
                shader,
                &[v0.0, v1.0, v2.0],
                &[v0.1, v1.1, v2.1],
                material,
            );
        }
    }

    /// Clips a polygon against a specific plane, writing into `output` (cleared first).
    fn clip_polygon_against_plane<V: Interpolatable>(
        input: &[ClipVertex<V>],
        output: &mut Vec<ClipVertex<V>>,
        axis: usize,
        sign: f32,
    ) {
        output.clear();

        let Some(&last) = input.last() else {
            return;
        };

        let is_inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + 1e-6;

        let mut prev = last;
        let mut prev_inside = is_inside(&prev.0);

        for curr in input {
            let curr_inside = is_inside(&curr.0);

            if curr_inside {
                if !prev_inside
                    && let Some(inter) = Self::intersect_edge_plane(prev, *curr, axis, sign)
                {
                    output.push(inter);
                }
                output.push(*curr);
            } else if prev_inside
                && let Some(inter) = Self::intersect_edge_plane(prev, *curr, axis, sign)
            {
                output.push(inter);
            }

            prev = *curr;
            prev_inside = curr_inside;
        }
    }

    /// Computes the intersection of a segment and a clip plane, interpolating
    /// both position and varying.
    #[inline(always)]
    fn intersect_edge_plane<V: Interpolatable>(
        a: ClipVertex<V>,
        b: ClipVertex<V>,
        axis: usize,
        sign: f32,
    ) -> Option<ClipVertex<V>> {
        let ac = a.0[axis];
        let bc = b.0[axis];
        let aw = a.0.w;
        let bw = b.0.w;

        let denom = sign * (bc - ac) - (bw - aw);
        if denom.abs() < 1e-9 {
            return None;
        }

        let t = (aw - sign * ac) / denom;
        if !t.is_finite() {
            return None;
        }

        let pos = a.0 + (b.0 - a.0) * t;
        let vary = a.1 * (1.0 - t) + b.1 * t;

        Some((pos, vary))
    }

    /// Rasterizes a triangle already inside the frustum: perspective division,
    /// viewport transform, culling, and the per-pixel loop.
    fn rasterize_triangle_clipped<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
        material: Option<&Material>,
    ) {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;
        let inv_samples = 1.0 / framebuffer.sample_count as f32;

        let mut screen_coords = [Point2::origin(); 3];
        let mut w_values = [0.0; 3];

        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return;
            }

            let ndc = apply_perspective_division(&clip_coords[i]);
            w_values[i] = clip_coords[i].w;
            screen_coords[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
        }

        // Screen Y points down, so counter-clockwise triangles have negative area here.
        let v0 = screen_coords[0];
        let v1 = screen_coords[1];
        let v2 = screen_coords[2];
        let edge1 = v1 - v0;
        let edge2 = v2 - v1;
        let signed_area = edge1.x * edge2.y - edge1.y * edge2.x;

        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return,
            CullMode::Front if signed_area <= 0.0 => return,
            _ => {}
        }

        let (min_x, min_y, max_x, max_y) = Self::compute_bounding_box(&screen_coords);

        // Scissor Test
        if max_x < 0
            || max_y < 0
            || min_x >= framebuffer.buffer_width as i32
            || min_y >= framebuffer.buffer_height as i32
        {
            return;
        }

        let start_x = min_x.max(0) as usize;
        let end_x = (max_x.min(framebuffer.buffer_width as i32 - 1)) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = (max_y.min(framebuffer.buffer_height as i32 - 1)) as usize;

        let blend = shader.blend_mode();

        // Rayon work-stealing handles the uneven row lengths well.
        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let Some(bary) = barycentric_coordinates(
                    pixel_center,
                    screen_coords[0],
                    screen_coords[1],
                    screen_coords[2],
                ) else {
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }

                if self.wireframe {
                    let threshold = 0.02;
                    if bary.x > threshold && bary.y > threshold && bary.z > threshold {
                        continue;
                    }
                }

                let Some(corrected_bary) =
                    perspective_correct_barycentric(bary, w_values[0], w_values[1], w_values[2])
                else {
                    continue;
                };

                let z_clip = corrected_bary.x * clip_coords[0].z
                    + corrected_bary.y * clip_coords[1].z
                    + corrected_bary.z * clip_coords[2].z;
                let w_clip = corrected_bary.x * w_values[0]
                    + corrected_bary.y * w_values[1]
                    + corrected_bary.z * w_values[2];
                let depth = (z_clip / w_clip) * 0.5 + 0.5;

                let passed = match blend {
                    BlendMode::Additive => framebuffer.depth_test(x, y, depth),
                    _ => framebuffer.depth_test_and_update(x, y, depth),
                };
                if !passed {
                    continue;
                }

                let interpolated_varying = varyings[0] * corrected_bary.x
                    + varyings[1] * corrected_bary.y
                    + varyings[2] * corrected_bary.z;

                let frag_coord = Point2::new(pixel_center.x * inv_samples, pixel_center.y * inv_samples);
                let color = shader.fragment(interpolated_varying, material, frag_coord);
                if !color.iter().all(|c| c.is_finite()) {
                    continue;
                }

                match blend {
                    BlendMode::Opaque => framebuffer.set_pixel_safe(x, y, color),
                    BlendMode::Alpha(alpha) => framebuffer.blend_pixel_safe(x, y, color, alpha),
                    BlendMode::Additive => framebuffer.add_pixel_safe(x, y, color),
                }
            }
        });
    }

    /// Splats a round, soft-edged point sprite additively.
    ///
    /// `size_px` is the sprite diameter in output pixels. The sprite is opaque
    /// out to 20% of its radius and fades linearly to the rim, like a radial
    /// gradient texture. Depth is tested but not written.
    pub fn rasterize_point(
        &self,
        framebuffer: &FrameBuffer,
        clip: &Vector4<f32>,
        size_px: f32,
        color: Vector3<f32>,
    ) {
        if clip.w <= 1e-6 {
            return;
        }
        let ndc = apply_perspective_division(clip);
        if !(-1.0..=1.0).contains(&ndc.z) {
            return;
        }

        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;
        let center = ndc_to_screen(ndc.x, ndc.y, width, height);
        let radius = (size_px * framebuffer.sample_count as f32 * 0.5).max(0.5);
        let depth = ndc.z * 0.5 + 0.5;

        let min_x = (center.x - radius).floor().max(0.0) as i64;
        let max_x = (center.x + radius).ceil().min(width - 1.0) as i64;
        let min_y = (center.y - radius).floor().max(0.0) as i64;
        let max_y = (center.y + radius).ceil().min(height - 1.0) as i64;
        if max_x < min_x || max_y < min_y {
            return;
        }

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                let d = (dx * dx + dy * dy).sqrt() / radius;
                if d >= 1.0 {
                    continue;
                }
                let falloff = if d < 0.2 { 1.0 } else { 1.0 - (d - 0.2) / 0.8 };

                let (ux, uy) = (x as usize, y as usize);
                if framebuffer.depth_test(ux, uy, depth) {
                    framebuffer.add_pixel_safe(ux, uy, color * falloff);
                }
            }
        }
    }

    fn compute_bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
        let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
        let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
        (min_x, min_y, max_x, max_y)
    }
}
