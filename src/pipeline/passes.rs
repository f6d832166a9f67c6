use crate::core::color::{aces_tone_mapping, linear_to_srgb, srgb_to_linear};
use crate::core::framebuffer::FrameBuffer;
use crate::core::math::transform::TransformFactory;
use crate::core::rasterizer::CullMode;
use crate::io::config::Config;
use crate::pipeline::renderer::{ClearOptions, Renderer};
use crate::pipeline::shaders::lit::{LitShader, ShadowMap};
use crate::pipeline::shaders::ocean::OceanShader;
use crate::pipeline::shaders::shadow::ShadowShader;
use crate::pipeline::shaders::unlit::UnlitShader;
use crate::procgen::normals::normalize_or;
use crate::scene::context::RenderContext;
use crate::scene::graph::{RenderKind, Renderable};
use nalgebra::{Matrix4, Point3, Vector3};
use rayon::prelude::*;
use std::sync::Arc;

/// Executes the Shadow Mapping Pass.
///
/// Renders every shadow-casting node into an orthographic depth map looking
/// from the sun toward the origin.
pub fn render_shadow_pass(
    config: &Config,
    context: &RenderContext,
    shadow_renderer: &mut Renderer,
) -> Option<ShadowMap> {
    if !config.render.use_shadows {
        return None;
    }

    // Only the sun's bearing matters; the depth camera sits halfway down the range.
    let light_target = Point3::new(0.0, 0.0, 0.0);
    let bearing = normalize_or(context.shadow_light_pos().coords, Vector3::y());
    let light_pos = light_target + bearing * (config.render.shadow_far * 0.5);
    let light_dir = -bearing;
    let light_up = if light_dir.y.abs() > 0.9 {
        Vector3::z()
    } else {
        Vector3::y()
    };

    let light_view = TransformFactory::view(&light_pos, &light_target, &light_up);
    let ortho_size = config.render.shadow_ortho_size;
    let light_proj = TransformFactory::orthographic(
        -ortho_size,
        ortho_size,
        -ortho_size,
        ortho_size,
        config.render.shadow_near,
        config.render.shadow_far,
    );
    let light_space_matrix = light_proj * light_view;

    shadow_renderer.clear_with_options(ClearOptions {
        depth: f32::INFINITY,
        ..Default::default()
    });
    shadow_renderer.rasterizer.set_cull_mode(CullMode::None);

    for (model, renderable) in context.graph.renderables() {
        if !renderable.cast_shadow {
            continue;
        }
        let shader = ShadowShader::new(model, light_space_matrix);
        shadow_renderer.draw_mesh(&renderable.mesh, &shader, None);
    }

    Some(ShadowMap {
        depth: Arc::new(shadow_renderer.framebuffer.depth_values()),
        size: shadow_renderer.framebuffer.buffer_width,
        light_space_matrix,
        bias: config.render.shadow_bias,
        use_pcf: config.render.use_pcf,
        pcf_kernel_size: config.render.pcf_kernel_size,
    })
}

/// Solids first, then the water over them, then the sky layers.
fn draw_order(kind: RenderKind) -> u8 {
    match kind {
        RenderKind::Lit => 0,
        RenderKind::Ocean => 1,
        RenderKind::Unlit => 2,
        RenderKind::Points { .. } => 3,
    }
}

fn background(config: &Config) -> ClearOptions {
    let r = &config.render;
    let gradient = match (r.background_gradient_top, r.background_gradient_bottom) {
        (Some(top), Some(bottom)) => Some((
            srgb_to_linear(Vector3::from(top)),
            srgb_to_linear(Vector3::from(bottom)),
        )),
        _ => None,
    };
    ClearOptions {
        color: srgb_to_linear(Vector3::from(r.background_color)),
        gradient,
        depth: f32::INFINITY,
    }
}

/// Executes the Main Rendering Pass.
pub fn render_main_pass(
    config: &Config,
    context: &RenderContext,
    renderer: &mut Renderer,
    shadow_map: Option<ShadowMap>,
) {
    renderer.clear_with_options(background(config));

    let base_cull = CullMode::from_name(&config.render.cull_mode);
    renderer.rasterizer.wireframe = config.render.wireframe;

    let camera = &context.camera;
    let view = camera.view_matrix();
    let projection = camera.projection_matrix();

    let mut drawables = context.graph.renderables();
    drawables.sort_by_key(|(_, r)| draw_order(r.kind));

    for (model, renderable) in drawables {
        let cull = if renderable.material.double_sided {
            CullMode::None
        } else {
            base_cull
        };
        renderer.rasterizer.set_cull_mode(cull);
        draw_renderable(context, renderer, model, renderable, view, projection, &shadow_map);
    }
}

fn draw_renderable(
    context: &RenderContext,
    renderer: &Renderer,
    model: Matrix4<f32>,
    renderable: &Renderable,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    shadow_map: &Option<ShadowMap>,
) {
    let material = &renderable.material;
    let camera_pos = context.camera.position;

    match renderable.kind {
        RenderKind::Lit => {
            let mut shader = LitShader::new(model, view, projection, camera_pos);
            shader.lights = context.lighting.lights.clone();
            shader.shadow_light = Some(context.lighting.sun_index());
            shader.shadow_map = shadow_map.clone();
            shader.opacity = material.opacity;
            renderer.draw_mesh(&renderable.mesh, &shader, Some(material));
        }
        RenderKind::Ocean => {
            let shader =
                OceanShader::new(model, view, projection, camera_pos, context.ocean_uniforms.clone());
            renderer.draw_mesh(&renderable.mesh, &shader, Some(material));
        }
        RenderKind::Unlit => {
            let shader = UnlitShader::new(projection * view * model, material.opacity);
            renderer.draw_mesh(&renderable.mesh, &shader, Some(material));
        }
        RenderKind::Points { size } => {
            renderer.draw_points(
                &renderable.mesh,
                &(projection * view * model),
                size,
                material.color,
                material.opacity,
            );
        }
    }
}

/// Post-processing: Tone Mapping -> Gamma Correction -> u32 Buffer.
pub fn post_process_to_buffer(framebuffer: &FrameBuffer, buffer: &mut [u32], config: &Config) {
    buffer
        .par_chunks_mut(framebuffer.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                if let Some(color) = framebuffer.get_pixel(x, y) {
                    let exposed = color * config.render.exposure;
                    let mapped = if config.render.use_aces {
                        aces_tone_mapping(exposed)
                    } else {
                        exposed
                    };
                    let srgb = linear_to_srgb(mapped);

                    let r = (srgb.x.clamp(0.0, 1.0) * 255.0) as u32;
                    let g = (srgb.y.clamp(0.0, 1.0) * 255.0) as u32;
                    let b = (srgb.z.clamp(0.0, 1.0) * 255.0) as u32;

                    *pixel = (255 << 24) | (r << 16) | (g << 8) | b;
                } else {
                    *pixel = 0;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_scene_config() -> Config {
        let mut config = Config::default();
        config.render.width = 16;
        config.render.height = 9;
        config.render.samples = 1;
        config.render.shadow_map_size = 32;
        let s = &mut config.scene;
        s.ocean = false;
        s.bridge = false;
        s.sf_hills = false;
        s.adjacent_hills = false;
        s.stars = false;
        s.surfboards = false;
        config
    }

    #[test]
    fn test_shadow_pass_disabled() {
        let mut config = empty_scene_config();
        config.render.use_shadows = false;
        let ctx = RenderContext::from_config(&config);
        let mut shadow = Renderer::new(32, 32, 1);
        assert!(render_shadow_pass(&config, &ctx, &mut shadow).is_none());
    }

    #[test]
    fn test_shadow_map_matches_renderer() {
        let mut config = empty_scene_config();
        config.scene.bridge = true;
        let ctx = RenderContext::from_config(&config);
        let mut shadow = Renderer::new(32, 32, 1);
        let map = render_shadow_pass(&config, &ctx, &mut shadow).unwrap();
        assert_eq!(map.size, 32);
        assert_eq!(map.depth.len(), 32 * 32);
        // the bridge lands somewhere in the sun's view
        assert!(map.depth.iter().any(|d| d.is_finite()));
    }

    #[test]
    fn test_empty_scene_is_background() {
        let config = empty_scene_config();
        let ctx = RenderContext::from_config(&config);
        let mut renderer = Renderer::new(16, 9, 1);
        render_main_pass(&config, &ctx, &mut renderer, None);

        let expected = srgb_to_linear(Vector3::from(config.render.background_color));
        for y in 0..9 {
            for x in 0..16 {
                let c = renderer.framebuffer.get_pixel(x, y).unwrap();
                assert!((c - expected).norm() < 1e-6);
            }
        }

        let mut buffer = vec![0u32; 16 * 9];
        post_process_to_buffer(&renderer.framebuffer, &mut buffer, &config);
        assert!(buffer.iter().all(|p| p >> 24 == 255));
        assert!(buffer.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_draw_order() {
        assert!(draw_order(RenderKind::Lit) < draw_order(RenderKind::Ocean));
        assert!(draw_order(RenderKind::Ocean) < draw_order(RenderKind::Points { size: 1.0 }));
    }
}
