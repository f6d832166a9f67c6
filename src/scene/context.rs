use crate::io::config::Config;
use crate::pipeline::shaders::ocean::OceanUniforms;
use crate::procgen::normals::normalize_or;
use crate::procgen::terrain::RadialMeshParams;
use crate::scene::camera::Camera;
use crate::scene::graph::SceneGraph;
use crate::scene::objects::{
    AdjacentHills, Animated, Bridge, Headland, Ocean, SfHills, Starfield, Surfboards, SunsetLighting,
};
use crate::scene::objects::stars::StarCounts;
use nalgebra::{Point3, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Holds all scene resources required for rendering.
pub struct RenderContext {
    pub camera: Camera,
    pub graph: SceneGraph,
    pub lighting: SunsetLighting,
    pub ocean_uniforms: OceanUniforms,
    pub ocean: Option<Ocean>,
    pub headland: Option<Headland>,
    animated: Vec<Box<dyn Animated>>,
}

impl RenderContext {
    /// Builds every enabled object group. All random placement draws from one
    /// generator seeded with `scene.seed`, so a seed always gives the same bay.
    pub fn from_config(config: &Config) -> Self {
        let scene = &config.scene;
        let mut graph = SceneGraph::new();
        let mut rng = StdRng::seed_from_u64(scene.seed);
        let mut animated: Vec<Box<dyn Animated>> = Vec::new();

        let ocean_uniforms = ocean_uniforms_from(config);
        let ocean = scene
            .ocean
            .then(|| Ocean::build(&mut graph, None, &ocean_uniforms));

        if scene.bridge {
            animated.push(Box::new(Bridge::build(&mut graph, None)));
        }
        if scene.sf_hills {
            animated.push(Box::new(SfHills::build(&mut graph, None)));
        }
        if scene.adjacent_hills {
            animated.push(Box::new(AdjacentHills::build(&mut graph, None)));
        }
        let headland = scene
            .headland
            .then(|| Headland::build(&mut graph, None, &RadialMeshParams::headland()));
        if scene.stars {
            let counts = StarCounts {
                points: scene.star_points,
                bright: scene.star_bright,
                spheres: scene.star_spheres,
            };
            animated.push(Box::new(Starfield::build(&mut graph, None, counts, &mut rng)));
        }
        if scene.surfboards {
            animated.push(Box::new(Surfboards::build(
                &mut graph,
                None,
                scene.surfboard_count,
                &mut rng,
            )));
        }

        log::info!(
            "Scene built: {} nodes, {} animated groups (seed {})",
            graph.len(),
            animated.len(),
            scene.seed
        );

        Self {
            camera: Camera::from_config(
                &config.camera,
                config.render.width as f32 / config.render.height.max(1) as f32,
            ),
            graph,
            lighting: SunsetLighting::new(),
            ocean_uniforms,
            ocean,
            headland,
            animated,
        }
    }

    /// Poses the whole scene for `time` seconds on the scene clock.
    pub fn update(&mut self, time: f32) {
        self.lighting.update(time);
        if let Some(ocean) = &self.ocean {
            ocean.update(&mut self.ocean_uniforms, time);
        }
        for object in &self.animated {
            object.update(&mut self.graph, time);
        }
    }

    /// Where the shadow map is rendered from.
    pub fn shadow_light_pos(&self) -> Point3<f32> {
        self.lighting.sun_position
    }
}

fn ocean_uniforms_from(config: &Config) -> OceanUniforms {
    let o = &config.ocean;
    OceanUniforms {
        time: 0.0,
        water_color: Vector3::from(o.water_color),
        sun_direction: normalize_or(Vector3::from(o.sun_direction), -Vector3::y()),
        sky_color: Vector3::from(o.sky_color),
        horizon_color: Vector3::from(o.horizon_color),
        sun_color: Vector3::from(o.sun_color),
        opacity: o.opacity.clamp(0.0, 1.0),
        waves: o.waves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::graph::RenderKind;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.scene.star_points = 40;
        config.scene.star_bright = 4;
        config.scene.star_spheres = 2;
        config.scene.surfboard_count = 3;
        config
    }

    fn positions(graph: &SceneGraph) -> Vec<Point3<f32>> {
        graph
            .renderables()
            .iter()
            .filter(|(_, r)| matches!(r.kind, RenderKind::Points { .. }))
            .flat_map(|(_, r)| r.mesh.vertices.iter().map(|v| v.position))
            .collect()
    }

    #[test]
    fn test_default_scene_groups() {
        let ctx = RenderContext::from_config(&small_config());
        for name in ["ocean", "bridge", "sf_hills", "starfield", "surfboards"] {
            assert!(ctx.graph.find_by_name(name).is_some(), "missing {name}");
        }
        assert!(ctx.ocean.is_some());
        assert!(ctx.headland.is_none());
        let defaults = OceanUniforms::default();
        assert_eq!(ctx.ocean_uniforms.water_color, defaults.water_color);
        assert_eq!(ctx.ocean_uniforms.waves, defaults.waves);
        assert!((ctx.ocean_uniforms.sun_direction - defaults.sun_direction).norm() < 1e-6);
    }

    #[test]
    fn test_toggles_skip_groups() {
        let mut config = small_config();
        config.scene.bridge = false;
        config.scene.ocean = false;
        config.scene.stars = false;
        let ctx = RenderContext::from_config(&config);
        assert!(ctx.graph.find_by_name("bridge").is_none());
        assert!(ctx.graph.find_by_name("starfield").is_none());
        assert!(ctx.ocean.is_none());
    }

    #[test]
    fn test_seed_fixes_layout() {
        let a = RenderContext::from_config(&small_config());
        let b = RenderContext::from_config(&small_config());
        assert_eq!(positions(&a.graph), positions(&b.graph));

        let mut other = small_config();
        other.scene.seed = 7;
        let c = RenderContext::from_config(&other);
        assert_ne!(positions(&a.graph), positions(&c.graph));
    }

    #[test]
    fn test_update_advances_clock() {
        let mut ctx = RenderContext::from_config(&small_config());
        ctx.update(3.0);
        assert_eq!(ctx.ocean_uniforms.time, 3.0);
        let posed = ctx.graph.world_transforms();
        ctx.update(3.0);
        assert_eq!(posed, ctx.graph.world_transforms());
        assert_eq!(ctx.shadow_light_pos(), ctx.lighting.sun_position);
    }
}
