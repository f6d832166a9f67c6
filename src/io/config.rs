use crate::error::SceneError;
use crate::pipeline::shaders::ocean::WaveParams;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Everything the renderer reads from `scene.toml`. Every section and field
/// is optional; missing values take the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub ocean: OceanConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    // --- Output & Quality ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_exposure")]
    pub exposure: f32,
    #[serde(default = "default_true")]
    pub use_aces: bool,

    // --- Background (display-space RGB) ---
    #[serde(default = "default_background")]
    pub background_color: [f32; 3],
    pub background_gradient_top: Option<[f32; 3]>,
    pub background_gradient_bottom: Option<[f32; 3]>,

    // --- Shadow System ---
    #[serde(default = "default_true")]
    pub use_shadows: bool,
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: usize,
    #[serde(default = "default_shadow_ortho_size")]
    pub shadow_ortho_size: f32,
    #[serde(default = "default_shadow_near")]
    pub shadow_near: f32,
    #[serde(default = "default_shadow_far")]
    pub shadow_far: f32,
    #[serde(default = "default_shadow_bias")]
    pub shadow_bias: f32,
    #[serde(default = "default_true")]
    pub use_pcf: bool,
    #[serde(default = "default_pcf_kernel")]
    pub pcf_kernel_size: i32,

    // --- Pipeline & Debug ---
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"
    #[serde(default = "default_false")]
    pub wireframe: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            samples: default_samples(),
            exposure: default_exposure(),
            use_aces: true,
            background_color: default_background(),
            background_gradient_top: None,
            background_gradient_bottom: None,
            use_shadows: true,
            shadow_map_size: default_shadow_map_size(),
            shadow_ortho_size: default_shadow_ortho_size(),
            shadow_near: default_shadow_near(),
            shadow_far: default_shadow_far(),
            shadow_bias: default_shadow_bias(),
            use_pcf: true,
            pcf_kernel_size: default_pcf_kernel(),
            cull_mode: default_cull_mode(),
            wireframe: false,
        }
    }
}

fn default_width() -> usize {
    1280
}
fn default_height() -> usize {
    720
}
fn default_samples() -> usize {
    2
}
fn default_exposure() -> f32 {
    1.0
}
fn default_background() -> [f32; 3] {
    // #1a2a6c
    [26.0 / 255.0, 42.0 / 255.0, 108.0 / 255.0]
}
fn default_shadow_map_size() -> usize {
    2048
}
fn default_shadow_ortho_size() -> f32 {
    50.0
}
fn default_shadow_near() -> f32 {
    0.5
}
fn default_shadow_far() -> f32 {
    100.0
}
fn default_shadow_bias() -> f32 {
    0.005
}
fn default_pcf_kernel() -> i32 {
    1
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_camera_target")]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: default_camera_target(),
            up: default_up(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 3.0, 8.0]
}
fn default_camera_target() -> [f32; 3] {
    [0.0, 3.0, -1.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    75.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    1000.0
}

/// Water colors (display-space RGB) and wave shape.
#[derive(Debug, Clone, Deserialize)]
pub struct OceanConfig {
    #[serde(default = "default_water_color")]
    pub water_color: [f32; 3],
    /// Direction the sunlight travels; normalized on load.
    #[serde(default = "default_sun_direction")]
    pub sun_direction: [f32; 3],
    #[serde(default = "default_sky_color")]
    pub sky_color: [f32; 3],
    #[serde(default = "default_horizon_color")]
    pub horizon_color: [f32; 3],
    #[serde(default = "default_sun_color")]
    pub sun_color: [f32; 3],
    #[serde(default = "default_ocean_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub waves: WaveParams,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            water_color: default_water_color(),
            sun_direction: default_sun_direction(),
            sky_color: default_sky_color(),
            horizon_color: default_horizon_color(),
            sun_color: default_sun_color(),
            opacity: default_ocean_opacity(),
            waves: WaveParams::default(),
        }
    }
}

fn default_water_color() -> [f32; 3] {
    [0.1, 0.2, 0.4]
}
fn default_sun_direction() -> [f32; 3] {
    [0.5, -0.5, -0.5]
}
fn default_sky_color() -> [f32; 3] {
    [0.5, 0.7, 1.0]
}
fn default_horizon_color() -> [f32; 3] {
    [1.0, 0.6, 0.3]
}
fn default_sun_color() -> [f32; 3] {
    [1.0, 0.8, 0.6]
}
fn default_ocean_opacity() -> f32 {
    0.85
}

/// Which object groups to build, and the seed for everything placed at
/// random.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_true")]
    pub ocean: bool,
    #[serde(default = "default_true")]
    pub bridge: bool,
    #[serde(default = "default_true")]
    pub sf_hills: bool,
    #[serde(default = "default_true")]
    pub adjacent_hills: bool,
    #[serde(default = "default_false")]
    pub headland: bool,
    #[serde(default = "default_true")]
    pub stars: bool,
    #[serde(default = "default_true")]
    pub surfboards: bool,
    #[serde(default = "default_star_points")]
    pub star_points: usize,
    #[serde(default = "default_star_bright")]
    pub star_bright: usize,
    #[serde(default = "default_star_spheres")]
    pub star_spheres: usize,
    #[serde(default = "default_surfboard_count")]
    pub surfboard_count: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            ocean: true,
            bridge: true,
            sf_hills: true,
            adjacent_hills: true,
            headland: false,
            stars: true,
            surfboards: true,
            star_points: default_star_points(),
            star_bright: default_star_bright(),
            star_spheres: default_star_spheres(),
            surfboard_count: default_surfboard_count(),
        }
    }
}

fn default_seed() -> u64 {
    42
}
fn default_star_points() -> usize {
    1000
}
fn default_star_bright() -> usize {
    50
}
fn default_star_spheres() -> usize {
    20
}
fn default_surfboard_count() -> usize {
    12
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Scene clock at the first frame, in seconds.
    #[serde(default)]
    pub start_time: f32,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            fps: default_fps(),
            start_time: 0.0,
            output_dir: default_output_dir(),
        }
    }
}

fn default_frames() -> usize {
    1
}
fn default_fps() -> f32 {
    30.0
}
fn default_output_dir() -> String {
    "output".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Write the ambient WAVs next to the frames.
    #[serde(default = "default_false")]
    pub enabled: bool,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_ocean_seconds")]
    pub ocean_seconds: f32,
    #[serde(default = "default_wind_seconds")]
    pub wind_seconds: f32,
    #[serde(default = "default_ambience_seconds")]
    pub ambience_seconds: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: default_sample_rate(),
            ocean_seconds: default_ocean_seconds(),
            wind_seconds: default_wind_seconds(),
            ambience_seconds: default_ambience_seconds(),
        }
    }
}

fn default_sample_rate() -> u32 {
    44_100
}
fn default_ocean_seconds() -> f32 {
    15.0
}
fn default_wind_seconds() -> f32 {
    20.0
}
fn default_ambience_seconds() -> f32 {
    25.0
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SceneError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path` when given, falling back to defaults (with a warning) when
    /// it cannot be read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("No config given, using defaults");
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from '{}'", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}
