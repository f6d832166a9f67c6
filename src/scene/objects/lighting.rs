use crate::core::color::{hsl_to_rgb, linear_from_hex, srgb_to_linear};
use crate::scene::light::Light;
use nalgebra::Point3;

const SUN_COLOR: u32 = 0xff8c42;
const SKY_BLUE: u32 = 0x87ceeb;
const AMBIENT_GREY: u32 = 0x404040;
const DUSK_BLUE: u32 = 0x1a2a6c;
const LAMP_ORANGE: u32 = 0xff9a5a;

const SUN_START: [f32; 3] = [5.0, 10.0, -15.0];
const FILL_POSITION: [f32; 3] = [-5.0, 5.0, 10.0];
const LAMP_POSITION: [f32; 3] = [0.0, 10.0, -30.0];
const LAMP_RANGE: f32 = 100.0;

/// Warm sunset rig: a low sun that casts the shadows, a cool fill from the
/// opposite side, a flat ambient, a sky/sea hemisphere and a warm lamp near
/// the bridge.
#[derive(Debug, Clone)]
pub struct SunsetLighting {
    pub lights: Vec<Light>,
    /// Where the sun sits; it shines toward the origin.
    pub sun_position: Point3<f32>,
    sun: usize,
    hemisphere: usize,
    lamp: usize,
}

impl Default for SunsetLighting {
    fn default() -> Self {
        Self::new()
    }
}

impl SunsetLighting {
    pub fn new() -> Self {
        let sun_position = Point3::from(SUN_START);
        let lights = vec![
            Light::directional_from(sun_position, linear_from_hex(SUN_COLOR), 1.8),
            Light::directional_from(Point3::from(FILL_POSITION), linear_from_hex(SKY_BLUE), 0.5),
            Light::Ambient {
                color: linear_from_hex(AMBIENT_GREY),
                intensity: 0.8,
            },
            Light::Hemisphere {
                sky: linear_from_hex(SKY_BLUE),
                ground: linear_from_hex(DUSK_BLUE),
                intensity: 0.6,
            },
            Light::new_point(
                Point3::from(LAMP_POSITION),
                linear_from_hex(LAMP_ORANGE),
                1.5,
                LAMP_RANGE,
            ),
        ];
        Self {
            lights,
            sun_position,
            sun: 0,
            hemisphere: 3,
            lamp: 4,
        }
    }

    /// Index of the shadow-casting light in `lights`.
    pub fn sun_index(&self) -> usize {
        self.sun
    }

    /// Moves the sun along its arc and re-tints the rig for `time`.
    pub fn update(&mut self, time: f32) {
        self.lights[self.lamp].set_intensity(1.5 + (time * 2.0).sin() * 0.1);

        let time_of_day = 0.5 + 0.5 * (time * 0.1).sin();
        let sun_height = (time_of_day * 2.0 - 0.5).max(0.0) * 50.0;
        self.sun_position.y = sun_height;

        let k = (sun_height / 15.0 + 0.3).clamp(0.0, 1.0);
        let color = srgb_to_linear(hsl_to_rgb(0.1, 0.9, 0.5 + 0.3 * k));
        self.lights[self.sun] = Light::directional_from(self.sun_position, color, 0.5 + 2.3 * k);

        self.lights[self.hemisphere].set_intensity(0.4 + 0.2 * k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rig_at_dawn() {
        let mut rig = SunsetLighting::new();
        assert_eq!(rig.lights.len(), 5);
        rig.update(0.0);

        // time of day 0.5 puts the sun at (2 * 0.5 - 0.5) * 50 = 25
        assert!((rig.sun_position.y - 25.0).abs() < 1e-5);
        // k clamps to 1
        assert!((rig.lights[rig.sun_index()].intensity() - 2.8).abs() < 1e-5);
        assert!((rig.lights[3].intensity() - 0.6).abs() < 1e-6);
        assert!((rig.lights[4].intensity() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_sun_sets_at_night() {
        let mut rig = SunsetLighting::new();
        // sin(0.1 t) = -1 gives time of day 0
        let t = 1.5 * std::f32::consts::PI / 0.1;
        rig.update(t);
        assert!(rig.sun_position.y.abs() < 1e-4);
        assert!((rig.lights[rig.sun_index()].intensity() - (0.5 + 2.3 * 0.3)).abs() < 1e-4);
        assert!((rig.lights[3].intensity() - (0.4 + 0.2 * 0.3)).abs() < 1e-4);
    }

    #[test]
    fn test_sun_points_at_origin() {
        let rig = SunsetLighting::new();
        let to_light = rig.lights[0].direction_to_light(&Point3::origin()).unwrap();
        let expected = Point3::from(SUN_START).coords.normalize();
        assert!((to_light - expected).norm() < 1e-6);
    }
}
