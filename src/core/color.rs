use nalgebra::Vector3;

/// ACES (Academy Color Encoding System) filmic tone mapping curve.
/// Maps high dynamic range (HDR) values to [0, 1] range with a film-like look.
pub fn aces_tone_mapping(color: Vector3<f32>) -> Vector3<f32> {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;

    color.map(|x| ((x * (a * x + b)) / (x * (c * x + d) + e)).clamp(0.0, 1.0))
}

/// Converts linear RGB to sRGB (Gamma Correction).
/// Usually applied after tone mapping.
pub fn linear_to_srgb(color: Vector3<f32>) -> Vector3<f32> {
    let gamma = 1.0 / 2.2;
    color.map(|x| x.max(0.0).powf(gamma))
}

/// Inverse of [`linear_to_srgb`]. Used for colors authored as display values.
pub fn srgb_to_linear(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|x| x.max(0.0).powf(2.2))
}

/// Decodes a `0xRRGGBB` literal into display-space RGB in [0, 1].
pub fn rgb_from_hex(hex: u32) -> Vector3<f32> {
    Vector3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}

/// Decodes a `0xRRGGBB` literal and converts it to linear RGB for lighting.
pub fn linear_from_hex(hex: u32) -> Vector3<f32> {
    srgb_to_linear(rgb_from_hex(hex))
}

/// HSL (all components in [0, 1]) to RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vector3<f32> {
    if s <= 0.0 {
        return Vector3::new(l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vector3::new(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn test_hex_decoding() {
        assert!(close(rgb_from_hex(0xff8000), Vector3::new(1.0, 128.0 / 255.0, 0.0)));
        assert!(close(rgb_from_hex(0x000000), Vector3::zeros()));
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), Vector3::new(1.0, 0.0, 0.0)));
        assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), Vector3::new(0.0, 1.0, 0.0)));
        assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_hsl_grey_when_unsaturated() {
        assert!(close(hsl_to_rgb(0.3, 0.0, 0.25), Vector3::new(0.25, 0.25, 0.25)));
    }

    #[test]
    fn test_srgb_roundtrip_is_stable() {
        let c = Vector3::new(0.2, 0.5, 0.9);
        assert!(close(linear_to_srgb(srgb_to_linear(c)), c));
    }

    #[test]
    fn test_aces_clamps() {
        let mapped = aces_tone_mapping(Vector3::new(100.0, 0.0, -1.0));
        assert!(mapped.iter().all(|c| (0.0..=1.0).contains(c)));
    }
}
