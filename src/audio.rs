//! Procedural ambient audio: ocean swell, wind and a low drone, rendered as
//! mono float samples and written out as 16-bit PCM WAV files.

use crate::error::SceneError;
use rand::Rng;
use std::f32::consts::TAU;
use std::path::Path;

/// Water level the ocean loop is mixed against.
const WATER_LEVEL: f32 = -0.5;

fn sample_count(duration: f32, sample_rate: u32) -> usize {
    (duration.max(0.0) * sample_rate as f32) as usize
}

/// Centered uniform noise in `[-scale / 2, scale / 2)`.
fn noise<R: Rng + ?Sized>(rng: &mut R, scale: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * scale
}

/// Three slow swells plus a little hiss under a 20 s amplitude envelope.
pub fn generate_ocean_waves<R: Rng + ?Sized>(duration: f32, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    let rate = sample_rate as f32;
    (0..sample_count(duration, sample_rate))
        .map(|i| {
            let t = i as f32 / rate;
            let deep = (TAU * 0.1 * t).sin() * 0.3;
            let medium = (TAU * 0.3 * t).sin() * 0.2;
            let ripple = (TAU * 0.8 * t).sin() * 0.1;
            let envelope = 0.5 + 0.5 * (TAU * 0.05 * t).sin();
            (deep + medium + ripple + noise(rng, 0.05)) * envelope * 0.4
        })
        .collect()
}

/// Low-passed noise modulated by two gust cycles.
pub fn generate_wind<R: Rng + ?Sized>(duration: f32, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    let rate = sample_rate as f32;
    let len = sample_count(duration, sample_rate);
    let mut out = Vec::with_capacity(len);
    let mut previous = 0.0;
    for i in 0..len {
        let t = i as f32 / rate;
        let gust = (TAU * 0.02 * t).sin() * 0.3 + (TAU * 0.05 * t).sin() * 0.2;
        // one-pole low-pass over the previous output sample
        let filtered = noise(rng, 2.0) * 0.7 + previous * 0.3;
        let sample = filtered * (0.3 + gust) * 0.3;
        out.push(sample);
        previous = sample;
    }
    out
}

/// A very quiet two-tone drone.
pub fn generate_ambience<R: Rng + ?Sized>(duration: f32, sample_rate: u32, rng: &mut R) -> Vec<f32> {
    let rate = sample_rate as f32;
    (0..sample_count(duration, sample_rate))
        .map(|i| {
            let t = i as f32 / rate;
            let drone = (TAU * 0.01 * t).sin() * 0.1 + (TAU * 0.015 * t).sin() * 0.08;
            (drone + noise(rng, 0.02)) * 0.5
        })
        .collect()
}

/// Ocean loop gain for a listener at `camera_y`: loudest at the waterline,
/// fading to a floor of 0.3 from 20 units up.
pub fn ocean_volume_for_camera(camera_y: f32) -> f32 {
    let proximity = (1.0 - (camera_y - WATER_LEVEL).abs() / 20.0).max(0.0);
    (proximity * 0.8).max(0.3)
}

/// Clamps to `[-1, 1]` and scales to signed 16-bit, truncating toward zero.
pub fn to_pcm_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Writes mono 16-bit PCM.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<(), SceneError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in to_pcm_i16(samples) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_lengths_follow_duration() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(generate_ocean_waves(1.5, 1000, &mut rng).len(), 1500);
        assert_eq!(generate_wind(2.0, 800, &mut rng).len(), 1600);
        assert_eq!(generate_ambience(0.0, 44_100, &mut rng).len(), 0);
        assert!(generate_wind(-1.0, 44_100, &mut rng).is_empty());
    }

    #[test]
    fn test_ocean_starts_near_silence() {
        let mut rng = StdRng::seed_from_u64(1);
        let samples = generate_ocean_waves(1.0, 100, &mut rng);
        // at t = 0 only the noise term survives: |noise| <= 0.025, times 0.5 * 0.4
        assert!(samples[0].abs() <= 0.025 * 0.5 * 0.4 + 1e-6);
        assert!(samples.iter().all(|s| s.abs() <= 0.625 * 0.4 + 1e-6));
    }

    #[test]
    fn test_signals_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let wind = generate_wind(5.0, 2000, &mut rng);
        // |filtered| < 1 / 0.7 stays bounded, gusts peak at 0.8
        assert!(wind.iter().all(|s| s.abs() < 1.0));
        let drone = generate_ambience(5.0, 2000, &mut rng);
        assert!(drone.iter().all(|s| s.abs() <= 0.1));
    }

    #[test]
    fn test_same_seed_same_audio() {
        let a = generate_wind(0.5, 1000, &mut StdRng::seed_from_u64(3));
        let b = generate_wind(0.5, 1000, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ocean_volume() {
        assert!((ocean_volume_for_camera(-0.5) - 0.8).abs() < 1e-6);
        assert_eq!(ocean_volume_for_camera(100.0), 0.3);
        // camera default height: proximity 1 - 3.5 / 20
        assert!((ocean_volume_for_camera(3.0) - 0.825 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_pcm_conversion() {
        assert_eq!(to_pcm_i16(&[0.0, 1.0, -1.0, 2.0, -3.0, 0.5]), vec![
            0,
            i16::MAX,
            -i16::MAX,
            i16::MAX,
            -i16::MAX,
            16383
        ]);
    }

    #[test]
    fn test_wav_header_and_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples = generate_ambience(0.25, 8000, &mut StdRng::seed_from_u64(9));
        write_wav(&path, &samples, 8000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 2000);
        let read: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, to_pcm_i16(&samples));
    }
}
