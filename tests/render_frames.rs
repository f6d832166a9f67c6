use bayscape::app::run_cli;
use bayscape::io::config::Config;

fn tiny_config(output_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.render.width = 64;
    config.render.height = 36;
    config.render.samples = 1;
    config.render.shadow_map_size = 128;
    config.animation.frames = 2;
    config.animation.output_dir = output_dir.display().to_string();
    config
}

#[test]
fn renders_frames_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let config = tiny_config(dir.path());
    let manifest = run_cli(&config).unwrap();

    assert_eq!(manifest.frames.len(), 2);
    assert_eq!(manifest.frames[1].time, 1.0 / 30.0);
    for frame in &manifest.frames {
        let img = image::open(dir.path().join(&frame.file)).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (64, 36));
        let first = *img.get_pixel(0, 0);
        assert!(img.pixels().any(|p| *p != first), "{} is a flat image", frame.file);
    }

    let text = std::fs::read_to_string(dir.path().join("manifest.toml")).unwrap();
    assert!(text.contains("frame_0001.png"));
    assert!(manifest.audio.is_empty());
}

#[test]
fn writes_audio_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = tiny_config(dir.path());
    config.animation.frames = 0;
    config.audio.enabled = true;
    config.audio.sample_rate = 8000;
    config.audio.ocean_seconds = 0.5;
    config.audio.wind_seconds = 0.25;
    config.audio.ambience_seconds = 0.125;

    let manifest = run_cli(&config).unwrap();
    assert_eq!(manifest.audio, ["ocean_waves.wav", "wind.wav", "ambience.wav"]);

    let lengths: Vec<u32> = manifest
        .audio
        .iter()
        .map(|name| hound::WavReader::open(dir.path().join(name)).unwrap().len())
        .collect();
    assert_eq!(lengths, [4000, 2000, 1000]);
}

#[test]
fn rejects_non_positive_fps() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = tiny_config(dir.path());
    config.animation.fps = 0.0;
    assert!(run_cli(&config).is_err());
}

#[test]
fn same_seed_same_frame() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let mut ca = tiny_config(a.path());
    let mut cb = tiny_config(b.path());
    ca.animation.frames = 1;
    cb.animation.frames = 1;
    run_cli(&ca).unwrap();
    run_cli(&cb).unwrap();

    let ia = image::open(a.path().join("frame_0000.png")).unwrap().to_rgb8();
    let ib = image::open(b.path().join("frame_0000.png")).unwrap().to_rgb8();
    assert_eq!(ia.as_raw(), ib.as_raw());
}
