use crate::audio::{
    generate_ambience, generate_ocean_waves, generate_wind, ocean_volume_for_camera, write_wav,
};
use crate::error::SceneError;
use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::io::manifest::{FrameRecord, RenderManifest};
use crate::pipeline::passes::{post_process_to_buffer, render_main_pass, render_shadow_pass};
use crate::pipeline::renderer::Renderer;
use crate::scene::context::RenderContext;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Renders the configured frame sequence headless, writing PNG frames (and
/// the ambient WAVs when enabled) plus a manifest into the output directory.
pub fn run_cli(config: &Config) -> Result<RenderManifest, SceneError> {
    let anim = &config.animation;
    if anim.fps.is_nan() || anim.fps <= 0.0 {
        return Err(SceneError::invalid("animation", "fps must be positive"));
    }
    if config.render.width == 0 || config.render.height == 0 {
        return Err(SceneError::invalid("render", "width and height must be non-zero"));
    }

    let output_dir = Path::new(&anim.output_dir);
    fs::create_dir_all(output_dir)?;

    info!(
        "Rendering {} frame(s) at {}x{} into '{}'",
        anim.frames,
        config.render.width,
        config.render.height,
        output_dir.display()
    );

    let mut context = RenderContext::from_config(config);
    let mut renderer = Renderer::new(
        config.render.width,
        config.render.height,
        config.render.samples,
    );
    let mut shadow_renderer = Renderer::new(
        config.render.shadow_map_size,
        config.render.shadow_map_size,
        1,
    );

    let mut manifest = RenderManifest::new(
        config.scene.seed,
        config.render.width,
        config.render.height,
        anim.fps,
    );

    if config.audio.enabled {
        manifest.audio = write_audio(config, output_dir, &context)?;
    }

    let mut buffer = vec![0u32; config.render.width * config.render.height];
    let run_start = Instant::now();

    for n in 0..anim.frames {
        let frame_start = Instant::now();
        let time = anim.start_time + n as f32 / anim.fps;
        context.update(time);

        let shadow_map = render_shadow_pass(config, &context, &mut shadow_renderer);
        if shadow_map.is_some() {
            debug!("Frame {}: shadow pass completed", n);
        }
        render_main_pass(config, &context, &mut renderer, shadow_map);

        post_process_to_buffer(&renderer.framebuffer, &mut buffer, config);
        let file = format!("frame_{n:04}.png");
        save_buffer_to_image(
            &buffer,
            config.render.width,
            config.render.height,
            output_dir.join(&file),
        )?;

        info!(
            "Frame {}/{} (t = {:.2}s) rendered in {:.2?}",
            n + 1,
            anim.frames,
            time,
            frame_start.elapsed()
        );
        manifest.frames.push(FrameRecord {
            index: n,
            time,
            file,
        });
    }

    manifest.write(output_dir.join("manifest.toml"))?;
    info!("Done in {:.2?}", run_start.elapsed());
    Ok(manifest)
}

fn write_audio(
    config: &Config,
    output_dir: &Path,
    context: &RenderContext,
) -> Result<Vec<String>, SceneError> {
    let audio = &config.audio;
    let rate = audio.sample_rate;
    let mut rng = StdRng::seed_from_u64(config.scene.seed);

    let tracks = [
        ("ocean_waves.wav", generate_ocean_waves(audio.ocean_seconds, rate, &mut rng)),
        ("wind.wav", generate_wind(audio.wind_seconds, rate, &mut rng)),
        ("ambience.wav", generate_ambience(audio.ambience_seconds, rate, &mut rng)),
    ];

    let mut written = Vec::with_capacity(tracks.len());
    for (name, samples) in &tracks {
        write_wav(output_dir.join(name), samples, rate)?;
        debug!("Wrote {} ({} samples)", name, samples.len());
        written.push(name.to_string());
    }

    info!(
        "Ambient audio written; suggested ocean gain {:.2} for the camera height",
        ocean_volume_for_camera(context.camera.position.y)
    );
    Ok(written)
}
