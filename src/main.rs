use bayscape::app::run_cli;
use bayscape::io::config::Config;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "bayscape")]
#[command(version, about = "Renders the procedural Golden Gate bay scene to PNG frames")]
struct Cli {
    /// Scene config (TOML). Defaults are used when absent or unreadable.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of frames to render.
    #[arg(short, long)]
    frames: Option<usize>,

    /// Scene clock rate.
    #[arg(long)]
    fps: Option<f32>,

    /// Scene time of the first frame, in seconds.
    #[arg(long, value_name = "SECONDS")]
    start_time: Option<f32>,

    /// Where frames, audio and the manifest are written.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Also write the ambient WAV files.
    #[arg(long)]
    audio: bool,

    /// Overrides the scene seed.
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(frames) = self.frames {
            config.animation.frames = frames;
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
        if let Some(start) = self.start_time {
            config.animation.start_time = start;
        }
        if let Some(dir) = &self.output_dir {
            config.animation.output_dir = dir.clone();
        }
        if self.audio {
            config.audio.enabled = true;
        }
        if let Some(seed) = self.seed {
            config.scene.seed = seed;
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(cli.config.as_deref());
    cli.apply(&mut config);

    match run_cli(&config) {
        Ok(manifest) => {
            log::info!("Wrote {} frame(s)", manifest.frames.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
