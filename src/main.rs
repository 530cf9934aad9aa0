#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::{path::PathBuf, time::Duration};

    use anyhow::{Context, Result};
    use clap::Parser;
    use gemcut::{
        clock::ManualClock, presets, AnimationDriver, FrameOutcome, Framebuffer, GemConfig,
        GemEntry, GemSequence, PaletteOverrides, PillarCode,
    };

    /// Renders pillar gems to a PNG still.
    #[derive(Parser, Debug)]
    #[command(name = "gemcut", version)]
    struct Args {
        /// Pillar such as 甲子; repeat to build the cycled sequence.
        #[arg(long = "pillar", value_name = "PILLAR")]
        pillars: Vec<String>,

        /// Frames to simulate before writing the still.
        #[arg(long, default_value_t = 1)]
        frames: u32,

        /// Simulated milliseconds per frame.
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Canvas edge length in pixels, overriding the config.
        #[arg(long)]
        size: Option<u32>,

        /// JSON file with projection and animation tunables.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "gem.png")]
        out: PathBuf,

        #[arg(long)]
        primary: Option<String>,

        #[arg(long)]
        secondary: Option<String>,

        /// Replaces both the stem and the branch highlight.
        #[arg(long)]
        highlight: Option<String>,

        /// Transparent body colors: strokes the mesh instead of shading it.
        #[arg(long)]
        wireframe: bool,

        /// Cycle the five forge wireframes instead of the given pillars.
        #[arg(long)]
        forge: bool,

        /// Hover offset; positive raises the gem.
        #[arg(long, default_value_t = 0.0)]
        lift: f32,
    }

    impl Args {
        fn overrides(&self) -> PaletteOverrides {
            let transparent = || Some("rgba(0,0,0,0)".to_string());
            let mut overrides = PaletteOverrides {
                primary: self.primary.clone(),
                secondary: self.secondary.clone(),
                ..Default::default()
            };
            if let Some(highlight) = &self.highlight {
                overrides = overrides.with_highlight(highlight.clone());
            }
            if self.wireframe {
                overrides.primary = transparent();
                overrides.secondary = transparent();
            }
            overrides
        }

        fn sequence(&self) -> Result<GemSequence> {
            if self.forge {
                return Ok(presets::forge_sequence());
            }
            if self.pillars.is_empty() {
                anyhow::bail!("pass at least one --pillar, or --forge");
            }
            let overrides = self.overrides();
            let entries = self
                .pillars
                .iter()
                .map(|pillar| {
                    let pillar = PillarCode::parse(pillar)?;
                    Ok(GemEntry::new(pillar).with_palette(overrides.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(GemSequence::new(entries))
        }

        fn config(&self) -> Result<GemConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    let json = std::fs::read_to_string(path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    GemConfig::from_json(&json)
                        .with_context(|| format!("parsing {}", path.display()))?
                }
                None if self.forge => GemConfig {
                    canvas_size: presets::FORGE_CANVAS_SIZE,
                    ..Default::default()
                },
                None => GemConfig::default(),
            };
            if let Some(size) = self.size {
                config.canvas_size = size;
            }
            Ok(config)
        }
    }

    pub fn run() -> Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();

        let args = Args::parse();
        let config = args.config()?;
        let sequence = args.sequence()?;

        let clock = ManualClock::new();
        let mut driver = AnimationDriver::new(config, sequence, clock.clone());
        driver.set_lift(args.lift);
        let mut framebuffer = Framebuffer::new(config.canvas_size)?;

        let mut last = None;
        for _ in 0..args.frames.max(1) {
            clock.advance(Duration::from_millis(args.frame_ms));
            if let FrameOutcome::Rendered { stats, morphed } = driver.frame(&mut framebuffer) {
                if morphed {
                    log::info!("now showing entry {}", driver.state().index);
                }
                last = Some(stats);
            }
        }

        if let Some(stats) = last {
            log::info!(
                "last frame: {} front, {} back, {} skipped{}",
                stats.front,
                stats.back,
                stats.skipped,
                if stats.wireframe { ", wireframe" } else { "" }
            );
        }

        framebuffer
            .save_png(&args.out)
            .with_context(|| format!("writing {}", args.out.display()))?;
        log::info!("wrote {}", args.out.display());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
