//! Replays hand landmark recordings through the gesture effects pipeline.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gesture_effects::{
    app::{demo_session, load_recording, GestureApp},
    config::{Config, EXAMPLE_CONFIG},
};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML landmark recording to replay
    #[arg(short, long)]
    input: Option<String>,

    /// Replay the built-in synthetic session
    #[arg(long)]
    demo: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Honor recorded timestamps instead of replaying as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Gesture Effects");

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    config.validate().context("Invalid configuration")?;

    let frames = match (&args.input, args.demo) {
        (Some(path), false) => {
            info!("Loading recording from: {}", path);
            load_recording(path).with_context(|| format!("Failed to load recording {path}"))?
        }
        (None, true) => demo_session(),
        (Some(_), true) => bail!("--input and --demo are mutually exclusive"),
        (None, false) => bail!("Nothing to replay: pass --input <FILE> or --demo"),
    };

    // Create and run application
    let mut app = GestureApp::new(&config)?;
    let summary = app.run(&frames, args.realtime);
    app.shutdown();

    match summary.final_effect {
        Some(id) => println!("Final effect: {} ({})", id, id.label()),
        None => println!("Final effect: none"),
    }
    println!(
        "{} frames, {} without a hand, {} dropped, {} effect changes",
        summary.frames,
        summary.no_hand,
        summary.dropped,
        summary.effect_changes.len()
    );

    Ok(())
}
