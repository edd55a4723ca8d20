//! pixelflow fire demo — entry point.
//!
//! ```text
//! pixelflow-fire                     Connect with defaults
//! pixelflow-fire --config <path>     Use custom config TOML
//! pixelflow-fire --server host:port  Override the display address
//! pixelflow-fire --gen-config        Dump default config and exit
//! ```
//!
//! Up/Down change the heat, Space holds the seed for a frame, q/Esc quit.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use pixelflow_core::Canvas;
use pixelflow_fire::config::{FireConfig, parse_server};
use pixelflow_fire::fire::{Fire, install_palette};
use pixelflow_fire::keys::{Action, RawTerminal};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pixelflow-fire", about = "Fire effect on a pixelflow display")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "pixelflow-fire.toml")]
    config: PathBuf,

    /// Display address (overrides config). Example: 127.0.0.1:19223
    #[arg(short, long)]
    server: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        println!("{}", FireConfig::default_toml()?);
        return Ok(());
    }

    let mut config = FireConfig::load(&cli.config);
    if let Some(addr) = cli.server.as_deref() {
        config.network = parse_server(addr)?;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("pixelflow-fire v{}", env!("CARGO_PKG_VERSION"));

    let mut canvas = Canvas::connect_with_config(&config.network, &config.canvas)?;
    install_palette(&mut canvas)?;
    let mut fire = Fire::new(config.fire.clone(), rand::rng());

    let terminal = RawTerminal::enable()?;
    let result = run(&terminal, &mut canvas, &mut fire, config.fire.fps);
    drop(terminal);

    match &result {
        Ok(()) => info!(
            bytes = canvas.bytes_sent(),
            messages = canvas.messages_sent(),
            "display closed"
        ),
        Err(e) => error!("fire loop stopped: {e}"),
    }
    result
}

fn run<R: rand::Rng>(
    terminal: &RawTerminal,
    canvas: &mut Canvas,
    fire: &mut Fire<R>,
    fps: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let mut seed = true;
        for action in terminal.poll_actions()? {
            match action {
                Action::Quit => return Ok(()),
                Action::HeatUp => {
                    fire.heat_up();
                    debug!(heat = fire.heat(), "heat raised");
                }
                Action::HeatDown => {
                    fire.heat_down();
                    debug!(heat = fire.heat(), "heat lowered");
                }
                Action::Pause => seed = false,
            }
        }
        fire.frame(canvas, seed)?;
        canvas.ensure_max_fps(fps);
    }
}
