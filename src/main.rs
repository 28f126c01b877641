use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use led_config_editor::config::Config;
use led_config_editor::web::{start_server, Session};
use led_config_editor::EditSession;

#[derive(Parser, Debug)]
#[command(name = "led-config-editor")]
#[command(about = "Edit, validate and save controller LED options")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/led-config-editor/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load and validate the stored LED options, then exit
    #[arg(long)]
    check: bool,

    /// Print the button to LED order, then exit
    #[arg(long)]
    show_order: bool,

    /// Serve the editor API (the default when no other action is given)
    #[arg(long)]
    serve: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let base_dir = config_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let store = config.build_store(&base_dir)?;
    let mut session: Session =
        EditSession::new(store, config.catalog(), config.pins.reserved.clone());
    session.load().await?;

    // --check and --show-order exit afterwards unless --serve is also given
    if cli.check {
        check(&session)?;
    }
    if cli.show_order {
        show_order(&session);
    }
    if (cli.check || cli.show_order) && !cli.serve {
        return Ok(());
    }

    info!("Starting led-config-editor");

    tokio::select! {
        result = start_server(config.web.port, session) => result,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            Ok(())
        }
    }
}

/// Report validation errors and advisories for the stored options
fn check(session: &Session) -> Result<()> {
    for hint in session.advisories() {
        warn!(
            "{} = {} is below the first free LED index {}",
            hint.field, hint.value, hint.first_available
        );
    }

    match session.validate() {
        Ok(()) => {
            println!("LED options are valid");
            Ok(())
        }
        Err(errors) => {
            for (field, violation) in errors.iter() {
                println!("  {}: {}", field, violation);
            }
            anyhow::bail!("{} invalid field(s)", errors.len())
        }
    }
}

fn show_order(session: &Session) {
    let views = session.views();
    let config = session.config();
    let per_button = config.strip.leds_per_button.max(0);

    println!("Assigned:");
    for (index, id) in views.assigned.iter().enumerate() {
        let label = session.label_for(*id);
        let first = index as i32 * per_button;
        println!("  {:>2}  {:<8} LEDs {}..{}", index, label, first, first + per_button);
    }

    println!("Available:");
    for id in &views.available {
        println!("      {}", session.label_for(*id));
    }

    println!(
        "First free RGB index: {}",
        session.first_available_rgb_index()
    );
}
