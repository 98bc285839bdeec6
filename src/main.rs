use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use glyphroute::commands;

#[derive(Parser)]
#[command(name = "glyphroute", version, about = "Glyph-shaped cycling route generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the track generation web server
    Serve {
        /// Interface to bind
        #[arg(long, default_value = "0.0.0.0")]
        interface: String,
        /// Port to listen on
        #[arg(long, default_value_t = 5000)]
        port: u16,
        /// Font file to trace glyphs from (falls back to GLYPHROUTE_FONT)
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// Fit a character's key points into geographic space and print the
    /// result, without calling any routing service
    Fit {
        /// Character to fit (only the first char of the argument is used)
        character: char,
        /// Start point as lng,lat (defaults to Beijing city center)
        #[arg(long)]
        start: Option<String>,
        /// Minimum path length in meters
        #[arg(long, default_value_t = 5000.0)]
        min: f64,
        /// Maximum path length in meters
        #[arg(long, default_value_t = 10000.0)]
        max: f64,
        /// Font file to trace glyphs from (falls back to GLYPHROUTE_FONT)
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve {
            interface,
            port,
            font,
        } => commands::handle_serve(interface, port, font).await,
        Commands::Fit {
            character,
            start,
            min,
            max,
            font,
        } => commands::handle_fit(character, start, min, max, font),
    }
}
