mod commands;
mod source;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "traceview", about = "Clinical trace image viewer engine")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Composite an image through the view pipeline and save a PNG
    Render(commands::render::RenderArgs),
    /// Export session overlays as a JSON measurement record
    Overlays(commands::overlays::OverlaysArgs),
    /// Show a session file summary
    Info(commands::info::InfoArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Overlays(args) => commands::overlays::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
