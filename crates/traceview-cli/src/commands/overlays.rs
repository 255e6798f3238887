use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use traceview_core::export::export_overlays;
use traceview_core::session::SessionContext;

use crate::store::JsonSessionStore;

#[derive(Args)]
pub struct OverlaysArgs {
    /// Session file to read overlays from
    pub session: PathBuf,

    /// Output JSON file; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &OverlaysArgs) -> Result<()> {
    let mut store = JsonSessionStore::new(&args.session);
    let ctx = SessionContext::load_from(&mut store)
        .with_context(|| format!("Failed to load session {}", args.session.display()))?;

    let export = export_overlays(&ctx.overlays, ctx.calibration.as_ref());
    let json = serde_json::to_string_pretty(&export)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} overlay(s) to {}",
                export.overlays.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
