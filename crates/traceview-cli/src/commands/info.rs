use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use clap::Args;
use traceview_core::overlay::OverlayKind;
use traceview_core::session::SessionContext;

use crate::store::JsonSessionStore;

#[derive(Args)]
pub struct InfoArgs {
    /// Session file to summarize
    pub session: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut store = JsonSessionStore::new(&args.session);
    let ctx = SessionContext::load_from(&mut store)
        .with_context(|| format!("Failed to load session {}", args.session.display()))?;

    let (pan_x, pan_y) = ctx.view.pan_offset();
    println!("File:        {}", args.session.display());
    println!("Zoom:        {:.0}%", ctx.view.zoom_factor() * 100.0);
    println!("Pan:         ({:.1}, {:.1})", pan_x, pan_y);
    println!("Contrast:    {}", ctx.view.contrast_mode.label());
    println!("Trace enh.:  {}", if ctx.view.trace_enhancement { "on" } else { "off" });

    let mut notes = 0;
    let mut rulers = 0;
    let mut rois = 0;
    for overlay in ctx.overlays.iter() {
        match overlay.kind {
            OverlayKind::Note { .. } => notes += 1,
            OverlayKind::Ruler { .. } => rulers += 1,
            OverlayKind::Roi { .. } => rois += 1,
        }
    }
    println!("Overlays:    {} ({notes} notes, {rulers} rulers, {rois} ROIs)", ctx.overlays.len());

    match &ctx.calibration {
        Some(cal) => println!(
            "Calibration: {:.2} x {:.2} px per {}",
            cal.pixels_per_unit_x, cal.pixels_per_unit_y, cal.unit_label
        ),
        None => println!("Calibration: none"),
    }

    let positions: Vec<_> = ctx.positions().collect();
    println!("Positions:   {}", positions.len());
    for (name, pos) in positions {
        let stamp = pos
            .created_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        println!(
            "  {name}: {:.0}% at ({:.1}, {:.1}), saved at unix {stamp}",
            pos.zoom_factor * 100.0,
            pos.pan_offset.0,
            pos.pan_offset.1
        );
    }

    Ok(())
}
