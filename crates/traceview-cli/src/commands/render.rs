use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use traceview_core::document::Paginator;
use traceview_core::export::export_current_view;
use traceview_core::filters::ContrastMode;
use traceview_core::frame::SourceFrame;
use traceview_core::geometry::ViewPoint;
use traceview_core::session::SessionContext;

use crate::source::SingleImageDocument;
use crate::store::JsonSessionStore;

#[derive(Args)]
pub struct RenderArgs {
    /// Input image file (PNG, JPEG, TIFF)
    pub file: PathBuf,

    /// Session file with overlays, calibration and view state
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// Contrast mode: normal, enhanced-color, high-contrast-color,
    /// smart-invert, inverted-gray, hc-gray, inverted-hc-gray, binary
    #[arg(long)]
    pub mode: Option<String>,

    /// Zoom factor (saturates to 0.10..5.00)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Pan offset as "x,y" in view pixels
    #[arg(long)]
    pub pan: Option<String>,

    /// Viewport size as "WxH"
    #[arg(long, default_value = "800x600")]
    pub viewport: String,

    /// Apply trace enhancement
    #[arg(long)]
    pub trace: bool,

    /// Enable Enhanced Mode (250% zoom + high-contrast color)
    #[arg(long)]
    pub enhanced: bool,

    /// Output file path
    #[arg(short, long, default_value = "view.png")]
    pub output: PathBuf,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let document = SingleImageDocument::open(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let pager = Paginator::new(Box::new(document))?;
    let bitmap = pager.current_bitmap().clone();

    println!("Loaded {}x{} image", bitmap.width(), bitmap.height());

    let viewport = parse_size(&args.viewport)?;
    let mut ctx = match &args.session {
        Some(path) => {
            let mut store = JsonSessionStore::new(path);
            SessionContext::load_from(&mut store)
                .with_context(|| format!("Failed to load session {}", path.display()))?
        }
        None => SessionContext::new(viewport),
    };
    ctx.view.set_viewport_size(viewport);
    ctx.view.set_image_size((bitmap.width(), bitmap.height()));

    if args.enhanced {
        ctx.view.set_enhanced_mode(true);
    }
    if let Some(zoom) = args.zoom {
        let center = ViewPoint::new(viewport.0 as f64 / 2.0, viewport.1 as f64 / 2.0);
        ctx.view.set_zoom(zoom, center);
    }
    if let Some(ref pan) = args.pan {
        ctx.view.set_pan(parse_pan(pan)?);
    }
    if let Some(ref mode) = args.mode {
        ctx.view.contrast_mode = parse_mode(mode)?;
    }
    ctx.view.trace_enhancement = args.trace;

    println!(
        "Compositing at {:.0}% zoom, {} mode",
        ctx.view.zoom_factor() * 100.0,
        ctx.view.contrast_mode.label()
    );

    let frame = SourceFrame::new(bitmap, 0);
    let surface = export_current_view(
        Some(&frame),
        &ctx.view,
        &ctx.overlays,
        ctx.calibration.as_ref(),
    );
    surface
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Saved to {}", args.output.display());

    Ok(())
}

fn parse_size(s: &str) -> Result<(u32, u32)> {
    let (w, h) = s
        .split_once('x')
        .context("Invalid viewport format (expected 'WxH')")?;
    Ok((
        w.trim().parse().context("Invalid viewport width")?,
        h.trim().parse().context("Invalid viewport height")?,
    ))
}

fn parse_pan(s: &str) -> Result<(f64, f64)> {
    let (x, y) = s
        .split_once(',')
        .context("Invalid pan format (expected 'x,y')")?;
    Ok((
        x.trim().parse().context("Invalid pan x")?,
        y.trim().parse().context("Invalid pan y")?,
    ))
}

fn parse_mode(s: &str) -> Result<ContrastMode> {
    match s {
        "normal" => Ok(ContrastMode::Normal),
        "enhanced-color" => Ok(ContrastMode::EnhancedColor),
        "high-contrast-color" => Ok(ContrastMode::HighContrastColor),
        "smart-invert" => Ok(ContrastMode::SmartInvert),
        "inverted-gray" => Ok(ContrastMode::InvertedGray),
        "hc-gray" => Ok(ContrastMode::HighContrastGray),
        "inverted-hc-gray" => Ok(ContrastMode::InvertedHighContrastGray),
        "binary" => Ok(ContrastMode::Binary),
        other => anyhow::bail!("Unknown contrast mode '{other}'"),
    }
}
