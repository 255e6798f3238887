/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Lower zoom bound; requests below saturate here.
pub const MIN_ZOOM: f64 = 0.10;

/// Upper zoom bound; requests above saturate here.
pub const MAX_ZOOM: f64 = 5.00;

/// Zoom applied when Enhanced Mode is switched on.
pub const ENHANCED_MODE_ZOOM: f64 = 2.50;

/// Step for incremental zoom in/out (10%).
pub const ZOOM_STEP: f64 = 0.10;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Saturation gain for the EnhancedColor contrast mode.
pub const ENHANCED_SATURATION_GAIN: f32 = 1.3;

/// Contrast gain (around midpoint) for the EnhancedColor mode.
pub const ENHANCED_CONTRAST_GAIN: f32 = 1.2;

/// Contrast gain for the HighContrastColor mode.
pub const HIGH_CONTRAST_GAIN: f32 = 1.5;

/// Chroma (saturation) gain for the HighContrastColor mode.
pub const HIGH_CONTRAST_CHROMA_GAIN: f32 = 1.2;

/// Contrast gain for the grayscale high-contrast modes.
pub const GRAY_CONTRAST_GAIN: f32 = 1.4;

/// Threshold for the Binary contrast mode, on 8-bit luminance.
pub const BINARY_THRESHOLD: u8 = 120;

/// Hit-test tolerance around overlay geometry, in view pixels.
/// Constant in screen terms so pick accuracy does not change with zoom.
pub const HIT_TEST_RADIUS: f64 = 6.0;

/// Stroke width for overlay geometry, in view pixels.
pub const OVERLAY_STROKE_WIDTH: f32 = 2.0;

/// Radius of overlay endpoint/anchor markers, in view pixels.
pub const OVERLAY_MARKER_RADIUS: f32 = 4.0;

/// Opacity of the ROI interior fill (fraction of overlay color blended in).
pub const ROI_FILL_OPACITY: f32 = 0.125;

/// Dash pattern for ruler lines, in view pixels (on, off).
pub const RULER_DASH: (f32, f32) = (6.0, 4.0);

/// Size of the "no content" placeholder bitmap.
pub const PLACEHOLDER_SIZE: (u32, u32) = (640, 480);

/// Background gray level for the viewport canvas and placeholder.
pub const BACKGROUND_GRAY: u8 = 30;

/// Selectable live-capture frame rates, in frames per second.
pub const FPS_CHOICES: [u32; 5] = [10, 15, 30, 60, 120];

/// Frame rate used for the "match display" capture setting.
pub const DISPLAY_REFRESH_FPS: u32 = 60;

/// Width of the grab margin along the measurement grid's bottom/right
/// edges that starts a resize instead of a move, in screen pixels.
pub const GRID_RESIZE_MARGIN: f64 = 10.0;

/// Version of the overlay export and session state schemas.
pub const SCHEMA_VERSION: u32 = 1;
