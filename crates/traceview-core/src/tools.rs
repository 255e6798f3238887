//! Annotation tool dispatch: one press/drag/release routine for every
//! tool, parameterized by [`ToolKind`]. Pointer events arrive in view
//! space and are mapped to image space here; completed geometry is
//! handed back for the caller to add to the overlay store.

use crate::geometry::{ImagePoint, ViewPoint};
use crate::overlay::OverlayKind;
use crate::view::ViewState;

/// The active annotation tool. `None` leaves pointer events to the pan
/// gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolKind {
    #[default]
    None,
    Note,
    Ruler,
    Roi,
}

/// Result of feeding one pointer event to the dispatcher.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// Event not consumed (no tool, outside the bitmap, or no gesture in
    /// progress).
    Ignored,
    /// A drag gesture began; nothing to paint yet.
    Started,
    /// Gesture in progress; `0` is the geometry to paint as a live
    /// preview.
    Preview(OverlayKind),
    /// Gesture finished; `0` is the validated geometry to add.
    Completed(OverlayKind),
}

/// Routes pointer events for the active tool.
#[derive(Debug, Default)]
pub struct ToolDispatcher {
    tool: ToolKind,
    drag_start: Option<ImagePoint>,
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Select a tool; any gesture in progress is cancelled.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.drag_start = None;
    }

    /// Abort the gesture in progress, if any.
    pub fn cancel(&mut self) {
        self.drag_start = None;
    }

    /// Pointer press. Presses outside the source bitmap are ignored. A
    /// Note completes immediately (text is filled in by the caller);
    /// Ruler and ROI start a drag.
    pub fn press(&mut self, at: ViewPoint, view: &ViewState) -> DispatchOutcome {
        if self.tool == ToolKind::None || !view.hits_image(at) {
            return DispatchOutcome::Ignored;
        }
        let anchor = view.to_image(at);
        match self.tool {
            ToolKind::Note => DispatchOutcome::Completed(OverlayKind::Note {
                anchor,
                text: String::new(),
            }),
            ToolKind::Ruler | ToolKind::Roi => {
                self.drag_start = Some(anchor);
                DispatchOutcome::Started
            }
            ToolKind::None => DispatchOutcome::Ignored,
        }
    }

    /// Pointer move while pressed. The moving endpoint is clamped to the
    /// bitmap so a drag that leaves the window still yields valid
    /// geometry.
    pub fn drag(&mut self, at: ViewPoint, view: &ViewState) -> DispatchOutcome {
        match self.drag_start {
            Some(start) => {
                DispatchOutcome::Preview(self.gesture_kind(start, clamp_to_image(view.to_image(at), view)))
            }
            None => DispatchOutcome::Ignored,
        }
    }

    /// Pointer release. A degenerate gesture (both points identical after
    /// clamping) is discarded.
    pub fn release(&mut self, at: ViewPoint, view: &ViewState) -> DispatchOutcome {
        match self.drag_start.take() {
            Some(start) => {
                let end = clamp_to_image(view.to_image(at), view);
                if start == end {
                    return DispatchOutcome::Ignored;
                }
                DispatchOutcome::Completed(self.gesture_kind(start, end))
            }
            None => DispatchOutcome::Ignored,
        }
    }

    fn gesture_kind(&self, start: ImagePoint, end: ImagePoint) -> OverlayKind {
        match self.tool {
            ToolKind::Roi => OverlayKind::Roi {
                top_left: ImagePoint::new(start.x.min(end.x), start.y.min(end.y)),
                bottom_right: ImagePoint::new(start.x.max(end.x), start.y.max(end.y)),
            },
            // Ruler is the only other drag tool.
            _ => OverlayKind::Ruler { start, end },
        }
    }
}

fn clamp_to_image(p: ImagePoint, view: &ViewState) -> ImagePoint {
    let (iw, ih) = view.image_size();
    ImagePoint::new(
        p.x.clamp(0.0, iw as f64),
        p.y.clamp(0.0, ih as f64),
    )
}
