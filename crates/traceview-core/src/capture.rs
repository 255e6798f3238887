//! Bounded-rate live capture.
//!
//! The [`CaptureLoop`] is an explicitly ticked state machine, independent
//! of any event loop. A slow source never builds a backlog: missed
//! deadlines are skipped and counted. For blocking sources,
//! [`spawn_acquisition`] runs the same schedule on a named worker thread
//! and hands frames over through a latest-wins [`FrameMailbox`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::consts::{DISPLAY_REFRESH_FPS, FPS_CHOICES};
use crate::error::{Result, ViewerError};
use crate::frame::SourceFrame;

/// Anything the capture loop can pull frames from.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<SourceFrame>;
}

/// Requested capture cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRate {
    /// One of the fixed operator-selectable rates.
    Fixed(u32),
    /// Track the display refresh rate.
    MatchDisplay,
}

impl TargetRate {
    /// Validate a fixed-rate request against the selectable set.
    pub fn fixed(fps: u32) -> Result<TargetRate> {
        if FPS_CHOICES.contains(&fps) {
            Ok(TargetRate::Fixed(fps))
        } else {
            Err(ViewerError::InvalidInput {
                field: "fps",
                reason: format!("{fps} is not one of the selectable rates {FPS_CHOICES:?}"),
            })
        }
    }

    pub fn fps(self) -> u32 {
        match self {
            TargetRate::Fixed(fps) => fps,
            TargetRate::MatchDisplay => DISPLAY_REFRESH_FPS,
        }
    }

    pub fn interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps() as f64)
    }
}

/// Deadline scheduler. `tick` is pure with respect to the supplied clock
/// reading, so overrun behavior is testable without sleeping.
#[derive(Debug)]
pub struct CaptureClock {
    interval: Duration,
    next_deadline: Option<Instant>,
    captured: u64,
    skipped: u64,
}

impl CaptureClock {
    pub fn new(rate: TargetRate) -> Self {
        Self {
            interval: rate.interval(),
            next_deadline: None,
            captured: 0,
            skipped: 0,
        }
    }

    /// Change cadence. The schedule restarts at the next tick.
    pub fn set_rate(&mut self, rate: TargetRate) {
        self.interval = rate.interval();
        self.next_deadline = None;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a capture is due at `now`. Advances the deadline past
    /// `now`, counting any whole intervals that were missed; the schedule
    /// stays phase-locked to its start rather than drifting.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.next_deadline {
            None => {
                self.next_deadline = Some(now + self.interval);
                self.captured += 1;
                true
            }
            Some(deadline) if now < deadline => false,
            Some(mut deadline) => {
                let mut periods = 0u64;
                while deadline <= now {
                    deadline += self.interval;
                    periods += 1;
                }
                self.next_deadline = Some(deadline);
                self.skipped += periods - 1;
                self.captured += 1;
                true
            }
        }
    }

    /// Time until the next deadline; zero when due or not yet started.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_deadline
            .map(|d| d.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    pub fn frames_captured(&self) -> u64 {
        self.captured
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.skipped
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Running,
    Paused,
}

/// Synchronous capture state machine, driven by [`tick`](Self::tick).
pub struct CaptureLoop {
    state: CaptureState,
    source: Option<Box<dyn FrameSource>>,
    clock: CaptureClock,
    last_frame: Option<SourceFrame>,
}

impl CaptureLoop {
    pub fn new(rate: TargetRate) -> Self {
        Self {
            state: CaptureState::Idle,
            source: None,
            clock: CaptureClock::new(rate),
            last_frame: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Most recent successfully captured frame, retained across stop,
    /// pause and source failure.
    pub fn last_frame(&self) -> Option<&SourceFrame> {
        self.last_frame.as_ref()
    }

    pub fn frames_captured(&self) -> u64 {
        self.clock.frames_captured()
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.clock.skipped
    }

    pub fn start(&mut self, source: Box<dyn FrameSource>, rate: TargetRate) {
        info!(fps = rate.fps(), "capture started");
        self.source = Some(source);
        self.clock.set_rate(rate);
        self.state = CaptureState::Running;
    }

    /// Stop capturing: Running -> Paused. The source and the last frame
    /// are retained, so a later `resume` picks up where capture left
    /// off. `Idle` is reserved for a loop that never started.
    pub fn stop(&mut self) {
        info!(
            captured = self.clock.frames_captured(),
            skipped = self.clock.ticks_skipped(),
            "capture stopped"
        );
        self.state = CaptureState::Paused;
    }

    /// Leave Paused (or Idle, if a source is attached) and run again.
    pub fn resume(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(ViewerError::SourceUnavailable(
                "no frame source attached".to_string(),
            ));
        }
        self.clock.next_deadline = None;
        self.state = CaptureState::Running;
        Ok(())
    }

    /// Swap the frame source in any state; takes effect on the next tick.
    pub fn change_source(&mut self, source: Box<dyn FrameSource>) {
        self.source = Some(source);
    }

    /// Reconfigure cadence without stopping.
    pub fn set_rate(&mut self, rate: TargetRate) {
        self.clock.set_rate(rate);
    }

    /// Advance the loop. Before the deadline, or outside Running, this is
    /// a no-op. On a due tick the source is polled once; failure moves
    /// the loop to Paused and surfaces the error, leaving the last frame
    /// in place.
    pub fn tick(&mut self, now: Instant) -> Result<Option<&SourceFrame>> {
        if self.state != CaptureState::Running || !self.clock.tick(now) {
            return Ok(None);
        }
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| ViewerError::SourceUnavailable("no frame source attached".to_string()))?;
        match source.next_frame() {
            Ok(frame) => {
                self.last_frame = Some(frame);
                Ok(self.last_frame.as_ref())
            }
            Err(err) => {
                warn!(error = %err, "frame acquisition failed, pausing capture");
                self.state = CaptureState::Paused;
                Err(err)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Threaded acquisition
// ---------------------------------------------------------------------------

/// One-slot frame handoff between the acquisition thread and the render
/// side. Publishing replaces any unconsumed frame; the consumer only
/// ever sees the latest capture.
#[derive(Debug, Default)]
pub struct FrameMailbox {
    slot: Mutex<Option<SourceFrame>>,
}

impl FrameMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, frame: SourceFrame) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = slot.replace(frame) {
            debug!(seq = old.seq, "dropped unconsumed frame");
        }
    }

    /// Take the latest frame, leaving the slot empty.
    pub fn take(&self) -> Option<SourceFrame> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Handle to a running acquisition thread.
pub struct CaptureHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl CaptureHandle {
    /// Signal the thread to stop and wait for it to exit. An in-flight
    /// acquisition completes first; its frame is discarded with the
    /// mailbox.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Sleep granularity while waiting for the next deadline, kept short so
/// a stop request is honored promptly.
const WAIT_SLICE: Duration = Duration::from_millis(5);

/// Run the capture schedule on a named worker thread, publishing frames
/// to `mailbox`. A failed acquisition logs a warning and leaves the
/// previously published frame in place; the thread keeps running.
pub fn spawn_acquisition(
    mut source: impl FrameSource + 'static,
    rate: TargetRate,
    mailbox: Arc<FrameMailbox>,
) -> Result<CaptureHandle> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let join = thread::Builder::new()
        .name("capture".to_string())
        .spawn(move || {
            info!(fps = rate.fps(), "capture thread started");
            let mut clock = CaptureClock::new(rate);
            while !stop_flag.load(Ordering::Relaxed) {
                let now = Instant::now();
                if clock.tick(now) {
                    match source.next_frame() {
                        Ok(frame) => mailbox.publish(frame),
                        Err(err) => {
                            warn!(error = %err, "frame acquisition failed, keeping previous frame");
                        }
                    }
                } else {
                    thread::sleep(clock.time_until_due(now).min(WAIT_SLICE));
                }
            }
            info!(
                captured = clock.frames_captured(),
                skipped = clock.ticks_skipped(),
                "capture thread stopped"
            );
        })?;

    Ok(CaptureHandle {
        stop,
        join: Some(join),
    })
}
