//! Scroll source abstraction and the default smooth scroller
//!
//! A [`ScrollSource`] owns the scroll offset of the presentation region. It is
//! advanced from the frame clock and reports what happened since the last
//! frame as [`ScrollEvent`]s, which is how the navigator subscribes to it.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{EasingType, ScrollConfig};
use crate::motion::timing::{lerp, progress, Stopwatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScrollError {
    #[error("scroll source has been disposed")]
    Disposed,

    #[error("scroll offset out of range")]
    OutOfRange,
}

/// Identifies one programmatic glide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GlideTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideOptions {
    pub duration: Duration,
    pub easing: EasingType,
    /// Ignore free scroll input until the glide lands
    pub lock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event", content = "value")]
pub enum ScrollEvent {
    /// Scroll position changed; normalized progress in [0, 1]
    Progress(f64),
    /// A glide reached its destination
    GlideComplete(GlideTicket),
}

/// Collaborator that owns the scroll offset
pub trait ScrollSource {
    /// Animate to an absolute offset; completion is reported through [`ScrollEvent::GlideComplete`]
    fn glide_to(&mut self, offset: f64, options: GlideOptions) -> Result<GlideTicket, ScrollError>;

    /// Advance by one frame and drain the events it produced
    fn advance(&mut self, dt: Duration) -> Vec<ScrollEvent>;

    /// Stop everything; later glides fail with [`ScrollError::Disposed`]
    fn dispose(&mut self);
}

/// Running offset animation
#[derive(Debug, Clone)]
struct Motion {
    from: f64,
    to: f64,
    clock: Stopwatch,
    duration: Duration,
    easing: EasingType,
    /// Present for programmatic glides, absent for wheel smoothing
    ticket: Option<GlideTicket>,
}

/// Wheel-smoothing scroll source
///
/// Free input accumulates through [`scroll_by`](Self::scroll_by) and is eased
/// toward its target over the configured wheel duration. Glides override free
/// input and, when locked, make it ignored until they land.
#[derive(Debug, Clone)]
pub struct SmoothScroller {
    config: ScrollConfig,
    region_length: f64,
    offset: f64,
    motion: Option<Motion>,
    pending_delta: f64,
    locked: bool,
    next_ticket: u64,
    reported: Option<f64>,
    disposed: bool,
}

impl SmoothScroller {
    pub fn new(config: ScrollConfig, region_length: f64) -> Self {
        Self {
            config,
            region_length,
            offset: 0.0,
            motion: None,
            pending_delta: 0.0,
            locked: false,
            next_ticket: 0,
            reported: Some(0.0),
            disposed: false,
        }
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Normalized scroll progress
    pub fn progress(&self) -> f64 {
        if self.region_length <= 0.0 {
            return 0.0;
        }
        (self.offset / self.region_length).clamp(0.0, 1.0)
    }

    /// Final offset once the current motion lands
    pub fn target(&self) -> f64 {
        self.motion.as_ref().map(|m| m.to).unwrap_or(self.offset)
    }

    /// Check if there's pending work; use this to pick the frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.motion.is_some() || self.pending_delta != 0.0
    }

    /// A locked glide is running; free input is ignored until it lands
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.region_length)
    }

    /// Free scroll input (positive = down); returns `false` when ignored
    ///
    /// Multiple inputs within one frame are batched together.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        if self.disposed || self.locked || !delta.is_finite() {
            return false;
        }
        if self.config.smooth_enabled {
            self.pending_delta += delta;
        } else {
            self.offset = self.clamp(self.offset + delta);
            self.motion = None;
        }
        true
    }

    /// One wheel notch in either direction
    pub fn wheel(&mut self, down: bool) -> bool {
        let step = self.config.wheel_step;
        self.scroll_by(if down { step } else { -step })
    }

    fn start_wheel_motion(&mut self) {
        let target = self.clamp(self.target() + self.pending_delta);
        self.pending_delta = 0.0;
        if target == self.offset {
            self.motion = None;
            return;
        }
        self.motion = Some(Motion {
            from: self.offset,
            to: target,
            clock: Stopwatch::new(),
            duration: Duration::from_millis(self.config.animation_duration_ms),
            easing: self.config.easing,
            ticket: None,
        });
    }
}

impl ScrollSource for SmoothScroller {
    fn glide_to(&mut self, offset: f64, options: GlideOptions) -> Result<GlideTicket, ScrollError> {
        if self.disposed {
            return Err(ScrollError::Disposed);
        }
        if !offset.is_finite() || offset < 0.0 || offset > self.region_length {
            return Err(ScrollError::OutOfRange);
        }

        let ticket = GlideTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending_delta = 0.0;
        self.locked = options.lock;
        self.motion = Some(Motion {
            from: self.offset,
            to: offset,
            clock: Stopwatch::new(),
            duration: options.duration,
            easing: options.easing,
            ticket: Some(ticket),
        });
        debug!(?ticket, from = self.offset, to = offset, "Glide started");
        Ok(ticket)
    }

    fn advance(&mut self, dt: Duration) -> Vec<ScrollEvent> {
        if self.disposed {
            return Vec::new();
        }
        if self.pending_delta != 0.0 {
            self.start_wheel_motion();
        }

        let mut landed = None;
        if let Some(motion) = self.motion.as_mut() {
            let t = progress(motion.clock.advance(dt), motion.duration);
            if t >= 1.0 {
                self.offset = motion.to;
                landed = Some(motion.ticket);
            } else {
                self.offset = lerp(motion.from, motion.to, motion.easing.apply(t));
            }
        }

        let mut events = Vec::new();
        let current = self.progress();
        if self.reported != Some(current) {
            self.reported = Some(current);
            events.push(ScrollEvent::Progress(current));
        }
        if let Some(ticket) = landed {
            self.motion = None;
            if let Some(ticket) = ticket {
                self.locked = false;
                events.push(ScrollEvent::GlideComplete(ticket));
            }
        }
        events
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.motion = None;
        self.pending_delta = 0.0;
        self.locked = false;
    }
}
