//! Fire-and-forget sound cues

use std::time::Duration;

use serde::Serialize;
use tracing::trace;

use crate::config::SoundConfig;
use crate::motion::timing::Stopwatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Pointer over a sidebar item
    Hover,
    /// Accepted jump
    Click,
    /// New section title revealed
    TextChange,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Hover => "hover",
            Cue::Click => "click",
            Cue::TextChange => "text_change",
        }
    }
}

/// Sound collaborator; playing never fails and never blocks
pub trait SoundCue {
    fn play(&mut self, cue: Cue, delay: Duration);

    fn set_enabled(&mut self, enabled: bool);
}

/// A cue whose delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiredCue {
    pub cue: Cue,
    pub volume: f32,
}

#[derive(Debug, Clone)]
struct Pending {
    cue: Cue,
    due: Duration,
}

/// Queue of delayed cues, drained by the front end every frame
#[derive(Debug, Clone)]
pub struct CueQueue {
    config: SoundConfig,
    clock: Stopwatch,
    pending: Vec<Pending>,
}

impl CueQueue {
    pub fn new(config: SoundConfig) -> Self {
        Self {
            config,
            clock: Stopwatch::new(),
            pending: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn volume(&self, cue: Cue) -> f32 {
        match cue {
            Cue::Hover => self.config.hover_volume,
            Cue::Click => self.config.click_volume,
            Cue::TextChange => self.config.text_change_volume,
        }
    }

    /// Advance the queue clock and return the cues now due, in due order
    pub fn advance(&mut self, dt: Duration) -> Vec<FiredCue> {
        let now = self.clock.advance(dt);
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| p.due);
        due.into_iter()
            .map(|p| FiredCue {
                cue: p.cue,
                volume: self.volume(p.cue),
            })
            .collect()
    }
}

impl SoundCue for CueQueue {
    fn play(&mut self, cue: Cue, delay: Duration) {
        if !self.config.enabled {
            return;
        }
        trace!(cue = cue.name(), delay_ms = delay.as_millis() as u64, "Cue queued");
        self.pending.push(Pending {
            cue,
            due: self.clock.elapsed().saturating_add(delay),
        });
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.pending.clear();
        }
    }
}
