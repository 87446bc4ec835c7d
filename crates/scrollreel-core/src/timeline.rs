//! Flat timeline of timed animation descriptors
//!
//! A transition is a list of tweens and one-shot steps, each tagged with the
//! animation group it belongs to. One driver samples them from the frame
//! clock, so cancelling a transition is dropping the list.

use std::time::Duration;

use serde::Serialize;

use crate::config::EasingType;
use crate::motion::timing::{lerp_f32, progress, Stopwatch};
use crate::view::{BackgroundState, ClipInset, SidebarList, ViewModel, WordToken};

/// Independently timed animation groups of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Text,
    Background,
    Sidebar,
    Progress,
    /// Sidebar reveal after mount
    Intro,
}

impl Group {
    /// Groups launched by every section transition
    pub const TRANSITION: [Group; 4] = [Group::Text, Group::Background, Group::Sidebar, Group::Progress];
}

/// Which edge of a background layer is clipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEdge {
    Top,
    Bottom,
}

/// Animatable property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Offset and opacity of one word
    Word(WordToken),
    BackgroundOpacity(usize),
    BackgroundOffset(usize),
    BackgroundClip(usize, ClipEdge),
    SidebarOpacity(SidebarList, usize),
    ProgressFill,
}

/// Channel value; words carry (offset, opacity), everything else one scalar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Scalar(f32),
    Pair(f32, f32),
}

impl Value {
    fn interpolate(self, to: Value, t: f64) -> Value {
        if t >= 1.0 {
            return to;
        }
        if t <= 0.0 {
            return self;
        }
        match (self, to) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(lerp_f32(a, b, t)),
            (from, to) => {
                let (a0, a1) = from.pair();
                let (b0, b1) = to.pair();
                Value::Pair(lerp_f32(a0, b0, t), lerp_f32(a1, b1, t))
            }
        }
    }

    fn scalar(self) -> f32 {
        match self {
            Value::Scalar(v) | Value::Pair(v, _) => v,
        }
    }

    fn pair(self) -> (f32, f32) {
        match self {
            Value::Scalar(v) => (v, v),
            Value::Pair(a, b) => (a, b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub group: Group,
    pub channel: Channel,
    pub from: Value,
    pub to: Value,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: EasingType,
}

impl Tween {
    pub fn word(
        token: WordToken,
        from: (f32, f32),
        to: (f32, f32),
        delay: Duration,
        duration: Duration,
        easing: EasingType,
    ) -> Self {
        Self {
            group: Group::Text,
            channel: Channel::Word(token),
            from: Value::Pair(from.0, from.1),
            to: Value::Pair(to.0, to.1),
            delay,
            duration,
            easing,
        }
    }

    pub fn scalar(
        group: Group,
        channel: Channel,
        from: f32,
        to: f32,
        duration: Duration,
        easing: EasingType,
    ) -> Self {
        Self {
            group,
            channel,
            from: Value::Scalar(from),
            to: Value::Scalar(to),
            delay: Duration::ZERO,
            duration,
            easing,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Time at which this tween has landed on its end value
    pub fn end(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }
}

/// Instantaneous change
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Set(Channel, Value),
    SectionVisible(usize, bool),
    BackgroundState(usize, BackgroundState),
    BackgroundClip(usize, ClipInset),
    Highlight(SidebarList, usize, bool),
    ProgressLabel(String),
}

/// One-shot action fired once the clock reaches `at`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub group: Group,
    pub at: Duration,
    pub action: Action,
}

impl Step {
    pub fn now(group: Group, action: Action) -> Self {
        Self {
            group,
            at: Duration::ZERO,
            action,
        }
    }

    pub fn at(group: Group, at: Duration, action: Action) -> Self {
        Self { group, at, action }
    }
}

#[derive(Debug, Clone)]
struct TweenSlot {
    tween: Tween,
    done: bool,
}

#[derive(Debug, Clone)]
struct StepSlot {
    step: Step,
    fired: bool,
}

/// Driver for a flat list of tweens and steps
///
/// Within one frame, tweens are sampled before steps fire, so a step placed
/// at a tween's end overrides its final value.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    tweens: Vec<TweenSlot>,
    steps: Vec<StepSlot>,
    clock: Stopwatch,
    cancelled: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_tween(&mut self, tween: Tween) {
        self.tweens.push(TweenSlot { tween, done: false });
    }

    pub fn push_step(&mut self, step: Step) {
        self.steps.push(StepSlot { step, fired: false });
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn tweens(&self) -> impl Iterator<Item = &Tween> {
        self.tweens.iter().map(|slot| &slot.tween)
    }

    /// Time at which the last tween lands or the last step fires
    pub fn total_duration(&self) -> Duration {
        let tweens = self.tweens.iter().map(|s| s.tween.end());
        let steps = self.steps.iter().map(|s| s.step.at);
        tweens.chain(steps).max().unwrap_or(Duration::ZERO)
    }

    /// Advance the clock by one frame and apply everything due
    ///
    /// Returns `true` once every tween has landed and every step has fired.
    pub fn advance(&mut self, dt: Duration, view: &mut dyn ViewModel) -> bool {
        if self.cancelled {
            return true;
        }
        let now = self.clock.advance(dt);

        for slot in self.tweens.iter_mut().filter(|s| !s.done) {
            let tween = &slot.tween;
            if now < tween.delay {
                continue;
            }
            let t = progress(now - tween.delay, tween.duration);
            let value = tween.from.interpolate(tween.to, tween.easing.apply(t));
            apply(view, tween.channel, value);
            if t >= 1.0 {
                slot.done = true;
            }
        }

        for slot in self.steps.iter_mut().filter(|s| !s.fired) {
            if now >= slot.step.at {
                perform(view, &slot.step.action);
                slot.fired = true;
            }
        }

        self.is_finished()
    }

    /// Jump to the end: land every pending tween and fire every pending step in time order
    pub fn finish(&mut self, view: &mut dyn ViewModel) {
        if self.cancelled {
            return;
        }
        for slot in self.tweens.iter_mut().filter(|s| !s.done) {
            apply(view, slot.tween.channel, slot.tween.to);
            slot.done = true;
        }
        let mut pending: Vec<&mut StepSlot> = self.steps.iter_mut().filter(|s| !s.fired).collect();
        pending.sort_by_key(|s| s.step.at);
        for slot in pending {
            perform(view, &slot.step.action);
            slot.fired = true;
        }
    }

    /// Drop everything still pending; nothing is applied afterwards
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.tweens.clear();
        self.steps.clear();
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled
            || (self.tweens.iter().all(|s| s.done) && self.steps.iter().all(|s| s.fired))
    }

    /// Whether every tween and step of one group is complete
    pub fn group_finished(&self, group: Group) -> bool {
        self.cancelled
            || (self
                .tweens
                .iter()
                .filter(|s| s.tween.group == group)
                .all(|s| s.done)
                && self
                    .steps
                    .iter()
                    .filter(|s| s.step.group == group)
                    .all(|s| s.fired))
    }
}

fn apply(view: &mut dyn ViewModel, channel: Channel, value: Value) {
    match channel {
        Channel::Word(token) => {
            let (offset, opacity) = value.pair();
            view.set_word_offset(token, offset, opacity);
        }
        Channel::BackgroundOpacity(i) => view.set_background_opacity(i, value.scalar()),
        Channel::BackgroundOffset(i) => view.set_background_offset(i, value.scalar()),
        Channel::BackgroundClip(i, ClipEdge::Top) => {
            view.set_background_clip(i, ClipInset::top(value.scalar()))
        }
        Channel::BackgroundClip(i, ClipEdge::Bottom) => {
            view.set_background_clip(i, ClipInset::bottom(value.scalar()))
        }
        Channel::SidebarOpacity(list, i) => view.set_sidebar_opacity(list, i, value.scalar()),
        Channel::ProgressFill => view.set_progress_fill(value.scalar()),
    }
}

fn perform(view: &mut dyn ViewModel, action: &Action) {
    match action {
        Action::Set(channel, value) => apply(view, *channel, *value),
        Action::SectionVisible(section, visible) => view.set_section_visible(*section, *visible),
        Action::BackgroundState(i, state) => view.set_background_state(*i, *state),
        Action::BackgroundClip(i, clip) => view.set_background_clip(*i, *clip),
        Action::Highlight(list, i, on) => view.set_highlighted(*list, *i, *on),
        Action::ProgressLabel(label) => view.set_progress_label(label),
    }
}
