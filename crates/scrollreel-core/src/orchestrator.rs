//! Per-transition animation orchestration
//!
//! [`TransitionOrchestrator::launch`] turns a [`TransitionRequest`] into one
//! flat [`Timeline`] covering the four animation groups (text reveal,
//! background crossfade, sidebar emphasis, progress indicator) and applies its
//! start state. The returned [`TransitionRun`] reports a single completion
//! once every group has landed.
//!
//! At launch every section not taking part is put into its resting state
//! relative to the destination: hidden, words parked below (`+100`) when it
//! lies after the destination and above (`-100`) when it lies before. The
//! settled scene therefore depends on the current section only, and a forward
//! step followed by the matching backward step restores it exactly.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{EasingType, MotionConfig};
use crate::machine::{Direction, TransitionRequest};
use crate::motion::timing::scale_ms;
use crate::scene::section_label;
use crate::timeline::{Action, Channel, ClipEdge, Group, Step, Timeline, Tween, Value};
use crate::view::{BackgroundState, ClipInset, SidebarList, ViewModel, WordToken};

/// Word offset of a fully hidden word, in percent of its height
const HIDDEN_OFFSET: f32 = 100.0;

/// Easing of the sidebar emphasis
const SIDEBAR_EASING: EasingType = EasingType::Power2Out;

/// Easing of the progress fill
const PROGRESS_EASING: EasingType = EasingType::InOutCubic;

/// Builds and launches transition timelines
#[derive(Debug, Clone)]
pub struct TransitionOrchestrator {
    motion: MotionConfig,
    section_count: usize,
}

/// One launched transition
#[derive(Debug)]
pub struct TransitionRun {
    request: TransitionRequest,
    timeline: Timeline,
    reveals_text: bool,
}

impl TransitionRun {
    pub fn request(&self) -> TransitionRequest {
        self.request
    }

    /// Whether the entering section had words to reveal
    pub fn reveals_text(&self) -> bool {
        self.reveals_text
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Advance all groups by one frame; `true` once every group has finished
    pub fn advance(&mut self, dt: Duration, view: &mut dyn ViewModel) -> bool {
        self.timeline.advance(dt, view)
    }

    /// Done once every transition group has landed
    pub fn is_finished(&self) -> bool {
        Group::TRANSITION
            .into_iter()
            .all(|group| self.timeline.group_finished(group))
    }

    /// Drop every pending tween and step
    pub fn cancel(&mut self) {
        self.timeline.cancel();
    }
}

/// Position of word `i` (of `n`) in the stagger order: front-to-back going
/// forward, back-to-front going backward
fn stagger_rank(i: usize, n: usize, direction: Direction) -> u32 {
    let rank = match direction {
        Direction::Backward => n - 1 - i,
        _ => i,
    };
    rank as u32
}

fn stagger(rank: u32, step_ms: u64) -> Duration {
    Duration::from_millis(step_ms) * rank
}

/// Resting word offset of `section` while `current` is shown
fn resting_offset(section: usize, current: usize) -> f32 {
    if section < current {
        -HIDDEN_OFFSET
    } else {
        HIDDEN_OFFSET
    }
}

impl TransitionOrchestrator {
    pub fn new(motion: MotionConfig, section_count: usize) -> Self {
        Self {
            motion,
            section_count,
        }
    }

    fn text_duration(&self) -> Duration {
        Duration::from_millis(self.motion.text_duration_ms)
    }

    fn dim_opacity(&self) -> f32 {
        self.motion.dim_opacity
    }

    /// Progress fill for a section: `section / (N - 1)`, full for a single section
    pub fn progress_fill(&self, section: usize) -> f32 {
        if self.section_count <= 1 {
            1.0
        } else {
            section as f32 / (self.section_count - 1) as f32
        }
    }

    /// Build the timeline for `request`, apply its start state and return the run
    pub fn launch(&self, request: TransitionRequest, view: &mut dyn ViewModel) -> TransitionRun {
        let mut timeline = Timeline::new();

        let reveals_text = self.text_group(&request, view, &mut timeline);
        self.background_group(&request, view, &mut timeline);
        self.sidebar_group(request.to, view, &mut timeline);
        self.progress_group(request.to, view, &mut timeline);

        debug!(
            from = request.from,
            to = request.to,
            direction = ?request.direction,
            tweens = timeline.tween_count(),
            steps = timeline.step_count(),
            total_ms = timeline.total_duration().as_millis() as u64,
            "Transition timeline built"
        );

        timeline.advance(Duration::ZERO, view);

        TransitionRun {
            request,
            timeline,
            reveals_text,
        }
    }

    /// Put the view into the settled state for `section` without animating
    pub fn settle(&self, section: usize, view: &mut dyn ViewModel) {
        for s in 0..self.section_count {
            let shown = s == section;
            view.set_section_visible(s, shown);
            if let Some(n) = view.word_count(s) {
                let (offset, opacity) = if shown {
                    (0.0, 1.0)
                } else {
                    (resting_offset(s, section), 0.0)
                };
                for w in 0..n {
                    view.set_word_offset(WordToken::new(s, w), offset, opacity);
                }
            }
            if view.has_background(s) {
                let state = if shown {
                    BackgroundState::Active
                } else {
                    BackgroundState::Inactive
                };
                view.set_background_state(s, state);
                view.set_background_opacity(s, if shown { 1.0 } else { 0.0 });
                view.set_background_offset(s, 0.0);
                view.set_background_clip(s, ClipInset::NONE);
            }
        }

        for list in SidebarList::BOTH {
            for i in 0..view.sidebar_len(list) {
                let highlighted = i == section;
                view.set_highlighted(list, i, highlighted);
                let opacity = if highlighted { 1.0 } else { self.dim_opacity() };
                view.set_sidebar_opacity(list, i, opacity);
            }
        }

        if view.progress_fill().is_some() {
            view.set_progress_fill(self.progress_fill(section));
            view.set_progress_label(&section_label(section, self.section_count));
        }
    }

    /// Sidebar reveal played after mount: items fade in one by one to their
    /// settled opacity, the right-hand list trailing the left
    pub fn intro(
        &self,
        section: usize,
        view: &mut dyn ViewModel,
        stagger_ms: u64,
        right_delay_ms: u64,
    ) -> Timeline {
        let mut timeline = Timeline::new();
        let duration = Duration::from_millis(self.motion.sidebar_duration_ms);
        for list in SidebarList::BOTH {
            let lead = match list {
                SidebarList::Left => Duration::ZERO,
                SidebarList::Right => Duration::from_millis(right_delay_ms),
            };
            for i in 0..view.sidebar_len(list) {
                view.set_highlighted(list, i, i == section);
                view.set_sidebar_opacity(list, i, 0.0);
                let target = if i == section { 1.0 } else { self.dim_opacity() };
                timeline.push_tween(
                    Tween::scalar(
                        Group::Intro,
                        Channel::SidebarOpacity(list, i),
                        0.0,
                        target,
                        duration,
                        SIDEBAR_EASING,
                    )
                    .delayed(lead + stagger(i as u32, stagger_ms)),
                );
            }
        }
        timeline
    }

    /// Exiting and entering words; returns whether the entering section has words
    fn text_group(
        &self,
        request: &TransitionRequest,
        view: &mut dyn ViewModel,
        timeline: &mut Timeline,
    ) -> bool {
        let sign = request.direction.sign();
        let duration = self.text_duration();
        let easing = self.motion.easing;

        // Everything not involved goes to rest relative to the destination
        for s in (0..self.section_count).filter(|s| *s != request.from && *s != request.to) {
            timeline.push_step(Step::now(Group::Text, Action::SectionVisible(s, false)));
            if let Some(n) = view.word_count(s) {
                let rest = Value::Pair(resting_offset(s, request.to), 0.0);
                for w in 0..n {
                    timeline.push_step(Step::now(
                        Group::Text,
                        Action::Set(Channel::Word(WordToken::new(s, w)), rest),
                    ));
                }
            }
        }

        match view.word_count(request.from) {
            Some(n) => {
                let exit = scale_ms(self.motion.text_duration_ms, self.motion.text_exit_ratio);
                let mut last_end = Duration::ZERO;
                for w in 0..n {
                    let delay = stagger(
                        stagger_rank(w, n, request.direction),
                        self.motion.exit_stagger_ms,
                    );
                    let tween = Tween::word(
                        WordToken::new(request.from, w),
                        (0.0, 1.0),
                        (-HIDDEN_OFFSET * sign, 0.0),
                        delay,
                        exit,
                        easing,
                    );
                    last_end = last_end.max(tween.end());
                    timeline.push_tween(tween);
                }
                timeline.push_step(Step::at(
                    Group::Text,
                    last_end,
                    Action::SectionVisible(request.from, false),
                ));
            }
            None => {
                warn!(section = request.from, "No words for exiting section, skipping text exit");
                timeline.push_step(Step::now(
                    Group::Text,
                    Action::SectionVisible(request.from, false),
                ));
            }
        }

        match view.word_count(request.to) {
            Some(n) => {
                timeline.push_step(Step::now(Group::Text, Action::SectionVisible(request.to, true)));
                let start = (HIDDEN_OFFSET * sign, 0.0);
                for w in 0..n {
                    let token = WordToken::new(request.to, w);
                    timeline.push_step(Step::now(
                        Group::Text,
                        Action::Set(Channel::Word(token), Value::Pair(start.0, start.1)),
                    ));
                    let delay = stagger(
                        stagger_rank(w, n, request.direction),
                        self.motion.enter_stagger_ms,
                    );
                    timeline.push_tween(Tween::word(token, start, (0.0, 1.0), delay, duration, easing));
                }
                true
            }
            None => {
                warn!(section = request.to, "No words for entering section, skipping text reveal");
                timeline.push_step(Step::now(Group::Text, Action::SectionVisible(request.to, true)));
                false
            }
        }
    }

    /// Directional wipe of the entering layer, parallax fade of the exiting one
    fn background_group(
        &self,
        request: &TransitionRequest,
        view: &mut dyn ViewModel,
        timeline: &mut Timeline,
    ) {
        let sign = request.direction.sign();
        let duration = self.text_duration();
        let half = duration / 2;
        let easing = self.motion.easing;

        for s in (0..self.section_count).filter(|s| *s != request.from && *s != request.to) {
            let Some(opacity) = view.background_opacity(s) else {
                continue;
            };
            timeline.push_step(Step::now(
                Group::Background,
                Action::BackgroundState(s, BackgroundState::Inactive),
            ));
            if opacity > 0.0 {
                timeline.push_tween(Tween::scalar(
                    Group::Background,
                    Channel::BackgroundOpacity(s),
                    opacity,
                    0.0,
                    scale_ms(self.motion.text_duration_ms, self.motion.background_sweep_ratio),
                    easing,
                ));
            }
        }

        if view.has_background(request.to) {
            let (edge, clip) = match request.direction {
                Direction::Backward => (ClipEdge::Bottom, ClipInset::bottom(100.0)),
                _ => (ClipEdge::Top, ClipInset::top(100.0)),
            };
            let to = request.to;
            for action in [
                Action::BackgroundState(to, BackgroundState::Active),
                Action::Set(Channel::BackgroundOpacity(to), Value::Scalar(1.0)),
                Action::Set(Channel::BackgroundOffset(to), Value::Scalar(0.0)),
                Action::BackgroundClip(to, clip),
            ] {
                timeline.push_step(Step::now(Group::Background, action));
            }
            timeline.push_tween(Tween::scalar(
                Group::Background,
                Channel::BackgroundClip(to, edge),
                100.0,
                0.0,
                duration,
                easing,
            ));
        } else {
            warn!(section = request.to, "No background layer for entering section");
        }

        if view.has_background(request.from) {
            let from = request.from;
            timeline.push_step(Step::now(
                Group::Background,
                Action::BackgroundState(from, BackgroundState::Previous),
            ));
            timeline.push_tween(Tween::scalar(
                Group::Background,
                Channel::BackgroundOffset(from),
                0.0,
                self.motion.parallax_percent * sign,
                duration,
                easing,
            ));
            timeline.push_tween(
                Tween::scalar(
                    Group::Background,
                    Channel::BackgroundOpacity(from),
                    1.0,
                    0.0,
                    duration - half,
                    easing,
                )
                .delayed(half),
            );
            timeline.push_step(Step::at(
                Group::Background,
                duration,
                Action::BackgroundState(from, BackgroundState::Inactive),
            ));
            timeline.push_step(Step::at(
                Group::Background,
                duration,
                Action::Set(Channel::BackgroundOffset(from), Value::Scalar(0.0)),
            ));
        } else {
            warn!(section = request.from, "No background layer for exiting section");
        }
    }

    /// Highlight `section` in both lists and dim the rest; items already in
    /// their target state are left alone
    fn sidebar_group(&self, section: usize, view: &mut dyn ViewModel, timeline: &mut Timeline) {
        let duration = Duration::from_millis(self.motion.sidebar_duration_ms);
        for list in SidebarList::BOTH {
            let len = view.sidebar_len(list);
            if section >= len {
                warn!(?list, section, len, "Sidebar list has no item for section");
            }
            for i in 0..len {
                let highlighted = i == section;
                if view.is_highlighted(list, i) != Some(highlighted) {
                    timeline.push_step(Step::now(
                        Group::Sidebar,
                        Action::Highlight(list, i, highlighted),
                    ));
                }
                let target = if highlighted { 1.0 } else { self.dim_opacity() };
                if let Some(current) = view.sidebar_opacity(list, i) {
                    if current != target {
                        timeline.push_tween(Tween::scalar(
                            Group::Sidebar,
                            Channel::SidebarOpacity(list, i),
                            current,
                            target,
                            duration,
                            SIDEBAR_EASING,
                        ));
                    }
                }
            }
        }
    }

    fn progress_group(&self, section: usize, view: &mut dyn ViewModel, timeline: &mut Timeline) {
        let Some(current) = view.progress_fill() else {
            warn!("No progress indicator, skipping progress update");
            return;
        };
        let target = self.progress_fill(section);
        timeline.push_step(Step::now(
            Group::Progress,
            Action::ProgressLabel(section_label(section, self.section_count)),
        ));
        if current != target {
            timeline.push_tween(Tween::scalar(
                Group::Progress,
                Channel::ProgressFill,
                current,
                target,
                Duration::from_millis(self.motion.progress_duration_ms),
                PROGRESS_EASING,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::scene::Scene;

    const FRAME: Duration = Duration::from_millis(16);

    fn orchestrator() -> TransitionOrchestrator {
        TransitionOrchestrator::new(MotionConfig::default(), 10)
    }

    fn settled(section: usize) -> Scene {
        let mut scene = Scene::from_chapters(&AppConfig::default().chapters);
        orchestrator().settle(section, &mut scene);
        scene
    }

    fn run_to_end(run: &mut TransitionRun, view: &mut dyn ViewModel) {
        for _ in 0..1000 {
            if run.advance(FRAME, view) {
                return;
            }
        }
        panic!("transition never finished");
    }

    fn word_delays(run: &TransitionRun, section: usize) -> Vec<Duration> {
        run.timeline()
            .tweens()
            .filter(|t| matches!(t.channel, Channel::Word(token) if token.section == section))
            .map(|t| t.delay)
            .collect()
    }

    #[test]
    fn test_launch_builds_every_group() {
        let mut scene = settled(2);
        let run = orchestrator().launch(TransitionRequest::new(2, 3), &mut scene);
        for group in Group::TRANSITION {
            assert!(
                run.timeline().tweens().any(|t| t.group == group),
                "no tweens for {:?}",
                group
            );
        }
        assert!(run.reveals_text());
        assert!(!run.is_finished());
    }

    #[test]
    fn test_launch_applies_start_state() {
        let mut scene = settled(2);
        orchestrator().launch(TransitionRequest::new(2, 3), &mut scene);
        assert!(scene.sections[3].visible);
        assert!(scene.sections[2].visible);
        assert_eq!(scene.sections[3].words[0].offset, 100.0);
        assert_eq!(scene.sections[3].words[0].opacity, 0.0);
        assert_eq!(scene.backgrounds[3].state, BackgroundState::Active);
        assert_eq!(scene.backgrounds[3].clip, ClipInset::top(100.0));
        assert_eq!(scene.backgrounds[2].state, BackgroundState::Previous);
        assert_eq!(scene.progress.label, "04");
    }

    #[test]
    fn test_stagger_follows_direction() {
        // "Deep Knowing" -> "True Expression", two words each
        let mut scene = settled(2);
        let forward = orchestrator().launch(TransitionRequest::new(2, 3), &mut scene);
        assert_eq!(
            word_delays(&forward, 2),
            vec![Duration::ZERO, Duration::from_millis(30)]
        );
        assert_eq!(
            word_delays(&forward, 3),
            vec![Duration::ZERO, Duration::from_millis(50)]
        );

        let mut scene = settled(3);
        let backward = orchestrator().launch(TransitionRequest::new(3, 2), &mut scene);
        assert_eq!(
            word_delays(&backward, 3),
            vec![Duration::from_millis(30), Duration::ZERO]
        );
        assert_eq!(
            word_delays(&backward, 2),
            vec![Duration::from_millis(50), Duration::ZERO]
        );
    }

    #[test]
    fn test_exit_direction_matches_travel() {
        let mut scene = settled(5);
        let mut run = orchestrator().launch(TransitionRequest::new(5, 4), &mut scene);
        run_to_end(&mut run, &mut scene);
        assert!(scene.sections[5].words.iter().all(|w| w.offset == 100.0 && w.opacity == 0.0));
        assert!(scene.sections[4].words.iter().all(|w| w.offset == 0.0 && w.opacity == 1.0));
        assert!(!scene.sections[5].visible);
    }

    #[test]
    fn test_run_lands_on_settled_scene() {
        let mut scene = settled(2);
        let mut run = orchestrator().launch(TransitionRequest::new(2, 3), &mut scene);
        run_to_end(&mut run, &mut scene);
        assert_eq!(scene, settled(3));
    }

    #[test]
    fn test_forward_then_backward_restores_scene() {
        let start = settled(2);
        let mut scene = start.clone();
        let orchestrator = orchestrator();

        let mut run = orchestrator.launch(TransitionRequest::new(2, 3), &mut scene);
        run_to_end(&mut run, &mut scene);
        let mut run = orchestrator.launch(TransitionRequest::new(3, 2), &mut scene);
        run_to_end(&mut run, &mut scene);

        assert_eq!(scene, start);
    }

    #[test]
    fn test_jump_leaves_single_visible_section() {
        let mut scene = settled(0);
        let mut run = orchestrator().launch(TransitionRequest::new(0, 7), &mut scene);
        run_to_end(&mut run, &mut scene);
        assert_eq!(scene.visible_sections(), vec![7]);
        assert_eq!(scene.active_background(), Some(7));
        assert_eq!(scene.highlighted(SidebarList::Left), vec![7]);
        assert_eq!(scene.highlighted(SidebarList::Right), vec![7]);
        assert_eq!(scene, settled(7));
    }

    #[test]
    fn test_progress_reaches_last_section() {
        let mut scene = settled(0);
        let mut run = orchestrator().launch(TransitionRequest::new(0, 9), &mut scene);
        run_to_end(&mut run, &mut scene);
        assert_eq!(scene.progress.fill, 1.0);
        assert_eq!(scene.progress.label, "10");
    }

    #[test]
    fn test_progress_fill_values() {
        let orchestrator = orchestrator();
        assert_eq!(orchestrator.progress_fill(0), 0.0);
        assert_eq!(orchestrator.progress_fill(9), 1.0);
        assert!((orchestrator.progress_fill(3) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(TransitionOrchestrator::new(MotionConfig::default(), 1).progress_fill(0), 1.0);
    }

    #[test]
    fn test_sidebar_only_touches_changed_items() {
        let mut scene = settled(2);
        let run = orchestrator().launch(TransitionRequest::new(2, 3), &mut scene);
        let sidebar: Vec<&Tween> = run
            .timeline()
            .tweens()
            .filter(|t| t.group == Group::Sidebar)
            .collect();
        assert_eq!(sidebar.len(), 4);
        assert!(sidebar
            .iter()
            .all(|t| matches!(t.channel, Channel::SidebarOpacity(_, 2 | 3))));

        // Highlight already in place: the sidebar group has nothing to do
        let mut emphasized = settled(3);
        let run = orchestrator().launch(TransitionRequest::new(2, 3), &mut emphasized);
        assert!(run.timeline().tweens().all(|t| t.group != Group::Sidebar));
        assert_eq!(emphasized.highlighted(SidebarList::Right), vec![3]);
    }

    #[test]
    fn test_cancelled_run_stops_mutating() {
        let mut scene = settled(1);
        let mut run = orchestrator().launch(TransitionRequest::new(1, 2), &mut scene);
        run.advance(FRAME, &mut scene);
        run.cancel();
        let frozen = scene.clone();
        assert!(run.advance(FRAME * 10, &mut scene));
        assert_eq!(scene, frozen);
    }

    #[test]
    fn test_intro_reveals_sidebar() {
        let mut scene = settled(0);
        let mut intro = orchestrator().intro(0, &mut scene, 60, 200);
        assert!(scene.left.iter().all(|item| item.opacity == 0.0));
        for _ in 0..200 {
            if intro.advance(FRAME, &mut scene) {
                break;
            }
        }
        assert!(intro.is_finished());
        assert_eq!(scene, settled(0));
    }

    #[test]
    fn test_section_without_words_is_not_revealed() {
        let mut config = AppConfig::default();
        config.chapters[1].title = String::new();
        let mut scene = Scene::from_chapters(&config.chapters);
        let orchestrator = orchestrator();
        orchestrator.settle(0, &mut scene);

        let mut run = orchestrator.launch(TransitionRequest::new(0, 1), &mut scene);
        assert!(!run.reveals_text());
        run_to_end(&mut run, &mut scene);
        assert_eq!(scene.visible_sections(), vec![1]);
    }

    /// Scene without background layers or progress indicator
    struct Bare(Scene);

    impl ViewModel for Bare {
        fn word_count(&self, section: usize) -> Option<usize> {
            self.0.word_count(section)
        }
        fn background_opacity(&self, _section: usize) -> Option<f32> {
            None
        }
        fn sidebar_len(&self, list: SidebarList) -> usize {
            self.0.sidebar_len(list)
        }
        fn sidebar_opacity(&self, list: SidebarList, index: usize) -> Option<f32> {
            self.0.sidebar_opacity(list, index)
        }
        fn is_highlighted(&self, list: SidebarList, index: usize) -> Option<bool> {
            self.0.is_highlighted(list, index)
        }
        fn progress_fill(&self) -> Option<f32> {
            None
        }
        fn set_section_visible(&mut self, section: usize, visible: bool) {
            self.0.set_section_visible(section, visible)
        }
        fn set_word_offset(&mut self, token: WordToken, percent: f32, opacity: f32) {
            self.0.set_word_offset(token, percent, opacity)
        }
        fn set_background_state(&mut self, _index: usize, _state: BackgroundState) {
            panic!("no background layers");
        }
        fn set_background_opacity(&mut self, _index: usize, _opacity: f32) {
            panic!("no background layers");
        }
        fn set_background_offset(&mut self, _index: usize, _percent: f32) {
            panic!("no background layers");
        }
        fn set_background_clip(&mut self, _index: usize, _clip: ClipInset) {
            panic!("no background layers");
        }
        fn set_highlighted(&mut self, list: SidebarList, index: usize, highlighted: bool) {
            self.0.set_highlighted(list, index, highlighted)
        }
        fn set_sidebar_opacity(&mut self, list: SidebarList, index: usize, opacity: f32) {
            self.0.set_sidebar_opacity(list, index, opacity)
        }
        fn set_progress_fill(&mut self, _fill: f32) {
            panic!("no progress indicator");
        }
        fn set_progress_label(&mut self, _label: &str) {
            panic!("no progress indicator");
        }
    }

    #[test]
    fn test_missing_handles_are_skipped() {
        let mut view = Bare(Scene::from_chapters(&AppConfig::default().chapters));
        let orchestrator = orchestrator();
        orchestrator.settle(0, &mut view);

        let mut run = orchestrator.launch(TransitionRequest::new(0, 1), &mut view);
        assert!(run.timeline().tweens().all(|t| t.group != Group::Background));
        assert!(run.timeline().tweens().all(|t| t.group != Group::Progress));
        run_to_end(&mut run, &mut view);
        assert_eq!(view.0.visible_sections(), vec![1]);
        assert_eq!(view.0.highlighted(SidebarList::Left), vec![1]);
    }
}
