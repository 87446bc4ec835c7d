//! Navigation facade
//!
//! [`Navigator`] is the only public surface the front ends talk to. It maps
//! scroll progress to sections, feeds the state machine, and for every
//! accepted transition runs two halves side by side: a locked glide of the
//! scroll source to the destination boundary and the orchestrated animation
//! groups. The transition ends only when both halves are done.
//!
//! Everything advances from [`Navigator::tick`]; nothing blocks.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{AppConfig, MotionConfig};
use crate::machine::{decide, Decision, SectionMachine, TransitionRequest, TransitionState, Trigger};
use crate::mapping::ScrollMapping;
use crate::orchestrator::{TransitionOrchestrator, TransitionRun};
use crate::scroll::{GlideOptions, GlideTicket, ScrollEvent, ScrollSource};
use crate::sound::{Cue, SoundCue};
use crate::timeline::Timeline;
use crate::view::{SidebarList, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlideStatus {
    Pending(GlideTicket),
    Done,
}

#[derive(Debug)]
struct ActiveTransition {
    run: TransitionRun,
    glide: GlideStatus,
}

impl ActiveTransition {
    fn is_done(&self) -> bool {
        self.glide == GlideStatus::Done && self.run.is_finished()
    }
}

pub struct Navigator<S, V, A>
where
    S: ScrollSource,
    V: ViewModel,
    A: SoundCue,
{
    machine: SectionMachine,
    orchestrator: TransitionOrchestrator,
    mapping: ScrollMapping,
    motion: MotionConfig,
    text_change_delay: Duration,
    scroll: S,
    view: V,
    sound: A,
    active: Option<ActiveTransition>,
    intro: Option<Timeline>,
    /// A scroll sample was dropped while a transition was in flight
    sample_deferred: bool,
    alive: bool,
}

impl<S, V, A> Navigator<S, V, A>
where
    S: ScrollSource,
    V: ViewModel,
    A: SoundCue,
{
    /// Mount the presentation at section 0
    pub fn new(config: &AppConfig, scroll: S, mut view: V, mut sound: A) -> crate::Result<Self> {
        let section_count = config.section_count();
        let mapping = ScrollMapping::uniform(section_count, config.presentation.region_length)?;
        let orchestrator = TransitionOrchestrator::new(config.motion.clone(), section_count);

        orchestrator.settle(0, &mut view);
        let intro = config.presentation.intro_reveal.then(|| {
            orchestrator.intro(
                0,
                &mut view,
                config.presentation.intro_stagger_ms,
                config.presentation.intro_right_delay_ms,
            )
        });
        sound.set_enabled(config.sound.enabled);

        info!(sections = section_count, "Presentation mounted");

        Ok(Self {
            machine: SectionMachine::new(),
            orchestrator,
            mapping,
            motion: config.motion.clone(),
            text_change_delay: Duration::from_millis(config.sound.text_change_delay_ms),
            scroll,
            view,
            sound,
            active: None,
            intro,
            sample_deferred: false,
            alive: true,
        })
    }

    /// Feed one continuous scroll sample
    ///
    /// Steps at most one section toward the sampled position. Samples arriving
    /// mid-transition are coalesced; the latest one is re-evaluated once the
    /// transition completes.
    pub fn request_scroll(&mut self, progress: f64) -> Option<TransitionRequest> {
        if !self.alive {
            return None;
        }
        let target = self.mapping.section_at(progress);
        let Some(request) = self.machine.accept(Trigger::ScrollSample { target, progress }) else {
            if self.machine.state().in_flight {
                self.sample_deferred = true;
            }
            return None;
        };
        self.start(request, self.motion.step_glide_ms);
        Some(request)
    }

    /// Navigate straight to a section; out-of-range indices are clamped
    pub fn request_jump(&mut self, index: usize) -> Option<TransitionRequest> {
        if !self.alive {
            return None;
        }
        let trigger = Trigger::Jump {
            index: self.mapping.clamp_section(index),
        };
        if let Decision::Start(_) = decide(self.machine.state(), trigger) {
            self.sound.play(Cue::Click, Duration::ZERO);
        }
        let request = self.machine.accept(trigger)?;
        self.start(request, self.motion.jump_glide_ms);
        Some(request)
    }

    /// Pointer entered a sidebar item
    pub fn hover(&mut self, list: SidebarList, index: usize) {
        if !self.alive || index >= self.view.sidebar_len(list) {
            return;
        }
        self.sound.play(Cue::Hover, Duration::ZERO);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if !self.alive {
            return;
        }
        self.sound.set_enabled(enabled);
    }

    /// Subscriber entry point for the scroll source
    pub fn handle_scroll_event(&mut self, event: ScrollEvent) {
        if !self.alive {
            return;
        }
        match event {
            ScrollEvent::Progress(progress) => {
                self.request_scroll(progress);
            }
            ScrollEvent::GlideComplete(ticket) => {
                match self.active.as_mut() {
                    Some(active) if active.glide == GlideStatus::Pending(ticket) => {
                        active.glide = GlideStatus::Done;
                    }
                    _ => debug!(?ticket, "Glide completion without matching transition"),
                }
                self.try_complete();
            }
        }
    }

    /// Advance the frame clock
    pub fn tick(&mut self, dt: Duration) {
        if !self.alive {
            return;
        }
        for event in self.scroll.advance(dt) {
            self.handle_scroll_event(event);
        }

        if let Some(intro) = self.intro.as_mut() {
            if intro.advance(dt, &mut self.view) {
                self.intro = None;
            }
        }

        if let Some(active) = self.active.as_mut() {
            active.run.advance(dt, &mut self.view);
        }
        self.try_complete();
    }

    /// Tear down: cancel everything pending and refuse later input
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        if let Some(mut active) = self.active.take() {
            active.run.cancel();
        }
        if let Some(mut intro) = self.intro.take() {
            intro.cancel();
        }
        self.scroll.dispose();
        self.sound.set_enabled(false);
        info!("Presentation disposed");
    }

    fn start(&mut self, request: TransitionRequest, glide_ms: u64) {
        self.sample_deferred = false;
        if let Some(mut intro) = self.intro.take() {
            intro.finish(&mut self.view);
        }

        info!(
            from = request.from,
            to = request.to,
            direction = ?request.direction,
            "Transition started"
        );

        let options = GlideOptions {
            duration: Duration::from_millis(glide_ms),
            easing: self.motion.glide_easing,
            lock: true,
        };
        let glide = match self.scroll.glide_to(self.mapping.boundary(request.to), options) {
            Ok(ticket) => GlideStatus::Pending(ticket),
            Err(e) => {
                warn!(error = %e, "Scroll source unavailable, skipping glide");
                GlideStatus::Done
            }
        };

        let run = self.orchestrator.launch(request, &mut self.view);
        if run.reveals_text() {
            self.sound.play(Cue::TextChange, self.text_change_delay);
        }

        self.active = Some(ActiveTransition { run, glide });
        self.try_complete();
    }

    fn try_complete(&mut self) {
        if !self.active.as_ref().is_some_and(ActiveTransition::is_done) {
            return;
        }
        if let Some(active) = self.active.take() {
            let request = active.run.request();
            if self.machine.complete(&request) {
                info!(section = request.to, "Transition complete");
                if std::mem::take(&mut self.sample_deferred) {
                    let progress = self.machine.state().last_progress;
                    debug!(progress, "Re-evaluating scroll sample held during transition");
                    self.request_scroll(progress);
                }
            }
        }
    }

    pub fn state(&self) -> &TransitionState {
        self.machine.state()
    }

    pub fn current_section(&self) -> usize {
        self.machine.state().current_section
    }

    pub fn is_in_flight(&self) -> bool {
        self.machine.state().in_flight
    }

    /// Request of the transition currently running
    pub fn active_request(&self) -> Option<TransitionRequest> {
        self.active.as_ref().map(|a| a.run.request())
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn intro_running(&self) -> bool {
        self.intro.is_some()
    }

    pub fn section_count(&self) -> usize {
        self.mapping.section_count()
    }

    pub fn mapping(&self) -> &ScrollMapping {
        &self.mapping
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn scroll(&self) -> &S {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut S {
        &mut self.scroll
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut A {
        &mut self.sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::scroll::{ScrollError, SmoothScroller};
    use crate::view::{BackgroundState, ClipInset, WordToken};

    const FRAME: Duration = Duration::from_millis(16);

    /// Scroll source whose glides land on the next frame
    #[derive(Default)]
    struct MockScroll {
        glides: Vec<(f64, GlideOptions)>,
        events: Vec<ScrollEvent>,
        next: u64,
        unavailable: bool,
        hold: bool,
        disposed: bool,
    }

    impl ScrollSource for MockScroll {
        fn glide_to(&mut self, offset: f64, options: GlideOptions) -> Result<GlideTicket, ScrollError> {
            if self.unavailable || self.disposed {
                return Err(ScrollError::Disposed);
            }
            let ticket = GlideTicket(self.next);
            self.next += 1;
            self.glides.push((offset, options));
            if !self.hold {
                self.events.push(ScrollEvent::GlideComplete(ticket));
            }
            Ok(ticket)
        }

        fn advance(&mut self, _dt: Duration) -> Vec<ScrollEvent> {
            std::mem::take(&mut self.events)
        }

        fn dispose(&mut self) {
            self.disposed = true;
        }
    }

    #[derive(Default)]
    struct RecordingSound {
        played: Vec<(Cue, Duration)>,
        enabled: bool,
    }

    impl SoundCue for RecordingSound {
        fn play(&mut self, cue: Cue, delay: Duration) {
            self.played.push((cue, delay));
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
    }

    /// Scene that counts every mutation
    struct CountingView {
        scene: Scene,
        writes: usize,
    }

    impl ViewModel for CountingView {
        fn word_count(&self, section: usize) -> Option<usize> {
            self.scene.word_count(section)
        }
        fn background_opacity(&self, section: usize) -> Option<f32> {
            self.scene.background_opacity(section)
        }
        fn sidebar_len(&self, list: SidebarList) -> usize {
            self.scene.sidebar_len(list)
        }
        fn sidebar_opacity(&self, list: SidebarList, index: usize) -> Option<f32> {
            self.scene.sidebar_opacity(list, index)
        }
        fn is_highlighted(&self, list: SidebarList, index: usize) -> Option<bool> {
            self.scene.is_highlighted(list, index)
        }
        fn progress_fill(&self) -> Option<f32> {
            self.scene.progress_fill()
        }
        fn set_section_visible(&mut self, section: usize, visible: bool) {
            self.writes += 1;
            self.scene.set_section_visible(section, visible)
        }
        fn set_word_offset(&mut self, token: WordToken, percent: f32, opacity: f32) {
            self.writes += 1;
            self.scene.set_word_offset(token, percent, opacity)
        }
        fn set_background_state(&mut self, index: usize, state: BackgroundState) {
            self.writes += 1;
            self.scene.set_background_state(index, state)
        }
        fn set_background_opacity(&mut self, index: usize, opacity: f32) {
            self.writes += 1;
            self.scene.set_background_opacity(index, opacity)
        }
        fn set_background_offset(&mut self, index: usize, percent: f32) {
            self.writes += 1;
            self.scene.set_background_offset(index, percent)
        }
        fn set_background_clip(&mut self, index: usize, clip: ClipInset) {
            self.writes += 1;
            self.scene.set_background_clip(index, clip)
        }
        fn set_highlighted(&mut self, list: SidebarList, index: usize, highlighted: bool) {
            self.writes += 1;
            self.scene.set_highlighted(list, index, highlighted)
        }
        fn set_sidebar_opacity(&mut self, list: SidebarList, index: usize, opacity: f32) {
            self.writes += 1;
            self.scene.set_sidebar_opacity(list, index, opacity)
        }
        fn set_progress_fill(&mut self, fill: f32) {
            self.writes += 1;
            self.scene.set_progress_fill(fill)
        }
        fn set_progress_label(&mut self, label: &str) {
            self.writes += 1;
            self.scene.set_progress_label(label)
        }
    }

    type TestNavigator = Navigator<MockScroll, CountingView, RecordingSound>;

    fn config(intro: bool) -> AppConfig {
        let mut config = AppConfig::default();
        config.presentation.intro_reveal = intro;
        config.sound.enabled = true;
        config
    }

    fn mount_with(config: &AppConfig, scroll: MockScroll) -> TestNavigator {
        let view = CountingView {
            scene: Scene::from_chapters(&config.chapters),
            writes: 0,
        };
        Navigator::new(config, scroll, view, RecordingSound::default()).unwrap()
    }

    fn mount() -> TestNavigator {
        mount_with(&config(false), MockScroll::default())
    }

    fn settle(nav: &mut TestNavigator) {
        for _ in 0..500 {
            nav.tick(FRAME);
            if !nav.is_in_flight() && !nav.intro_running() {
                return;
            }
        }
        panic!("navigator never went idle");
    }

    /// Midpoint progress of a section
    fn progress_of(nav: &TestNavigator, section: usize) -> f64 {
        (section as f64 + 0.5) / nav.section_count() as f64
    }

    #[test]
    fn test_mount_shows_first_section() {
        let nav = mount();
        let scene = &nav.view().scene;
        assert_eq!(nav.current_section(), 0);
        assert_eq!(scene.visible_sections(), vec![0]);
        assert_eq!(scene.active_background(), Some(0));
        assert_eq!(scene.highlighted(SidebarList::Left), vec![0]);
        assert_eq!(scene.progress.label, "01");
        assert!(nav.sound().enabled);
    }

    /// Record the running request whenever it changes
    fn observe(nav: &TestNavigator, episodes: &mut Vec<TransitionRequest>) {
        if let Some(request) = nav.active_request() {
            if episodes.last() != Some(&request) {
                episodes.push(request);
            }
        }
    }

    #[test]
    fn test_sweep_visits_every_section_one_step_at_a_time() {
        let mut nav = mount();
        let mut episodes = Vec::new();

        let mut p = 0.05;
        while p <= 0.95 + 1e-9 {
            nav.request_scroll(p);
            observe(&nav, &mut episodes);
            nav.tick(FRAME);
            observe(&nav, &mut episodes);
            p += 0.01;
        }
        // Keep holding at the end of the sweep until the last step lands
        for _ in 0..2000 {
            if nav.current_section() == 9 && !nav.is_in_flight() {
                break;
            }
            nav.request_scroll(0.95);
            observe(&nav, &mut episodes);
            nav.tick(FRAME);
            observe(&nav, &mut episodes);
        }

        assert_eq!(nav.current_section(), 9);
        assert_eq!(episodes.len(), 9);
        for (i, request) in episodes.iter().enumerate() {
            assert_eq!(*request, TransitionRequest::new(i, i + 1));
        }
    }

    #[test]
    fn test_settled_sweep_steps_once_per_sample() {
        let mut nav = mount();
        let mut episodes = Vec::new();

        for i in 0..10 {
            let p = 0.05 + 0.1 * i as f64;
            episodes.extend(nav.request_scroll(p));
            settle(&mut nav);
            assert_eq!(nav.current_section(), i);
        }

        assert_eq!(episodes.len(), 9);
        for (i, request) in episodes.iter().enumerate() {
            assert_eq!(*request, TransitionRequest::new(i, i + 1));
        }
        assert_eq!(nav.view().scene.visible_sections(), vec![9]);
    }

    #[test]
    fn test_sample_held_during_transition_is_replayed() {
        let mut nav = mount();
        nav.request_scroll(progress_of(&nav, 1));
        nav.tick(FRAME);
        // Glide has landed, the animation is still running
        assert!(nav.is_in_flight());
        assert_eq!(nav.request_scroll(progress_of(&nav, 5)), None);

        settle(&mut nav);

        assert_eq!(nav.current_section(), 2);
        let glides = &nav.scroll().glides;
        assert_eq!(glides.len(), 2);
        assert_eq!(glides[1].0, nav.mapping().boundary(2));
    }

    #[test]
    fn test_no_replay_without_held_sample() {
        let mut nav = mount();
        nav.request_scroll(progress_of(&nav, 1));
        settle(&mut nav);
        nav.request_jump(4);
        settle(&mut nav);

        // The last sample (section 1) was taken, not held, so the jump stands
        assert_eq!(nav.current_section(), 4);
        assert_eq!(nav.scroll().glides.len(), 2);
    }

    #[test]
    fn test_scroll_after_glide_lands_keeps_section_in_sync() {
        let mut config = config(false);
        config.scroll.smooth_enabled = false;
        let scroll = SmoothScroller::new(config.scroll.clone(), config.presentation.region_length);
        let scene = Scene::from_chapters(&config.chapters);
        let mut nav = Navigator::new(&config, scroll, scene, RecordingSound::default()).unwrap();

        assert!(nav.scroll_mut().scroll_by(1100.0));
        nav.tick(FRAME);
        assert_eq!(nav.active_request(), Some(TransitionRequest::new(0, 1)));
        for _ in 0..200 {
            if !nav.scroll().is_locked() {
                break;
            }
            nav.tick(FRAME);
        }
        assert!(!nav.scroll().is_locked());
        assert!(nav.is_in_flight());

        assert!(nav.scroll_mut().scroll_by(4000.0));
        for _ in 0..300 {
            nav.tick(FRAME);
        }

        assert!(!nav.is_in_flight());
        let scrolled_to = nav.mapping().section_at(nav.scroll().progress());
        assert_eq!(nav.current_section(), scrolled_to);
        assert_eq!(nav.current_section(), 2);
    }

    #[test]
    fn test_jump_is_a_single_episode() {
        let mut nav = mount();
        nav.request_jump(2);
        settle(&mut nav);

        let request = nav.request_jump(5);
        assert_eq!(request, Some(TransitionRequest::new(2, 5)));
        let glides_before = nav.scroll().glides.len();
        settle(&mut nav);

        assert_eq!(nav.current_section(), 5);
        assert_eq!(nav.scroll().glides.len(), glides_before);
        assert_eq!(nav.view().scene.visible_sections(), vec![5]);
    }

    #[test]
    fn test_back_to_back_jumps_equal_first_alone() {
        let mut both = mount();
        assert!(both.request_jump(3).is_some());
        assert!(both.request_jump(7).is_none());
        settle(&mut both);

        let mut single = mount();
        single.request_jump(3);
        settle(&mut single);

        assert_eq!(both.current_section(), 3);
        assert_eq!(both.view().scene, single.view().scene);
        assert_eq!(both.scroll().glides.len(), 1);
        let clicks = both.sound().played.iter().filter(|(c, _)| *c == Cue::Click).count();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn test_forward_then_backward_restores_scene() {
        let mut nav = mount();
        nav.request_jump(2);
        settle(&mut nav);
        let snapshot = nav.view().scene.clone();

        let p = progress_of(&nav, 3);
        assert_eq!(nav.request_scroll(p), Some(TransitionRequest::new(2, 3)));
        settle(&mut nav);
        let p = progress_of(&nav, 2);
        assert_eq!(nav.request_scroll(p), Some(TransitionRequest::new(3, 2)));
        settle(&mut nav);

        assert_eq!(nav.view().scene, snapshot);
    }

    #[test]
    fn test_late_completion_after_dispose_changes_nothing() {
        let scroll = MockScroll {
            hold: true,
            ..Default::default()
        };
        let mut nav = mount_with(&config(false), scroll);
        nav.request_jump(4);
        nav.tick(FRAME);
        nav.dispose();

        let writes = nav.view().writes;
        let state = nav.state().clone();
        let played = nav.sound().played.len();

        nav.handle_scroll_event(ScrollEvent::GlideComplete(GlideTicket(0)));
        nav.tick(Duration::from_secs(5));
        nav.request_jump(1);
        nav.request_scroll(0.9);
        nav.hover(SidebarList::Left, 2);

        assert_eq!(nav.view().writes, writes);
        assert_eq!(nav.state(), &state);
        assert_eq!(nav.sound().played.len(), played);
        assert!(!nav.sound().enabled);
        assert!(nav.scroll().disposed);
    }

    #[test]
    fn test_progress_indicator_at_section_three() {
        let mut nav = mount();
        nav.request_jump(3);
        settle(&mut nav);
        let progress = &nav.view().scene.progress;
        assert!((progress.fill - 3.0 / 9.0).abs() < 1e-6);
        assert_eq!(progress.label, "04");
    }

    #[test]
    fn test_transition_waits_for_glide() {
        let scroll = MockScroll {
            hold: true,
            ..Default::default()
        };
        let mut nav = mount_with(&config(false), scroll);
        nav.request_jump(1);
        for _ in 0..200 {
            nav.tick(FRAME);
        }
        assert!(nav.is_in_flight());
        assert_eq!(nav.current_section(), 0);

        // A completion for some other glide is ignored
        nav.handle_scroll_event(ScrollEvent::GlideComplete(GlideTicket(42)));
        assert!(nav.is_in_flight());

        nav.handle_scroll_event(ScrollEvent::GlideComplete(GlideTicket(0)));
        assert!(!nav.is_in_flight());
        assert_eq!(nav.current_section(), 1);
    }

    #[test]
    fn test_transition_waits_for_animation() {
        let mut nav = mount();
        nav.request_jump(1);
        nav.tick(FRAME);
        // Glide landed on the first frame, the text is still moving
        assert!(nav.is_in_flight());
        settle(&mut nav);
        assert_eq!(nav.current_section(), 1);
    }

    #[test]
    fn test_unavailable_scroll_source_does_not_stall() {
        let scroll = MockScroll {
            unavailable: true,
            ..Default::default()
        };
        let mut nav = mount_with(&config(false), scroll);
        nav.request_jump(6);
        settle(&mut nav);
        assert_eq!(nav.current_section(), 6);
    }

    #[test]
    fn test_glide_targets_section_boundary() {
        let mut nav = mount();
        nav.request_scroll(progress_of(&nav, 1));
        settle(&mut nav);
        nav.request_jump(8);
        settle(&mut nav);

        let glides = &nav.scroll().glides;
        assert_eq!(glides[0].0, nav.mapping().boundary(1));
        assert_eq!(glides[0].1.duration, Duration::from_millis(600));
        assert!(glides[0].1.lock);
        assert_eq!(glides[1].0, nav.mapping().boundary(8));
        assert_eq!(glides[1].1.duration, Duration::from_millis(800));
    }

    #[test]
    fn test_jump_is_clamped() {
        let mut nav = mount();
        assert_eq!(nav.request_jump(99), Some(TransitionRequest::new(0, 9)));
        settle(&mut nav);
        assert_eq!(nav.current_section(), 9);
    }

    #[test]
    fn test_click_only_for_accepted_jumps() {
        let mut nav = mount();
        nav.request_jump(0);
        assert!(nav.sound().played.is_empty());

        nav.request_jump(2);
        nav.request_jump(5);
        let cues: Vec<Cue> = nav.sound().played.iter().map(|(c, _)| *c).collect();
        assert_eq!(cues, vec![Cue::Click, Cue::TextChange]);
        assert_eq!(nav.sound().played[1].1, Duration::from_millis(250));
    }

    #[test]
    fn test_hover_plays_cue_for_existing_items() {
        let mut nav = mount();
        nav.hover(SidebarList::Right, 3);
        nav.hover(SidebarList::Right, 30);
        assert_eq!(nav.sound().played, vec![(Cue::Hover, Duration::ZERO)]);
    }

    #[test]
    fn test_intro_is_finished_by_first_transition() {
        let mut nav = mount_with(&config(true), MockScroll::default());
        assert!(nav.intro_running());
        assert!(nav.view().scene.left.iter().all(|item| item.opacity == 0.0));

        nav.request_jump(4);
        assert!(!nav.intro_running());
        settle(&mut nav);

        let mut plain = mount();
        plain.request_jump(4);
        settle(&mut plain);
        assert_eq!(nav.view().scene, plain.view().scene);
    }

    #[test]
    fn test_intro_plays_out_on_its_own() {
        let mut nav = mount_with(&config(true), MockScroll::default());
        settle(&mut nav);
        assert!(!nav.intro_running());
        assert_eq!(nav.view().scene, mount().view().scene);
    }
}
