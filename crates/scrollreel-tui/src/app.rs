use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ratatui::layout::Rect;
use scrollreel_core::{
    AppConfig, CueQueue, FiredCue, Navigator, Scene, SidebarList, SmoothScroller, ViewModel,
};
use tracing::debug;

use crate::layout::ScreenLayout;
use crate::theme::Theme;

/// Navigator wired to the terminal collaborators
pub type Presentation = Navigator<SmoothScroller, Scene, CueQueue>;

/// How long a fired cue stays visible in the status bar
const CUE_DISPLAY: Duration = Duration::from_millis(1200);

/// Chapter list holding the keyboard cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Left,
    Right,
}

impl Focus {
    pub fn list(self) -> SidebarList {
        match self {
            Focus::Left => SidebarList::Left,
            Focus::Right => SidebarList::Right,
        }
    }
}

/// Application state
pub struct App {
    pub navigator: Presentation,
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub focus: Focus,
    /// Keyboard cursor inside the focused list
    pub cursor: usize,
    pub layout: ScreenLayout,
    pub status_message: Option<String>,
    pub last_cue: Option<FiredCue>,
    cue_age: Duration,
    hovered: Option<(SidebarList, usize)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Result<Self> {
        let scroll = SmoothScroller::new(config.scroll.clone(), config.presentation.region_length);
        let scene = Scene::from_chapters(&config.chapters);
        let sound = CueQueue::new(config.sound.clone());
        let navigator = Navigator::new(&config, scroll, scene, sound)?;

        Ok(Self {
            navigator,
            config,
            theme,
            focus: Focus::Left,
            cursor: 0,
            layout: ScreenLayout::default(),
            status_message: None,
            last_cue: None,
            cue_age: Duration::ZERO,
            hovered: None,
            should_quit: false,
        })
    }

    pub fn scene(&self) -> &Scene {
        self.navigator.view()
    }

    pub fn current_section(&self) -> usize {
        self.navigator.current_section()
    }

    pub fn section_count(&self) -> usize {
        self.navigator.section_count()
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.navigator.sound().is_enabled()
    }

    /// Whether anything is still moving; the run loop idles otherwise
    pub fn is_animating(&self) -> bool {
        self.navigator.is_in_flight()
            || self.navigator.intro_running()
            || self.navigator.scroll().needs_update()
            || self.navigator.sound().pending() > 0
    }

    /// Advance one frame; returns the cues that fired during it
    pub fn tick(&mut self, dt: Duration) -> Vec<FiredCue> {
        self.navigator.tick(dt);

        let fired = self.navigator.sound_mut().advance(dt);
        for cue in &fired {
            debug!(cue = cue.cue.name(), volume = cue.volume, "Cue fired");
        }
        match fired.last() {
            Some(cue) => {
                self.last_cue = Some(*cue);
                self.cue_age = Duration::ZERO;
            }
            None => {
                self.cue_age = self.cue_age.saturating_add(dt);
                if self.cue_age > CUE_DISPLAY {
                    self.last_cue = None;
                }
            }
        }
        fired
    }

    /// Recompute geometry for a new terminal size
    pub fn set_viewport(&mut self, area: Rect) {
        self.layout = ScreenLayout::new(area);
    }

    /// One wheel notch or scroll key
    pub fn scroll(&mut self, down: bool) {
        if self.navigator.scroll().is_locked() {
            debug!(down, "Scroll input ignored while gliding");
            return;
        }
        self.navigator.scroll_mut().wheel(down);
    }

    pub fn jump(&mut self, index: usize) {
        let index = index.min(self.section_count().saturating_sub(1));
        self.cursor = index;
        if self.navigator.request_jump(index).is_none() {
            debug!(index, "Jump not taken");
        }
    }

    pub fn jump_to_cursor(&mut self) {
        self.jump(self.cursor);
    }

    pub fn jump_first(&mut self) {
        self.jump(0);
    }

    pub fn jump_last(&mut self) {
        self.jump(self.section_count().saturating_sub(1));
    }

    fn list_len(&self) -> usize {
        self.scene().sidebar_len(self.focus.list())
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.list_len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn focus_left(&mut self) {
        self.focus = Focus::Left;
        self.clamp_cursor();
    }

    pub fn focus_right(&mut self) {
        self.focus = Focus::Right;
        self.clamp_cursor();
    }

    pub fn toggle_focus(&mut self) {
        match self.focus {
            Focus::Left => self.focus_right(),
            Focus::Right => self.focus_left(),
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.list_len().saturating_sub(1));
    }

    pub fn toggle_sound(&mut self) {
        let enabled = !self.is_sound_enabled();
        self.navigator.set_sound_enabled(enabled);
        self.set_status(if enabled { "Sound on" } else { "Sound off" });
    }

    fn item_at(&self, column: u16, row: u16) -> Option<(SidebarList, usize)> {
        let scene = self.scene();
        let lens = SidebarList::BOTH.map(|list| scene.sidebar_len(list));
        self.layout.item_at(column, row, lens)
    }

    /// Pointer moved; plays the hover cue once per item entered
    pub fn hover_at(&mut self, column: u16, row: u16) {
        let item = self.item_at(column, row);
        if item == self.hovered {
            return;
        }
        self.hovered = item;
        if let Some((list, index)) = item {
            self.navigator.hover(list, index);
        }
    }

    pub fn click_at(&mut self, column: u16, row: u16) {
        if let Some((list, index)) = self.item_at(column, row) {
            self.focus = match list {
                SidebarList::Left => Focus::Left,
                SidebarList::Right => Focus::Right,
            };
            self.jump(index);
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn quit(&mut self) {
        self.navigator.dispose();
        self.should_quit = true;
    }
}
