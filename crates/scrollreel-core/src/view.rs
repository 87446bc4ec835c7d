//! Rendering collaborator interface
//!
//! The orchestrator never looks anything up by name: every handle is addressed
//! by section index, word position or list position. Queries report which
//! handles exist so missing ones can be skipped instead of failing.

use serde::Serialize;

/// One word of a section's featured title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WordToken {
    pub section: usize,
    pub word: usize,
}

impl WordToken {
    pub fn new(section: usize, word: usize) -> Self {
        Self { section, word }
    }
}

/// The two chapter lists flanking the featured title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarList {
    Left,
    Right,
}

impl SidebarList {
    pub const BOTH: [SidebarList; 2] = [SidebarList::Left, SidebarList::Right];
}

/// Stacking role of a background layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundState {
    /// Current section's layer, drawn on top
    Active,
    /// Layer being left, drawn under the active one while it fades
    Previous,
    #[default]
    Inactive,
}

/// Clip of a background layer, as insets in percent of its height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ClipInset {
    pub top: f32,
    pub bottom: f32,
}

impl ClipInset {
    /// Fully uncovered
    pub const NONE: ClipInset = ClipInset {
        top: 0.0,
        bottom: 0.0,
    };

    pub fn top(percent: f32) -> Self {
        Self {
            top: percent,
            bottom: 0.0,
        }
    }

    pub fn bottom(percent: f32) -> Self {
        Self {
            top: 0.0,
            bottom: percent,
        }
    }

    /// Visible fraction of the layer
    pub fn visible_fraction(&self) -> f32 {
        (1.0 - (self.top + self.bottom) / 100.0).clamp(0.0, 1.0)
    }
}

/// Index-addressed rendering surface driven by the orchestrator
pub trait ViewModel {
    /// Number of word tokens for a section, `None` when the section has no title handle
    fn word_count(&self, section: usize) -> Option<usize>;

    /// Current opacity of a background layer, `None` when the layer is missing
    fn background_opacity(&self, section: usize) -> Option<f32>;

    /// Whether a background layer exists for a section
    fn has_background(&self, section: usize) -> bool {
        self.background_opacity(section).is_some()
    }

    /// Number of items in one sidebar list
    fn sidebar_len(&self, list: SidebarList) -> usize;

    fn sidebar_opacity(&self, list: SidebarList, index: usize) -> Option<f32>;

    fn is_highlighted(&self, list: SidebarList, index: usize) -> Option<bool>;

    /// Current fill of the progress indicator, `None` when there is none
    fn progress_fill(&self) -> Option<f32>;

    fn set_section_visible(&mut self, section: usize, visible: bool);

    /// Vertical word offset in percent of the word height, plus opacity
    fn set_word_offset(&mut self, token: WordToken, percent: f32, opacity: f32);

    fn set_background_state(&mut self, index: usize, state: BackgroundState);

    fn set_background_opacity(&mut self, index: usize, opacity: f32);

    /// Parallax shift in percent of the layer height
    fn set_background_offset(&mut self, index: usize, percent: f32);

    fn set_background_clip(&mut self, index: usize, clip: ClipInset);

    fn set_highlighted(&mut self, list: SidebarList, index: usize, highlighted: bool);

    fn set_sidebar_opacity(&mut self, list: SidebarList, index: usize, opacity: f32);

    /// Fill ratio in [0, 1]
    fn set_progress_fill(&mut self, fill: f32);

    fn set_progress_label(&mut self, label: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_visible_fraction() {
        assert_eq!(ClipInset::NONE.visible_fraction(), 1.0);
        assert_eq!(ClipInset::top(100.0).visible_fraction(), 0.0);
        assert_eq!(ClipInset::bottom(25.0).visible_fraction(), 0.75);
    }
}
