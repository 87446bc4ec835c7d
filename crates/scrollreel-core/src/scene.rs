//! In-memory view model
//!
//! Holds the complete visual state of the presentation as plain values. The
//! terminal front end renders from it, and tests compare snapshots of it.

use serde::Serialize;

use crate::config::ChapterConfig;
use crate::view::{BackgroundState, ClipInset, SidebarList, ViewModel, WordToken};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordState {
    pub text: String,
    /// Vertical offset in percent of the word height
    pub offset: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScene {
    pub title: String,
    pub words: Vec<WordState>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerScene {
    pub name: String,
    pub state: BackgroundState,
    pub opacity: f32,
    pub offset: f32,
    pub clip: ClipInset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarItem {
    pub label: String,
    pub highlighted: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressScene {
    pub fill: f32,
    pub label: String,
    pub total_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub sections: Vec<SectionScene>,
    pub backgrounds: Vec<LayerScene>,
    pub left: Vec<SidebarItem>,
    pub right: Vec<SidebarItem>,
    pub progress: ProgressScene,
}

/// Split a title into animatable words
pub fn split_words(title: &str) -> Vec<String> {
    title.split_whitespace().map(str::to_string).collect()
}

/// Section number as shown by the progress indicator ("04", "10", "120")
pub fn section_label(section: usize, section_count: usize) -> String {
    let width = section_count.to_string().len().max(2);
    format!("{:0width$}", section + 1, width = width)
}

impl Scene {
    /// Build an unstyled scene; the navigator applies the initial state on mount
    pub fn from_chapters(chapters: &[ChapterConfig]) -> Self {
        let sections = chapters
            .iter()
            .map(|c| SectionScene {
                title: c.title.clone(),
                words: split_words(&c.title)
                    .into_iter()
                    .map(|text| WordState {
                        text,
                        offset: 0.0,
                        opacity: 0.0,
                    })
                    .collect(),
                visible: false,
            })
            .collect();
        let backgrounds = chapters
            .iter()
            .map(|c| LayerScene {
                name: c.background.clone(),
                state: BackgroundState::Inactive,
                opacity: 0.0,
                offset: 0.0,
                clip: ClipInset::NONE,
            })
            .collect();
        let item = |label: &String| SidebarItem {
            label: label.clone(),
            highlighted: false,
            opacity: 0.0,
        };
        Self {
            sections,
            backgrounds,
            left: chapters.iter().map(|c| item(&c.left)).collect(),
            right: chapters.iter().map(|c| item(&c.right)).collect(),
            progress: ProgressScene {
                fill: 0.0,
                label: section_label(0, chapters.len()),
                total_label: section_label(chapters.len().saturating_sub(1), chapters.len()),
            },
        }
    }

    pub fn sidebar(&self, list: SidebarList) -> &[SidebarItem] {
        match list {
            SidebarList::Left => &self.left,
            SidebarList::Right => &self.right,
        }
    }

    fn sidebar_mut(&mut self, list: SidebarList) -> &mut Vec<SidebarItem> {
        match list {
            SidebarList::Left => &mut self.left,
            SidebarList::Right => &mut self.right,
        }
    }

    /// Index of the layer currently marked active
    pub fn active_background(&self) -> Option<usize> {
        self.backgrounds
            .iter()
            .position(|b| b.state == BackgroundState::Active)
    }

    /// Indices highlighted in a list
    pub fn highlighted(&self, list: SidebarList) -> Vec<usize> {
        self.sidebar(list)
            .iter()
            .enumerate()
            .filter(|(_, item)| item.highlighted)
            .map(|(i, _)| i)
            .collect()
    }

    /// Sections currently shown in the featured slot
    pub fn visible_sections(&self) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible)
            .map(|(i, _)| i)
            .collect()
    }
}

impl ViewModel for Scene {
    fn word_count(&self, section: usize) -> Option<usize> {
        self.sections
            .get(section)
            .map(|s| s.words.len())
            .filter(|n| *n > 0)
    }

    fn background_opacity(&self, section: usize) -> Option<f32> {
        self.backgrounds.get(section).map(|b| b.opacity)
    }

    fn sidebar_len(&self, list: SidebarList) -> usize {
        self.sidebar(list).len()
    }

    fn sidebar_opacity(&self, list: SidebarList, index: usize) -> Option<f32> {
        self.sidebar(list).get(index).map(|item| item.opacity)
    }

    fn is_highlighted(&self, list: SidebarList, index: usize) -> Option<bool> {
        self.sidebar(list).get(index).map(|item| item.highlighted)
    }

    fn progress_fill(&self) -> Option<f32> {
        Some(self.progress.fill)
    }

    fn set_section_visible(&mut self, section: usize, visible: bool) {
        if let Some(s) = self.sections.get_mut(section) {
            s.visible = visible;
        }
    }

    fn set_word_offset(&mut self, token: WordToken, percent: f32, opacity: f32) {
        if let Some(word) = self
            .sections
            .get_mut(token.section)
            .and_then(|s| s.words.get_mut(token.word))
        {
            word.offset = percent;
            word.opacity = opacity;
        }
    }

    fn set_background_state(&mut self, index: usize, state: BackgroundState) {
        if let Some(layer) = self.backgrounds.get_mut(index) {
            layer.state = state;
        }
    }

    fn set_background_opacity(&mut self, index: usize, opacity: f32) {
        if let Some(layer) = self.backgrounds.get_mut(index) {
            layer.opacity = opacity;
        }
    }

    fn set_background_offset(&mut self, index: usize, percent: f32) {
        if let Some(layer) = self.backgrounds.get_mut(index) {
            layer.offset = percent;
        }
    }

    fn set_background_clip(&mut self, index: usize, clip: ClipInset) {
        if let Some(layer) = self.backgrounds.get_mut(index) {
            layer.clip = clip;
        }
    }

    fn set_highlighted(&mut self, list: SidebarList, index: usize, highlighted: bool) {
        if let Some(item) = self.sidebar_mut(list).get_mut(index) {
            item.highlighted = highlighted;
        }
    }

    fn set_sidebar_opacity(&mut self, list: SidebarList, index: usize, opacity: f32) {
        if let Some(item) = self.sidebar_mut(list).get_mut(index) {
            item.opacity = opacity;
        }
    }

    fn set_progress_fill(&mut self, fill: f32) {
        self.progress.fill = fill.clamp(0.0, 1.0);
    }

    fn set_progress_label(&mut self, label: &str) {
        self.progress.label = label.to_string();
    }
}
