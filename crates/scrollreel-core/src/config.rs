use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    /// Chapter content, one entry per section
    #[serde(default = "default_chapters")]
    pub chapters: Vec<ChapterConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            presentation: PresentationConfig::default(),
            motion: MotionConfig::default(),
            scroll: ScrollConfig::default(),
            sound: SoundConfig::default(),
            chapters: default_chapters(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Length of the pinned scroll region in scroll units
    #[serde(default = "default_region_length")]
    pub region_length: f64,
    /// Header lines shown above the chapter content
    #[serde(default = "default_header")]
    pub header: Vec<String>,
    /// Footer lines shown below the chapter content
    #[serde(default = "default_footer")]
    pub footer: Vec<String>,
    /// Reveal sidebar items one by one after mount
    #[serde(default = "default_true")]
    pub intro_reveal: bool,
    /// Delay between two revealed sidebar items
    #[serde(default = "default_intro_stagger")]
    pub intro_stagger_ms: u64,
    /// Extra delay applied to the right-hand list
    #[serde(default = "default_intro_right_delay")]
    pub intro_right_delay_ms: u64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            region_length: default_region_length(),
            header: default_header(),
            footer: default_footer(),
            intro_reveal: default_true(),
            intro_stagger_ms: default_intro_stagger(),
            intro_right_delay_ms: default_intro_right_delay(),
        }
    }
}

/// Timings for one section transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Duration of the entering text reveal and the background wipe
    #[serde(default = "default_text_duration")]
    pub text_duration_ms: u64,
    /// Exiting text runs for this fraction of `text_duration_ms`
    #[serde(default = "default_exit_ratio")]
    pub text_exit_ratio: f64,
    /// Per-word stagger for exiting text
    #[serde(default = "default_exit_stagger")]
    pub exit_stagger_ms: u64,
    /// Per-word stagger for entering text
    #[serde(default = "default_enter_stagger")]
    pub enter_stagger_ms: u64,
    /// Easing shared by text and background groups
    #[serde(default = "default_transition_easing")]
    pub easing: EasingType,
    /// Parallax shift of the exiting background, in percent of its height
    #[serde(default = "default_parallax")]
    pub parallax_percent: f32,
    /// Unrelated backgrounds fade out over this fraction of `text_duration_ms`
    #[serde(default = "default_sweep_ratio")]
    pub background_sweep_ratio: f64,
    /// Sidebar emphasis duration
    #[serde(default = "default_sidebar_duration")]
    pub sidebar_duration_ms: u64,
    /// Opacity of sidebar items that are not highlighted
    #[serde(default = "default_dim_opacity")]
    pub dim_opacity: f32,
    /// Progress bar fill duration
    #[serde(default = "default_progress_duration")]
    pub progress_duration_ms: u64,
    /// Glide duration for a one-step scroll transition
    #[serde(default = "default_step_glide")]
    pub step_glide_ms: u64,
    /// Glide duration for an explicit jump
    #[serde(default = "default_jump_glide")]
    pub jump_glide_ms: u64,
    /// Easing of programmatic glides
    #[serde(default = "default_glide_easing")]
    pub glide_easing: EasingType,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            text_duration_ms: default_text_duration(),
            text_exit_ratio: default_exit_ratio(),
            exit_stagger_ms: default_exit_stagger(),
            enter_stagger_ms: default_enter_stagger(),
            easing: default_transition_easing(),
            parallax_percent: default_parallax(),
            background_sweep_ratio: default_sweep_ratio(),
            sidebar_duration_ms: default_sidebar_duration(),
            dim_opacity: default_dim_opacity(),
            progress_duration_ms: default_progress_duration(),
            step_glide_ms: default_step_glide(),
            jump_glide_ms: default_jump_glide(),
            glide_easing: default_glide_easing(),
        }
    }
}

/// Free (wheel-driven) scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Ease wheel input instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of a wheel ease
    #[serde(default = "default_wheel_duration")]
    pub animation_duration_ms: u64,
    /// Easing applied to wheel input
    #[serde(default = "default_wheel_easing")]
    pub easing: EasingType,
    /// Scroll units per wheel notch or key press
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,
    /// Frame clock rate
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_wheel_duration(),
            easing: default_wheel_easing(),
            wheel_step: default_wheel_step(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Sound starts muted until toggled on
    #[serde(default)]
    pub enabled: bool,
    /// Delay of the text-change cue after a transition starts
    #[serde(default = "default_text_change_delay")]
    pub text_change_delay_ms: u64,
    #[serde(default = "default_hover_volume")]
    pub hover_volume: f32,
    #[serde(default = "default_cue_volume")]
    pub click_volume: f32,
    #[serde(default = "default_cue_volume")]
    pub text_change_volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            text_change_delay_ms: default_text_change_delay(),
            hover_volume: default_hover_volume(),
            click_volume: default_cue_volume(),
            text_change_volume: default_cue_volume(),
        }
    }
}

/// Content of one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// Label in the left-hand list
    pub left: String,
    /// Featured title, revealed word by word
    pub title: String,
    /// Label in the right-hand list
    pub right: String,
    /// Background layer name
    #[serde(default)]
    pub background: String,
}

impl ChapterConfig {
    fn new(left: &str, title: &str, right: &str, background: &str) -> Self {
        Self {
            left: left.to_string(),
            title: title.to_string(),
            right: right.to_string(),
            background: background.to_string(),
        }
    }
}

/// Easing curve selection, shared by glides, wheel input and transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end value on the last frame
    None,
    Linear,
    /// Cubic ease-out: 1 - (1-t)^3
    #[default]
    Cubic,
    /// Quintic ease-out: 1 - (1-t)^5
    Quintic,
    /// Exponential ease-out: 1 - 2^(-10t)
    EaseOut,
    /// Quadratic ease-out
    Power2Out,
    /// cubic-bezier(0.65, 0, 0.35, 1)
    InOutCubic,
    /// cubic-bezier(0.86, 0, 0.07, 1), slow start and a long settle
    Dramatic,
}

fn default_chapters() -> Vec<ChapterConfig> {
    [
        ("Silence", "Creative Elements", "Reduction"),
        ("Meditation", "Inner Stillness", "Essence"),
        ("Intuition", "Deep Knowing", "Space"),
        ("Authenticity", "True Expression", "Resonance"),
        ("Presence", "Now Moment", "Truth"),
        ("Listening", "Deep Attention", "Feeling"),
        ("Curiosity", "Open Exploration", "Clarity"),
        ("Patience", "Calm Waiting", "Emptiness"),
        ("Surrender", "Let Go Control", "Awareness"),
        ("Simplicity", "Pure Essence", "Minimalism"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (left, title, right))| {
        ChapterConfig::new(left, title, right, &format!("flame-glow-blur-{:03}", i + 1))
    })
    .collect()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrollreel")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_region_length() -> f64 {
    10_000.0
}

fn default_header() -> Vec<String> {
    vec!["The Creative".to_string(), "Process".to_string()]
}

fn default_footer() -> Vec<String> {
    vec!["Beyond".to_string(), "Thinking".to_string()]
}

fn default_intro_stagger() -> u64 {
    60
}

fn default_intro_right_delay() -> u64 {
    200
}

fn default_text_duration() -> u64 {
    640
}

fn default_exit_ratio() -> f64 {
    0.6
}

fn default_exit_stagger() -> u64 {
    30
}

fn default_enter_stagger() -> u64 {
    50
}

fn default_transition_easing() -> EasingType {
    EasingType::Dramatic
}

fn default_parallax() -> f32 {
    5.0
}

fn default_sweep_ratio() -> f64 {
    0.3
}

fn default_sidebar_duration() -> u64 {
    300
}

fn default_dim_opacity() -> f32 {
    0.3
}

fn default_progress_duration() -> u64 {
    300
}

fn default_step_glide() -> u64 {
    600
}

fn default_jump_glide() -> u64 {
    800
}

fn default_glide_easing() -> EasingType {
    EasingType::Cubic
}

fn default_wheel_duration() -> u64 {
    1200
}

fn default_wheel_easing() -> EasingType {
    EasingType::EaseOut
}

fn default_wheel_step() -> f64 {
    120.0
}

fn default_animation_fps() -> u32 {
    60
}

fn default_text_change_delay() -> u64 {
    250
}

fn default_hover_volume() -> f32 {
    0.15
}

fn default_cue_volume() -> f32 {
    0.3
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.chapters.is_empty() {
            return Err(crate::Error::InvalidStoryboard(
                "at least one chapter is required".to_string(),
            ));
        }
        if let Some(idx) = self.chapters.iter().position(|c| c.title.trim().is_empty()) {
            return Err(crate::Error::InvalidStoryboard(format!(
                "chapter {} has an empty title",
                idx
            )));
        }
        let region = self.presentation.region_length;
        if !region.is_finite() || region <= 0.0 {
            return Err(crate::Error::Config(format!(
                "presentation.region_length must be positive, got {}",
                region
            )));
        }
        let ratios = [
            ("motion.text_exit_ratio", self.motion.text_exit_ratio),
            ("motion.background_sweep_ratio", self.motion.background_sweep_ratio),
        ];
        for (name, value) in ratios {
            if !(value > 0.0 && value <= 1.0) {
                return Err(crate::Error::Config(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.motion.dim_opacity) {
            return Err(crate::Error::Config(format!(
                "motion.dim_opacity must be in [0, 1], got {}",
                self.motion.dim_opacity
            )));
        }
        Ok(())
    }

    /// Number of sections in the presentation
    pub fn section_count(&self) -> usize {
        self.chapters.len()
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollreel/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollreel")
            .join("config.toml")
    }

    /// Get the log file path used by the terminal front end
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrollreel.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
