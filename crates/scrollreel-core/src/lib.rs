pub mod config;
pub mod error;
pub mod machine;
pub mod mapping;
pub mod motion;
pub mod navigator;
pub mod orchestrator;
pub mod scene;
pub mod scroll;
pub mod sound;
pub mod timeline;
pub mod view;

pub use config::{AppConfig, EasingType, MotionConfig, ScrollConfig, SoundConfig};
pub use error::{Error, Result};
pub use machine::{Direction, Phase, TransitionRequest, TransitionState};
pub use mapping::{section_for_progress, ScrollMapping};
pub use navigator::Navigator;
pub use scene::Scene;
pub use scroll::{ScrollError, ScrollEvent, ScrollSource, SmoothScroller};
pub use sound::{Cue, CueQueue, FiredCue, SoundCue};
pub use view::{SidebarList, ViewModel};
