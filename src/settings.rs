//! Player preferences
//!
//! Persisted separately from campaign progress. Unknown or missing fields
//! load as defaults, so older saves keep working.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, keys, load_json, save_json};
use crate::tuning::CourseTuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Obstacle course pacing (gap, spacing, speed sliders)
    pub course: CourseTuning,

    // === HUD ===
    /// Show the run timer while playing
    pub show_timer: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Skip the level-complete pause and load the next level at once
    pub skip_level_delay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            course: CourseTuning::default(),
            show_timer: true,
            show_fps: false,
            skip_level_delay: false,
        }
    }
}

impl Settings {
    /// Load settings; course values are clamped into playable ranges
    pub fn load(storage: &dyn Storage) -> Self {
        let mut settings: Self = load_json(storage, keys::SETTINGS);
        settings.course = settings.course.sanitized();
        settings
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        if save_json(storage, keys::SETTINGS, self) {
            log::info!("Settings saved");
        }
    }

    /// Level-complete delay in ticks under these settings
    pub fn level_advance_delay(&self, default_ticks: u32) -> u32 {
        if self.skip_level_delay { 0 } else { default_ticks }
    }
}
