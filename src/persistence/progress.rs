//! Campaign progress: unlocked levels, player name, ultimate flag

use serde::{Deserialize, Serialize};

use super::{Storage, keys, load_u32};
use crate::sim::GameEvent;

/// Longest accepted name, in characters
pub const MAX_NAME_CHARS: usize = 20;

/// A validated, trimmed player name (1 to 20 characters)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim();
        let len = name.chars().count();
        if len == 0 || len > MAX_NAME_CHARS {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("invalid player name {:?}", raw))
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the campaign remembers between visits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Highest unlocked level (at least 1)
    pub max_level_reached: u32,
    pub player_name: Option<PlayerName>,
    pub ultimate_unlocked: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            max_level_reached: 1,
            player_name: None,
            ultimate_unlocked: false,
        }
    }
}

impl Progress {
    /// Read progress; missing or malformed values fall back individually
    pub fn load(storage: &dyn Storage) -> Self {
        let max_level_reached = load_u32(storage, keys::MAX_LEVEL).unwrap_or(1).max(1);
        let player_name = storage.get(keys::PLAYER_NAME).and_then(|raw| {
            let name = PlayerName::parse(&raw);
            if name.is_none() {
                log::warn!("Ignoring invalid saved player name");
            }
            name
        });
        let ultimate_unlocked = storage.get(keys::ULTIMATE).as_deref() == Some("true");

        log::info!(
            "Loaded progress: level {} unlocked, ultimate {}",
            max_level_reached,
            ultimate_unlocked
        );
        Self {
            max_level_reached,
            player_name,
            ultimate_unlocked,
        }
    }

    pub fn set_max_level(&mut self, storage: &mut dyn Storage, level: u32) {
        self.max_level_reached = level.max(1);
        if !storage.set(keys::MAX_LEVEL, &self.max_level_reached.to_string()) {
            log::warn!("Failed to save unlocked level");
        }
    }

    /// Validate and store a new name. Returns false if the name was rejected.
    pub fn set_player_name(&mut self, storage: &mut dyn Storage, raw: &str) -> bool {
        let Some(name) = PlayerName::parse(raw) else {
            return false;
        };
        if !storage.set(keys::PLAYER_NAME, name.as_str()) {
            log::warn!("Failed to save player name");
        }
        log::info!("Player name set to {}", name);
        self.player_name = Some(name);
        true
    }

    pub fn unlock_ultimate(&mut self, storage: &mut dyn Storage) {
        if self.ultimate_unlocked {
            return;
        }
        self.ultimate_unlocked = true;
        storage.set(keys::ULTIMATE, "true");
        log::info!("Ultimate title unlocked");
    }

    /// Forget unlocked levels and the ultimate flag. The name survives.
    pub fn reset(&mut self, storage: &mut dyn Storage) {
        self.max_level_reached = 1;
        self.ultimate_unlocked = false;
        storage.remove(keys::MAX_LEVEL);
        storage.remove(keys::ULTIMATE);
        log::info!("Progress reset");
    }

    /// Persist whatever a session event changes
    pub fn observe(&mut self, storage: &mut dyn Storage, event: &GameEvent) {
        match *event {
            GameEvent::LevelUnlocked { max_level } => self.set_max_level(storage, max_level),
            GameEvent::Victory { ultimate: true, .. } => self.unlock_ultimate(storage),
            _ => {}
        }
    }
}
