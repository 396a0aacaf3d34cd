//! Key-value persistence with safe fallbacks
//!
//! Features:
//! - `Storage` trait over browser LocalStorage or an in-memory map
//! - JSON blobs via serde_json; anything unreadable loads as `Default`
//! - Writes are best-effort: failures are logged, never propagated
//!
//! Keys and value formats match what the browser games already wrote, so
//! existing saves keep working.

pub mod progress;
pub mod storage;

pub use progress::{PlayerName, Progress};
pub use storage::MemoryStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys
pub mod keys {
    /// Highest unlocked level, plain integer
    pub const MAX_LEVEL: &str = "maxLevelReached";
    /// Player name, plain string
    pub const PLAYER_NAME: &str = "playerName";
    /// Both leaderboards, JSON
    pub const LEADERBOARD: &str = "leaderboardData";
    /// `"true"` once the ultimate run has been achieved
    pub const ULTIMATE: &str = "ultimateNinjaUnlocked";
    /// Obstacle course best score, plain integer
    pub const COURSE_BEST: &str = "flappy_best";
    /// Preferences, JSON
    pub const SETTINGS: &str = "banana_rama_settings";
}

/// Minimal string key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns false if the write was rejected (quota, private mode)
    fn set(&mut self, key: &str, value: &str) -> bool;
    fn remove(&mut self, key: &str) -> bool;
}

/// Decode a JSON value, falling back to `Default` when missing or corrupt
pub fn load_json<T>(storage: &dyn Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(json) = storage.get(key) else {
        log::info!("No saved {}, using defaults", key);
        return T::default();
    };
    match serde_json::from_str(&json) {
        Ok(value) => {
            log::info!("Loaded {}", key);
            value
        }
        Err(err) => {
            log::warn!("Corrupt {} ({}), using defaults", key, err);
            T::default()
        }
    }
}

/// Encode and store a JSON value. Returns false on failure.
pub fn save_json<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => {
            let ok = storage.set(key, &json);
            if !ok {
                log::warn!("Failed to save {}", key);
            }
            ok
        }
        Err(err) => {
            log::warn!("Failed to encode {}: {}", key, err);
            false
        }
    }
}

/// Read a plain unsigned integer (stored as decimal text)
pub fn load_u32(storage: &dyn Storage, key: &str) -> Option<u32> {
    let raw = storage.get(key)?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("Ignoring non-numeric {} = {:?}", key, raw);
            None
        }
    }
}
