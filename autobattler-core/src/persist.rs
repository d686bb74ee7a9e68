//! Session persistence for save/load functionality.
//!
//! The engine itself performs no I/O; callers that want to resume a run save
//! the whole [`GameSession`] as JSON.

use crate::character_builder::ATTRIBUTE_MIN;
use crate::session::GameSession;
use crate::world::Player;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid save format")]
    InvalidFormat,

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// A saved session with all state needed to resume play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRun {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// Seconds since the Unix epoch when the save was created.
    pub saved_at: String,

    pub session: GameSession,

    pub metadata: RunMetadata,
}

/// Summary of a saved run, readable without loading the full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub player_name: String,

    /// Class levels, e.g. "Warrior 2 / Rogue 1".
    pub classes: String,

    pub total_level: u32,

    pub wins_in_row: u32,

    pub battles_fought: u32,

    #[serde(default)]
    pub saved_at: String,
}

impl SavedRun {
    /// Snapshot a session.
    pub fn new(session: GameSession) -> Self {
        let saved_at = timestamp_now();
        let metadata = RunMetadata {
            player_name: session.player.name.clone(),
            classes: session.player.class_summary(),
            total_level: session.player.total_level(),
            wins_in_row: session.player.wins_in_row,
            battles_fought: session.battles_fought,
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            session,
            metadata,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    ///
    /// Maximum health is recomputed from the stored levels and current health
    /// clamped to it. Zero levels or attributes are rejected.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        check_version(&value)?;
        let mut run: SavedRun = serde_json::from_value(value)?;
        restore_invariants(&mut run.session.player)?;
        Ok(run)
    }

    /// Read a save's metadata without deserializing the session.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<RunMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: RunMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;
        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }
}

fn check_version(value: &serde_json::Value) -> Result<(), PersistError> {
    let found = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or(PersistError::InvalidFormat)?;
    if found != u64::from(SAVE_VERSION) {
        return Err(PersistError::VersionMismatch {
            expected: SAVE_VERSION,
            found: u32::try_from(found).unwrap_or(u32::MAX),
        });
    }
    Ok(())
}

fn restore_invariants(player: &mut Player) -> Result<(), PersistError> {
    let attributes = player.attributes;
    let attributes_ok = [
        attributes.strength,
        attributes.dexterity,
        attributes.constitution,
    ]
    .iter()
    .all(|value| *value >= ATTRIBUTE_MIN);
    if !attributes_ok || player.levels.values().any(|level| *level == 0) {
        return Err(PersistError::InvalidFormat);
    }
    player.recalculate_max_health();
    Ok(())
}

/// Auto-save file name for a player, with unsafe characters replaced.
pub fn auto_save_path(base_dir: impl AsRef<Path>, player_name: &str) -> PathBuf {
    let sanitized = player_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    base_dir.as_ref().join(format!("{sanitized}_autosave.json"))
}

fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_save_path_sanitizes() {
        let path = auto_save_path("/tmp/saves", "Sir Hero!");
        assert_eq!(path, PathBuf::from("/tmp/saves/Sir_Hero__autosave.json"));
    }

    #[test]
    fn test_restore_invariants() {
        use crate::testing::PlayerFixture;
        use crate::world::CharacterClass;

        let mut player = PlayerFixture::new(2, 2, 2)
            .class(CharacterClass::Rogue)
            .build();
        player.health.maximum = 50;
        player.health.current = 40;
        restore_invariants(&mut player).unwrap();
        assert_eq!(player.max_health(), 4 + 2);
        assert_eq!(player.current_health(), 6);

        let mut unlevelled = player.clone();
        unlevelled.levels.insert(CharacterClass::Warrior, 0);
        assert!(matches!(
            restore_invariants(&mut unlevelled),
            Err(PersistError::InvalidFormat)
        ));

        let mut weak = player;
        weak.attributes.strength = 0;
        assert!(matches!(
            restore_invariants(&mut weak),
            Err(PersistError::InvalidFormat)
        ));
    }

    #[test]
    fn test_check_version() {
        let ok = serde_json::json!({ "version": SAVE_VERSION });
        assert!(check_version(&ok).is_ok());

        let old = serde_json::json!({ "version": 0 });
        assert!(matches!(
            check_version(&old),
            Err(PersistError::VersionMismatch { found: 0, .. })
        ));

        let missing = serde_json::json!({ "session": {} });
        assert!(matches!(
            check_version(&missing),
            Err(PersistError::InvalidFormat)
        ));
    }
}
