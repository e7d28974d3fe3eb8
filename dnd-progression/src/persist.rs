//! Character persistence for save/load functionality.
//!
//! Characters are stored as pretty JSON with a version number and a small
//! metadata block that can be read without deserializing the whole
//! character. Rule catalogs can also be loaded from JSON files.

use crate::catalog::RuleCatalog;
use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

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

/// Current character save file version.
const CHARACTER_SAVE_VERSION: u32 = 1;

/// A saved character that can be reused across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCharacter {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the character was saved, in seconds since the Unix epoch.
    pub saved_at: String,

    /// The complete character, including benefit records and level history.
    pub character: Character,

    /// Quick-access metadata about the character.
    pub metadata: CharacterMetadata,
}

/// Metadata about a saved character for quick display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMetadata {
    pub name: String,
    pub species: Option<String>,
    pub origin: Option<String>,

    /// Class levels, e.g. "Fighter 5 / Wizard 2".
    pub classes: String,

    /// Total character level.
    pub level: u8,
}

impl CharacterMetadata {
    pub fn from_character(character: &Character) -> Self {
        let classes = if character.classes.is_empty() {
            "None".to_string()
        } else {
            character
                .classes
                .iter()
                .map(|c| format!("{} {}", c.class, c.level))
                .collect::<Vec<_>>()
                .join(" / ")
        };
        Self {
            name: character.name.clone(),
            species: character.species.clone(),
            origin: character.origin.clone(),
            classes,
            level: character.total_level(),
        }
    }
}

impl SavedCharacter {
    pub fn new(character: Character) -> Self {
        let metadata = CharacterMetadata::from_character(&character);
        Self {
            version: CHARACTER_SAVE_VERSION,
            saved_at: timestamp_now(),
            character,
            metadata,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        debug!(character = %self.metadata.name, path = %path.display(), "character saved");
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != CHARACTER_SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: CHARACTER_SAVE_VERSION,
                found: saved.version,
            });
        }
        if saved.metadata.name != saved.character.name {
            return Err(PersistError::InvalidFormat);
        }

        Ok(saved)
    }

    /// Get metadata without loading the full character.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<CharacterMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: CharacterMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != CHARACTER_SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: CHARACTER_SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a character save file.
#[derive(Debug, Clone)]
pub struct CharacterSaveInfo {
    pub path: PathBuf,
    pub metadata: CharacterMetadata,
}

/// List all character save files in a directory, sorted by name.
///
/// A missing directory is created and yields an empty list. Files that are
/// not readable character saves are skipped.
pub async fn list_character_saves(dir: impl AsRef<Path>) -> Result<Vec<CharacterSaveInfo>, PersistError> {
    let mut saves = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(saves);
    }

    let mut entries = fs::read_dir(dir_path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            match SavedCharacter::peek_metadata(&path).await {
                Ok(metadata) => saves.push(CharacterSaveInfo { path, metadata }),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable save"),
            }
        }
    }

    saves.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
    Ok(saves)
}

/// Generate a save path for a character.
pub fn character_save_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    let sanitized = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}.json"))
}

/// Load a rule catalog from a JSON file.
pub async fn load_catalog_json(path: impl AsRef<Path>) -> Result<RuleCatalog, PersistError> {
    let content = fs::read_to_string(path).await?;
    let catalog = RuleCatalog::from_json(&content)?;
    if catalog.classes.is_empty() {
        return Err(PersistError::InvalidFormat);
    }
    Ok(catalog)
}

/// Write a rule catalog as pretty JSON.
pub async fn save_catalog_json(catalog: &RuleCatalog, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let content = catalog.to_json()?;
    fs::write(path, content).await?;
    Ok(())
}

fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}
