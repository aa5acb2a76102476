use std::path::PathBuf;

use crate::analysis::energy::LevelMode;

/// Directory under the data root where the recording lives.
pub const STORAGE_DIR: &str = "audio";

/// The single backing file, overwritten on each capture session.
pub const STORAGE_FILE: &str = "raw.audio";

/// Engine configuration.
///
/// The device format (44.1 kHz mono 16-bit PCM) is fixed; only the
/// storage root and the level computation vary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Application-data root; the recording lands at `audio/raw.audio`
    /// beneath it.
    pub data_dir: PathBuf,

    /// Level computation variant for emitted energy values.
    pub level_mode: LevelMode,
}

impl EngineConfig {
    /// Full path of the backing recording file.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_DIR).join(STORAGE_FILE)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("audio-replay"),
            level_mode: LevelMode::default(),
        }
    }
}
