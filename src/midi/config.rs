//! MIDI output configuration: destination file and resolution, loaded from ~/.notelang/midi.yaml.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::event::TICKS_PER_BEAT;

/// MIDI output settings loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiOutputConfig {
    /// File the rendered score is written to.
    #[serde(default = "MidiOutputConfig::default_output")]
    pub output: PathBuf,
    /// Resolution of the written file, in ticks per quarter note.
    #[serde(default = "MidiOutputConfig::default_ticks_per_beat")]
    pub ticks_per_beat: u16,
}

impl MidiOutputConfig {
    /// Standard config path (~/.notelang/midi.yaml).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".notelang").join("midi.yaml"))
    }

    /// Load config from the standard path.
    /// Returns None if the file doesn't exist or can't be parsed.
    pub fn load() -> Option<Self> {
        let path = Self::default_path()?;
        let content = std::fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn default_output() -> PathBuf {
        PathBuf::from("output.mid")
    }

    fn default_ticks_per_beat() -> u16 {
        TICKS_PER_BEAT as u16
    }
}

impl Default for MidiOutputConfig {
    fn default() -> Self {
        Self {
            output: Self::default_output(),
            ticks_per_beat: Self::default_ticks_per_beat(),
        }
    }
}
