// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Harness configuration
//!
//! The headless harness reads an optional TOML file and merges command
//! line flags over it. The core itself takes no configuration; all of
//! this is pacing and file plumbing for the embedding program.

use crate::core::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Harness settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// BIOS ROM path
    pub bios: Option<PathBuf>,

    /// PS-X EXE to side-load once the shell is reached
    pub exe: Option<PathBuf>,

    /// Disc image streamed through the CD-ROM read callback
    pub disc: Option<PathBuf>,

    /// Frames to run before exiting (0 = until SystemError or error)
    pub frames: u32,

    /// Treat every guest exception as fatal
    pub break_on_exception: bool,

    /// Write the final framebuffer here (raw A1B5G5R5, 1024x512)
    pub vram_dump: Option<PathBuf>,
}

impl HarnessConfig {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| EmulatorError::InvalidConfig(e.to_string()))
    }

    /// Overlay another configuration; set fields win
    pub fn merge(mut self, overlay: HarnessConfig) -> Self {
        if overlay.bios.is_some() {
            self.bios = overlay.bios;
        }
        if overlay.exe.is_some() {
            self.exe = overlay.exe;
        }
        if overlay.disc.is_some() {
            self.disc = overlay.disc;
        }
        if overlay.frames != 0 {
            self.frames = overlay.frames;
        }
        if overlay.break_on_exception {
            self.break_on_exception = true;
        }
        if overlay.vram_dump.is_some() {
            self.vram_dump = overlay.vram_dump;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "bios = \"bios/SCPH1001.BIN\"\nframes = 120\nbreak_on_exception = true"
        )
        .unwrap();

        let config = HarnessConfig::load(file.path()).unwrap();
        assert_eq!(config.bios.as_deref(), Some(Path::new("bios/SCPH1001.BIN")));
        assert_eq!(config.frames, 120);
        assert!(config.break_on_exception);
        assert!(config.exe.is_none());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "frames = \"not a number\"").unwrap();
        assert!(matches!(
            HarnessConfig::load(file.path()),
            Err(EmulatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = HarnessConfig {
            bios: Some(PathBuf::from("a.bin")),
            frames: 60,
            ..Default::default()
        };
        let overlay = HarnessConfig {
            bios: Some(PathBuf::from("b.bin")),
            break_on_exception: true,
            ..Default::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.bios.as_deref(), Some(Path::new("b.bin")));
        assert_eq!(merged.frames, 60, "unset overlay fields keep the base");
        assert!(merged.break_on_exception);
    }
}
