use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::driver::ExecutionBudget;

pub const CONFIG_FILE: &str = "pokitto.json";
/// Largest window scale accepted from the config file.
pub const MAX_SCALE: u32 = 16;

/// Optional settings read from `pokitto.json`; every field has a default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    pub title: String,
    pub scale: u32,
    pub batch_size: u32,
    pub tick_quantum: u64,
    pub default_rom: PathBuf,
    /// Defaults to the ROM path with an `.eeprom` extension.
    pub eeprom_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let budget = ExecutionBudget::default();
        HarnessConfig {
            title: "PokittoEmu".to_string(),
            scale: 2,
            batch_size: budget.batch_size,
            tick_quantum: budget.tick_quantum,
            default_rom: PathBuf::from("file.bin"),
            eeprom_path: None,
        }
    }
}

impl HarnessConfig {
    /// Reads `path`. A missing file gives the defaults; so does a malformed
    /// one, with a warning. Out-of-range values are replaced field by field.
    pub fn load(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                debug!("no config at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<HarnessConfig>(&data) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                warn!("ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Zero batch size or tick quantum would stall the clock; fall back to the
    /// defaults for those. Scale is clamped to `1..=MAX_SCALE`.
    pub fn sanitized(mut self) -> Self {
        let defaults = ExecutionBudget::default();
        if self.batch_size == 0 {
            warn!("batch_size must be non-zero, using {}", defaults.batch_size);
            self.batch_size = defaults.batch_size;
        }
        if self.tick_quantum == 0 {
            warn!("tick_quantum must be non-zero, using {}", defaults.tick_quantum);
            self.tick_quantum = defaults.tick_quantum;
        }
        let scale = self.scale.clamp(1, MAX_SCALE);
        if scale != self.scale {
            warn!("scale {} out of range, using {}", self.scale, scale);
            self.scale = scale;
        }
        self
    }

    pub fn budget(&self) -> ExecutionBudget {
        ExecutionBudget {
            batch_size: self.batch_size,
            tick_quantum: self.tick_quantum,
        }
    }

    pub fn eeprom_path_for(&self, rom: &Path) -> PathBuf {
        self.eeprom_path
            .clone()
            .unwrap_or_else(|| rom.with_extension("eeprom"))
    }
}
