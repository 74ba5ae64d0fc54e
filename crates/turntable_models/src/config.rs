#![cfg_attr(coverage_nightly, coverage(off))]

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::Duration;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use crate::capture::{desktop_dir, CaptureDirectory};
use crate::error::TurntableError;
use crate::key_utils::convert;

/// Folder the config files are read from when `TURNTABLE_CONFIG_DIR` is unset.
pub const DEFAULT_CONFIG_DIR: &str = "config";

// =================================================================================================
//
//                                            Global
//
// =================================================================================================

#[derive(Resource, Deserialize, Serialize, Clone, Debug, Default)]
pub struct GlobalConfig {
    pub turntable_config: TurntableConfig,
    pub input_config: InputConfig,
}

impl GlobalConfig {

    /// Loads a configuration file and deserializes it into the specified type.
    ///
    /// # Arguments
    /// - `path`: The file path of the configuration file to load.
    ///
    /// # Errors
    /// [`TurntableError::Io`] if the file cannot be read and
    /// [`TurntableError::ConfigParse`] if it is not valid TOML for `T`.
    pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, TurntableError> {
        let content = read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TurntableError::ConfigParse(e.to_string()))
    }

    /// Loads a config file or falls back to `T::default()` with a warning.
    fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
        match Self::load(path) {
            Ok(value) => value,
            Err(err) => {
                warn!("Using default settings for '{}': {err}", path.display());
                T::default()
            }
        }
    }

    /// Creates a new `GlobalConfig` instance and loads all configuration files
    /// from `dir`. Missing or broken files are replaced by their defaults.
    ///
    /// # Returns
    /// - `GlobalConfig`: A new instance with loaded configurations for the turntable and input.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            turntable_config: Self::load_or_default(&dir.join("turntable.toml")),
            input_config: Self::load_or_default(&dir.join("input.toml")),
        }
    }

}

// =================================================================================================
//
//                                           Turntable
//
// =================================================================================================

/// Serializable turntable configuration. Every field has a default so a
/// partial `turntable.toml` only overrides what it names.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TurntableConfig {
    /// Seconds to wait between two steps of a pass.
    pub step_interval_secs: f32,
    /// Degrees the camera advances per step. Must be in `1..360`.
    pub angular_increment: u32,
    /// Orbit radius as a multiple of the target's bounding size.
    pub radius_multiplier: f32,
    /// Orbit height above the target as a multiple of its bounding size.
    pub height_multiplier: f32,
    /// Name of the folder the screenshots are written to.
    pub output_dir_name: String,
    /// Parent folder of `output_dir_name`. The user's desktop when unset.
    pub output_root: Option<PathBuf>,
    /// Start a pass as soon as the app is up.
    pub start_on_launch: bool,
    /// Close the app once a pass has finished.
    pub exit_when_done: bool,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        Self {
            step_interval_secs: 0.25,
            angular_increment: 5,
            radius_multiplier: 3.0,
            height_multiplier: 0.5,
            output_dir_name: String::from("Turntable"),
            output_root: None,
            start_on_launch: true,
            exit_when_done: false,
        }
    }
}

impl TurntableConfig {

    /// Validates the raw values and converts them into [`OrbitSettings`].
    ///
    /// An increment that does not divide 360 is accepted, the last step of
    /// such a pass simply lands short of a full revolution.
    ///
    /// # Errors
    /// - [`TurntableError::InvalidIncrement`] for `0` or anything `>= 360`.
    /// - [`TurntableError::InvalidInterval`] for negative, non-finite or too large intervals.
    pub fn settings(&self) -> Result<OrbitSettings, TurntableError> {
        if self.angular_increment == 0 || self.angular_increment >= 360 {
            return Err(TurntableError::InvalidIncrement(self.angular_increment));
        }
        let step_interval = Duration::try_from_secs_f32(self.step_interval_secs)
            .map_err(|_| TurntableError::InvalidInterval(self.step_interval_secs))?;
        if 360 % self.angular_increment != 0 {
            warn!(
                "Angular increment {} does not divide 360, the last capture will not close the circle",
                self.angular_increment
            );
        }

        Ok(OrbitSettings {
            step_interval,
            angular_increment: self.angular_increment,
            radius_multiplier: self.radius_multiplier,
            height_multiplier: self.height_multiplier,
        })
    }

    /// Resolves the folder screenshots are written to.
    pub fn capture_directory(&self) -> CaptureDirectory {
        let root = self.output_root.clone().unwrap_or_else(desktop_dir);
        CaptureDirectory::new(root.join(&self.output_dir_name))
    }
}

/// Validated, immutable orbit parameters used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct OrbitSettings {
    /// Minimum time between two steps.
    pub step_interval: Duration,
    /// Degrees per step, always in `1..360`.
    pub angular_increment: u32,
    pub radius_multiplier: f32,
    pub height_multiplier: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(250),
            angular_increment: 5,
            radius_multiplier: 3.0,
            height_multiplier: 0.5,
        }
    }
}

impl OrbitSettings {
    /// Number of steps a full pass takes.
    pub fn steps_per_pass(&self) -> u32 {
        360_u32.div_ceil(self.angular_increment)
    }
}

// =================================================================================================
//
//                                            Input
//
// =================================================================================================

/// Serializable input configuration mapping high-level actions to key names.
/// Stores human-readable key strings (e.g., "F1", "Space", "A") that are later
/// converted into engine `KeyCode`s at runtime.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Toggle developer inspector overlay.
    pub inspector: String,
    /// Start (or restart) a turntable pass.
    pub start_turntable: String,
    /// Abort the running pass.
    pub stop_turntable: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            inspector: String::from("F1"),
            start_turntable: String::from("F5"),
            stop_turntable: String::from("Escape"),
        }
    }
}

impl InputConfig {
    pub fn get_inspector_key(&self) -> KeyCode {
        convert(self.inspector.as_str()).unwrap_or(KeyCode::F1)
    }

    pub fn get_start_key(&self) -> KeyCode {
        convert(self.start_turntable.as_str()).unwrap_or(KeyCode::F5)
    }

    pub fn get_stop_key(&self) -> KeyCode {
        convert(self.stop_turntable.as_str()).unwrap_or(KeyCode::Escape)
    }
}
