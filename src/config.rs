//! Application settings persisted as TOML in the app directory.
//!
//! A missing file yields defaults. Slider ranges are presentation constants
//! with no domain meaning; they are normalized on load so the form can always
//! render them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::schema::HabitInput;
use crate::trainer::{DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("No suitable config directory found")]
    NoConfigDir,
}

/// Bounds, step and starting value of one form slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32, default: f32) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Repair inverted bounds, a non-positive step and an out-of-range default.
    pub fn normalized(self, fallback: SliderRange) -> Self {
        let finite = [self.min, self.max, self.step, self.default]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return fallback;
        }
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if min == max {
            return fallback;
        }
        let step = if self.step > 0.0 { self.step } else { fallback.step };
        Self {
            min,
            max,
            step,
            default: self.default.clamp(min, max),
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

pub const SLEEP_RANGE: SliderRange = SliderRange::new(0.0, 12.0, 0.5, 7.0);
pub const SCREEN_RANGE: SliderRange = SliderRange::new(0.0, 16.0, 0.5, 4.0);
pub const MEALS_RANGE: SliderRange = SliderRange::new(1.0, 6.0, 1.0, 3.0);
pub const WATER_RANGE: SliderRange = SliderRange::new(0.0, 5.0, 0.5, 2.5);

/// Slider configuration for the input form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRanges {
    /// Initial answer of the daily-exercise choice.
    pub exercise_default: bool,
    pub sleep: SliderRange,
    pub screen: SliderRange,
    pub meals: SliderRange,
    pub water: SliderRange,
}

impl Default for FormRanges {
    fn default() -> Self {
        Self {
            exercise_default: true,
            sleep: SLEEP_RANGE,
            screen: SCREEN_RANGE,
            meals: MEALS_RANGE,
            water: WATER_RANGE,
        }
    }
}

impl FormRanges {
    pub fn normalized(self) -> Self {
        let mut meals = self.meals.normalized(MEALS_RANGE);
        meals.min = meals.min.round().max(0.0);
        meals.max = meals.max.round().max(meals.min + 1.0);
        meals.step = meals.step.round().max(1.0);
        meals.default = meals.default.round().clamp(meals.min, meals.max);
        Self {
            exercise_default: self.exercise_default,
            sleep: self.sleep.normalized(SLEEP_RANGE),
            screen: self.screen.normalized(SCREEN_RANGE),
            meals,
            water: self.water.normalized(WATER_RANGE),
        }
    }

    /// Form values before the user touches anything.
    pub fn default_input(&self) -> HabitInput {
        HabitInput {
            sleep_hours: self.sleep.default,
            screen_hours: self.screen.default,
            exercises_daily: self.exercise_default,
            meals_per_day: self.meals.default as u32,
            water_litres: self.water.default,
        }
    }

    /// Clamp every field into its slider range.
    pub fn clamp_input(&self, input: HabitInput) -> HabitInput {
        HabitInput {
            sleep_hours: self.sleep.clamp(input.sleep_hours),
            screen_hours: self.screen.clamp(input.screen_hours),
            exercises_daily: input.exercises_daily,
            meals_per_day: self.meals.clamp(input.meals_per_day as f32) as u32,
            water_litres: self.water.clamp(input.water_litres),
        }
    }
}

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Trained artifact read at startup.
    pub model_path: PathBuf,
    /// Dataset used for the optional charts.
    pub dataset_path: PathBuf,
    pub form: FormRanges,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            form: FormRanges::default(),
        }
    }
}

impl AppConfig {
    pub fn normalized(self) -> Self {
        Self {
            form: self.form.normalized(),
            ..self
        }
    }
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Load configuration from `path`, returning defaults if it does not exist.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppConfig>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(AppConfig::normalized)
}

/// Persist configuration to the app directory.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    save_to_path(config, &config_path()?)
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::ConfigBaseGuard;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let cfg = load_or_default().unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.form.default_input(), HabitInput::default());
    }

    #[test]
    fn saves_and_reloads_from_app_dir() {
        let dir = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(dir.path().to_path_buf());
        let mut cfg = AppConfig::default();
        cfg.model_path = PathBuf::from("models/forest.json");
        cfg.form.screen = SliderRange::new(0.0, 20.0, 1.0, 5.0);
        save(&cfg).unwrap();
        assert!(
            dir.path()
                .join(app_dirs::APP_DIR_NAME)
                .join(CONFIG_FILE_NAME)
                .is_file()
        );
        assert_eq!(load_or_default().unwrap(), cfg);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "dataset_path = \"data/other.csv\"\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.dataset_path, PathBuf::from("data/other.csv"));
        assert_eq!(cfg.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(cfg.form, FormRanges::default());
    }

    #[test]
    fn normalizes_broken_ranges_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        let data = r#"
[form.sleep]
min = 10.0
max = 2.0
step = -1.0
default = 20.0

[form.meals]
min = 1.4
max = 1.4
step = 1.0
default = 3.0
"#;
        std::fs::write(&path, data).unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.form.sleep, SliderRange::new(2.0, 10.0, 0.5, 10.0));
        assert_eq!(cfg.form.meals, MEALS_RANGE);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "model_path = [").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::ParseToml { .. })
        ));
    }

    #[test]
    fn clamp_input_respects_ranges() {
        let form = FormRanges::default();
        let clamped = form.clamp_input(HabitInput {
            sleep_hours: 15.0,
            screen_hours: -2.0,
            exercises_daily: false,
            meals_per_day: 9,
            water_litres: 2.0,
        });
        assert_eq!(clamped.sleep_hours, 12.0);
        assert_eq!(clamped.screen_hours, 0.0);
        assert_eq!(clamped.meals_per_day, 6);
        assert_eq!(clamped.water_litres, 2.0);
    }
}
