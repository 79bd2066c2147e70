use std::path::Path;

use ::config::{Config, ConfigError, File, FileFormat};
use tracing::{debug, warn};

use crate::error::SkillError;

/// Default location, relative to the skill's working directory.
pub const CONFIG_INI: &str = "config.ini";

const REQUEST_COUNT_KEY: &str = "global.request_count_threshold";
const CONFIDENCE_SCORE_KEY: &str = "global.confidence_score_threshold";

pub const DEFAULT_REQUEST_COUNT_THRESHOLD: u32 = 3;
pub const DEFAULT_CONFIDENCE_SCORE_THRESHOLD: f64 = 0.8;

/// Tunables for the division dialogue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillConfig {
    /// Turns allowed before giving up (ceiling, >= 0).
    pub request_count_threshold: u32,
    /// Minimum confidence for an operand to be accepted (floor, 0.0 - 1.0).
    pub confidence_score_threshold: f64,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            request_count_threshold: DEFAULT_REQUEST_COUNT_THRESHOLD,
            confidence_score_threshold: DEFAULT_CONFIDENCE_SCORE_THRESHOLD,
        }
    }
}

impl SkillConfig {
    /// Load from an INI file with a `[global]` section.
    /// Never fails: anything unreadable falls back to defaults.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default configuration, {} unreadable: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Strict file read. A missing file is not an error (all defaults), a
    /// malformed one is. Individual bad values fall back per key.
    pub fn read(path: &Path) -> Result<Self, SkillError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(false))
            .build()?;

        let request_count_threshold = setting(
            &settings,
            REQUEST_COUNT_KEY,
            DEFAULT_REQUEST_COUNT_THRESHOLD,
            parse_ceiling,
        );
        let confidence_score_threshold = setting(
            &settings,
            CONFIDENCE_SCORE_KEY,
            DEFAULT_CONFIDENCE_SCORE_THRESHOLD,
            parse_floor,
        );

        Ok(Self {
            request_count_threshold,
            confidence_score_threshold,
        })
    }
}

fn setting<T: Copy + std::fmt::Debug>(
    settings: &Config,
    key: &'static str,
    default: T,
    parse: fn(&Config, &'static str) -> Result<T, SkillError>,
) -> T {
    match parse(settings, key) {
        Ok(value) => value,
        Err(SkillError::Config(ConfigError::NotFound(_))) => {
            debug!("{} not set, using {:?}", key, default);
            default
        }
        Err(e) => {
            warn!("Ignoring {}: {}", key, e);
            default
        }
    }
}

fn parse_ceiling(settings: &Config, key: &'static str) -> Result<u32, SkillError> {
    let raw: i64 = settings.get(key)?;
    u32::try_from(raw).map_err(|_| SkillError::InvalidValue {
        key,
        reason: format!("{} is not a valid retry count", raw),
    })
}

fn parse_floor(settings: &Config, key: &'static str) -> Result<f64, SkillError> {
    let raw: f64 = settings.get(key)?;
    if raw.is_finite() && (0.0..=1.0).contains(&raw) {
        Ok(raw)
    } else {
        Err(SkillError::InvalidValue {
            key,
            reason: format!("{} is outside 0.0 - 1.0", raw),
        })
    }
}
