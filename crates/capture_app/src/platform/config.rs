//! Settings overrides read from a RON file.
//!
//! Every field is optional; anything left out keeps the engine default.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use capture_engine::{FallbackPolicy, FrameSize, WorkflowSettings};
use capture_logging::{capture_info, capture_warn};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum PolicyName {
    Approximate,
    Withhold,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FallbackOverrides {
    policy: Option<PolicyName>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_degrees: Option<f64>,
    place_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsOverrides {
    target_size: Option<(u32, u32)>,
    default_frame_size: Option<(u32, u32)>,
    jpeg_quality: Option<u8>,
    processing_delay_ms: Option<u64>,
    completion_delay_ms: Option<u64>,
    location_timeout_ms: Option<u64>,
    fallback: Option<FallbackOverrides>,
}

impl SettingsOverrides {
    fn apply(self, settings: &mut WorkflowSettings) {
        if let Some((width, height)) = self.target_size {
            settings.target_size = FrameSize::new(width, height);
        }
        if let Some((width, height)) = self.default_frame_size {
            settings.default_frame_size = FrameSize::new(width, height);
        }
        if let Some(quality) = self.jpeg_quality {
            settings.jpeg_quality = quality.clamp(1, 100);
        }
        if let Some(ms) = self.processing_delay_ms {
            settings.processing_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.completion_delay_ms {
            settings.completion_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.location_timeout_ms {
            settings.location_timeout = Duration::from_millis(ms);
        }
        if let Some(fallback) = self.fallback {
            let target = &mut settings.fallback;
            if let Some(policy) = fallback.policy {
                target.policy = match policy {
                    PolicyName::Approximate => FallbackPolicy::Approximate,
                    PolicyName::Withhold => FallbackPolicy::Withhold,
                };
            }
            if let Some(latitude) = fallback.latitude {
                target.reference_latitude = latitude;
            }
            if let Some(longitude) = fallback.longitude {
                target.reference_longitude = longitude;
            }
            if let Some(radius) = fallback.radius_degrees {
                target.radius_degrees = radius.max(0.0);
            }
            if let Some(name) = fallback.place_name {
                target.place_name = name;
            }
        }
    }
}

/// Engine settings with the wall clock installed and any overrides from
/// `path` applied. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<WorkflowSettings, ConfigError> {
    let mut settings = WorkflowSettings {
        clock: Arc::new(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        ..WorkflowSettings::default()
    };

    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            capture_warn!("No settings file at {:?}; using defaults", path);
            return Ok(settings);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let overrides: SettingsOverrides =
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    overrides.apply(&mut settings);
    capture_info!("Loaded settings from {:?}", path);
    Ok(settings)
}
