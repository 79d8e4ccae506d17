use crate::error::{CliError, Result};
use directories::ProjectDirs;
use molbind::core::viewers::ViewerKind;
use molbind::engine::config::{ViewerConfig, ViewerConfigBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct TimeoutSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    connect_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    launch_secs: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct SuperposeSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    min_positions: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ViewerPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pymol: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chimera: Option<PathBuf>,
}

/// The per-user settings file: timeouts, superposition threshold and preferred viewer
/// executables. Every value is optional; absent values fall back to library defaults.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeouts: Option<TimeoutSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    superpose: Option<SuperposeSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    viewers: Option<ViewerPaths>,
}

impl Settings {
    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("org", "molbind", "molbind")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
            .ok_or_else(|| {
                CliError::Config("Could not determine config directory path.".to_string())
            })
    }

    /// Reads the settings file at `path`; a missing file yields empty settings.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults.", path);
            return Ok(Self::default());
        }
        debug!("Loading settings from file: {:?}", path);
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(self).map_err(|e| CliError::Other(e.into()))?;
        fs::write(path, content).map_err(CliError::from)
    }

    pub fn viewer_path(&self, viewer: ViewerKind) -> Option<&Path> {
        let paths = self.viewers.as_ref()?;
        match viewer {
            ViewerKind::Pymol => paths.pymol.as_deref(),
            ViewerKind::Chimera => paths.chimera.as_deref(),
        }
    }

    pub fn set_viewer_path(&mut self, viewer: ViewerKind, path: Option<PathBuf>) {
        let paths = self.viewers.get_or_insert_with(Default::default);
        match viewer {
            ViewerKind::Pymol => paths.pymol = path,
            ViewerKind::Chimera => paths.chimera = path,
        }
        if paths.pymol.is_none() && paths.chimera.is_none() {
            self.viewers = None;
        }
    }

    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let parse_int = || -> Result<u64> {
                value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })
            };

            match key {
                "timeouts.connect-ms" => {
                    self.timeouts.get_or_insert_with(Default::default).connect_ms =
                        Some(parse_int()?);
                }
                "timeouts.reply-ms" => {
                    self.timeouts.get_or_insert_with(Default::default).reply_ms =
                        Some(parse_int()?);
                }
                "timeouts.launch-secs" => {
                    self.timeouts.get_or_insert_with(Default::default).launch_secs =
                        Some(parse_int()?);
                }
                "superpose.min-positions" => {
                    self.superpose
                        .get_or_insert_with(Default::default)
                        .min_positions = Some(parse_int()? as usize);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn viewer_config(&self, viewer: ViewerKind) -> Result<ViewerConfig> {
        let mut builder = ViewerConfigBuilder::new().viewer(viewer);
        if let Some(timeouts) = &self.timeouts {
            if let Some(ms) = timeouts.connect_ms {
                builder = builder.connect_timeout(Duration::from_millis(ms));
            }
            if let Some(ms) = timeouts.reply_ms {
                builder = builder.reply_timeout(Duration::from_millis(ms));
            }
            if let Some(secs) = timeouts.launch_secs {
                builder = builder.launch_timeout(Duration::from_secs(secs));
            }
        }
        if let Some(positions) = self.superpose.as_ref().and_then(|s| s.min_positions) {
            builder = builder.min_superpose_positions(positions);
        }
        builder
            .build()
            .map_err(|e| CliError::Core(e.into()))
    }
}
