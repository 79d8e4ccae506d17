use crate::core::viewers::ViewerKind;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_LAUNCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MIN_SUPERPOSE_POSITIONS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub viewer: ViewerKind,
    /// How long to wait for a TCP connection to the viewer's control port.
    pub connect_timeout: Duration,
    /// How long to wait for the viewer to answer one request.
    pub reply_timeout: Duration,
    /// How long to wait for a launched viewer to announce its port.
    pub launch_timeout: Duration,
    pub min_superpose_positions: usize,
}

#[derive(Default)]
pub struct ViewerConfigBuilder {
    viewer: Option<ViewerKind>,
    connect_timeout: Option<Duration>,
    reply_timeout: Option<Duration>,
    launch_timeout: Option<Duration>,
    min_superpose_positions: Option<usize>,
}

impl ViewerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewer(mut self, viewer: ViewerKind) -> Self {
        self.viewer = Some(viewer);
        self
    }
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
    pub fn reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = Some(timeout);
        self
    }
    pub fn launch_timeout(mut self, timeout: Duration) -> Self {
        self.launch_timeout = Some(timeout);
        self
    }
    pub fn min_superpose_positions(mut self, positions: usize) -> Self {
        self.min_superpose_positions = Some(positions);
        self
    }

    pub fn build(self) -> Result<ViewerConfig, ConfigError> {
        let viewer = self.viewer.ok_or(ConfigError::MissingParameter("viewer"))?;
        let min_superpose_positions = self
            .min_superpose_positions
            .unwrap_or(DEFAULT_MIN_SUPERPOSE_POSITIONS);
        if min_superpose_positions == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "min_superpose_positions",
                reason: "must be at least 1".to_string(),
            });
        }
        let timeouts = [
            ("connect_timeout", self.connect_timeout),
            ("reply_timeout", self.reply_timeout),
            ("launch_timeout", self.launch_timeout),
        ];
        if let Some((parameter, _)) = timeouts
            .iter()
            .find(|(_, timeout)| timeout.is_some_and(|t| t.is_zero()))
        {
            return Err(ConfigError::InvalidValue {
                parameter: *parameter,
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(ViewerConfig {
            viewer,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            reply_timeout: self.reply_timeout.unwrap_or(DEFAULT_REPLY_TIMEOUT),
            launch_timeout: self.launch_timeout.unwrap_or(DEFAULT_LAUNCH_TIMEOUT),
            min_superpose_positions,
        })
    }
}
