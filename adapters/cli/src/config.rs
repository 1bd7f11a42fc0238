use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_sprint_core::Character;
use maze_sprint_session::SessionConfig;
use serde::Deserialize;

use crate::DeviceArg;

/// Contents of the optional TOML file passed via `--config`.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct CliConfig {
    #[serde(flatten)]
    pub(crate) session: SessionConfig,
    #[serde(default)]
    pub(crate) device: Option<DeviceArg>,
    #[serde(default)]
    pub(crate) character: Option<Character>,
}

impl CliConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }
}
