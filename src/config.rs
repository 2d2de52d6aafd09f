use std::{env, fs, path::PathBuf};

use crate::prelude::*;
use crate::render::ColorChoice;
use nestify::nest;
use serde::{Deserialize, Serialize};

nest! {
    #[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]*
    #[serde(default, rename_all = "kebab-case")]*
    /// Persistent configuration for proctree.
    ///
    /// Stored at `~/.config/proctree/config.yaml`. Every field is optional and command line
    /// flags can only enable what the file leaves disabled.
    pub struct ProctreeConfig {
        pub display: pub struct DisplayConfig {
            pub resources: bool,
            pub verbose: bool,
            pub stats: bool,
        },
        pub color: ColorChoice,
    }
}

/// Get the path to the configuration file, following the XDG Base Directory Specification
/// at https://specifications.freedesktop.org/basedir-spec/basedir-spec-latest.html
///
/// If config_name is None, returns ~/.config/proctree/config.yaml (default)
/// If config_name is Some, returns ~/.config/proctree/{config_name}.yaml
fn get_configuration_file_path(config_name: Option<&str>) -> Result<PathBuf> {
    let config_dir = match env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = env::var("HOME").context("Neither XDG_CONFIG_HOME nor HOME is set")?;
            PathBuf::from(home).join(".config")
        }
    };
    let config_dir = config_dir.join("proctree");

    Ok(match config_name {
        Some(name) => config_dir.join(format!("{name}.yaml")),
        None => config_dir.join("config.yaml"),
    })
}

impl ProctreeConfig {
    /// Load the configuration. If it does not exist, return a default configuration.
    pub fn load(config_name: Option<&str>) -> Result<Self> {
        let config_path = match get_configuration_file_path(config_name) {
            Ok(path) => path,
            Err(err) => {
                debug!("{err}, using the default configuration");
                return Ok(Self::default());
            }
        };

        match fs::read(&config_path) {
            Ok(config_str) => {
                let config: ProctreeConfig =
                    serde_yaml::from_slice(&config_str).with_context(|| {
                        format!("Failed to parse proctree config at {}", config_path.display())
                    })?;
                debug!("Config loaded from {}", config_path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file not found at {}", config_path.display());
                Ok(Self::default())
            }
            Err(e) => bail!("Failed to load config: {e}"),
        }
    }
}
