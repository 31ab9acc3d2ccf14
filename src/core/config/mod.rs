use std::path::{Path, PathBuf};

mod loader;

use loader::ConfigLoader;

pub const DEFAULT_PROMPT: &str = ": ";
const RC_FILE: &str = ".minshrc";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Start-up settings read from the rc file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    prompt: String,
    exported: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            exported: Vec::new(),
        }
    }
}

impl Config {
    /// `$HOME/.minshrc`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(RC_FILE))
    }

    /// Loads `explicit` if given (it must exist), otherwise the default rc
    /// file when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
                }
                ConfigLoader::new(path).load_into(&mut config)?;
            }
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.exists()) {
                    ConfigLoader::new(&path).load_into(&mut config)?;
                }
            }
        }
        Ok(config)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Variables exported by the rc file, in file order.
    pub fn exported(&self) -> &[(String, String)] {
        &self.exported
    }
}
