use std::{env, fs, path::Path};

use log::{debug, warn};

use super::{Config, ConfigError};

pub struct ConfigLoader<'a> {
    path: &'a Path,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    pub fn load_into(&self, config: &mut Config) -> Result<(), ConfigError> {
        let content = fs::read_to_string(self.path).map_err(|source| ConfigError::Io {
            path: self.path.to_path_buf(),
            source,
        })?;

        for (number, line) in content.lines().enumerate() {
            self.process_line(number + 1, line, config);
        }
        debug!("loaded config from {}", self.path.display());
        Ok(())
    }

    fn process_line(&self, number: usize, line: &str, config: &mut Config) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        if let Some(var_def) = line.strip_prefix("export ") {
            self.process_env_var(number, var_def, config);
        } else if let Some(value) = line.strip_prefix("prompt=") {
            config.prompt = unquote(value).to_string();
        } else {
            warn!("{}:{}: ignoring unknown setting", self.path.display(), number);
        }
    }

    fn process_env_var(&self, number: usize, var_def: &str, config: &mut Config) {
        let Some((name, value)) = var_def.split_once('=') else {
            warn!("{}:{}: expected export NAME=VALUE", self.path.display(), number);
            return;
        };

        let name = name.trim();
        let value = unquote(value.trim());
        if name.is_empty() || name.contains('\0') || value.contains('\0') {
            warn!("{}:{}: invalid export", self.path.display(), number);
            return;
        }

        env::set_var(name, value);
        config.exported.push((name.to_string(), value.to_string()));
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
