//! Configuration loader.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env reference pattern"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, falling back to defaults when the file
    /// does not exist. Parse errors are still reported.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand `${VAR}` and `${VAR:-default}`. Comment lines are left as written.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(content.len());
        for (index, line) in content.split_inclusive('\n').enumerate() {
            if line.trim_start().starts_with('#') {
                result.push_str(line);
                continue;
            }

            let mut last = 0;
            for cap in ENV_REFERENCE.captures_iter(line) {
                let Some(whole) = cap.get(0) else { continue };
                let (var_name, fallback) = match cap[1].split_once(":-") {
                    Some((name, default)) => (name, Some(default)),
                    None => (&cap[1], None),
                };
                let value = match (std::env::var(var_name), fallback) {
                    (Ok(value), _) => value,
                    (Err(_), Some(default)) => default.to_string(),
                    (Err(_), None) => {
                        return Err(ConfigError::EnvVarNotSet {
                            var: var_name.to_string(),
                            line: index + 1,
                        });
                    }
                };
                result.push_str(&line[last..whole.start()]);
                result.push_str(&value);
                last = whole.end();
            }
            result.push_str(&line[last..]);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
