use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the MDX sources.
    pub content_dir: PathBuf,
    /// Where processed markdown is written.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Scope every page to this SDK instead of inferring it from the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk: Option<String>,
    /// Globs, relative to `content_dir`, selecting the files to build.
    #[serde(default = "default_include")]
    pub include: Vec<String>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_include() -> Vec<String> {
    vec!["**/*.mdx".to_string(), "**/*.md".to_string()]
}

impl Config {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            out_dir: default_out_dir(),
            sdk: None,
            include: default_include(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured directories
        config.content_dir = Self::expand_path(&config.content_dir).unwrap_or(config.content_dir);
        config.out_dir = Self::expand_path(&config.out_dir).unwrap_or(config.out_dir);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/docs-mdx");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Source files matching any `include` glob, as paths relative to
    /// `content_dir`, sorted and without duplicates. Entries that cannot be
    /// read are skipped.
    pub fn source_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        // glob drops `.` components from what it yields
        let root: PathBuf = self
            .content_dir
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect();

        let mut files = Vec::new();
        for pattern in &self.include {
            let full = self.content_dir.join(pattern);
            let entries = glob::glob(&full.to_string_lossy()).map_err(|source| {
                ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            files.extend(
                entries
                    .flatten()
                    .filter(|path| path.is_file())
                    .filter_map(|path| {
                        path.strip_prefix(&root)
                            .or_else(|_| path.strip_prefix(&self.content_dir))
                            .ok()
                            .map(Path::to_path_buf)
                    }),
            );
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// `~` and `$VAR` expansion; `None` when a variable is undefined.
    fn expand_path(path: &Path) -> Option<PathBuf> {
        shellexpand::full(&path.to_string_lossy())
            .ok()
            .map(|expanded| PathBuf::from(expanded.into_owned()))
    }
}
