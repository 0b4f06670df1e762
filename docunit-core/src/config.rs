//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the docunit.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,

    /// Static asset directory; defaults to `<src_dir>/public`
    #[serde(default)]
    pub public_dir: Option<PathBuf>,

    #[serde(default)]
    pub clean_urls: CleanUrls,

    /// Attach git modification times to page data
    #[serde(default)]
    pub last_updated: bool,

    /// Regex patterns (matched against source-relative paths) excluded from discovery
    #[serde(default)]
    pub src_exclude: Vec<String>,

    #[serde(default)]
    pub ignore_dead_links: IgnoreDeadLinks,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_src_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_cache_capacity() -> usize {
    1024
}

/// How internal `.md` links are rewritten in rendered output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanUrls {
    /// `guide/install.md` -> `guide/install.html`
    #[default]
    Disabled,
    /// `guide/install.md` -> `guide/install`
    WithoutSubfolders,
    /// `guide/install.md` -> `guide/install/`
    WithSubfolders,
}

/// Which dead links are dropped instead of reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IgnoreDeadLinks {
    Flag(bool),
    Keyword(IgnoreKeyword),
    Patterns(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreKeyword {
    /// Only links pointing at `localhost`
    #[serde(rename = "localhostLinks")]
    LocalhostLinks,
}

impl Default for IgnoreDeadLinks {
    fn default() -> Self {
        IgnoreDeadLinks::Flag(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Production builds reserve more constant names
    #[serde(default)]
    pub production: bool,

    /// Build-time defines; only the keys matter here
    #[serde(default)]
    pub define: HashMap<String, serde_yaml::Value>,
}

impl Config {
    /// Configuration rooted at `src_dir` with every other option at its default
    pub fn new(src_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            public_dir: None,
            clean_urls: CleanUrls::default(),
            last_updated: false,
            src_exclude: Vec::new(),
            ignore_dead_links: IgnoreDeadLinks::default(),
            build: BuildConfig::default(),
            cache_capacity: default_cache_capacity(),
            config_path: None,
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Get the source directory, resolved relative to config file
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.src_dir)
    }

    /// Get the public asset directory, resolved relative to config file
    pub fn public_dir(&self) -> PathBuf {
        match &self.public_dir {
            Some(dir) => self.resolve_path(dir),
            None => self.src_dir().join("public"),
        }
    }

    /// Keys of user defines, in sorted order
    pub fn define_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.build.define.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(default_src_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.src_dir, PathBuf::from("."));
        assert_eq!(config.clean_urls, CleanUrls::Disabled);
        assert_eq!(config.ignore_dead_links, IgnoreDeadLinks::Flag(false));
        assert_eq!(config.cache_capacity, 1024);
        assert!(!config.last_updated);
        assert!(!config.build.production);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
src_dir: docs
public_dir: assets
clean_urls: without-subfolders
last_updated: true
src_exclude: ["^drafts/"]
ignore_dead_links: localhostLinks
build:
  production: true
  define:
    __APP_VERSION__: "1.0"
    __DEV__: false
cache_capacity: 16
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.clean_urls, CleanUrls::WithoutSubfolders);
        assert_eq!(
            config.ignore_dead_links,
            IgnoreDeadLinks::Keyword(IgnoreKeyword::LocalhostLinks)
        );
        assert_eq!(config.define_keys(), vec!["__APP_VERSION__", "__DEV__"]);
        assert_eq!(config.cache_capacity, 16);
    }

    #[test]
    fn test_ignore_dead_links_variants() {
        let config: Config = serde_yaml::from_str("ignore_dead_links: true").unwrap();
        assert_eq!(config.ignore_dead_links, IgnoreDeadLinks::Flag(true));

        let config: Config =
            serde_yaml::from_str("ignore_dead_links: ['^/api/', 'legacy']").unwrap();
        assert_eq!(
            config.ignore_dead_links,
            IgnoreDeadLinks::Patterns(vec!["^/api/".into(), "legacy".into()])
        );
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docunit.yml");
        fs::write(&path, "src_dir: docs\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.src_dir(), dir.path().join("docs"));
        assert_eq!(config.public_dir(), dir.path().join("docs").join("public"));
    }

    #[test]
    fn test_explicit_public_dir() {
        let mut config = Config::new("/site/docs");
        config.public_dir = Some(PathBuf::from("/site/static"));
        assert_eq!(config.public_dir(), PathBuf::from("/site/static"));
    }
}
