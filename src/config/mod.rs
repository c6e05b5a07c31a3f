//! Knowledge-base configuration management for `medkb.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site], [store], [import], [build]
//! ├── error.rs       # ConfigError, ConfigDiagnostics
//! ├── util.rs        # config discovery, URL helpers
//! └── mod.rs         # KbConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section             | Purpose                                         |
//! |---------------------|-------------------------------------------------|
//! | `[site]`            | Site name, public base URL, admin URL pattern   |
//! | `[store]`           | Content store snapshot path                     |
//! | `[import]`          | Existing-article policy, index page title       |
//! | `[render]`          | Citation scope, markdown extensions             |
//! | `[build]`           | Static HTML output directory                    |

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{BuildConfig, ImportConfig, SiteConfig, StoreConfig};
pub use util::{find_config_file, join_url, parse_base_url};

use crate::{
    cli::{Cli, Commands},
    log,
    render::RenderOptions,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "medkb.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing medkb.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KbConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub render: RenderOptions,

    #[serde(default)]
    pub build: BuildConfig,
}

impl KbConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// `init` gets defaults rooted at the cwd. Every other command searches
    /// upward from the cwd for the config file and fails if none exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        if cli.is_init() {
            let mut config = Self::default();
            config.config_path = cwd.join(&cli.config);
            config.finalize(&cwd, cli);
            return Ok(config);
        }

        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;
        let mut config = Self::from_path(&config_path)?;

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.config_path = config_path;
        config.finalize(&root, cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Default configuration rendered as TOML, written by `medkb init`.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Resolve paths against `root` and apply CLI overrides.
    fn finalize(&mut self, root: &Path, cli: &Cli) {
        self.root = root.to_path_buf();
        self.apply_command_options(cli);
        self.store.path = util::resolve_path(&self.store.path, root);
        self.build.output = util::resolve_path(&self.build.output, root);
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Import { on_existing, .. } => {
                Self::update_option(&mut self.import.on_existing, on_existing.as_ref());
            }
            Commands::Render { citation_scope, .. } => {
                Self::update_option(&mut self.render.citation_scope, citation_scope.as_ref());
            }
            Commands::Build {
                output,
                clean,
                citation_scope,
            } => {
                Self::update_option(&mut self.build.output, output.as_ref());
                Self::update_option(&mut self.render.citation_scope, citation_scope.as_ref());
                self.build.clean |= *clean;
            }
            Commands::Init { .. }
            | Commands::Keywords { .. }
            | Commands::Links { .. }
            | Commands::Validate { .. }
            | Commands::Prune { .. }
            | Commands::Purge { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors and returning them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.store.validate(&mut diag);
        self.import.validate(&mut diag);
        self.build.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KbConfig {
    let (parsed, ignored) = KbConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
