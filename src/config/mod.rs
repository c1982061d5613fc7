//! Site configuration management for `quill.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[base]`    | Site metadata (title, description, url)        |
//! | `[build]`   | Paths, drafts, reading time, RSS and sitemap   |
//! | `[serve]`   | Development server (port, interface, watch)    |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Acme Blog"
//! description = "Tutorials and news"
//! url = "https://blog.acme.dev"
//!
//! [build]
//! content = "content"
//! output = "public"
//!
//! [serve]
//! port = 5277
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod serve;

pub use error::ConfigError;

use base::BaseConfig;
use build::BuildConfig;
use serve::ServeConfig;

use crate::{
    cli::{Cli, Commands},
    content::DeriveOptions,
};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing quill.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Base URL without a trailing slash, or `""` when unset.
    pub fn site_url(&self) -> &str {
        self.base.url.as_deref().unwrap_or("").trim_end_matches('/')
    }

    /// Options for computed fields.
    pub fn derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            words_per_minute: self.build.words_per_minute,
        }
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        self.update_path_with_root(&root, cli);

        if let Some(args) = cli.build_args() {
            self.build.clean |= args.clean;
            self.build.hide_drafts |= args.hide_drafts;
            Self::update_option(&mut self.build.rss.enable, args.rss.as_ref());
            Self::update_option(&mut self.build.sitemap.enable, args.sitemap.as_ref());
            if let Some(url) = &args.base_url {
                self.base.url = Some(url.clone());
            }
        }

        if let Commands::Serve {
            interface,
            port,
            watch,
            build_args,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
            if build_args.base_url.is_none() {
                self.base.url = Some(format!(
                    "http://{}:{}",
                    self.serve.interface, self.serve.port
                ));
            }
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every path against the root and make it absolute
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        self.build.rss.path = self.build.output.join(&self.build.rss.path);
        self.build.sitemap.path = self.build.output.join(&self.build.sitemap.path);
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Check settings the current command depends on
    pub fn validate(&self, cli: &Cli) -> Result<(), ConfigError> {
        if self.build.words_per_minute == 0 {
            return Err(ConfigError::invalid(
                "[build.words_per_minute]",
                "must be greater than 0",
            ));
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            return Err(ConfigError::invalid(
                "[base.url]",
                "must start with http:// or https://",
            ));
        }

        let writes_links = self.build.rss.enable || self.build.sitemap.enable;
        if matches!(cli.command, Commands::Build { .. }) && writes_links && self.base.url.is_none()
        {
            return Err(ConfigError::invalid(
                "[base.url]",
                "is required for RSS and sitemap generation",
            ));
        }

        if self.build.output.starts_with(&self.build.content) {
            return Err(ConfigError::invalid(
                "[build.output]",
                "must not be inside the content directory",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const MINIMAL: &str = r#"
        [base]
        title = "Acme"
        description = "Acme blog"
        url = "https://acme.dev/"
    "#;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("quill").chain(args.iter().copied()))
    }

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(MINIMAL).unwrap();
        assert_eq!(config.base.title, "Acme");
        assert_eq!(config.site_url(), "https://acme.dev");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(matches!(
            SiteConfig::from_str("[base\ntitle = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SiteConfig::from_path(&dir.path().join("quill.toml")),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_top_level_section() {
        let config = format!("{MINIMAL}\n[deploy]\nprovider = \"github\"\n");
        assert!(SiteConfig::from_str(&config).is_err());
    }

    #[test]
    fn test_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
        assert_eq!(config.site_url(), "");
        assert_eq!(config.serve.port, 5277);
        assert_eq!(config.derive_options().words_per_minute, 200);
    }

    #[test]
    fn test_update_with_cli_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let mut config = SiteConfig::from_str(MINIMAL).unwrap();
        config.update_with_cli(&cli(&["--root", root, "--output", "dist", "build"]));

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.build.content, root.join("content"));
        assert_eq!(config.build.output, root.join("dist"));
        assert_eq!(config.build.rss.path, root.join("dist").join("rss.xml"));
        assert_eq!(config.config_path, root.join("quill.toml"));
    }

    #[test]
    fn test_update_with_cli_build_flags() {
        let mut config = SiteConfig::from_str(MINIMAL).unwrap();
        config.update_with_cli(&cli(&[
            "build",
            "--hide-drafts",
            "--rss",
            "false",
            "--base-url",
            "https://ci.acme.dev",
        ]));

        assert!(config.build.hide_drafts);
        assert!(!config.build.rss.enable);
        assert_eq!(config.site_url(), "https://ci.acme.dev");
    }

    #[test]
    fn test_serve_uses_local_url() {
        let mut config = SiteConfig::from_str(MINIMAL).unwrap();
        config.update_with_cli(&cli(&["serve", "--port", "8080"]));

        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.site_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_validate_requires_url_for_build() {
        let mut config = SiteConfig::from_str(MINIMAL).unwrap();
        config.base.url = None;
        let build = cli(&["build"]);
        config.update_with_cli(&build);
        assert!(config.validate(&build).is_err());

        // Check never writes links
        assert!(config.validate(&cli(&["check"])).is_ok());
    }

    #[test]
    fn test_validate_url_scheme() {
        let mut config = SiteConfig::from_str(MINIMAL).unwrap();
        config.base.url = Some("acme.dev".into());
        let err = config.validate(&cli(&["check"])).unwrap_err();
        assert!(err.to_string().contains("[base.url]"));
    }

    #[test]
    fn test_validate_words_per_minute() {
        let mut config = SiteConfig::from_str(MINIMAL).unwrap();
        config.build.words_per_minute = 0;
        assert!(config.validate(&cli(&["check"])).is_err());
    }
}
