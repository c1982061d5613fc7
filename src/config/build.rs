//! `[build]` section configuration.
//!
//! Paths, draft handling, reading-time rate and the feed/sitemap outputs.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in quill.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"      # authors/, tags/, posts/
/// output = "public"
/// hide_drafts = false
///
/// [build.rss]
/// enable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content root holding the kind folders.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Static files copied verbatim into the output (images, CSS).
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Remove the output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Leave posts marked `draft: true` out of pages, the feed and the sitemap.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub hide_drafts: bool,

    /// Reading speed used for `readingTime`.
    #[serde(default = "defaults::build::words_per_minute")]
    #[educe(Default = defaults::build::words_per_minute())]
    pub words_per_minute: u32,

    /// RSS feed generation settings.
    #[serde(default)]
    pub rss: RssConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// `[build.rss]` section.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RssConfig {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Feed path, relative to the output directory.
    #[serde(default = "defaults::build::rss::path")]
    #[educe(Default = defaults::build::rss::path())]
    pub path: PathBuf,
}

/// `[build.sitemap]` section.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Sitemap path, relative to the output directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert!(!config.build.clean);
        assert!(!config.build.hide_drafts);
        assert_eq!(config.build.words_per_minute, 200);
        assert!(config.build.rss.enable);
        assert_eq!(config.build.rss.path, PathBuf::from("rss.xml"));
        assert_eq!(config.build.sitemap.path, PathBuf::from("sitemap.xml"));
    }

    #[test]
    fn test_build_config_override() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test"

            [build]
            content = "data"
            hide_drafts = true
            words_per_minute = 250

            [build.rss]
            enable = false

            [build.sitemap]
            path = "map.xml"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.content, PathBuf::from("data"));
        assert!(config.build.hide_drafts);
        assert_eq!(config.build.words_per_minute, 250);
        assert!(!config.build.rss.enable);
        assert!(config.build.sitemap.enable);
        assert_eq!(config.build.sitemap.path, PathBuf::from("map.xml"));
    }

    #[test]
    fn test_build_unknown_field_rejection() {
        let result = toml::from_str::<SiteConfig>(
            r#"
            [base]
            title = "Test"
            description = "Test"

            [build]
            minify = true
        "#,
        );
        assert!(result.is_err());
    }
}
