//! Sitemap generation.
//!
//! Lists every public page for search engine indexing, in this order:
//! static pages, posts, the tags index, tags, authors.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    content::{Collections, query::published},
    log,
    site::route::{STATIC_ROUTES, TAGS_ROUTE},
    utils::date::to_ymd,
};
use anyhow::{Context, Result};
use std::fs;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Write the sitemap to `[build.sitemap].path` if enabled.
pub fn build_sitemap(config: &SiteConfig, collections: &Collections) -> Result<()> {
    if config.build.sitemap.enable {
        let sitemap_path = &config.build.sitemap.path;
        let xml = render_sitemap(config, collections);

        if let Some(parent) = sitemap_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(sitemap_path, xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", sitemap_path.file_name().unwrap_or_default().to_string_lossy());
    }
    Ok(())
}

/// Render the sitemap document for the current snapshot.
pub fn render_sitemap(config: &SiteConfig, collections: &Collections) -> String {
    let lastmod = to_ymd(chrono::Utc::now());
    Sitemap::from_collections(config, collections).into_xml(&lastmod)
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

struct Sitemap {
    /// Absolute page URLs
    urls: Vec<String>,
}

impl Sitemap {
    fn from_collections(config: &SiteConfig, collections: &Collections) -> Self {
        let site_url = config.site_url();
        let absolute = |path: &str| {
            if path == "/" {
                site_url.to_owned()
            } else {
                format!("{site_url}{path}")
            }
        };

        let posts = published(collections.posts(), config.build.hide_drafts);
        let urls = STATIC_ROUTES
            .into_iter()
            .map(absolute)
            .chain(posts.iter().map(|post| absolute(&post.url)))
            .chain(std::iter::once(absolute(TAGS_ROUTE)))
            .chain(collections.tags().iter().map(|tag| absolute(&tag.url)))
            .chain(collections.authors().iter().map(|author| absolute(&author.url)))
            .collect();

        Self { urls }
    }

    /// Every entry shares one `lastmod`, the build date.
    fn into_xml(self, lastmod: &str) -> String {
        let mut xml = String::with_capacity(128 * (self.urls.len() + 1));

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for loc in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
