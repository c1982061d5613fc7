//! RSS feed generation.
//!
//! One item per post, newest first. The channel links back to itself through
//! an Atom `self` link.

use crate::{
    config::SiteConfig,
    content::{
        Collections, ResolvedRecord,
        query::{published, resolve_references, sort_by_publish_date_desc},
    },
    log,
    utils::{date::to_rfc2822, slug::to_slash},
};
use anyhow::{Context, Result, anyhow};
use rss::{
    CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder,
    extension::atom::{AtomExtension, Link},
    validation::Validate,
};
use std::fs;

// ============================================================================
// Public API
// ============================================================================

/// Write the feed to `[build.rss].path` if enabled.
pub fn build_rss(config: &SiteConfig, collections: &Collections) -> Result<()> {
    if config.build.rss.enable {
        let xml = render_feed(config, collections)?;
        let rss_path = &config.build.rss.path;

        if let Some(parent) = rss_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(rss_path, xml)
            .with_context(|| format!("Failed to write feed to {}", rss_path.display()))?;

        log!("rss"; "{}", rss_path.file_name().unwrap_or_default().to_string_lossy());
    }
    Ok(())
}

/// Render the RSS 2.0 document for the current snapshot.
pub fn render_feed(config: &SiteConfig, collections: &Collections) -> Result<String> {
    let site_url = config.site_url();
    let posts = sort_by_publish_date_desc(published(collections.posts(), config.build.hide_drafts));

    let items: Vec<_> = posts
        .into_iter()
        .map(|post| post_to_rss_item(post, collections, site_url))
        .collect();

    let webmaster = match (&config.base.email, &config.base.author) {
        (Some(email), Some(author)) => Some(format!("{email} ({author})")),
        _ => None,
    };

    let channel = ChannelBuilder::default()
        .title(&config.base.title)
        .link(site_url)
        .description(&config.base.description)
        .language(config.base.language.clone())
        .generator(format!("quill {}", env!("CARGO_PKG_VERSION")))
        .webmaster(webmaster)
        .pub_date(to_rfc2822(chrono::Utc::now()))
        .atom_ext(Some(self_link(&feed_url(config))))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validation failed: {e}"))?;
    Ok(channel.to_string())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Absolute URL of the feed, from its path under the output directory.
fn feed_url(config: &SiteConfig) -> String {
    let rss_path = &config.build.rss.path;
    let relative = rss_path.strip_prefix(&config.build.output).unwrap_or(rss_path);
    format!("{}/{}", config.site_url(), to_slash(relative))
}

fn self_link(href: &str) -> AtomExtension {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel("self");
    link.set_mime_type(Some("application/rss+xml".to_owned()));

    let mut atom = AtomExtension::default();
    atom.set_links(vec![link]);
    atom
}

/// Convert a post to an RSS item.
///
/// The author is the first of the post's authors that resolves.
fn post_to_rss_item(post: &ResolvedRecord, collections: &Collections, site_url: &str) -> rss::Item {
    let link = format!("{site_url}{}", post.url);
    let author = resolve_references(&post.author_slugs(), collections.authors())
        .first()
        .map(|author| author.name().to_owned());
    let categories = post
        .tag_slugs()
        .into_iter()
        .map(|tag| CategoryBuilder::default().name(tag).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(post.title().to_owned())
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.description().map(str::to_owned))
        .pub_date(post.published_at().map(to_rfc2822))
        .author(author)
        .categories(categories)
        .build()
}
