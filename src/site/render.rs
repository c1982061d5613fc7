//! Page rendering with embedded Tera templates.
//!
//! Templates are compiled into the binary. Every page gets `site`, `title`,
//! `description` and `url`; page-specific values are listed on
//! [`Renderer::render`].

use super::route::Page;
use crate::{
    config::SiteConfig,
    content::ResolvedRecord,
    utils::{date::to_display, plural::plural_count},
};
use anyhow::{Context, Result};
use serde::Serialize;
use tera::Tera;

const TEMPLATES: [(&str, &str); 10] = [
    ("base.html", include_str!("../embed/templates/base.html")),
    ("macros.html", include_str!("../embed/templates/macros.html")),
    ("home.html", include_str!("../embed/templates/home.html")),
    ("tutorials.html", include_str!("../embed/templates/tutorials.html")),
    ("post.html", include_str!("../embed/templates/post.html")),
    ("tags.html", include_str!("../embed/templates/tags.html")),
    ("tag.html", include_str!("../embed/templates/tag.html")),
    ("author.html", include_str!("../embed/templates/author.html")),
    ("about.html", include_str!("../embed/templates/about.html")),
    ("404.html", include_str!("../embed/templates/404.html")),
];

/// Site-wide values available to every template as `site`.
#[derive(Debug, Clone, Serialize)]
struct SiteView {
    title: String,
    description: String,
    url: String,
    language: String,
}

/// A post plus the labels templates print.
#[derive(Debug, Serialize)]
struct PostView<'a> {
    #[serde(flatten)]
    record: &'a ResolvedRecord,
    /// `Jan 05, 2024`
    date: String,
    /// Reading time rounded up.
    minutes: u64,
    /// Tag slugs with `-` read as spaces.
    keywords: Vec<String>,
}

impl<'a> PostView<'a> {
    fn new(record: &'a ResolvedRecord) -> Self {
        Self {
            record,
            date: record.published_at().map(to_display).unwrap_or_default(),
            minutes: reading_minutes(record.reading_time().unwrap_or(0.0)),
            keywords: record
                .tag_slugs()
                .into_iter()
                .map(|tag| tag.replace('-', " "))
                .collect(),
        }
    }

    fn many(records: &[&'a ResolvedRecord]) -> Vec<Self> {
        records.iter().copied().map(Self::new).collect()
    }
}

/// `ceil(minutes)`, never below zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn reading_minutes(minutes: f64) -> u64 {
    minutes.max(0.0).ceil() as u64
}

pub struct Renderer {
    tera: Tera,
    site: SiteView,
}

impl Renderer {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .context("Failed to parse embedded templates")?;

        Ok(Self {
            tera,
            site: SiteView {
                title: config.base.title.clone(),
                description: config.base.description.clone(),
                url: config.site_url().to_owned(),
                language: config.base.language.clone(),
            },
        })
    }

    /// Render one page to HTML.
    ///
    /// | Page      | Extra context                                  |
    /// |-----------|------------------------------------------------|
    /// | home      | `posts`                                        |
    /// | tutorials | `posts`                                        |
    /// | post      | `post`, `tags`, `authors`                      |
    /// | tags      | `tags`                                         |
    /// | tag       | `tag`, `posts`, `count`                        |
    /// | author    | `author`, `posts`, `count`                     |
    pub fn render(&self, page: &Page<'_>) -> Result<String> {
        let site_title = &self.site.title;
        let mut ctx = tera::Context::new();

        let (template, title, description) = match page {
            Page::Home { posts } => {
                ctx.insert("posts", &PostView::many(posts));
                ("home.html", site_title.clone(), self.site.description.clone())
            }
            Page::About => (
                "about.html",
                format!("About - {site_title}"),
                self.site.description.clone(),
            ),
            Page::Tutorials { posts } => {
                ctx.insert("posts", &PostView::many(posts));
                (
                    "tutorials.html",
                    format!("Tutorials - {site_title}"),
                    self.site.description.clone(),
                )
            }
            Page::Tags { tags } => {
                ctx.insert("tags", tags);
                (
                    "tags.html",
                    format!("Tags - {site_title}"),
                    self.site.description.clone(),
                )
            }
            Page::Post { post, tags, authors } => {
                ctx.insert("post", &PostView::new(post));
                ctx.insert("tags", tags);
                ctx.insert("authors", authors);
                (
                    "post.html",
                    post.title().to_owned(),
                    post.description().unwrap_or_default().to_owned(),
                )
            }
            Page::Tag { tag, posts } => {
                ctx.insert("tag", tag);
                ctx.insert("posts", &PostView::many(posts));
                ctx.insert("count", &plural_count(posts.len(), "post"));
                let description = tag.description().map_or_else(
                    || format!("Explore all content from {} tag.", tag.name()),
                    str::to_owned,
                );
                ("tag.html", format!("{} - {site_title}", tag.name()), description)
            }
            Page::Author { author, posts } => {
                ctx.insert("author", author);
                ctx.insert("posts", &PostView::many(posts));
                ctx.insert("count", &plural_count(posts.len(), "post"));
                let description = author.str_field("bio").map_or_else(
                    || format!("Posts written by {}.", author.name()),
                    str::to_owned,
                );
                ("author.html", format!("{} - {site_title}", author.name()), description)
            }
        };

        ctx.insert("title", &title);
        ctx.insert("description", &description);
        ctx.insert("url", page.url());
        self.finish(template, ctx)
            .with_context(|| format!("Failed to render `{}`", page.url()))
    }

    /// Render the not-found page.
    pub fn render_not_found(&self) -> Result<String> {
        let mut ctx = tera::Context::new();
        ctx.insert("title", &format!("Not Found - {}", self.site.title));
        ctx.insert("description", &self.site.description);
        ctx.insert("url", "/404.html");
        self.finish("404.html", ctx)
            .context("Failed to render the not-found page")
    }

    fn finish(&self, template: &str, mut ctx: tera::Context) -> Result<String> {
        ctx.insert("site", &self.site);
        Ok(self.tera.render(template, &ctx)?)
    }
}
