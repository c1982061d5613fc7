//! URL routing over the content snapshot.
//!
//! | Path                  | Route            |
//! |-----------------------|------------------|
//! | `/`                   | `Home`           |
//! | `/about`              | `About`          |
//! | `/tutorials`          | `Tutorials`      |
//! | `/tags`               | `Tags`           |
//! | `/posts/{slug...}`    | `Post(slug)`     |
//! | `/tags/{slug...}`     | `Tag(slug)`      |
//! | `/authors/{slug...}`  | `Author(slug)`   |
//! | `/rss.xml`            | `Feed`           |
//! | `/sitemap.xml`        | `Sitemap`        |
//!
//! Anything else, or a slug with no record, is not found.

use crate::content::{
    Collections, ResolvedRecord,
    query::{
        filter_by_author, filter_by_tag, find_by_slug, published, resolve_references,
        sort_by_publish_date_desc,
    },
};

/// Static pages, in sitemap order.
pub const STATIC_ROUTES: [&str; 3] = ["/", "/about", "/tutorials"];

/// The tags index, listed in the sitemap after the posts.
pub const TAGS_ROUTE: &str = "/tags";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Tutorials,
    Tags,
    /// Slugs may contain `/`.
    Post(String),
    Tag(String),
    Author(String),
    Feed,
    Sitemap,
    NotFound,
}

impl Route {
    /// Match a request path. Query strings and a trailing `index.html`
    /// segment are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_matches('/');
        let path = match path {
            "index.html" => "",
            _ => path.strip_suffix("/index.html").unwrap_or(path),
        };

        match path {
            "" => Self::Home,
            "about" => Self::About,
            "tutorials" => Self::Tutorials,
            "tags" => Self::Tags,
            "rss.xml" => Self::Feed,
            "sitemap.xml" => Self::Sitemap,
            _ => {
                let Some((folder, slug)) = path.split_once('/') else {
                    return Self::NotFound;
                };
                if slug.split('/').any(str::is_empty) {
                    return Self::NotFound;
                }
                match folder {
                    "posts" => Self::Post(slug.to_owned()),
                    "tags" => Self::Tag(slug.to_owned()),
                    "authors" => Self::Author(slug.to_owned()),
                    _ => Self::NotFound,
                }
            }
        }
    }
}

/// Data one page needs, borrowed from a snapshot.
#[derive(Debug)]
pub enum Page<'a> {
    Home {
        posts: Vec<&'a ResolvedRecord>,
    },
    About,
    Tutorials {
        posts: Vec<&'a ResolvedRecord>,
    },
    Tags {
        tags: &'a [ResolvedRecord],
    },
    Post {
        post: &'a ResolvedRecord,
        tags: Vec<&'a ResolvedRecord>,
        authors: Vec<&'a ResolvedRecord>,
    },
    Tag {
        tag: &'a ResolvedRecord,
        posts: Vec<&'a ResolvedRecord>,
    },
    Author {
        author: &'a ResolvedRecord,
        posts: Vec<&'a ResolvedRecord>,
    },
}

impl Page<'_> {
    /// Canonical URL path of this page.
    pub fn url(&self) -> &str {
        match self {
            Self::Home { .. } => "/",
            Self::About => "/about",
            Self::Tutorials { .. } => "/tutorials",
            Self::Tags { .. } => TAGS_ROUTE,
            Self::Post { post, .. } => &post.url,
            Self::Tag { tag, .. } => &tag.url,
            Self::Author { author, .. } => &author.url,
        }
    }
}

/// Resolve a page route against `collections`.
///
/// Returns `None` for not-found routes, unknown slugs and drafts when
/// `hide_drafts` is set. `Feed` and `Sitemap` are not pages and also yield `None`.
pub fn resolve<'a>(
    route: &Route,
    collections: &'a Collections,
    hide_drafts: bool,
) -> Option<Page<'a>> {
    let posts = published(collections.posts(), hide_drafts);

    let page = match route {
        Route::Home => Page::Home { posts },
        Route::About => Page::About,
        Route::Tutorials => Page::Tutorials {
            posts: sort_by_publish_date_desc(posts),
        },
        Route::Tags => Page::Tags {
            tags: collections.tags(),
        },
        Route::Post(slug) => {
            let post = *posts.iter().find(|post| post.slug == *slug)?;
            Page::Post {
                post,
                tags: resolve_references(&post.tag_slugs(), collections.tags()),
                authors: resolve_references(&post.author_slugs(), collections.authors()),
            }
        }
        Route::Tag(slug) => {
            let tag = find_by_slug(collections.tags(), slug)?;
            Page::Tag {
                tag,
                posts: sort_by_publish_date_desc(filter_by_tag(posts, slug)),
            }
        }
        Route::Author(slug) => {
            let author = find_by_slug(collections.authors(), slug)?;
            Page::Author {
                author,
                posts: sort_by_publish_date_desc(filter_by_author(posts, slug)),
            }
        }
        Route::Feed | Route::Sitemap | Route::NotFound => return None,
    };
    Some(page)
}

/// Every page route the snapshot can serve, for static output.
pub fn all_routes(collections: &Collections, hide_drafts: bool) -> Vec<Route> {
    let mut routes = vec![Route::Home, Route::About, Route::Tutorials, Route::Tags];
    routes.extend(
        published(collections.posts(), hide_drafts)
            .into_iter()
            .map(|post| Route::Post(post.slug.clone())),
    );
    routes.extend(collections.tags().iter().map(|t| Route::Tag(t.slug.clone())));
    routes.extend(collections.authors().iter().map(|a| Route::Author(a.slug.clone())));
    routes
}
