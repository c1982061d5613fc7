//! Lookups over resolved collections.
//!
//! Queries borrow from a collection and return new vectors of references.
//! The collection itself is never reordered.

use super::record::ResolvedRecord;
use crate::debug;
use std::cmp::Reverse;

/// Find the record whose slug equals `slug`.
///
/// `None` is the not-found outcome; routes turn it into a 404.
pub fn find_by_slug<'a>(collection: &'a [ResolvedRecord], slug: &str) -> Option<&'a ResolvedRecord> {
    collection.iter().find(|record| record.slug == slug)
}

/// Map slugs to records, keeping the order of `slugs`.
///
/// Slugs without a record are dropped and reported in verbose mode.
pub fn resolve_references<'a, S: AsRef<str>>(
    slugs: &[S],
    collection: &'a [ResolvedRecord],
) -> Vec<&'a ResolvedRecord> {
    slugs
        .iter()
        .filter_map(|slug| {
            let slug = slug.as_ref();
            let found = find_by_slug(collection, slug);
            if found.is_none() {
                debug!("query"; "dangling reference `{slug}`");
            }
            found
        })
        .collect()
}

/// Posts whose `tags` contain `tag_slug`, in input order.
pub fn filter_by_tag<'a, I>(posts: I, tag_slug: &str) -> Vec<&'a ResolvedRecord>
where
    I: IntoIterator<Item = &'a ResolvedRecord>,
{
    posts
        .into_iter()
        .filter(|post| post.tag_slugs().contains(&tag_slug))
        .collect()
}

/// Posts whose `authors` contain `author_slug`, in input order.
pub fn filter_by_author<'a, I>(posts: I, author_slug: &str) -> Vec<&'a ResolvedRecord>
where
    I: IntoIterator<Item = &'a ResolvedRecord>,
{
    posts
        .into_iter()
        .filter(|post| post.author_slugs().contains(&author_slug))
        .collect()
}

/// Newest first. Stable: equal dates keep their input order.
///
/// Records without `publishedAt` sort last.
pub fn sort_by_publish_date_desc<'a, I>(posts: I) -> Vec<&'a ResolvedRecord>
where
    I: IntoIterator<Item = &'a ResolvedRecord>,
{
    let mut sorted: Vec<_> = posts.into_iter().collect();
    sorted.sort_by_key(|post| post.published_at().map(Reverse));
    // `None < Some`, so move undated records behind the dated ones
    let undated = sorted.iter().take_while(|p| p.published_at().is_none()).count();
    sorted.rotate_left(undated);
    sorted
}

/// Posts that appear on the site. Drafts are kept unless `hide_drafts` is set.
pub fn published(posts: &[ResolvedRecord], hide_drafts: bool) -> Vec<&ResolvedRecord> {
    posts
        .iter()
        .filter(|post| !(hide_drafts && post.is_draft()))
        .collect()
}
