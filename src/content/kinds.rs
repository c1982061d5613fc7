//! Built-in content kinds: Author, Tag and Post.

use super::{
    error::ContentError,
    schema::{
        ComputedField, ContentType, FieldKind, FieldSpec, KindSpec, NestedSchema, SchemaRegistry,
    },
};

pub const AUTHOR: &str = "Author";
pub const TAG: &str = "Tag";
pub const POST: &str = "Post";

/// `{ url, width, height, alt }`, shared by avatars and cover images.
pub fn image() -> FieldKind {
    FieldKind::Nested(NestedSchema {
        name: "Image",
        fields: vec![
            FieldSpec::required("url", FieldKind::String),
            FieldSpec::required("width", FieldKind::Number),
            FieldSpec::required("height", FieldKind::Number),
            FieldSpec::required("alt", FieldKind::String),
        ],
    })
}

pub fn author() -> KindSpec {
    KindSpec {
        name: AUTHOR.into(),
        content_type: ContentType::Data,
        file_path_pattern: "authors/**/*.json".into(),
        folder: "authors".into(),
        fields: vec![
            FieldSpec::required("name", FieldKind::String),
            FieldSpec::required("twitterHandle", FieldKind::String),
            FieldSpec::required("avatar", image()),
            FieldSpec::optional("bio", FieldKind::String),
        ],
        computed_fields: vec![ComputedField::slug(), ComputedField::url()],
    }
}

pub fn tag() -> KindSpec {
    KindSpec {
        name: TAG.into(),
        content_type: ContentType::Data,
        file_path_pattern: "tags/**/*.json".into(),
        folder: "tags".into(),
        fields: vec![
            FieldSpec::required("name", FieldKind::String),
            FieldSpec::optional("description", FieldKind::String),
        ],
        computed_fields: vec![ComputedField::slug(), ComputedField::url()],
    }
}

pub fn post() -> KindSpec {
    KindSpec {
        name: POST.into(),
        content_type: ContentType::Mdx,
        file_path_pattern: "posts/**/*.mdx".into(),
        folder: "posts".into(),
        fields: vec![
            FieldSpec::required("draft", FieldKind::Boolean),
            FieldSpec::required("publishedAt", FieldKind::Date),
            FieldSpec::optional("modifiedAt", FieldKind::Date),
            FieldSpec::required("title", FieldKind::String),
            FieldSpec::required("description", FieldKind::String),
            FieldSpec::required("coverImage", image()),
            FieldSpec::required("tags", FieldKind::list_of(FieldKind::String)),
            FieldSpec::required("authors", FieldKind::list_of(FieldKind::String)),
        ],
        computed_fields: vec![
            ComputedField::slug(),
            ComputedField::url(),
            ComputedField::reading_time(),
        ],
    }
}

/// Registry holding the three built-in kinds.
pub fn default_registry() -> Result<SchemaRegistry, ContentError> {
    let mut registry = SchemaRegistry::new();
    for spec in [author(), tag(), post()] {
        registry.define(spec)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = default_registry().unwrap();
        let names: Vec<_> = registry.kinds().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, [AUTHOR, TAG, POST]);
    }

    #[test]
    fn test_post_matches_nested_mdx() {
        let registry = default_registry().unwrap();
        let post = registry.get(POST).unwrap();
        assert!(post.matches("posts/intro.mdx"));
        assert!(post.matches("posts/series/part-1.mdx"));
        assert!(!post.matches("posts/intro.md"));
    }
}
