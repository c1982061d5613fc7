//! Computed field derivation.
//!
//! Turns a [`RawRecord`] into a [`ResolvedRecord`]. Every resolver is a pure
//! function of the record and its kind, so the output does not depend on
//! load order.
//!
//! | Source file              | slug        | url                  |
//! |--------------------------|-------------|----------------------|
//! | `authors/jane-doe.json`  | `jane-doe`  | `/authors/jane-doe`  |
//! | `posts/2024/intro.mdx`   | `2024/intro`| `/posts/2024/intro`  |
//! | `posts/guide/index.mdx`  | `guide`     | `/posts/guide`       |

use super::{
    error::ContentError,
    markdown,
    record::{Body, RawRecord, ResolvedRecord},
    schema::{ComputedField, KindDescriptor},
    value::FieldValue,
};
use std::collections::BTreeMap;

/// Tunables for computed fields.
#[derive(Debug, Clone, Copy)]
pub struct DeriveOptions {
    pub words_per_minute: u32,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}

/// Apply every computed field of `kind` to `record`.
pub fn derive_computed_fields(
    record: RawRecord,
    kind: &KindDescriptor,
    options: &DeriveOptions,
) -> Result<ResolvedRecord, ContentError> {
    let mut computed = BTreeMap::new();
    for field in &kind.computed_fields {
        computed.insert(field.name, (field.resolve)(&record, kind, options)?);
    }

    let mut take_string = |name: &str| match computed.remove(name) {
        Some(FieldValue::String(s)) => Ok(s),
        _ => Err(ContentError::Registration(format!(
            "{}: computed `{name}` must produce a string",
            kind.name
        ))),
    };
    let slug = take_string(ComputedField::SLUG)?;
    let url = take_string(ComputedField::URL)?;

    let RawRecord {
        id,
        flattened_path,
        source,
        mut fields,
        body,
    } = record;
    fields.extend(computed.into_iter().map(|(k, v)| (k.to_owned(), v)));

    Ok(ResolvedRecord {
        id,
        flattened_path,
        source,
        slug,
        url,
        fields,
        body: body.map(|raw| Body {
            html: markdown::to_html(&raw),
            raw,
        }),
    })
}

/// Strip the kind folder from the flattened path.
///
/// A path outside the folder would leak the folder name into the slug.
pub fn derive_slug(record: &RawRecord, kind: &KindDescriptor) -> Result<String, ContentError> {
    let prefix = format!("{}/", kind.folder);
    match record.flattened_path.strip_prefix(&prefix) {
        Some(slug) if !slug.is_empty() => Ok(slug.to_owned()),
        _ => Err(ContentError::DerivationInvariantViolation {
            kind: kind.name.clone(),
            path: record.id.clone().into(),
            slug: record.flattened_path.clone(),
            folder: kind.folder.clone(),
        }),
    }
}

pub fn resolve_slug(
    record: &RawRecord,
    kind: &KindDescriptor,
    _: &DeriveOptions,
) -> Result<FieldValue, ContentError> {
    derive_slug(record, kind).map(FieldValue::String)
}

pub fn resolve_url(
    record: &RawRecord,
    kind: &KindDescriptor,
    _: &DeriveOptions,
) -> Result<FieldValue, ContentError> {
    let slug = derive_slug(record, kind)?;
    Ok(FieldValue::String(format!("{}{slug}", kind.url_prefix())))
}

/// Minutes to read the body, unrounded.
pub fn resolve_reading_time(
    record: &RawRecord,
    _: &KindDescriptor,
    options: &DeriveOptions,
) -> Result<FieldValue, ContentError> {
    let words = record.body.as_deref().map(markdown::word_count).unwrap_or(0);
    let minutes = words as f64 / f64::from(options.words_per_minute.max(1));
    Ok(FieldValue::Number(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{
        kinds,
        schema::{ContentType, FieldKind, FieldSpec, KindSpec, SchemaRegistry},
    };
    use std::path::PathBuf;

    fn raw(id: &str, flattened: &str, body: Option<&str>) -> RawRecord {
        RawRecord {
            id: id.into(),
            flattened_path: flattened.into(),
            source: PathBuf::from("/site/content").join(id),
            fields: BTreeMap::from([("name".to_string(), FieldValue::String("Jane".into()))]),
            body: body.map(String::from),
        }
    }

    #[test]
    fn test_author_slug_and_url() {
        let registry = kinds::default_registry().unwrap();
        let author = registry.get(kinds::AUTHOR).unwrap();

        let resolved = derive_computed_fields(
            raw("authors/jane-doe.json", "authors/jane-doe", None),
            author,
            &DeriveOptions::default(),
        )
        .unwrap();

        assert_eq!(resolved.slug, "jane-doe");
        assert_eq!(resolved.url, "/authors/jane-doe");
        assert_eq!(resolved.name(), "Jane");
        assert!(resolved.body.is_none());
    }

    #[test]
    fn test_tag_url_uses_tags_prefix() {
        let registry = kinds::default_registry().unwrap();
        let tag = registry.get(kinds::TAG).unwrap();

        let resolved = derive_computed_fields(
            raw("tags/react-native.json", "tags/react-native", None),
            tag,
            &DeriveOptions::default(),
        )
        .unwrap();
        assert_eq!(resolved.url, "/tags/react-native");
    }

    #[test]
    fn test_nested_post_slug_keeps_slashes() {
        let registry = kinds::default_registry().unwrap();
        let post = registry.get(kinds::POST).unwrap();

        let resolved = derive_computed_fields(
            raw("posts/2024/intro.mdx", "posts/2024/intro", Some("one two three four")),
            post,
            &DeriveOptions { words_per_minute: 2 },
        )
        .unwrap();

        assert_eq!(resolved.slug, "2024/intro");
        assert_eq!(resolved.url, "/posts/2024/intro");
        assert_eq!(resolved.reading_time(), Some(2.0));
        assert!(resolved.body.unwrap().html.contains("one two three four"));
    }

    #[test]
    fn test_slug_outside_folder_is_rejected() {
        let registry = kinds::default_registry().unwrap();
        let post = registry.get(kinds::POST).unwrap();

        let err = derive_computed_fields(
            raw("drafts/hello.mdx", "drafts/hello", Some("")),
            post,
            &DeriveOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DerivationInvariantViolation { .. }));
    }

    #[test]
    fn test_folder_index_is_rejected() {
        let mut registry = SchemaRegistry::new();
        let kind = registry
            .define(KindSpec {
                name: "Page".into(),
                content_type: ContentType::Data,
                file_path_pattern: "pages/**/*.json".into(),
                folder: "pages".into(),
                fields: vec![FieldSpec::optional("name", FieldKind::String)],
                computed_fields: vec![ComputedField::slug(), ComputedField::url()],
            })
            .unwrap();

        // `pages/index.json` flattens to `pages`, leaving no slug
        assert!(derive_slug(&raw("pages/index.json", "pages", None), kind).is_err());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let registry = kinds::default_registry().unwrap();
        let author = registry.get(kinds::AUTHOR).unwrap();
        let record = raw("authors/a.json", "authors/a", None);

        let first = derive_computed_fields(record.clone(), author, &DeriveOptions::default());
        let second = derive_computed_fields(record, author, &DeriveOptions::default());
        assert_eq!(first.unwrap(), second.unwrap());
    }
}
