//! Raw and resolved content records.

use super::value::FieldValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};

/// Field names of the built-in kinds that the query layer reads.
pub mod fields {
    pub const NAME: &str = "name";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const DRAFT: &str = "draft";
    pub const PUBLISHED_AT: &str = "publishedAt";
    pub const TAGS: &str = "tags";
    pub const AUTHORS: &str = "authors";
}

/// One parsed and type-checked source file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Source path relative to the content root, with extension.
    pub id: String,
    /// Relative path without extension; a trailing `/index` is dropped.
    pub flattened_path: String,
    /// Absolute path of the source file.
    pub source: PathBuf,
    /// Declared fields present in the file.
    pub fields: BTreeMap<String, FieldValue>,
    /// Markup body (MDX kinds only).
    pub body: Option<String>,
}

/// Rendered markup body of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    pub raw: String,
    pub html: String,
}

/// A record after computed fields have been applied.
///
/// Serializes to the shape templates consume: declared fields at the top
/// level next to `_id`, `slug`, `url` and any other computed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip)]
    pub flattened_path: String,
    #[serde(skip)]
    pub source: PathBuf,
    pub slug: String,
    pub url: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

impl ResolvedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn date_field(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_date)
    }

    /// String elements of a list field; empty when absent.
    pub fn string_list(&self, field: &str) -> Vec<&str> {
        self.get(field)
            .and_then(FieldValue::as_list)
            .map(|items| items.iter().filter_map(FieldValue::as_str).collect())
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.str_field(fields::NAME).unwrap_or(&self.slug)
    }

    pub fn title(&self) -> &str {
        self.str_field(fields::TITLE).unwrap_or(&self.slug)
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field(fields::DESCRIPTION)
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.date_field(fields::PUBLISHED_AT)
    }

    pub fn is_draft(&self) -> bool {
        self.get(fields::DRAFT)
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
    }

    pub fn tag_slugs(&self) -> Vec<&str> {
        self.string_list(fields::TAGS)
    }

    pub fn author_slugs(&self) -> Vec<&str> {
        self.string_list(fields::AUTHORS)
    }

    /// Estimated reading time in minutes, if computed for this kind.
    pub fn reading_time(&self) -> Option<f64> {
        self.get(super::schema::ComputedField::READING_TIME)
            .and_then(FieldValue::as_f64)
    }
}
