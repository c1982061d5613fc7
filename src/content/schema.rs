//! Content kind declarations and structural validation.
//!
//! A [`KindSpec`] is plain configuration. [`SchemaRegistry::define`] checks it
//! once and turns it into a [`KindDescriptor`] the loader can use.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = SchemaRegistry::new();
//! registry.define(KindSpec {
//!     name: "Tag".into(),
//!     content_type: ContentType::Data,
//!     file_path_pattern: "tags/**/*.json".into(),
//!     folder: "tags".into(),
//!     fields: vec![FieldSpec::required("name", FieldKind::String)],
//!     computed_fields: vec![ComputedField::slug(), ComputedField::url()],
//! })?;
//! ```

use super::{
    derive::{self, DeriveOptions},
    error::ContentError,
    record::RawRecord,
    value::{FieldValue, describe_json},
};
use crate::utils::date::parse_date;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt, path::Path};
use wax::{Glob, Pattern};

// ============================================================================
// Field Kinds
// ============================================================================

/// How a source file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// A flat JSON object.
    Data,
    /// YAML front matter followed by an MDX body.
    Mdx,
}

/// The supported field kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Boolean,
    Number,
    Date,
    List(Box<FieldKind>),
    Nested(NestedSchema),
}

/// Named set of fields used by [`FieldKind::Nested`].
#[derive(Debug, Clone, PartialEq)]
pub struct NestedSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            required: false,
        }
    }
}

impl FieldKind {
    pub fn list_of(kind: FieldKind) -> Self {
        Self::List(Box::new(kind))
    }

    /// Human readable name used in schema violation messages.
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".into(),
            Self::Boolean => "boolean".into(),
            Self::Number => "number".into(),
            Self::Date => "date".into(),
            Self::List(inner) => format!("list of {}", inner.describe()),
            Self::Nested(schema) => format!("{} object", schema.name),
        }
    }

    /// Type-check one raw value.
    fn check(&self, value: &Value, path: &Path, field: &str) -> Result<FieldValue, ContentError> {
        let mismatch = || ContentError::schema(path, field, self.describe(), describe_json(value));

        match (self, value) {
            (Self::String, Value::String(s)) => Ok(FieldValue::String(s.clone())),
            (Self::Boolean, Value::Bool(b)) => Ok(FieldValue::Boolean(*b)),
            (Self::Number, Value::Number(n)) => n.as_f64().map(FieldValue::Number).ok_or_else(mismatch),
            (Self::Date, Value::String(s)) => parse_date(s).map(FieldValue::Date).ok_or_else(mismatch),
            (Self::List(inner), Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| inner.check(item, path, &format!("{field}[{i}]")))
                .collect::<Result<_, _>>()
                .map(FieldValue::List),
            (Self::Nested(schema), Value::Object(map)) => {
                check_fields(&schema.fields, map, path, &format!("{field}.")).map(FieldValue::Object)
            }
            _ => Err(mismatch()),
        }
    }
}

/// Validate `object` against `fields`.
///
/// Unknown keys are ignored. `null` counts as missing.
pub fn check_fields(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    path: &Path,
    prefix: &str,
) -> Result<BTreeMap<String, FieldValue>, ContentError> {
    let mut out = BTreeMap::new();

    for spec in fields {
        let name = format!("{prefix}{}", spec.name);
        match object.get(&spec.name) {
            None | Some(Value::Null) if spec.required => {
                return Err(ContentError::schema(path, name, spec.kind.describe(), "missing"));
            }
            None | Some(Value::Null) => {}
            Some(value) => {
                out.insert(spec.name.clone(), spec.kind.check(value, path, &name)?);
            }
        }
    }

    Ok(out)
}

// ============================================================================
// Computed Fields
// ============================================================================

/// Computes one derived value from a raw record.
pub type Resolver =
    fn(&RawRecord, &KindDescriptor, &DeriveOptions) -> Result<FieldValue, ContentError>;

/// A derived field, evaluated after loading.
#[derive(Clone, Copy)]
pub struct ComputedField {
    pub name: &'static str,
    pub resolve: Resolver,
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedField").field("name", &self.name).finish()
    }
}

impl ComputedField {
    pub const SLUG: &'static str = "slug";
    pub const URL: &'static str = "url";
    pub const READING_TIME: &'static str = "readingTime";

    pub const fn slug() -> Self {
        Self {
            name: Self::SLUG,
            resolve: derive::resolve_slug,
        }
    }

    pub const fn url() -> Self {
        Self {
            name: Self::URL,
            resolve: derive::resolve_url,
        }
    }

    pub const fn reading_time() -> Self {
        Self {
            name: Self::READING_TIME,
            resolve: derive::resolve_reading_time,
        }
    }
}

// ============================================================================
// Kind Descriptors
// ============================================================================

/// Declaration of a content kind, before validation.
#[derive(Debug, Clone)]
pub struct KindSpec {
    pub name: String,
    pub content_type: ContentType,
    /// Glob relative to the content root, e.g. `posts/**/*.mdx`.
    pub file_path_pattern: String,
    /// Fixed folder stripped from flattened paths to form slugs.
    pub folder: String,
    pub fields: Vec<FieldSpec>,
    pub computed_fields: Vec<ComputedField>,
}

/// A registered, validated content kind.
pub struct KindDescriptor {
    pub name: String,
    pub content_type: ContentType,
    pub file_path_pattern: String,
    pub folder: String,
    pub fields: Vec<FieldSpec>,
    pub computed_fields: Vec<ComputedField>,
    glob: Glob<'static>,
}

impl fmt::Debug for KindDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindDescriptor")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("file_path_pattern", &self.file_path_pattern)
            .field("folder", &self.folder)
            .finish_non_exhaustive()
    }
}

impl KindDescriptor {
    /// Check a `/`-separated path relative to the content root.
    pub fn matches(&self, relative: &str) -> bool {
        self.glob.is_match(relative)
    }

    /// URL prefix shared by every record of this kind, e.g. `/posts/`.
    pub fn url_prefix(&self) -> String {
        format!("/{}/", self.folder)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The set of known content kinds, in declaration order.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    kinds: Vec<KindDescriptor>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `spec` and register it.
    ///
    /// Fails when the name is taken, a field name repeats, a computed field
    /// shadows a declared field, `slug`/`url` are not computed, or the
    /// pattern's fixed segment differs from `folder`.
    pub fn define(&mut self, spec: KindSpec) -> Result<&KindDescriptor, ContentError> {
        let invalid = |msg: String| ContentError::Registration(format!("{}: {msg}", spec.name));

        if spec.name.is_empty() {
            return Err(ContentError::Registration("kind name is empty".into()));
        }
        if self.get(&spec.name).is_some() {
            return Err(invalid("already defined".into()));
        }

        let mut names = FxHashSet::default();
        for field in &spec.fields {
            if !names.insert(field.name.as_str()) {
                return Err(invalid(format!("field `{}` declared twice", field.name)));
            }
        }
        for computed in &spec.computed_fields {
            if !names.insert(computed.name) {
                return Err(invalid(format!(
                    "computed field `{}` collides with another field",
                    computed.name
                )));
            }
        }
        for required in [ComputedField::SLUG, ComputedField::URL] {
            if !spec.computed_fields.iter().any(|c| c.name == required) {
                return Err(invalid(format!("missing computed field `{required}`")));
            }
        }

        let parse = || {
            Glob::new(&spec.file_path_pattern)
                .map_err(|e| invalid(format!("bad pattern `{}`: {e}", spec.file_path_pattern)))
        };
        let glob = parse()?.into_owned();
        let (fixed, _) = parse()?.partition();
        if fixed != Path::new(&spec.folder) {
            return Err(invalid(format!(
                "pattern `{}` is rooted at `{}`, expected `{}`",
                spec.file_path_pattern,
                fixed.display(),
                spec.folder
            )));
        }

        let index = self.kinds.len();
        self.kinds.push(KindDescriptor {
            name: spec.name,
            content_type: spec.content_type,
            file_path_pattern: spec.file_path_pattern,
            folder: spec.folder,
            fields: spec.fields,
            computed_fields: spec.computed_fields,
            glob,
        });
        Ok(&self.kinds[index])
    }

    pub fn kinds(&self) -> &[KindDescriptor] {
        &self.kinds
    }

    pub fn get(&self, name: &str) -> Option<&KindDescriptor> {
        self.kinds.iter().find(|k| k.name.eq_ignore_ascii_case(name))
    }
}
