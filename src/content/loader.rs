//! Content loading.
//!
//! Walks the content root, picks the files matching each kind's pattern and
//! turns every file into a [`RawRecord`].
//!
//! # Ordering
//!
//! Directories are walked sorted by file name, so records come out in the
//! same order on every run and every platform. Nothing is sorted by content.
//!
//! # Failure
//!
//! One bad file fails the whole load. Callers never see a partial kind.

use super::{
    error::ContentError,
    frontmatter,
    record::RawRecord,
    schema::{ContentType, KindDescriptor, SchemaRegistry, check_fields},
};
use crate::utils::slug::{flattened_path, to_slash};
use rayon::prelude::*;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Raw records grouped by kind name.
pub type RawCollections = BTreeMap<String, Vec<RawRecord>>;

/// Load every registered kind from `content_root`.
pub fn load_all(registry: &SchemaRegistry, content_root: &Path) -> Result<RawCollections, ContentError> {
    let files = enumerate(content_root)?;

    registry
        .kinds()
        .iter()
        .map(|kind| Ok((kind.name.clone(), load_kind(kind, content_root, &files)?)))
        .collect()
}

/// Load the files of one kind, in enumeration order.
///
/// `files` are `(absolute, relative)` pairs from [`enumerate`].
pub fn load_kind(
    kind: &KindDescriptor,
    content_root: &Path,
    files: &[(PathBuf, String)],
) -> Result<Vec<RawRecord>, ContentError> {
    let matching: Vec<_> = files
        .iter()
        .filter(|(_, relative)| kind.matches(relative))
        .collect();

    matching
        .par_iter()
        .map(|(path, _)| load_file(kind, content_root, path))
        .collect()
}

/// List all files under `content_root` as `(absolute, relative)` pairs.
pub fn enumerate(content_root: &Path) -> Result<Vec<(PathBuf, String)>, ContentError> {
    if !content_root.is_dir() {
        return Err(ContentError::Io(
            content_root.to_path_buf(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "content directory not found"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(content_root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(content_root).to_path_buf();
            ContentError::Io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let relative = path
            .strip_prefix(content_root)
            .map(to_slash)
            .unwrap_or_default();
        if relative.is_empty() || relative.split('/').any(|part| part.starts_with('.')) {
            continue;
        }
        files.push((path, relative));
    }
    Ok(files)
}

/// Parse and validate one file.
pub fn load_file(
    kind: &KindDescriptor,
    content_root: &Path,
    path: &Path,
) -> Result<RawRecord, ContentError> {
    let relative = path.strip_prefix(content_root).unwrap_or(path);
    let id = to_slash(relative);
    let text = fs::read_to_string(path).map_err(|e| ContentError::Io(path.to_path_buf(), e))?;

    let (object, body) = match kind.content_type {
        ContentType::Data => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => (map, None),
            Ok(_) => return Err(ContentError::parse(&id, "expected a JSON object")),
            Err(e) => return Err(ContentError::parse(&id, e)),
        },
        ContentType::Mdx => {
            let (front_matter, body) = frontmatter::split(&text)
                .ok_or_else(|| ContentError::parse(&id, "missing `---` front matter"))?;
            let map = frontmatter::parse(front_matter).map_err(|e| ContentError::parse(&id, e))?;
            (map, Some(body.to_owned()))
        }
    };

    let fields = check_fields(&kind.fields, &object, Path::new(&id), "")?;

    Ok(RawRecord {
        flattened_path: flattened_path(relative),
        id,
        source: path.to_path_buf(),
        fields,
        body,
    })
}
