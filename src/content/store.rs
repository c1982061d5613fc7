//! Resolved collections and the live snapshot.

use super::{
    derive::{DeriveOptions, derive_computed_fields},
    error::ContentError,
    kinds,
    loader,
    record::ResolvedRecord,
    schema::SchemaRegistry,
};
use arc_swap::ArcSwap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::{collections::BTreeMap, path::Path, sync::Arc};

/// One immutable build of every kind.
///
/// Each collection keeps enumeration order and is never reordered.
#[derive(Debug, Default, Clone)]
pub struct Collections {
    kinds: BTreeMap<String, Arc<[ResolvedRecord]>>,
}

impl Collections {
    /// Records of `kind`; empty for unknown kinds.
    pub fn get(&self, kind: &str) -> &[ResolvedRecord] {
        self.kinds.get(kind).map(|c| &c[..]).unwrap_or_default()
    }

    pub fn authors(&self) -> &[ResolvedRecord] {
        self.get(kinds::AUTHOR)
    }

    pub fn tags(&self) -> &[ResolvedRecord] {
        self.get(kinds::TAG)
    }

    pub fn posts(&self) -> &[ResolvedRecord] {
        self.get(kinds::POST)
    }

    /// `(kind, count)` pairs, in kind name order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.kinds.iter().map(|(k, v)| (k.as_str(), v.len()))
    }

    /// Look up a kind by name, ignoring case.
    pub fn find_kind(&self, kind: &str) -> Option<&[ResolvedRecord]> {
        self.kinds
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(kind))
            .map(|(_, records)| &records[..])
    }
}

/// Load, derive and index every registered kind.
pub fn build_collections(
    registry: &SchemaRegistry,
    content_root: &Path,
    options: &DeriveOptions,
) -> Result<Collections, ContentError> {
    let raw = loader::load_all(registry, content_root)?;

    let mut kinds = BTreeMap::new();
    for (name, records) in raw {
        let Some(kind) = registry.get(&name) else {
            continue;
        };
        let resolved = records
            .into_par_iter()
            .map(|record| derive_computed_fields(record, kind, options))
            .collect::<Result<Vec<_>, _>>()?;
        check_unique_slugs(&name, &resolved)?;
        kinds.insert(name, Arc::from(resolved));
    }

    Ok(Collections { kinds })
}

fn check_unique_slugs(kind: &str, records: &[ResolvedRecord]) -> Result<(), ContentError> {
    let mut seen: FxHashMap<&str, &ResolvedRecord> = FxHashMap::default();
    for record in records {
        if let Some(first) = seen.insert(&record.slug, record) {
            return Err(ContentError::DuplicateSlug {
                kind: kind.to_owned(),
                slug: record.slug.clone(),
                first: first.id.clone().into(),
                second: record.id.clone().into(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Live Snapshot
// ============================================================================

/// Holds the current [`Collections`] behind an atomic pointer.
///
/// Readers take a snapshot and keep it for the whole request; a rebuild
/// swaps in a complete new value.
#[derive(Debug)]
pub struct ContentStore {
    current: ArcSwap<Collections>,
}

impl ContentStore {
    pub fn new(collections: Collections) -> Self {
        Self {
            current: ArcSwap::from_pointee(collections),
        }
    }

    pub fn snapshot(&self) -> Arc<Collections> {
        self.current.load_full()
    }

    pub fn replace(&self, collections: Collections) {
        self.current.store(Arc::new(collections));
    }
}
