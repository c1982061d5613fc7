//! Content watcher for the dev server.
//!
//! Any change under the content directory reloads every collection and swaps
//! the snapshot. A failed reload keeps serving the previous snapshot.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ notify   │───▶│ Debouncer│───▶│ build_collections│───▶│ store.replace│
//! │ events   │    │ (300ms)  │    └──────────────────┘    └──────────────┘
//! └──────────┘    └──────────┘
//! ```

use crate::{
    config::SiteConfig,
    content::{ContentStore, SchemaRegistry, build_collections, kinds},
    log,
    logger::WatchStatus,
    utils::{plural::plural_count, slug::to_slash},
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Whether `path` is a file some registered kind would load.
fn is_content_file(registry: &SchemaRegistry, content_root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(content_root) else {
        return false;
    };
    let relative = to_slash(relative);
    registry.kinds().iter().any(|kind| kind.matches(&relative))
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Reload content after `paths` changed. Returns true if a reload ran.
fn handle_changes(
    paths: &[PathBuf],
    config: &SiteConfig,
    registry: &SchemaRegistry,
    store: &ContentStore,
    status: &mut WatchStatus,
) -> bool {
    let content_root = &config.build.content;
    let changed: Vec<_> = paths
        .iter()
        .filter(|path| is_content_file(registry, content_root, path))
        .collect();

    if changed.is_empty() {
        status.unchanged("no content files changed");
        return false;
    }

    let trigger = changed
        .iter()
        .map(|path| to_slash(path.strip_prefix(content_root).unwrap_or(path)))
        .collect::<Vec<_>>()
        .join(", ");

    match build_collections(registry, content_root, &config.derive_options()) {
        Ok(collections) => {
            let posts = collections.posts().len();
            store.replace(collections);
            status.success(&format!("{trigger}: reloaded {}", plural_count(posts, "post")));
        }
        Err(err) => status.error(&format!("reload failed ({trigger})"), &err.to_string()),
    }
    true
}

// =============================================================================
// Public API
// =============================================================================

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

/// Watch the content directory and swap `store` on every change.
///
/// Blocks until the event channel closes.
pub fn watch_for_changes_blocking(config: &SiteConfig, store: &ContentStore) -> Result<()> {
    let registry = kinds::default_registry()?;
    let content_root = &config.build.content;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    watcher
        .watch(content_root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch content: {}", content_root.display()))?;

    let root = config.get_root();
    log!("watch"; "{}/", content_root.strip_prefix(root).unwrap_or(content_root).display());

    let mut debouncer = Debouncer::new();
    let mut status = WatchStatus::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), config, &registry, store, &mut status) {
                    debouncer.mark_rebuild();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}
