//! Static site build.
//!
//! ```text
//! build_site()
//!     │
//!     ├── load_collections() ──► authors, tags, posts (abort on any error)
//!     │
//!     ├── prepare_output()   ──► clean or create public/
//!     │
//!     ├── copy_assets() ─┐
//!     ├── write_pages() ─┴──► rayon::join
//!     │
//!     └── build_rss() ───┬──► rayon::join
//!         build_sitemap()┘
//! ```
//!
//! Nothing is written before every content file loads and derives.

use crate::{
    config::SiteConfig,
    content::{Collections, build_collections, kinds},
    generator::{build_rss, build_sitemap},
    log,
    site::{Renderer, all_routes, resolve},
    utils::{plural::plural_count, slug::url_to_output_path},
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Build the whole site into `config.build.output`.
///
/// Returns the loaded collections.
pub fn build_site(config: &SiteConfig) -> Result<Collections> {
    let collections = load_collections(config)?;
    let output = &config.build.output;

    prepare_output(output, config.build.clean)?;

    let renderer = Renderer::new(config)?;
    let (pages, assets) = rayon::join(
        || write_pages(config, &renderer, &collections),
        || copy_assets(&config.build.assets, output),
    );
    let pages = pages?;
    let assets = assets?;

    let (rss, sitemap) = rayon::join(
        || build_rss(config, &collections),
        || build_sitemap(config, &collections),
    );
    rss?;
    sitemap?;

    log!(
        "build";
        "done, {} and {}",
        plural_count(pages, "page"),
        plural_count(assets, "asset")
    );
    Ok(collections)
}

/// Load, validate and derive every content kind, logging per-kind counts.
pub fn load_collections(config: &SiteConfig) -> Result<Collections> {
    let collections = read_collections(config)?;
    for (kind, count) in collections.counts() {
        log!("content"; "{}", plural_count(count, &kind.to_lowercase()));
    }
    Ok(collections)
}

/// Load, validate and derive every content kind without logging.
pub fn read_collections(config: &SiteConfig) -> Result<Collections> {
    let registry = kinds::default_registry()?;
    build_collections(&registry, &config.build.content, &config.derive_options())
        .with_context(|| format!("Failed to load content from {}", config.build.content.display()))
}

/// Create the output directory, clearing it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Render every page plus `404.html`. Returns the number of files written.
fn write_pages(config: &SiteConfig, renderer: &Renderer, collections: &Collections) -> Result<usize> {
    let output = &config.build.output;
    let routes = all_routes(collections, config.build.hide_drafts);

    routes.par_iter().try_for_each(|route| {
        let page = resolve(route, collections, config.build.hide_drafts)
            .ok_or_else(|| anyhow!("route {route:?} has no page"))?;
        let html = renderer.render(&page)?;
        write_file(&url_to_output_path(page.url(), output), html.as_bytes())
    })?;

    let not_found = renderer.render_not_found()?;
    write_file(&output.join("404.html"), not_found.as_bytes())?;

    Ok(routes.len() + 1)
}

/// Copy `assets` into `output`, keeping relative paths. Returns the file count.
fn copy_assets(assets: &Path, output: &Path) -> Result<usize> {
    if !assets.is_dir() {
        return Ok(0);
    }

    let files: Vec<_> = WalkDir::new(assets)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.par_iter().try_for_each(|path| {
        let relative = path.strip_prefix(assets)?;
        let dest = output.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)
            .map(|_| ())
            .with_context(|| format!("Failed to copy asset {}", path.display()))
    })?;

    Ok(files.len())
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
