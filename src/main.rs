//! Quill - A static site generator for JSON/MDX content blogs.

mod build;
mod cli;
mod config;
mod content;
mod generator;
mod logger;
mod serve;
mod site;
mod utils;
mod watch;

use anyhow::{Result, anyhow};
use build::{build_site, load_collections, read_collections};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use content::{ContentStore, query::find_by_slug};
use serve::serve_site;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    logger::set_verbose(cli.verbose);
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => build_site(config).map(|_| ()),
        Commands::Serve { .. } => {
            let store = Arc::new(ContentStore::new(load_collections(config)?));
            serve_site(config, store)
        }
        Commands::Check => load_collections(config).map(|_| log!("check"; "ok")),
        Commands::Query { kind, slug } => query(config, kind, slug.as_deref()),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(std::path::Path::new("./"));
    let mut config = SiteConfig::from_path(&root.join(&cli.config))?;
    config.update_with_cli(cli);
    config.validate(cli)?;
    Ok(config)
}

/// Print every record of `kind`, or the one with `slug`, as JSON.
fn query(config: &SiteConfig, kind: &str, slug: Option<&str>) -> Result<()> {
    let collections = read_collections(config)?;
    let records = collections
        .find_kind(kind)
        .ok_or_else(|| anyhow!("unknown content kind `{kind}`"))?;

    let json = match slug {
        Some(slug) => {
            let record = find_by_slug(records, slug)
                .ok_or_else(|| anyhow!("no {kind} with slug `{slug}`"))?;
            serde_json::to_string_pretty(record)?
        }
        None => serde_json::to_string_pretty(records)?,
    };

    println!("{json}");
    Ok(())
}
