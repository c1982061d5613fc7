//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quill static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to site root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to site root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: quill.toml)
    #[arg(short = 'C', long, default_value = "quill.toml")]
    pub config: PathBuf,

    /// Print debug messages, such as dangling references
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Leave out posts marked `draft: true`
    #[arg(long)]
    pub hide_drafts: bool,

    /// enable rss feed generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub rss: Option<bool>,

    /// enable sitemap generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Override base URL for the site.
    ///
    /// Useful when the production URL differs from the one in quill.toml:
    ///   quill build --base-url "https://example.github.io/blog"
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load content and write the static site to the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the site. Rebuild content on change automatically
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Load and validate content without writing anything
    Check,

    /// Print resolved records of a kind as JSON
    Query {
        /// Kind name, e.g. `post`, `tag`, `author`
        kind: String,

        /// Print only the record with this slug
        slug: Option<String>,
    },
}

impl Cli {
    pub const fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } | Commands::Serve { build_args, .. } => Some(build_args),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["quill", "--root", "site", "build", "--clean", "--hide-drafts"]);
        let args = cli.build_args().unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("site")));
        assert_eq!(cli.config, PathBuf::from("quill.toml"));
        assert!(args.clean);
        assert!(args.hide_drafts);
        assert_eq!(args.rss, None);
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["quill", "serve", "--port", "8080", "--watch", "false", "--rss"]);
        let Commands::Serve { port, watch, build_args, .. } = &cli.command else {
            panic!("expected serve");
        };
        assert_eq!(*port, Some(8080));
        assert_eq!(*watch, Some(false));
        assert_eq!(build_args.rss, Some(true));
    }

    #[test]
    fn test_parse_query() {
        let cli = Cli::parse_from(["quill", "query", "post", "2024/intro", "-v"]);
        assert!(cli.verbose);
        assert!(cli.build_args().is_none());

        let Commands::Query { kind, slug } = &cli.command else {
            panic!("expected query");
        };
        assert_eq!(kind, "post");
        assert_eq!(slug.as_deref(), Some("2024/intro"));
    }
}
