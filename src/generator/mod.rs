//! Feed and sitemap output.

pub mod rss;
pub mod sitemap;

pub use rss::{build_rss, render_feed};
pub use sitemap::{build_sitemap, render_sitemap};
