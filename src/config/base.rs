//! `[base]` section configuration.
//!
//! Site metadata used by page headers, the RSS channel and the sitemap.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in quill.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Acme Blog"
/// description = "Tutorials and news"
/// url = "https://blog.acme.dev"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title displayed in browser tab and headers.
    pub title: String,

    /// Site description for meta tags and the feed channel.
    pub description: String,

    /// Base URL for absolute links in rss/sitemap.
    /// Required by `build` when the feed or sitemap is enabled.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code (e.g., "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Site owner, named in the feed's `webMaster`.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: Option<String>,

    /// Owner email. `webMaster` is only written when both are set.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: Option<String>,
}
