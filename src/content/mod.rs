//! Content layer: schemas, loading, derivation, collections and queries.
//!
//! ```text
//! SchemaRegistry ─► loader ─► derive ─► Collections ─► query
//!   (kinds.rs)     (RawRecord)   (ResolvedRecord)   (ContentStore)
//! ```

pub mod derive;
pub mod error;
pub mod frontmatter;
pub mod kinds;
pub mod loader;
pub mod markdown;
pub mod query;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;

pub use derive::DeriveOptions;
pub use error::ContentError;
pub use record::ResolvedRecord;
pub use schema::SchemaRegistry;
pub use store::{Collections, ContentStore, build_collections};
