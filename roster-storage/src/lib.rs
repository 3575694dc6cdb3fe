//! Roster Storage - client-side read cache.
//!
//! Reads are cached per [`QueryKey`] until a write to the same resource
//! family invalidates them. Cached data is never patched in place.

pub mod cache;

pub use cache::{CacheStats, QueryCache, QueryKey, QueryPrefix, ResourceFamily};
