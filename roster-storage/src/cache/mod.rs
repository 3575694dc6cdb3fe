//! Query cache for list reads.
//!
//! # Contract
//!
//! - `query(key)` answers from cache when a resolved value exists for the key,
//!   otherwise fetches once and shares the result with every concurrent caller
//!   of the same key.
//! - `invalidate(prefix)` drops every key under a family (or one registry's
//!   entries). Reads started afterwards always fetch.
//! - Failed fetches leave nothing behind, and nothing else is touched.
//!
//! Invalidation is deliberately coarse: a write drops every page, sort and
//! filter combination of its family rather than patching rows in place.
//! Correctness over efficiency.
//!
//! # Example
//!
//! ```ignore
//! let key = QueryKey::team_members(params);
//! let page = cache.query(&key, || api.list_team_members(&key.params)).await?;
//!
//! api.create_team_member(&input).await?;
//! cache.invalidate(ResourceFamily::TeamMembers);
//! ```

pub mod key;
pub mod query;
pub mod stats;

pub use key::{QueryKey, QueryPrefix, ResourceFamily};
pub use query::QueryCache;
pub use stats::CacheStats;
