//! Cache module for keeping the last shown article on disk
//!
//! A short freshness window lets a quick relaunch show the same article
//! without touching the network. Stale files are overwritten by the next
//! successful fetch, never deleted.

mod manager;

pub use manager::{CacheError, CacheManager, CacheMetadata, DEFAULT_TTL};
