//! Core traits defined in `shopkit-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
