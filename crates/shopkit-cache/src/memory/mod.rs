//! In-process cache provider.

mod provider;

pub use provider::MemoryCacheProvider;
