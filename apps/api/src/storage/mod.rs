//! Key-value persistence backends.
//!
//! Every persisted value in Folio is a string (JSON or a bare id) under a flat
//! key. Backends only need get/set/delete; there is no listing, no transactions
//! and no versioning: last write per key wins.

use anyhow::Result;
use async_trait::async_trait;

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileKv;
pub use memory::MemoryKv;
pub use self::redis::RedisKv;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
