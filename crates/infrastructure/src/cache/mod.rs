//! Cache engine adapters.
//!
//! Both adapters implement the same [`PropertyCache`](parcel_application::ports::PropertyCache)
//! port. Every operation that touches more than one key is applied as a
//! single atomic step: a server-side script on Redis, one critical section
//! in the in-process engine.

pub mod memory_cache;
pub mod redis_cache;
pub mod scripts;

pub use memory_cache::MemoryPropertyCache;
pub use redis_cache::RedisPropertyCache;
