//! Cache adapters mapping short codes to original URLs.

pub mod moka;
pub mod noop;
pub mod redis;

pub use self::moka::MokaUrlCache;
pub use self::noop::NoopUrlCache;
pub use self::redis::RedisUrlCache;
pub use shortlink_core::cache::{Result, UrlCache};
pub use shortlink_core::CacheError;
