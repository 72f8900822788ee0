//! URL resolution service.
//!
//! [`ResolutionService`] combines a code generator, a durable store, and a
//! cache into the operations exposed by every protocol front: create a short
//! URL, resolve a short code (read-through cache-aside), find the code for
//! an original URL (store only), and redirect.

pub mod error;
pub mod resolver;
pub mod service;

pub use error::{CreationError, Result, ServiceError};
pub use resolver::{RedirectTarget, Resolved, UrlResolver};
pub use service::{ResolutionService, ServiceSettings};
