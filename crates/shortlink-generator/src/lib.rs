//! Short code generation.
//!
//! Generators are pure: they never touch the network or disk and never look
//! at the URL being shortened, so shortening the same URL twice yields two
//! different codes.

mod clock;
mod code_id;
pub mod error;
mod flake;
mod obfuscator;

pub use clock::{Clock, SystemClock};
pub use code_id::CodeId;
pub use error::GenerationError;
pub use flake::{FlakeGenerator, FlakeSettings, DEFAULT_EPOCH};
pub use obfuscator::Obfuscator;

use shortlink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations must make collisions negligible over the lifetime of the
/// system. They fail only when their own id space is exhausted or
/// misconfigured; duplicate detection is the store's job.
pub trait Generator: Send + Sync + 'static {
    fn generate(&self) -> Result<ShortCode, GenerationError>;
}

impl<C: Clock + 'static> Generator for FlakeGenerator<C> {
    fn generate(&self) -> Result<ShortCode, GenerationError> {
        let id = self.next_id()?;
        Ok(ShortCode::from_bytes(self.obfuscator().obfuscate(id)))
    }
}
