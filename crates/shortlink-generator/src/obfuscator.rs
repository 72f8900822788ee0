use crate::code_id::CodeId;
use crate::error::GenerationError;
use typed_builder::TypedBuilder;

const U48_MASK: u64 = (1_u64 << 48) - 1;

/// Scrambles sequential [`CodeId`]s so consecutive codes do not look
/// consecutive.
///
/// The mapping is `(id * multiplier) ^ mask` modulo 2^48. With an odd
/// multiplier it is a bijection on 48-bit values, so distinct ids always
/// yield distinct outputs.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Obfuscator {
    #[builder(default = 0x5_DEEC_E66D)]
    multiplier: u64,
    #[builder(default = 0x9E37_79B9_7F4A)]
    mask: u64,
}

impl Default for Obfuscator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Obfuscator {
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub(crate) fn validate(&self) -> Result<(), GenerationError> {
        if self.multiplier % 2 == 0 {
            return Err(GenerationError::EvenMultiplier(self.multiplier));
        }
        Ok(())
    }

    /// Returns the obfuscated id as six big-endian bytes.
    pub fn obfuscate(&self, id: CodeId) -> [u8; 6] {
        let value = (id.to_u48().wrapping_mul(self.multiplier) ^ self.mask) & U48_MASK;
        let b = value.to_be_bytes();
        [b[2], b[3], b[4], b[5], b[6], b[7]]
    }
}
