use modular_bitfield::prelude::*;
use std::fmt;

/// The 48-bit identity behind a generated short code.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeId {
    /// 32 bits for seconds since the generator epoch.
    pub seconds: B32,
    /// 12 bits for the per-second sequence number.
    pub sequence: B12,
    /// 4 bits for the worker id (up to 16 generating processes).
    pub worker_id: B4,
}

impl CodeId {
    /// Packs the id into the low 48 bits of a `u64`.
    pub fn to_u48(self) -> u64 {
        let b = self.into_bytes();
        u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], 0, 0])
    }
}

impl fmt::Debug for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeId")
            .field("seconds", &self.seconds())
            .field("sequence", &self.sequence())
            .field("worker_id", &self.worker_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_fields_pack_to_distinct_values() {
        let a = CodeId::new().with_seconds(1).with_sequence(0).with_worker_id(0);
        let b = CodeId::new().with_seconds(0).with_sequence(1).with_worker_id(0);
        let c = CodeId::new().with_seconds(0).with_sequence(0).with_worker_id(1);

        assert_ne!(a.to_u48(), b.to_u48());
        assert_ne!(b.to_u48(), c.to_u48());
        assert_ne!(a.to_u48(), c.to_u48());
    }

    #[test]
    fn packed_value_fits_in_48_bits() {
        let max = CodeId::new()
            .with_seconds(u32::MAX)
            .with_sequence(0xFFF)
            .with_worker_id(0xF);
        assert_eq!(max.to_u48(), (1_u64 << 48) - 1);
    }
}
