use crate::clock::{Clock, SystemClock};
use crate::code_id::CodeId;
use crate::error::GenerationError;
use crate::obfuscator::Obfuscator;
use jiff::Timestamp;
use std::sync::Mutex;
use typed_builder::TypedBuilder;

const MAX_WORKER_ID: u8 = 0xF;
const MAX_SEQUENCE: u16 = 0xFFF;

/// 2026-01-01T00:00:00Z. The 32-bit seconds field lasts about 136 years
/// from here.
pub const DEFAULT_EPOCH: Timestamp = Timestamp::constant(1_767_225_600, 0);

/// Configures a [`FlakeGenerator`] instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct FlakeSettings {
    /// A unique worker index in the range `[0, 15]`.
    #[builder(default)]
    pub worker_id: u8,
    /// Custom epoch used as the zero point for the 32-bit seconds field.
    #[builder(default = DEFAULT_EPOCH)]
    pub start_epoch: Timestamp,
    /// How many seconds the generator may run ahead of the wall clock once a
    /// second's sequence space is used up.
    ///
    /// Generator state is in memory only. A process restarted within this
    /// window of its last issued id (or within the same second) can issue
    /// codes again that it already handed out; the store rejects those as
    /// conflicts. Restart after at least `max_lead_seconds + 1` seconds, or
    /// raise `SHORTLINK_CREATE_ATTEMPTS` so such creates retry.
    #[builder(default = 8)]
    pub max_lead_seconds: u32,
}

#[derive(Debug, Default)]
struct GeneratorState {
    /// Logical second of the last issued id.
    last_second: Option<u32>,
    sequence: u16,
    /// Highest wall-clock second observed, so a clock stepping backwards
    /// behaves like a stalled clock.
    observed: u32,
}

/// Time-ordered short code generator.
///
/// Each id packs seconds since the epoch, a per-second sequence, and the
/// worker id. When a second's 4096 sequence numbers are used up the
/// generator moves on to the next logical second instead of blocking, up to
/// `max_lead_seconds` ahead of the clock.
pub struct FlakeGenerator<C: Clock = SystemClock> {
    start_second: i64,
    worker_id: u8,
    max_lead_seconds: u32,
    obfuscator: Obfuscator,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl FlakeGenerator<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(settings: FlakeSettings, obfuscator: Obfuscator) -> Result<Self, GenerationError> {
        Self::with_clock(settings, obfuscator, SystemClock)
    }
}

impl<C: Clock> FlakeGenerator<C> {
    pub(crate) fn with_clock(
        settings: FlakeSettings,
        obfuscator: Obfuscator,
        clock: C,
    ) -> Result<Self, GenerationError> {
        if settings.worker_id > MAX_WORKER_ID {
            return Err(GenerationError::InvalidWorkerId {
                worker_id: settings.worker_id,
                max_worker_id: MAX_WORKER_ID,
            });
        }

        let now = clock.now();
        if settings.start_epoch > now {
            return Err(GenerationError::EpochAhead {
                epoch: settings.start_epoch,
                now,
            });
        }

        obfuscator.validate()?;

        Ok(Self {
            start_second: settings.start_epoch.as_second(),
            worker_id: settings.worker_id,
            max_lead_seconds: settings.max_lead_seconds,
            obfuscator,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    pub fn obfuscator(&self) -> &Obfuscator {
        &self.obfuscator
    }

    fn elapsed_seconds(&self) -> Result<u32, GenerationError> {
        let elapsed = (self.clock.now().as_second() - self.start_second).max(0);
        u32::try_from(elapsed).map_err(|_| GenerationError::OverTimeLimit)
    }

    /// Issues the next unique [`CodeId`].
    ///
    /// On error the generator state is left untouched, so a later call can
    /// succeed once the clock has caught up.
    pub fn next_id(&self) -> Result<CodeId, GenerationError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| GenerationError::StatePoisoned)?;

        let now = self.elapsed_seconds()?.max(state.observed);

        let (second, sequence) = match state.last_second {
            Some(last) if now <= last => {
                if state.sequence < MAX_SEQUENCE {
                    (last, state.sequence + 1)
                } else {
                    let next = last.checked_add(1).ok_or(GenerationError::OverTimeLimit)?;
                    let lead = next - now;
                    if lead > self.max_lead_seconds {
                        return Err(GenerationError::Exhausted { lead });
                    }
                    (next, 0)
                }
            }
            _ => (now, 0),
        };

        state.observed = now;
        state.last_second = Some(second);
        state.sequence = sequence;

        Ok(CodeId::new()
            .with_seconds(second)
            .with_sequence(sequence)
            .with_worker_id(self.worker_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_clock::TestClock;
    use crate::Generator;
    use shortlink_core::ShortCode;
    use std::collections::HashSet;

    fn settings(worker_id: u8, max_lead_seconds: u32) -> FlakeSettings {
        FlakeSettings::builder()
            .worker_id(worker_id)
            .start_epoch(Timestamp::from_second(0).unwrap())
            .max_lead_seconds(max_lead_seconds)
            .build()
    }

    fn make_generator(worker_id: u8, clock: &TestClock) -> FlakeGenerator<TestClock> {
        FlakeGenerator::with_clock(settings(worker_id, 2), Obfuscator::default(), clock.clone())
            .unwrap()
    }

    #[test]
    fn first_id_has_sequence_zero() {
        let clock = TestClock::at_second(100);
        let gen = make_generator(0, &clock);

        let id = gen.next_id().unwrap();
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.seconds(), 100);
    }

    #[test]
    fn same_second_increments_sequence() {
        let clock = TestClock::at_second(100);
        let gen = make_generator(0, &clock);

        let sequences: Vec<u16> = (0..3).map(|_| gen.next_id().unwrap().sequence()).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn new_second_resets_sequence() {
        let clock = TestClock::at_second(100);
        let gen = make_generator(0, &clock);

        gen.next_id().unwrap();
        gen.next_id().unwrap();
        clock.advance(1);

        let id = gen.next_id().unwrap();
        assert_eq!(id.seconds(), 101);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn exhausted_sequence_borrows_next_second() {
        let clock = TestClock::at_second(100);
        let gen = make_generator(0, &clock);

        for _ in 0..=MAX_SEQUENCE {
            gen.next_id().unwrap();
        }

        let id = gen.next_id().unwrap();
        assert_eq!(id.seconds(), 101);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn lead_limit_surfaces_exhaustion_and_recovers() {
        let clock = TestClock::at_second(100);
        let gen = make_generator(0, &clock);

        // Seconds 100, 101 and 102 are usable with a two second lead.
        for _ in 0..3 * (MAX_SEQUENCE as usize + 1) {
            gen.next_id().unwrap();
        }
        assert_eq!(
            gen.next_id(),
            Err(GenerationError::Exhausted { lead: 3 })
        );

        clock.advance(1);
        let id = gen.next_id().unwrap();
        assert_eq!(id.seconds(), 103);
    }

    #[test]
    fn clock_moving_backwards_never_repeats() {
        let clock = TestClock::at_second(100);
        let gen = make_generator(0, &clock);

        let first = gen.next_id().unwrap();
        clock.advance(-30);
        let second = gen.next_id().unwrap();

        assert_ne!(first, second);
        assert_eq!(second.seconds(), 100);
        assert_eq!(second.sequence(), 1);
    }

    #[test]
    fn worker_id_is_embedded() {
        let clock = TestClock::at_second(100);
        let gen = make_generator(15, &clock);
        assert_eq!(gen.next_id().unwrap().worker_id(), 15);
    }

    #[test]
    fn invalid_worker_id_is_rejected() {
        let clock = TestClock::at_second(100);
        let result = FlakeGenerator::with_clock(settings(16, 2), Obfuscator::default(), clock);
        assert!(matches!(
            result,
            Err(GenerationError::InvalidWorkerId { worker_id: 16, .. })
        ));
    }

    #[test]
    fn epoch_in_the_future_is_rejected() {
        let clock = TestClock::at_second(100);
        let settings = FlakeSettings::builder()
            .start_epoch(Timestamp::from_second(200).unwrap())
            .build();
        let result = FlakeGenerator::with_clock(settings, Obfuscator::default(), clock);
        assert!(matches!(result, Err(GenerationError::EpochAhead { .. })));
    }

    #[test]
    fn overtime_limit_returns_error() {
        let clock = TestClock::at_second(i64::from(u32::MAX) + 1);
        let gen = make_generator(0, &clock);
        assert_eq!(gen.next_id(), Err(GenerationError::OverTimeLimit));
    }

    #[test]
    fn generated_codes_are_unique_and_valid() {
        let clock = TestClock::at_second(1_000);
        let gen = make_generator(3, &clock);

        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let code = gen.generate().unwrap();
            assert!(ShortCode::new(code.as_str()).is_ok(), "invalid code {code}");
            assert!(seen.insert(code));
        }
    }

    #[test]
    fn system_clock_generator_produces_distinct_codes() {
        let settings = FlakeSettings::builder()
            .start_epoch(Timestamp::from_second(1_767_225_600).unwrap())
            .build();
        let gen = FlakeGenerator::new(settings, Obfuscator::default()).unwrap();

        let first = gen.generate().unwrap();
        let second = gen.generate().unwrap();
        assert_ne!(first, second);
    }
}
