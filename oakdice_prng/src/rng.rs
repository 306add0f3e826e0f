// Bounded samplers layered on the raw engine stream.
//
// `Rng` owns one `Mt19937` and derives every higher-level value from its
// `next_u32` stream: integers, floats, and doubles over explicit ranges with
// per-endpoint inclusivity, coin flips, byte sequences, hex identifiers,
// dice, and unit-interval draws. Nothing here re-implements randomness; all
// of it is scaling and bookkeeping around one raw extraction at a time.
//
// Range disorder (`low > high`) is recovered by swapping, with a warning
// through the `log` facade. A range that holds no values for the requested
// inclusivity is an error — it is never widened silently.
//
// See also: `engine.rs` for the generator and its snapshot format.
//
// **Critical constraint: determinism.** Every sampler consumes a fixed
// number of raw draws for a given request (one per scalar, `ceil(n/4)` per
// n-byte sequence). Changing draw counts reorders every stream built on a
// shared engine, which breaks replay compatibility.

use crate::engine::{EngineSnapshot, Mt19937, SnapshotError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// 2^32 — one past the largest raw draw.
const RAW_SPAN: f64 = 4_294_967_296.0;
/// 2^32 − 1 — the largest raw draw the engine can produce.
const RAW_MAX: f64 = 4_294_967_295.0;

/// Which endpoints of a sampling range are attainable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inclusivity {
    /// `[low, high]` — both endpoints attainable.
    Both,
    /// `[low, high)` — only the low endpoint attainable.
    LowOnly,
    /// `(low, high]` — only the high endpoint attainable.
    HighOnly,
    /// `(low, high)` — neither endpoint attainable.
    Neither,
}

impl Inclusivity {
    /// Is the low endpoint attainable?
    pub fn low(self) -> bool {
        matches!(self, Self::Both | Self::LowOnly)
    }

    /// Is the high endpoint attainable?
    pub fn high(self) -> bool {
        matches!(self, Self::Both | Self::HighOnly)
    }
}

impl fmt::Display for Inclusivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Both => "[low, high]",
            Self::LowOnly => "[low, high)",
            Self::HighOnly => "(low, high]",
            Self::Neither => "(low, high)",
        };
        write!(f, "{text}")
    }
}

/// A range request that holds no values for its inclusivity flags.
///
/// Disordered bounds alone are not an error (they are swapped and logged);
/// these are the genuinely empty cases, reported to the caller and never
/// widened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RangeError {
    /// No integer satisfies the bounds, e.g. an exclusive-exclusive request
    /// over a span of one.
    EmptyIntRange {
        low: i32,
        high: i32,
        inclusivity: Inclusivity,
    },
    /// A zero-width real range with an exclusive endpoint.
    EmptyRealRange {
        low: f64,
        high: f64,
        inclusivity: Inclusivity,
    },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIntRange {
                low,
                high,
                inclusivity,
            } => write!(
                f,
                "no integer lies in {inclusivity} for low={low} high={high}"
            ),
            Self::EmptyRealRange {
                low,
                high,
                inclusivity,
            } => write!(
                f,
                "no value lies in {inclusivity} for low={low} high={high}"
            ),
        }
    }
}

impl std::error::Error for RangeError {}

/// Swap disordered bounds, warning once per occurrence.
fn ordered<T: PartialOrd + fmt::Display + Copy>(low: T, high: T) -> (T, T) {
    if low > high {
        log::warn!("range bounds out of order: low {low} > high {high}; swapping");
        (high, low)
    } else {
        (low, high)
    }
}

/// Bounded sampler over one owned engine.
///
/// One `Rng` per logical stream. Serialization nests the engine snapshot as
/// a field; any type tag or version envelope around it belongs to the
/// caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rng {
    engine: Mt19937,
}

impl Rng {
    /// Sampler over a fresh engine seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            engine: Mt19937::new(seed),
        }
    }

    /// Sampler seeded from any hashable value (stable across runs).
    pub fn from_hashable<T: Hash + ?Sized>(seed: &T) -> Self {
        Self {
            engine: Mt19937::from_hashable(seed),
        }
    }

    /// Sampler seeded from the wall clock. Non-reproducible by design.
    pub fn from_clock() -> Self {
        Self {
            engine: Mt19937::from_clock(),
        }
    }

    /// Sampler over an engine built elsewhere (e.g. restored from a
    /// snapshot).
    pub fn from_engine(engine: Mt19937) -> Self {
        Self { engine }
    }

    /// The underlying engine, for snapshot inspection.
    pub fn engine(&self) -> &Mt19937 {
        &self.engine
    }

    /// Capture the complete generator state.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    /// Rebuild a sampler whose stream continues bit-identically from the
    /// moment `snapshot` was taken.
    pub fn restore(snapshot: &EngineSnapshot) -> Result<Self, SnapshotError> {
        Ok(Self {
            engine: Mt19937::restore(snapshot)?,
        })
    }

    /// One raw extraction, uniform over `[0, 2^32 - 1]`.
    pub fn next_u32(&mut self) -> u32 {
        self.engine.next_u32()
    }

    /// Scale one raw draw into `[0, bound)`.
    ///
    /// This is the primitive every derived sampler funnels through:
    /// `floor(raw / 2^32 * bound)`. Callers must pass `bound >= 1`; the
    /// draw is consumed either way.
    pub fn index_below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0, "index_below needs a positive bound");
        let t = f64::from(self.next_u32()) / RAW_SPAN;
        (t * bound as f64) as u64
    }

    // -----------------------------------------------------------------------
    // Scalar ranges
    // -----------------------------------------------------------------------

    /// Uniform integer over `low..high` with explicit endpoint inclusivity.
    ///
    /// Disordered bounds are swapped (with a warning), which may flip which
    /// endpoint an asymmetric `inclusivity` excludes. A range left empty by
    /// the flags — e.g. `(4, 5)` exclusive-exclusive — is an error.
    pub fn int_range(
        &mut self,
        low: i32,
        high: i32,
        inclusivity: Inclusivity,
    ) -> Result<i32, RangeError> {
        let (low, high) = ordered(low, high);
        // Effective half-open bounds, widened to i64 so `high = i32::MAX`
        // cannot overflow.
        let eff_low = i64::from(low) + i64::from(!inclusivity.low());
        let eff_high = i64::from(high) + 1 - i64::from(!inclusivity.high());
        let span = eff_high - eff_low;
        if span <= 0 {
            return Err(RangeError::EmptyIntRange {
                low,
                high,
                inclusivity,
            });
        }
        Ok((eff_low + self.index_below(span as u64) as i64) as i32)
    }

    /// Uniform `f32` over `low..high` with explicit endpoint inclusivity.
    ///
    /// An inclusive high endpoint divides by `2^32 - 1` (so the maximum draw
    /// reaches `high`); an exclusive one divides by `2^32` (an unreachable
    /// supremum). A raw draw of exactly zero against an exclusive low bound
    /// is replaced by the smallest positive value, never `low` itself.
    pub fn f32_range(
        &mut self,
        low: f32,
        high: f32,
        inclusivity: Inclusivity,
    ) -> Result<f32, RangeError> {
        let (low, high) = ordered(low, high);
        if low == high && inclusivity != Inclusivity::Both {
            return Err(RangeError::EmptyRealRange {
                low: f64::from(low),
                high: f64::from(high),
                inclusivity,
            });
        }
        Ok(self.f32_between(low, high, inclusivity))
    }

    /// Uniform `f64` over `low..high` with explicit endpoint inclusivity.
    ///
    /// Same denominator rule as [`Rng::f32_range`], but the exclusive low
    /// bound is handled differently per width: instead of substituting an
    /// epsilon for a zero draw, the raw draw is nudged up by one half before
    /// scaling. The asymmetry between the two widths is intentional and
    /// pinned by tests.
    pub fn f64_range(
        &mut self,
        low: f64,
        high: f64,
        inclusivity: Inclusivity,
    ) -> Result<f64, RangeError> {
        let (low, high) = ordered(low, high);
        if low == high && inclusivity != Inclusivity::Both {
            return Err(RangeError::EmptyRealRange {
                low,
                high,
                inclusivity,
            });
        }
        Ok(self.f64_between(low, high, inclusivity))
    }

    /// Uniform `f32` over `[0, 1]`, both endpoints attainable.
    pub fn unit_f32(&mut self) -> f32 {
        self.f32_between(0.0, 1.0, Inclusivity::Both)
    }

    /// Uniform `f64` over `[0, 1]`, both endpoints attainable.
    pub fn unit_f64(&mut self) -> f64 {
        self.f64_between(0.0, 1.0, Inclusivity::Both)
    }

    /// Ordered, non-empty f32 range; one raw draw.
    fn f32_between(&mut self, low: f32, high: f32, inclusivity: Inclusivity) -> f32 {
        let raw = self.next_u32();
        let numerator = if raw == 0 && !inclusivity.low() {
            f64::from(f32::MIN_POSITIVE)
        } else {
            f64::from(raw)
        };
        let denominator = if inclusivity.high() { RAW_MAX } else { RAW_SPAN };
        let t = numerator / denominator;
        (f64::from(low) + t * (f64::from(high) - f64::from(low))) as f32
    }

    /// Ordered, non-empty f64 range; one raw draw.
    fn f64_between(&mut self, low: f64, high: f64, inclusivity: Inclusivity) -> f64 {
        let raw = f64::from(self.next_u32());
        let numerator = if inclusivity.low() { raw } else { raw + 0.5 };
        let denominator = if inclusivity.high() { RAW_MAX } else { RAW_SPAN };
        low + (numerator / denominator) * (high - low)
    }

    // -----------------------------------------------------------------------
    // Derived draws
    // -----------------------------------------------------------------------

    /// Fair coin: the parity of one raw extraction.
    pub fn coin_flip(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }

    /// `|count|` random bytes.
    ///
    /// Full draws are decomposed four-at-a-time in little-endian order; a
    /// final partial draw contributes its first `|count| % 4` bytes.
    pub fn bytes(&mut self, count: i32) -> Vec<u8> {
        let count = count.unsigned_abs() as usize;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count / 4 {
            out.extend_from_slice(&self.next_u32().to_le_bytes());
        }
        let remainder = count % 4;
        if remainder != 0 {
            let tail = self.next_u32().to_le_bytes();
            out.extend_from_slice(&tail[..remainder]);
        }
        out
    }

    /// A 32-character lowercase-hex identifier (16 random bytes).
    pub fn hex_id(&mut self) -> String {
        self.hex_id_sized(16)
    }

    /// A lowercase-hex identifier over `|byte_count|` random bytes, two
    /// characters per byte, in draw order.
    pub fn hex_id_sized(&mut self, byte_count: i32) -> String {
        let bytes = self.bytes(byte_count);
        let mut out = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }

    // -----------------------------------------------------------------------
    // Dice
    // -----------------------------------------------------------------------

    /// Roll an n-sided die: uniform over `[1, sides]`. Sides below 1 are
    /// clamped to 1.
    pub fn roll_die(&mut self, sides: i32) -> i32 {
        let sides = sides.max(1);
        1 + self.index_below(sides as u64) as i32
    }

    pub fn d4(&mut self) -> i32 {
        self.roll_die(4)
    }

    pub fn d6(&mut self) -> i32 {
        self.roll_die(6)
    }

    pub fn d12(&mut self) -> i32 {
        self.roll_die(12)
    }

    pub fn d20(&mut self) -> i32 {
        self.roll_die(20)
    }

    pub fn d100(&mut self) -> i32 {
        self.roll_die(100)
    }
}

impl Default for Rng {
    /// Sampler over the canonical-seed engine; reproducible across runs.
    fn default() -> Self {
        Self {
            engine: Mt19937::default(),
        }
    }
}
