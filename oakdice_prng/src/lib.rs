// oakdice_prng — deterministic Mersenne Twister engine and bounded samplers.
//
// This crate is the single source of randomness for the Oakdice workspace:
// `oakdice_tables` (drop tables, shuffling, wigglers) draws everything from
// instances of the types defined here. By owning the generator ourselves we
// avoid depending on external RNG crates and guarantee deterministic,
// reproducible output given the same seed.
//
// Module overview:
// - `engine.rs`: `Mt19937` — the 32-bit Mersenne Twister generator, seeding
//   (explicit, hashed, wall-clock), batch regeneration, tempered extraction,
//   and the verbatim snapshot/restore format.
// - `rng.rs`:    `Rng` — bounded sampling over one owned engine: integer /
//   f32 / f64 ranges with per-endpoint inclusivity, coin flips, byte
//   sequences, hex identifiers, dice, and unit-interval draws.
//
// **Critical constraint: determinism.** Every method must produce identical
// output given the same prior state, regardless of platform, compiler
// version, or optimization level. The engine core is integer-only; the
// samplers scale raw draws with fixed f64 arithmetic. Not cryptographically
// secure — statistical use only.

pub mod engine;
pub mod rng;

pub use engine::{DEFAULT_SEED, EngineSnapshot, Mt19937, STATE_WORDS, SnapshotError};
pub use rng::{Inclusivity, RangeError, Rng};
