// Random selection and shuffling over collections.
//
// Index and element picks cost exactly one draw each, independent of
// collection size; a shuffle costs one draw per element. Zero-length inputs
// are reported as errors rather than silently producing nothing — an empty
// pick has no meaningful result, and callers that reach it have a logic bug
// upstream.
//
// See also: `drop_table.rs`, which reuses the uniform-index draw as its
// fallback path.

use oakdice_prng::Rng;
use std::fmt;

/// A selection request that cannot produce a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickError {
    /// The collection holds no elements to pick from.
    EmptyCollection,
    /// A random index was requested over a count of zero.
    InvalidCount,
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCollection => write!(f, "cannot pick from an empty collection"),
            Self::InvalidCount => write!(f, "random index requires a positive count"),
        }
    }
}

impl std::error::Error for PickError {}

/// Uniform index in `[0, count)`. A count of zero is an error.
pub fn random_index(count: usize, rng: &mut Rng) -> Result<usize, PickError> {
    if count == 0 {
        return Err(PickError::InvalidCount);
    }
    Ok(rng.index_below(count as u64) as usize)
}

/// Uniformly chosen element of `items`. An empty slice is an error.
pub fn random_element<'a, T>(items: &'a [T], rng: &mut Rng) -> Result<&'a T, PickError> {
    if items.is_empty() {
        return Err(PickError::EmptyCollection);
    }
    let index = random_index(items.len(), rng)?;
    Ok(&items[index])
}

/// Uniformly chosen element of any iterable, by value.
///
/// The iterator is materialized first (linear time and space), then exactly
/// one index draw selects the element — the draw count never depends on the
/// collection's size. For unordered collections the caller must supply a
/// deterministic iteration order (sort, or use an ordered container) if the
/// pick is meant to replay across runs.
pub fn random_element_from_iter<I>(items: I, rng: &mut Rng) -> Result<I::Item, PickError>
where
    I: IntoIterator,
{
    let mut pool: Vec<I::Item> = items.into_iter().collect();
    if pool.is_empty() {
        return Err(PickError::EmptyCollection);
    }
    let index = random_index(pool.len(), rng)?;
    Ok(pool.swap_remove(index))
}

/// Fisher–Yates shuffle, left to right.
///
/// Everything left of `separator` is already shuffled; each step draws a
/// uniform index in `[separator, len)` and swaps it into place. Every
/// permutation is reachable with uniform probability given a uniform engine.
/// An empty slice is an error.
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut Rng) -> Result<(), PickError> {
    if items.is_empty() {
        return Err(PickError::EmptyCollection);
    }
    for separator in 0..items.len() {
        let j = separator + rng.index_below((items.len() - separator) as u64) as usize;
        items.swap(separator, j);
    }
    Ok(())
}

/// Shuffled copy of `items`; the input is left untouched.
pub fn shuffled<T: Clone>(items: &[T], rng: &mut Rng) -> Result<Vec<T>, PickError> {
    let mut copy = items.to_vec();
    shuffle_in_place(&mut copy, rng)?;
    Ok(copy)
}
