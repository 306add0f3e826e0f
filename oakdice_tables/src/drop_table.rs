// Weighted discrete selection — drop tables.
//
// A table is a fixed, ordered list of `(weight, outcome)` entries. Weights
// are taken by absolute value; the total is summed once at construction, and
// rebuilding the table is the supported update path. Entries derive serde so
// tables can be loaded from JSON data files and rebuilt at point of use —
// the table itself has no persisted identity beyond the engine it draws
// from.
//
// Selection walks the entries in construction order, so entry order decides
// tie-breaks for a fixed engine state but not the statistical outcome.

use crate::collection::PickError;
use oakdice_prng::{Inclusivity, Rng};
use serde::{Deserialize, Serialize};

/// One weighted outcome. The weight's sign is ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropEntry<T> {
    pub weight: f32,
    pub outcome: T,
}

/// A fixed set of labeled outcomes, selected with probability proportional
/// to their weights.
#[derive(Clone, Debug, PartialEq)]
pub struct DropTable<T> {
    entries: Vec<DropEntry<T>>,
    total_weight: f32,
}

impl<T> DropTable<T> {
    /// Build a table from its entries. An empty entry list is rejected — a
    /// table that can never produce an outcome is a construction bug.
    pub fn new(entries: Vec<DropEntry<T>>) -> Result<Self, PickError> {
        if entries.is_empty() {
            return Err(PickError::EmptyCollection);
        }
        let total_weight = entries.iter().map(|e| e.weight.abs()).sum();
        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// Build a table from bare `(weight, outcome)` pairs.
    pub fn from_pairs(pairs: Vec<(f32, T)>) -> Result<Self, PickError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(weight, outcome)| DropEntry { weight, outcome })
                .collect(),
        )
    }

    /// The entries in construction order.
    pub fn entries(&self) -> &[DropEntry<T>] {
        &self.entries
    }

    /// Sum of absolute weights, fixed at construction.
    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    /// Select one outcome, weight-proportionally.
    ///
    /// Draws `f` uniformly from `[0, total)` and walks the entries,
    /// subtracting each absolute weight until `f` goes negative. If the draw
    /// cannot be made (total weight not usable, e.g. all zeros) or
    /// floating-point drift exhausts the walk without a hit, the roll falls
    /// back to a uniform pick over the entries — a roll always lands, though
    /// the fallback makes no proportionality promise.
    pub fn roll(&self, rng: &mut Rng) -> &T {
        if let Ok(mut remaining) = rng.f32_range(0.0, self.total_weight, Inclusivity::LowOnly) {
            for entry in &self.entries {
                remaining -= entry.weight.abs();
                if remaining < 0.0 {
                    return &entry.outcome;
                }
            }
        }
        let index = rng.index_below(self.entries.len() as u64) as usize;
        &self.entries[index].outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(
            DropTable::<&str>::new(Vec::new()),
            Err(PickError::EmptyCollection)
        );
    }

    #[test]
    fn single_entry_always_wins() {
        let table = DropTable::from_pairs(vec![(2.5, "only")]).unwrap();
        let mut rng = Rng::new(3);
        for _ in 0..100 {
            assert_eq!(*table.roll(&mut rng), "only");
        }
    }

    #[test]
    fn weights_are_roughly_proportional() {
        let table = DropTable::from_pairs(vec![(1.0, 'a'), (3.0, 'b')]).unwrap();
        let mut rng = Rng::new(1234);
        let trials = 20_000u32;
        let b_hits = (0..trials).filter(|_| *table.roll(&mut rng) == 'b').count();
        let fraction = b_hits as f64 / f64::from(trials);
        // b carries 3 of 4 weight units; allow generous statistical slack.
        assert!(
            (0.72..0.78).contains(&fraction),
            "expected ~75% b, got {:.1}%",
            fraction * 100.0
        );
    }

    #[test]
    fn negative_weights_count_by_magnitude() {
        let mut signed_rng = Rng::new(77);
        let mut plain_rng = Rng::new(77);
        let signed = DropTable::from_pairs(vec![(-1.0, 'a'), (3.0, 'b')]).unwrap();
        let plain = DropTable::from_pairs(vec![(1.0, 'a'), (3.0, 'b')]).unwrap();
        assert_eq!(signed.total_weight(), plain.total_weight());
        for _ in 0..1000 {
            assert_eq!(signed.roll(&mut signed_rng), plain.roll(&mut plain_rng));
        }
    }

    #[test]
    fn roll_determinism_over_entry_order() {
        let table = DropTable::from_pairs(vec![(1.0, "x"), (1.0, "y"), (1.0, "z")]).unwrap();
        let mut a = Rng::new(99);
        let mut b = Rng::new(99);
        for _ in 0..1000 {
            assert_eq!(table.roll(&mut a), table.roll(&mut b));
        }
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let table = DropTable::from_pairs(vec![(0.0, 'a'), (0.0, 'b')]).unwrap();
        assert_eq!(table.total_weight(), 0.0);
        let mut rng = Rng::new(5);
        let trials = 2000u32;
        let a_hits = (0..trials).filter(|_| *table.roll(&mut rng) == 'a').count();
        // The fallback is a uniform pick, so both outcomes must keep showing
        // up at comparable rates.
        let fraction = a_hits as f64 / f64::from(trials);
        assert!(
            (0.4..0.6).contains(&fraction),
            "uniform fallback should split ~evenly, got {:.1}% a",
            fraction * 100.0
        );
    }

    #[test]
    fn entries_load_from_json() {
        // Data-driven tables: entry lists live in JSON and are rebuilt at
        // point of use.
        let json = r#"[
            {"weight": 1.0, "outcome": "twig"},
            {"weight": 0.25, "outcome": "acorn"}
        ]"#;
        let entries: Vec<DropEntry<String>> = serde_json::from_str(json).unwrap();
        let table = DropTable::new(entries).unwrap();
        assert_eq!(table.entries().len(), 2);
        assert_eq!(table.total_weight(), 1.25);

        let mut rng = Rng::new(11);
        let outcome = table.roll(&mut rng);
        assert!(outcome == "twig" || outcome == "acorn");
    }
}
