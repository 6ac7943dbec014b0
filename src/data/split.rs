//! Deterministic shuffle and train/test split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::table::RecordTable;

/// Result of a train/test split.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: RecordTable,
    pub test: RecordTable,
}

/// Shuffle the table and split off a held-out test fraction.
///
/// The shuffle is driven entirely by `seed`: the same seed over the
/// same table always yields the same split, which is what lets a
/// session re-derive its evaluation set after training.
///
/// `test_fraction` is clamped to `[0, 1]`. The two parts are disjoint
/// and together cover every input row exactly once.
pub fn shuffle_split(table: &RecordTable, test_fraction: f32, seed: u64) -> TrainTestSplit {
    let n = table.n_rows();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let fraction = test_fraction.clamp(0.0, 1.0);
    let n_test = ((n as f64) * (fraction as f64)).round() as usize;
    let n_test = n_test.min(n);

    let (test_idx, train_idx) = indices.split_at(n_test);
    TrainTestSplit {
        train: table.select(train_idx),
        test: table.select(test_idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn table(n: usize) -> RecordTable {
        let records = (0..n)
            .map(|i| Record {
                make: format!("make{}", i % 5),
                model: format!("model{}", i % 7),
                price: 1_000.0 + i as f32,
                year: 2000.0 + (i % 18) as f32,
                mileage: 20_000.0 + 1_000.0 * i as f32,
                engine: "1.6".into(),
                fuel: "Diesel".into(),
            })
            .collect();
        RecordTable::new(records)
    }

    #[test]
    fn split_is_deterministic_per_seed() {
        let data = table(50);
        let a = shuffle_split(&data, 0.2, 1);
        let b = shuffle_split(&data, 0.2, 1);
        assert_eq!(a.test.records(), b.test.records());
        assert_eq!(a.train.records(), b.train.records());

        let c = shuffle_split(&data, 0.2, 2);
        assert_ne!(a.test.records(), c.test.records());
    }

    #[test]
    fn split_is_disjoint_and_covering() {
        let data = table(50);
        let split = shuffle_split(&data, 0.2, 7);
        assert_eq!(split.test.n_rows(), 10);
        assert_eq!(split.train.n_rows(), 40);

        let mut prices: Vec<f32> = split
            .train
            .labels()
            .into_iter()
            .chain(split.test.labels())
            .collect();
        prices.sort_by(f32::total_cmp);
        let mut expected = data.labels();
        expected.sort_by(f32::total_cmp);
        assert_eq!(prices, expected);
    }

    #[test]
    fn extreme_fractions_are_clamped() {
        let data = table(10);
        let all_test = shuffle_split(&data, 1.5, 3);
        assert_eq!(all_test.test.n_rows(), 10);
        assert!(all_test.train.is_empty());

        let no_test = shuffle_split(&data, 0.0, 3);
        assert!(no_test.test.is_empty());
        assert_eq!(no_test.train.n_rows(), 10);
    }
}
