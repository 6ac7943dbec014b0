//! Shared synthetic-data helpers for integration tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use otoprice::{Record, RecordTable};

/// Synthetic listings with price linear in mileage plus small noise.
///
/// The categorical columns cycle through fixed vocabularies and carry
/// no price signal of their own.
pub fn synthetic_listings(n: usize, seed: u64) -> RecordTable {
    let makes = ["audi", "bmw", "ford", "opel", "toyota"];
    let models = ["a4", "320d", "ka", "astra", "corolla", "a6", "118i", "focus", "corsa"];
    let engines = ["1.4", "1.6", "1.9", "2.0"];
    let fuels = ["Diesel", "Benzyna", "Benzyna+LPG"];

    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..n)
        .map(|i| {
            let mileage: f32 = rng.gen_range(10_000.0..500_000.0);
            let year: f32 = rng.gen_range(1995.0..2018.0);
            let noise: f32 = rng.gen_range(-500.0..500.0);
            Record {
                make: makes[i % makes.len()].into(),
                model: models[i % models.len()].into(),
                price: 52_000.0 - 0.07 * mileage + noise,
                year,
                mileage,
                engine: engines[i % engines.len()].into(),
                fuel: fuels[i % fuels.len()].into(),
            }
        })
        .collect();
    RecordTable::new(records)
}

/// The column set the end-to-end tests train with.
pub fn test_columns() -> Vec<otoprice::ColumnSpec> {
    use otoprice::{ColumnSpec, Transform};
    vec![
        ColumnSpec::new("mileage", Transform::NormalizeMeanVariance),
        ColumnSpec::new("year", Transform::NormalizeMeanVariance),
        ColumnSpec::new("make", Transform::OneHotEncoding),
        ColumnSpec::new("fuel", Transform::OneHotEncoding),
        ColumnSpec::new("engine", Transform::OneHotEncoding),
        ColumnSpec::new("model", Transform::OneHotEncoding),
    ]
}
