// packages/engine/src/seeder/generator.rs
//! Random `contexts` rows
//!
//! Generation is a pure function of the RNG (and the clock, for the
//! timestamp). Pass a seeded `StdRng` for reproducible output.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Quantum state labels drawn for `state_vector`
pub const QUANTUM_STATES: [&str; 6] = ["|0>", "|1>", "|0> + |1>", "|0> - |1>", "|+>", "|->"];

/// Number of floats in `coordinates`
pub const COORDINATE_DIMENSIONS: usize = 10;

/// Format of the `timestamp` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Furthest a timestamp may lie in the past
pub const MAX_AGE_DAYS: i64 = 365;

/// Upper bound of `temporal_index`
pub const MAX_TEMPORAL_INDEX: i64 = 1000;

/// One row of the `contexts` table, without its identity
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRow {
    pub state_vector: String,
    pub temporal_index: i64,
    /// In `[0, 1]`
    pub entropy: f64,
    /// In `[-1, 1]`
    pub synaptic_weight: f64,
    /// `0x` followed by 64 lowercase hex digits
    pub hash: String,
    /// Comma-joined floats, each in `[-10, 10]`
    pub coordinates: String,
    pub is_entangled: bool,
    /// UTC, formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
}

impl ContextRow {
    /// Parse `coordinates` back into floats
    pub fn coordinate_values(&self) -> Vec<Option<f64>> {
        self.coordinates
            .split(',')
            .map(|c| c.parse::<f64>().ok())
            .collect()
    }

    /// Parse `timestamp` back into a UTC instant
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Generate a row stamped relative to the current time
pub fn generate_random_row<R: Rng + ?Sized>(rng: &mut R) -> ContextRow {
    generate_random_row_at(rng, Utc::now())
}

/// Generate a row stamped relative to `now`
pub fn generate_random_row_at<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> ContextRow {
    let state_vector = QUANTUM_STATES
        .choose(rng)
        .copied()
        .unwrap_or(QUANTUM_STATES[0])
        .to_string();

    let hash_bytes: [u8; 32] = rng.gen();

    let coordinates = (0..COORDINATE_DIMENSIONS)
        .map(|_| rng.gen_range(-10.0..=10.0_f64).to_string())
        .collect::<Vec<_>>()
        .join(",");

    let age = Duration::days(rng.gen_range(0..=MAX_AGE_DAYS));

    ContextRow {
        state_vector,
        temporal_index: rng.gen_range(0..=MAX_TEMPORAL_INDEX),
        entropy: rng.gen_range(0.0..=1.0),
        synaptic_weight: rng.gen_range(-1.0..=1.0),
        hash: format!("0x{}", hex::encode(hash_bytes)),
        coordinates,
        is_entangled: rng.gen_bool(0.5),
        timestamp: (now - age).format(TIMESTAMP_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_in_bounds(row: &ContextRow, now: DateTime<Utc>) {
        assert!((0.0..=1.0).contains(&row.entropy));
        assert!((-1.0..=1.0).contains(&row.synaptic_weight));
        assert!((0..=MAX_TEMPORAL_INDEX).contains(&row.temporal_index));
        assert!(QUANTUM_STATES.contains(&row.state_vector.as_str()));

        assert_eq!(row.hash.len(), 66);
        assert!(row.hash.starts_with("0x"));
        assert!(row.hash[2..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));

        let coords = row.coordinate_values();
        assert_eq!(coords.len(), COORDINATE_DIMENSIONS);
        for c in coords {
            let c = c.expect("coordinate parses");
            assert!((-10.0..=10.0).contains(&c));
        }

        let ts = row.timestamp_utc().expect("timestamp parses");
        assert!(ts <= now);
        assert!(ts >= now - Duration::days(MAX_AGE_DAYS + 1));
    }

    #[test]
    fn test_row_bounds() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let now = Utc::now();
            let row = generate_random_row_at(&mut rng, now);
            assert_in_bounds(&row, now);
        }
    }

    #[test]
    fn test_seeded_rows_are_reproducible() {
        let now = Utc::now();
        let a = generate_random_row_at(&mut StdRng::seed_from_u64(42), now);
        let b = generate_random_row_at(&mut StdRng::seed_from_u64(42), now);
        assert_eq!(a, b);

        let c = generate_random_row_at(&mut StdRng::seed_from_u64(43), now);
        assert_ne!(a.hash, c.hash);
    }

    #[test]
    fn test_timestamp_format() {
        let row = generate_random_row(&mut rand::thread_rng());
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(row.timestamp.len(), 19);
        assert_eq!(&row.timestamp[4..5], "-");
        assert_eq!(&row.timestamp[10..11], " ");
    }

    proptest! {
        #[test]
        fn prop_rows_respect_bounds(seed in any::<u64>()) {
            let now = Utc::now();
            let row = generate_random_row_at(&mut StdRng::seed_from_u64(seed), now);
            assert_in_bounds(&row, now);
        }
    }
}
