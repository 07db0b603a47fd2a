use rand::{rngs::StdRng, Rng, SeedableRng};

/// Construct a deterministic RNG from a fixed seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Source of uniform draws in [0, 1) for the feedback-bias gate.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl UniformSource for StdRng {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling once exhausted.
///
/// The sequence always holds at least `first`.
#[derive(Clone, Debug)]
pub struct FixedDraws {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedDraws {
    pub fn new(first: f64, rest: impl IntoIterator<Item = f64>) -> Self {
        let values = std::iter::once(first).chain(rest).collect();
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(value, std::iter::empty())
    }

    /// Number of draws taken so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for FixedDraws {
    fn next_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Seed derived from a participant id: the wrapping sum of its UTF-16 code
/// units, so ids outside the BMP count both surrogate halves.
pub fn participant_seed(participant_id: &str) -> u64 {
    participant_id
        .encode_utf16()
        .fold(0u64, |acc, unit| acc.wrapping_add(u64::from(unit)))
}

/// Deterministic in-place permutation keyed by `seed`.
///
/// Walks `i` from the last index down to 1 and swaps position `i` with
/// `j = (seed + i) mod (i + 1)`. The same seed always yields the same order,
/// independent of any random number generator.
pub fn seeded_permutation<T>(items: &mut [T], seed: u64) {
    for i in (1..items.len()).rev() {
        let span = i as u64 + 1;
        let j = (seed.wrapping_add(i as u64) % span) as usize;
        items.swap(i, j);
    }
}
