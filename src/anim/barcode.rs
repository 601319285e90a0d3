//! Barcode offset tables and slice displacement vectors for the weave demo.
//!
//! An offset table assigns each of the mesh's "lines" (texture columns) to a
//! slice group by filling the table with contiguous runs of random length.
//! A vector table gives each group a random unit displacement direction.

use glam::Vec3;
use rand::Rng;

/// Longest run of consecutive lines sharing a group.
pub const MAX_RUN: usize = 10;

/// Length-`lines` table of slice-group indices, filled by contiguous runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    entries: Vec<u8>,
    slices: u32,
}

impl OffsetTable {
    /// Fill a table with runs of length 1..=[`MAX_RUN`]. Consecutive runs
    /// never share a group index, and the final run is truncated so the
    /// runs exactly cover the table.
    ///
    /// Requires `slices >= 2` (otherwise no non-repeating group exists).
    pub fn generate(rng: &mut impl Rng, lines: usize, slices: u32) -> Self {
        debug_assert!(slices >= 2);
        let mut entries = Vec::with_capacity(lines);
        let mut prev: Option<u8> = None;

        while entries.len() < lines {
            let run = rng
                .random_range(1..=MAX_RUN)
                .min(lines - entries.len());
            let mut group = rng.random_range(0..slices) as u8;
            while Some(group) == prev {
                group = rng.random_range(0..slices) as u8;
            }
            entries.extend(std::iter::repeat_n(group, run));
            prev = Some(group);
        }

        Self { entries, slices }
    }

    /// The group index per line.
    pub fn entries(&self) -> &[u8] {
        &self.entries
    }

    /// Number of slice groups this table draws from.
    pub fn slices(&self) -> u32 {
        self.slices
    }
}

/// One random unit displacement direction per slice group.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorTable {
    directions: Vec<Vec3>,
}

impl VectorTable {
    /// Draw `slices` uniform random unit vectors.
    pub fn generate(rng: &mut impl Rng, slices: u32) -> Self {
        let directions = (0..slices)
            .map(|_| loop {
                let v = Vec3::new(
                    rng.random::<f32>() * 2.0 - 1.0,
                    rng.random::<f32>() * 2.0 - 1.0,
                    rng.random::<f32>() * 2.0 - 1.0,
                );
                // Rejection-sample the unit ball for a uniform direction
                let len = v.length();
                if len > 1e-3 && len <= 1.0 {
                    break v / len;
                }
            })
            .collect();
        Self { directions }
    }

    /// The unit direction per group.
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }
}

/// Draw a spread magnitude uniformly from the configured range.
pub fn random_spread(rng: &mut impl Rng, range: (f32, f32)) -> f32 {
    if range.0 >= range.1 {
        return range.0;
    }
    rng.random_range(range.0..range.1)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const LINES: usize = 512;
    const SLICES: u32 = 10;

    fn runs(table: &OffsetTable) -> Vec<(u8, usize)> {
        let mut out: Vec<(u8, usize)> = Vec::new();
        for &g in table.entries() {
            match out.last_mut() {
                Some((prev, len)) if *prev == g => *len += 1,
                _ => out.push((g, 1)),
            }
        }
        out
    }

    #[test]
    fn covers_every_line() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let table = OffsetTable::generate(&mut rng, LINES, SLICES);
            assert_eq!(table.entries().len(), LINES);
        }
    }

    #[test]
    fn groups_are_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let table = OffsetTable::generate(&mut rng, LINES, SLICES);
        assert!(table.entries().iter().all(|&g| (g as u32) < SLICES));
    }

    #[test]
    fn adjacent_runs_never_repeat() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let table = OffsetTable::generate(&mut rng, LINES, SLICES);
            let runs = runs(&table);
            for pair in runs.windows(2) {
                assert_ne!(pair[0].0, pair[1].0);
            }
        }
    }

    #[test]
    fn run_lengths_are_bounded_and_sum_to_length() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let table = OffsetTable::generate(&mut rng, LINES, SLICES);
            let runs = runs(&table);
            assert!(runs.iter().all(|&(_, len)| len <= MAX_RUN));
            assert_eq!(runs.iter().map(|&(_, len)| len).sum::<usize>(), LINES);
        }
    }

    #[test]
    fn two_group_tables_alternate() {
        // Degenerate slices=2 case: the no-repeat rule forces alternation
        let mut rng = StdRng::seed_from_u64(19);
        let table = OffsetTable::generate(&mut rng, 64, 2);
        for pair in runs(&table).windows(2) {
            assert_ne!(pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn vector_table_has_unit_directions() {
        let mut rng = StdRng::seed_from_u64(23);
        let vectors = VectorTable::generate(&mut rng, SLICES);
        assert_eq!(vectors.directions().len(), SLICES as usize);
        for dir in vectors.directions() {
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn spread_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(29);
        for _ in 0..1000 {
            let s = random_spread(&mut rng, (0.03, 0.08));
            assert!((0.03..0.08).contains(&s));
        }
        assert_eq!(random_spread(&mut rng, (0.05, 0.05)), 0.05);
    }
}
