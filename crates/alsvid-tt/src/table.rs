//! Partially specified truth tables.

use rustc_hash::FxHashMap;

use crate::cube::Cube;

/// An ordered mapping from input cubes to output cubes.
///
/// Entries keep insertion order; inserting a duplicate input cube keeps the
/// first entry (last writers lose). Inputs may contain don't-cares until
/// [`extend`](TruthTable::extend) is called, and some concrete inputs may be
/// missing entirely.
///
/// The per-line metadata mirrors the circuit side: `constants[i]` marks
/// input line `i` (LSB first) as an added constant, `garbage[i]` marks
/// output line `i` as meaningless.
#[derive(Debug, Default, Clone)]
pub struct TruthTable {
    entries: Vec<(Cube, Cube)>,
    index: FxHashMap<Cube, usize>,
    constants: Vec<bool>,
    garbage: Vec<bool>,
}

impl TruthTable {
    /// Create an empty truth table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Input width, taken from the first entry (0 when empty).
    pub fn n_inputs(&self) -> usize {
        self.entries.first().map_or(0, |(i, _)| i.len())
    }

    /// Output width, taken from the first entry (0 when empty).
    pub fn n_outputs(&self) -> usize {
        self.entries.first().map_or(0, |(_, o)| o.len())
    }

    /// Insert an entry. Duplicate input cubes are first-wins; returns
    /// whether the entry was inserted.
    pub fn insert(&mut self, input: Cube, output: Cube) -> bool {
        debug_assert!(
            self.entries.is_empty()
                || (input.len() == self.n_inputs() && output.len() == self.n_outputs()),
            "cube widths must match the table"
        );
        if self.index.contains_key(&input) {
            return false;
        }
        self.index.insert(input.clone(), self.entries.len());
        self.entries.push((input, output));
        true
    }

    /// Look up the output for an input cube.
    pub fn get(&self, input: &Cube) -> Option<&Cube> {
        self.index.get(input).map(|&i| &self.entries[i].1)
    }

    /// Find the entry whose input equals the `width`-bit value.
    pub fn find(&self, value: u64, width: usize) -> Option<&(Cube, Cube)> {
        self.index
            .get(&Cube::from_integer(value, width))
            .map(|&i| &self.entries[i])
    }

    /// Iterate the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &(Cube, Cube)> {
        self.entries.iter()
    }

    /// Iterate the entries with mutable outputs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Cube, &mut Cube)> {
        self.entries.iter_mut().map(|(i, o)| (&*i, o))
    }

    /// Remove all entries; metadata is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Rewrite every entry through `f`, preserving order and rebuilding the
    /// lookup index. Duplicate rewritten inputs are first-wins.
    pub fn rebuild<F>(&mut self, mut f: F)
    where
        F: FnMut(Cube, Cube) -> (Cube, Cube),
    {
        let entries = std::mem::take(&mut self.entries);
        self.index.clear();
        for (input, output) in entries {
            let (input, output) = f(input, output);
            if !self.index.contains_key(&input) {
                self.index.insert(input.clone(), self.entries.len());
                self.entries.push((input, output));
            }
        }
    }

    // =========================================================================
    // Line metadata
    // =========================================================================

    /// Constant flags of the input lines (LSB first).
    pub fn constants(&self) -> &[bool] {
        &self.constants
    }

    /// Mutable access to the constant flags.
    pub fn constants_mut(&mut self) -> &mut Vec<bool> {
        &mut self.constants
    }

    /// Garbage flags of the output lines (LSB first).
    pub fn garbage(&self) -> &[bool] {
        &self.garbage
    }

    /// Mutable access to the garbage flags.
    pub fn garbage_mut(&mut self) -> &mut Vec<bool> {
        &mut self.garbage
    }

    /// Mark output line `i` as garbage, growing the flag vector if needed.
    pub fn set_garbage(&mut self, i: usize) {
        if self.garbage.len() <= i {
            self.garbage.resize(i + 1, false);
        }
        self.garbage[i] = true;
    }

    /// Number of outputs not flagged as garbage.
    pub fn n_primary_outputs(&self) -> usize {
        self.n_outputs() - self.garbage.iter().filter(|&&g| g).count()
    }

    /// Minimum number of additional lines a reversible embedding of this
    /// table needs: ⌈log₂ of the highest output-pattern frequency⌉.
    pub fn minimum_additional_lines(&self) -> usize {
        let mut freq: FxHashMap<&Cube, usize> = FxHashMap::default();
        for (_, output) in &self.entries {
            *freq.entry(output).or_insert(0) += 1;
        }
        let max = freq.values().copied().max().unwrap_or(1);
        (max as f64).log2().ceil() as usize
    }

    // =========================================================================
    // Extension
    // =========================================================================

    /// Make the table completely specified: expand every don't-care input
    /// into the concrete assignments it covers, then give every missing
    /// concrete input an all-zero output. The result is ordered by input
    /// value; the operation is idempotent.
    pub fn extend(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let n_inputs = self.n_inputs();
        let zero_output = Cube(vec![Some(false); self.n_outputs()]);

        let entries = std::mem::take(&mut self.entries);
        self.index.clear();

        let mut expanded: Vec<Option<Cube>> = vec![None; 1 << n_inputs];
        for (input, output) in entries {
            for concrete in input.complete_cubes() {
                let value = concrete.to_integer().expect("complete cube") as usize;
                if expanded[value].is_none() {
                    expanded[value] = Some(output.clone());
                }
            }
        }

        for (value, slot) in expanded.into_iter().enumerate() {
            let input = Cube::from_integer(value as u64, n_inputs);
            let output = slot.unwrap_or_else(|| zero_output.clone());
            self.index.insert(input.clone(), self.entries.len());
            self.entries.push((input, output));
        }
    }
}

impl PartialEq for TruthTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(s: &str) -> Cube {
        s.chars()
            .map(|c| match c {
                '1' => Some(true),
                '0' => Some(false),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_insert_is_first_wins() {
        let mut tt = TruthTable::new();
        assert!(tt.insert(cube("0"), cube("1")));
        assert!(!tt.insert(cube("0"), cube("0")));
        assert_eq!(tt.get(&cube("0")), Some(&cube("1")));
        assert_eq!(tt.size(), 1);
    }

    #[test]
    fn test_widths_follow_first_entry() {
        let mut tt = TruthTable::new();
        tt.insert(cube("01"), cube("110"));
        assert_eq!(tt.n_inputs(), 2);
        assert_eq!(tt.n_outputs(), 3);
    }

    #[test]
    fn test_extend_expands_dont_cares_and_fills_missing() {
        // mirrors the reference extend fixture: 0-1 -> 111, 1-0 -> 101
        let mut tt = TruthTable::new();
        tt.insert(cube("0-1"), cube("111"));
        tt.insert(cube("1-0"), cube("101"));
        tt.extend();

        assert_eq!(tt.size(), 8);
        for value in [0b011, 0b111] {
            assert!(tt.find(value, 3).unwrap().1.matches_integer(0b111, 3));
        }
        for value in [0b100, 0b110] {
            assert!(tt.find(value, 3).unwrap().1.matches_integer(0b101, 3));
        }
        for value in [0b000, 0b001, 0b010, 0b101] {
            assert!(tt.find(value, 3).unwrap().1.matches_integer(0b000, 3));
        }
    }

    #[test]
    fn test_extend_is_first_wins_on_overlap() {
        let mut tt = TruthTable::new();
        tt.insert(cube("1-"), cube("11"));
        tt.insert(cube("10"), cube("00"));
        tt.extend();

        // the don't-care entry was inserted first, so it claims 10
        assert!(tt.find(0b10, 2).unwrap().1.matches_integer(0b11, 2));
    }

    #[test]
    fn test_extend_is_idempotent() {
        let mut tt = TruthTable::new();
        tt.insert(cube("-1"), cube("10"));
        tt.extend();
        let once = tt.clone();
        tt.extend();
        assert_eq!(tt, once);
    }

    #[test]
    fn test_minimum_additional_lines() {
        let mut tt = TruthTable::new();
        tt.insert(cube("00"), cube("00"));
        tt.insert(cube("01"), cube("00"));
        tt.insert(cube("10"), cube("00"));
        tt.insert(cube("11"), cube("01"));
        // highest frequency 3 -> two additional lines
        assert_eq!(tt.minimum_additional_lines(), 2);

        let mut rev = TruthTable::new();
        rev.insert(cube("0"), cube("1"));
        rev.insert(cube("1"), cube("0"));
        assert_eq!(rev.minimum_additional_lines(), 0);
    }

    #[test]
    fn test_primary_outputs_exclude_garbage() {
        let mut tt = TruthTable::new();
        tt.insert(cube("00"), cube("000"));
        tt.set_garbage(0);
        assert_eq!(tt.n_primary_outputs(), 2);
    }
}
