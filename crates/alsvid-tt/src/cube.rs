//! Ternary cubes: fixed-width strings over `{0, 1, -}`.

use std::collections::BTreeSet;
use std::fmt;

/// One position of a cube: `Some(bit)` or don't-care (`None`).
pub type Value = Option<bool>;

/// A ternary cube, most significant bit first.
///
/// The derived ordering (don't-care < 0 < 1, lexicographic) is relied upon
/// by the minimiser and the encoder for deterministic tie-breaking.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cube(pub Vec<Value>);

/// An ordered set of cubes.
pub type CubeSet = BTreeSet<Cube>;

impl Cube {
    /// Create an empty cube.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a fully-specified cube from the `width` low bits of `value`,
    /// most significant bit first.
    pub fn from_integer(value: u64, width: usize) -> Self {
        let mut bits = Vec::with_capacity(width);
        for i in (0..width).rev() {
            bits.push(Some((value >> i) & 1 == 1));
        }
        Self(bits)
    }

    /// Interpret the cube as an integer, most significant bit first.
    ///
    /// Returns `None` if any position is a don't-care.
    pub fn to_integer(&self) -> Option<u64> {
        let mut value = 0u64;
        for bit in &self.0 {
            value = (value << 1) | u64::from((*bit)?);
        }
        Some(value)
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cube has no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every position is specified.
    pub fn is_concrete(&self) -> bool {
        self.0.iter().all(Value::is_some)
    }

    /// Append a 0 on the least significant side, returning the grown cube.
    #[must_use]
    pub fn append_zero(mut self) -> Self {
        self.0.push(Some(false));
        self
    }

    /// Append a 1 on the least significant side, returning the grown cube.
    #[must_use]
    pub fn append_one(mut self) -> Self {
        self.0.push(Some(true));
        self
    }

    /// Prepend a 0 on the most significant side.
    pub fn insert_zero(&mut self) {
        self.0.insert(0, Some(false));
    }

    /// Extend to `width` positions with don't-cares on the least
    /// significant side. Never shrinks.
    pub fn resize(&mut self, width: usize) {
        if self.0.len() < width {
            self.0.resize(width, None);
        }
    }

    /// Enumerate every concrete cube matched by this pattern.
    pub fn complete_cubes(&self) -> Vec<Cube> {
        let dc_positions: Vec<usize> = self
            .0
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.is_none().then_some(i))
            .collect();

        let mut result = Vec::with_capacity(1 << dc_positions.len());
        for assignment in 0u64..(1 << dc_positions.len()) {
            let mut cube = self.clone();
            for (j, &pos) in dc_positions.iter().enumerate() {
                cube.0[pos] = Some((assignment >> (dc_positions.len() - j - 1)) & 1 == 1);
            }
            result.push(cube);
        }
        result
    }

    /// Return some concrete cube of the set's common width that is not in
    /// `cubes`. The set must not already cover the full space.
    pub fn find_missing_cube(cubes: &CubeSet) -> Cube {
        let width = cubes.iter().next().map_or(0, Cube::len);
        for value in 0..(1u64 << width) {
            let candidate = Cube::from_integer(value, width);
            if !cubes.contains(&candidate) {
                return candidate;
            }
        }
        Cube::from_integer(0, width)
    }

    /// Match against a pattern string over `{'0', '1', '-'}`; a don't-care
    /// on either side matches anything.
    pub fn matches(&self, pattern: &str) -> bool {
        if self.0.len() != pattern.len() {
            return false;
        }
        self.0.iter().zip(pattern.chars()).all(|(v, c)| match (v, c) {
            (_, '-') | (None, _) => true,
            (Some(true), '1') | (Some(false), '0') => true,
            _ => false,
        })
    }

    /// Match against the `width`-bit representation of `value`; don't-cares
    /// in `self` are wildcards.
    pub fn matches_integer(&self, value: u64, width: usize) -> bool {
        if self.0.len() != width {
            return false;
        }
        let concrete = Cube::from_integer(value, width);
        self.0
            .iter()
            .zip(concrete.0.iter())
            .all(|(v, c)| v.is_none() || v == c)
    }
}

impl FromIterator<Value> for Cube {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.0 {
            let c = match v {
                Some(true) => '1',
                Some(false) => '0',
                None => '-',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
