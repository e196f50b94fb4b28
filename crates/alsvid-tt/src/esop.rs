//! Exclusive-or sum-of-products minimisation (Quine–McCluskey).
//!
//! Takes a set of concrete on-minterms and produces a compact prime cover:
//! prime implicant generation by popcount groups, a prime chart with
//! essential-prime extraction and dominance simplification, and a
//! most-covering heuristic for the cyclic core. The result is checked
//! against the on-set before it is returned.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::cube::{Cube, CubeSet, Value};

/// A minterm as a value/dash bit pair. Bit `i` addresses the cube position
/// `n - 1 - i` (LSB first).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct MinTerm {
    value: u64,
    dash: u64,
}

impl MinTerm {
    fn new(value: u64) -> Self {
        Self { value, dash: 0 }
    }

    fn get(&self, i: usize) -> Value {
        if (self.dash >> i) & 1 == 1 {
            None
        } else {
            Some((self.value >> i) & 1 == 1)
        }
    }

    /// Merge with a term differing in exactly one specified bit.
    fn combine(&self, other: &MinTerm) -> MinTerm {
        let mask = (self.value ^ other.value) | (self.dash ^ other.dash);
        MinTerm {
            value: self.value & !mask,
            dash: self.dash | mask,
        }
    }

    /// Invoke `f` for every concrete value covered by this term.
    fn for_each_value<F: FnMut(u64)>(&self, n: usize, f: &mut F) {
        fn rec<F: FnMut(u64)>(term: &MinTerm, n: usize, bit: usize, cur: u64, f: &mut F) {
            if bit == n {
                f(cur);
                return;
            }
            match term.get(bit) {
                None => {
                    rec(term, n, bit + 1, cur, f);
                    rec(term, n, bit + 1, cur | (1 << bit), f);
                }
                Some(false) => rec(term, n, bit + 1, cur, f),
                Some(true) => rec(term, n, bit + 1, cur | (1 << bit), f),
            }
        }
        rec(self, n, 0, 0, f);
    }
}

/// Group terms by popcount and combine neighbouring groups until no new
/// implicants appear; unmarked terms are prime.
fn prime_implicants(mut terms: Vec<MinTerm>, n: usize) -> Vec<MinTerm> {
    let mut primes = Vec::new();

    while !terms.is_empty() {
        let mut groups: Vec<Vec<MinTerm>> = vec![Vec::new(); n + 1];
        for term in &terms {
            groups[term.value.count_ones() as usize].push(*term);
        }

        let mut marked: FxHashMap<MinTerm, bool> = FxHashMap::default();
        let mut combined = Vec::new();
        for pair in groups.windows(2) {
            for a in &pair[0] {
                for b in &pair[1] {
                    if (a.value & b.value) == a.value && a.dash == b.dash {
                        marked.insert(*a, true);
                        marked.insert(*b, true);
                        combined.push(a.combine(b));
                    }
                }
            }
        }

        for term in &terms {
            if !marked.get(term).copied().unwrap_or(false) {
                primes.push(*term);
            }
        }

        combined.sort_unstable();
        combined.dedup();
        terms = combined;
    }

    primes.sort_unstable();
    primes.dedup();
    primes
}

/// The prime chart: one column per on-minterm, holding the primes covering
/// it.
struct PrimeChart {
    columns: FxHashMap<u64, Vec<MinTerm>>,
    n: usize,
}

impl PrimeChart {
    fn new(primes: &[MinTerm], n: usize) -> Self {
        let mut columns: FxHashMap<u64, Vec<MinTerm>> = FxHashMap::default();
        for prime in primes {
            prime.for_each_value(n, &mut |value| {
                columns.entry(value).or_default().push(*prime);
            });
        }
        for rows in columns.values_mut() {
            rows.sort_unstable();
        }
        Self { columns, n }
    }

    fn size(&self) -> usize {
        self.columns.len()
    }

    /// Move primes that are the sole cover of some column into the
    /// solution; returns whether any were found.
    fn remove_essentials(&mut self, solution: &mut Vec<MinTerm>) -> bool {
        let mut essentials: Vec<MinTerm> = self
            .columns
            .values()
            .filter(|rows| rows.len() == 1)
            .map(|rows| rows[0])
            .collect();
        if essentials.is_empty() {
            return false;
        }
        essentials.sort_unstable();
        essentials.dedup();

        for term in &essentials {
            term.for_each_value(self.n, &mut |value| {
                self.columns.remove(&value);
            });
        }
        solution.extend(essentials);
        true
    }

    /// Delete dominating columns and dominated rows; returns whether the
    /// chart changed.
    fn simplify(&mut self) -> bool {
        let mut change = false;

        // a column whose row set contains another column's row set is
        // weaker and can be dropped
        let mut keys: Vec<u64> = self.columns.keys().copied().collect();
        keys.sort_unstable();
        for &small in &keys {
            let Some(small_rows) = self.columns.get(&small).cloned() else {
                continue;
            };
            for &big in &keys {
                if big == small || !self.columns.contains_key(&big) {
                    continue;
                }
                let big_rows = &self.columns[&big];
                if is_subset(&small_rows, big_rows) && big_rows.len() > small_rows.len() {
                    self.columns.remove(&big);
                    change = true;
                }
            }
        }

        // transpose, drop rows whose coverage is contained in another row
        let mut rows: FxHashMap<MinTerm, Vec<u64>> = FxHashMap::default();
        for (&value, primes) in &self.columns {
            for prime in primes {
                rows.entry(*prime).or_default().push(value);
            }
        }
        for values in rows.values_mut() {
            values.sort_unstable();
        }

        let mut terms: Vec<MinTerm> = rows.keys().copied().collect();
        terms.sort_unstable();
        for &big in &terms {
            let Some(big_values) = rows.get(&big).cloned() else {
                continue;
            };
            for &small in &terms {
                if big == small || !rows.contains_key(&small) {
                    continue;
                }
                let small_values = &rows[&small];
                if is_subset(small_values, &big_values) && big_values.len() > small_values.len() {
                    rows.remove(&small);
                    change = true;
                }
            }
        }

        // transpose back
        self.columns.clear();
        for (term, values) in rows {
            for value in values {
                self.columns.entry(value).or_default().push(term);
            }
        }
        for primes in self.columns.values_mut() {
            primes.sort_unstable();
        }

        change
    }

    /// Cyclic-core fallback: take the prime covering the most remaining
    /// columns (smallest term on ties).
    fn remove_heuristic(&mut self, solution: &mut Vec<MinTerm>) {
        let mut covers: FxHashMap<MinTerm, usize> = FxHashMap::default();
        for primes in self.columns.values() {
            for prime in primes {
                *covers.entry(*prime).or_insert(0) += 1;
            }
        }

        let best = covers
            .into_iter()
            .max_by(|(ta, ca), (tb, cb)| ca.cmp(cb).then(tb.cmp(ta)))
            .map(|(term, _)| term)
            .expect("chart is nonempty");

        best.for_each_value(self.n, &mut |value| {
            self.columns.remove(&value);
        });
        solution.push(best);
    }
}

fn is_subset<T: Ord>(small: &[T], big: &[T]) -> bool {
    small.iter().all(|x| big.binary_search(x).is_ok())
}

fn eval(solution: &[MinTerm], value: u64, n: usize) -> bool {
    solution.iter().any(|term| {
        (0..n).all(|i| {
            let bit = (value >> i) & 1 == 1;
            match term.get(i) {
                Some(expected) => expected == bit,
                None => true,
            }
        })
    })
}

fn check_solution(solution: &[MinTerm], on_values: &[u64], n: usize) -> bool {
    if !on_values.iter().all(|&v| eval(solution, v, n)) {
        return false;
    }
    (0..(1u64 << n)).all(|v| on_values.contains(&v) || !eval(solution, v, n))
}

/// Minimise a set of concrete same-width cubes into a prime cover whose
/// evaluation equals the on-set exactly.
///
/// # Panics
///
/// Panics if the computed cover does not reproduce the on-set; that is an
/// implementation bug, not a data error.
pub fn minimize(on_set: &CubeSet) -> CubeSet {
    if on_set.len() <= 1 {
        return on_set.clone();
    }

    let n = on_set.iter().next().expect("nonempty").len();
    let mut on_values: Vec<u64> = on_set
        .iter()
        .map(|c| c.to_integer().expect("on-set cubes must be concrete"))
        .collect();
    on_values.sort_unstable();
    on_values.dedup();

    let terms: Vec<MinTerm> = on_values.iter().map(|&v| MinTerm::new(v)).collect();
    let primes = prime_implicants(terms, n);

    let mut chart = PrimeChart::new(&primes, n);
    let mut solution = Vec::new();
    loop {
        let mut change = chart.remove_essentials(&mut solution);
        change = change || chart.simplify();
        if !change && chart.size() > 0 {
            chart.remove_heuristic(&mut solution);
        }
        if chart.size() == 0 {
            break;
        }
    }

    assert!(
        check_solution(&solution, &on_values, n),
        "minimised cover does not reproduce the on-set"
    );
    trace!(minterms = on_values.len(), cubes = solution.len(), "minimised cover");

    solution
        .iter()
        .map(|term| (0..n).rev().map(|i| term.get(i)).collect::<Cube>())
        .collect()
}
