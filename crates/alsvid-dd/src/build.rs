//! Truth table to matrix DD construction.

use alsvid_tt::{Cube, TruthTable};

use crate::package::{Edge, Package, Var};

/// Build the matrix DD of a completely input-specified truth table.
///
/// The table must be square (`n_inputs == n_outputs`); output don't-cares
/// put the entry on both output branches. The empty table maps to the
/// canonical zero.
pub fn build_dd(tt: &TruthTable, pkg: &mut Package) -> Edge {
    assert_eq!(
        tt.n_inputs(),
        tt.n_outputs(),
        "DD construction needs a square truth table"
    );

    let entries: Vec<(Cube, Cube)> = tt.iter().cloned().collect();
    build_rec(&entries, tt.n_inputs(), pkg)
}

fn build_rec(entries: &[(Cube, Cube)], width: usize, pkg: &mut Package) -> Edge {
    if width == 0 || entries.is_empty() {
        return Edge::zero();
    }

    let label = (width - 1) as Var;

    if width == 1 {
        let mut edges = [Edge::zero(); 4];
        for (input, output) in entries {
            let in_bit = input.0[0].expect("inputs must be fully specified");
            match output.0[0] {
                Some(out_bit) => {
                    edges[2 * usize::from(out_bit) + usize::from(in_bit)] = Edge::one();
                }
                None => {
                    // an output don't-care reaches the terminal either way
                    edges[usize::from(in_bit)] = Edge::one();
                    edges[2 + usize::from(in_bit)] = Edge::one();
                }
            }
        }
        return pkg.make_node(label, edges);
    }

    // partition by the (output, input) MSB pair
    let mut partitions: [Vec<(Cube, Cube)>; 4] = [vec![], vec![], vec![], vec![]];
    for (input, output) in entries {
        let in_bit = input.0[0].expect("inputs must be fully specified");
        let reduced_in = Cube(input.0[1..].to_vec());
        let reduced_out = Cube(output.0[1..].to_vec());

        match output.0[0] {
            Some(out_bit) => {
                partitions[2 * usize::from(out_bit) + usize::from(in_bit)]
                    .push((reduced_in, reduced_out));
            }
            None => {
                partitions[usize::from(in_bit)].push((reduced_in.clone(), reduced_out.clone()));
                partitions[2 + usize::from(in_bit)].push((reduced_in, reduced_out));
            }
        }
    }

    let mut edges = [Edge::zero(); 4];
    for (i, part) in partitions.iter().enumerate() {
        edges[i] = build_rec(part, width - 1, pkg);
    }
    pkg.make_node(label, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_tt::read_pla;

    #[test]
    fn test_empty_table_builds_zero() {
        let tt = TruthTable::new();
        let mut pkg = Package::new(1);
        assert!(build_dd(&tt, &mut pkg).is_zero());
    }

    #[test]
    fn test_single_bit_identity() {
        let mut tt = TruthTable::new();
        tt.insert(Cube::from_integer(0, 1), Cube::from_integer(0, 1));
        tt.extend();

        let mut pkg = Package::new(1);
        let dd = build_dd(&tt, &mut pkg);
        assert!(pkg.is_identity(dd));
    }

    #[test]
    fn test_two_bit_identity() {
        let mut tt = TruthTable::new();
        for v in 0..4u64 {
            tt.insert(Cube::from_integer(v, 2), Cube::from_integer(v, 2));
        }

        let mut pkg = Package::new(2);
        let dd = build_dd(&tt, &mut pkg);
        assert!(pkg.is_identity(dd));
    }

    #[test]
    fn test_cnot_table_structure() {
        // MSB controls an X on the LSB
        let mut tt = read_pla(".i 2\n.o 2\n10 11\n01 01\n.e\n").unwrap();
        tt.extend();

        let mut pkg = Package::new(2);
        let dd = build_dd(&tt, &mut pkg);

        let ident = pkg.identity(1);
        let x = pkg.make_node(0, [Edge::zero(), Edge::one(), Edge::one(), Edge::zero()]);
        let expected = pkg.make_node(1, [ident, Edge::zero(), Edge::zero(), x]);
        assert_eq!(dd, expected);
    }

    #[test]
    fn test_output_dont_care_spans_both_branches() {
        let mut tt = TruthTable::new();
        tt.insert(Cube::from_integer(0, 1), Cube(vec![None]));
        tt.insert(Cube::from_integer(1, 1), Cube::from_integer(0, 1));

        let mut pkg = Package::new(1);
        let dd = build_dd(&tt, &mut pkg);
        let children = pkg.children(dd);
        assert!(children[0].is_one()); // 0 -> 0
        assert!(children[1].is_one()); // 1 -> 0
        assert!(children[2].is_one()); // 0 -> 1
        assert!(children[3].is_zero());
    }
}
