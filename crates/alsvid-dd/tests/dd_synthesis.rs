//! Scenario tests for the identity-reshaping synthesis.

use alsvid_dd::{build_dd, DdSynthesizer, Package};
use alsvid_ir::simulate;
use alsvid_tt::{read_pla, Cube, TruthTable};

/// Simulate `circuit` on the table's input value and compare the
/// non-garbage outcome against the expected output cube (don't-cares in
/// the expectation match anything).
fn assert_realizes(circuit: &alsvid_ir::Circuit, tt: &TruthTable) {
    let lines = circuit.lines() as usize;
    for (input, output) in tt.iter() {
        let mut bits = vec![false; lines];
        // cube position 0 is the most significant line
        for (pos, value) in input.0.iter().enumerate() {
            bits[lines - 1 - pos] = value.expect("extended tables are concrete");
        }
        let result = simulate(circuit, &bits).unwrap();
        for (pos, value) in output.0.iter().enumerate() {
            if let Some(expected) = value {
                assert_eq!(
                    result[lines - 1 - pos],
                    *expected,
                    "line {} for input {input}",
                    lines - 1 - pos
                );
            }
        }
    }
}

#[test]
fn cnot_table_needs_one_gate() {
    let mut tt = read_pla(".i 2\n.o 2\n10 11\n01 01\n.e\n").unwrap();
    tt.extend();

    let mut pkg = Package::new(2);
    let src = build_dd(&tt, &mut pkg);
    let mut synth = DdSynthesizer::new();
    synth.synthesize(src, &mut pkg);

    assert_eq!(synth.num_gates(), 1);
    assert_eq!(synth.circuit().num_gates(), 1);

    let gate = synth.circuit().gates().next().unwrap();
    assert_eq!(gate.controls().collect::<Vec<_>>(), vec![1]);
    assert_eq!(gate.targets().collect::<Vec<_>>(), vec![0]);

    assert_realizes(synth.circuit(), &tt);
}

#[test]
fn toffoli_table_needs_one_gate() {
    let mut tt = read_pla(".i 3\n.o 3\n110 111\n111 110\n.e\n").unwrap();
    tt.extend();

    let mut pkg = Package::new(3);
    let src = build_dd(&tt, &mut pkg);
    let mut synth = DdSynthesizer::new();
    synth.synthesize(src, &mut pkg);

    assert_eq!(synth.num_gates(), 1);
    let gate = synth.circuit().gates().next().unwrap();
    assert_eq!(gate.controls().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(gate.targets().collect::<Vec<_>>(), vec![0]);

    assert_realizes(synth.circuit(), &tt);
}

#[test]
fn identity_table_needs_no_gates() {
    let mut tt = TruthTable::new();
    for v in 0..8u64 {
        tt.insert(Cube::from_integer(v, 3), Cube::from_integer(v, 3));
    }

    let mut pkg = Package::new(3);
    let src = build_dd(&tt, &mut pkg);
    let mut synth = DdSynthesizer::new();
    synth.synthesize(src, &mut pkg);

    assert_eq!(synth.num_gates(), 0);
}

#[test]
fn bit_swap_permutation() {
    // exchange the two lines: 01 <-> 10
    let mut tt = read_pla(".i 2\n.o 2\n01 10\n10 01\n00 00\n11 11\n.e\n").unwrap();
    tt.extend();

    let mut pkg = Package::new(2);
    let src = build_dd(&tt, &mut pkg);
    let mut synth = DdSynthesizer::new();
    synth.synthesize(src, &mut pkg);

    assert!(synth.num_gates() > 0);
    assert_realizes(synth.circuit(), &tt);
}

#[test]
fn three_bit_permutations_are_realized() {
    // a handful of fixed permutations of {0..7}, exercising all four
    // reshaping tactics
    let permutations: [[u64; 8]; 4] = [
        [1, 0, 3, 2, 5, 4, 7, 6],
        [7, 6, 5, 4, 3, 2, 1, 0],
        [0, 2, 4, 6, 1, 3, 5, 7],
        [3, 1, 4, 0, 6, 5, 7, 2],
    ];

    for perm in &permutations {
        let mut tt = TruthTable::new();
        for (input, &output) in perm.iter().enumerate() {
            tt.insert(Cube::from_integer(input as u64, 3), Cube::from_integer(output, 3));
        }

        let mut pkg = Package::new(3);
        let src = build_dd(&tt, &mut pkg);
        let mut synth = DdSynthesizer::new();
        synth.synthesize(src, &mut pkg);

        assert_realizes(synth.circuit(), &tt);
    }
}

#[test]
fn random_four_bit_permutations_are_realized() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..6 {
        let mut perm: Vec<u64> = (0..16).collect();
        perm.shuffle(&mut rng);

        let mut tt = TruthTable::new();
        for (input, &output) in perm.iter().enumerate() {
            tt.insert(Cube::from_integer(input as u64, 4), Cube::from_integer(output, 4));
        }

        let mut pkg = Package::new(4);
        let src = build_dd(&tt, &mut pkg);
        let mut synth = DdSynthesizer::new();
        synth.synthesize(src, &mut pkg);

        assert_realizes(synth.circuit(), &tt);
    }
}

#[test]
fn dont_care_outputs_are_respected() {
    // partially specified outputs leave the synthesizer freedom; simulated
    // outputs must match wherever the table is specified
    let mut tt = read_pla(".i 2\n.o 2\n00 1-\n01 0-\n10 --\n11 --\n.e\n").unwrap();
    tt.extend();

    let mut pkg = Package::new(2);
    let src = build_dd(&tt, &mut pkg);
    let mut synth = DdSynthesizer::new();
    synth.synthesize(src, &mut pkg);

    assert_realizes(synth.circuit(), &tt);
}

#[test]
fn collapsed_subtree_below_a_dont_care_level_is_reshaped() {
    // for inputs 1xx the middle output bit is free and independent of the
    // middle input bit, so all four children of that subtree coincide and
    // the node collapses: the low-bit inverter hangs one level below the
    // root's child edge
    let mut tt = read_pla(
        ".i 3\n\
         .o 3\n\
         000 000\n\
         001 001\n\
         010 010\n\
         011 011\n\
         100 1-1\n\
         101 1-0\n\
         110 1-1\n\
         111 1-0\n\
         .e\n",
    )
    .unwrap();
    tt.extend();

    let mut pkg = Package::new(3);
    let src = build_dd(&tt, &mut pkg);
    let mut synth = DdSynthesizer::new();
    synth.synthesize(src, &mut pkg);

    // one controlled inverter suffices; the free bit needs no gates
    assert_eq!(synth.num_gates(), 1);
    assert_realizes(synth.circuit(), &tt);
}

#[test]
fn cascading_dont_care_collapse_is_reshaped() {
    // two free output bits over two irrelevant input bits collapse the
    // whole 1xxx subtree down to the single-bit inverter, so the child
    // edge skips two levels
    let mut tt = read_pla(
        ".i 4\n\
         .o 4\n\
         0000 0000\n\
         0001 0001\n\
         0010 0010\n\
         0011 0011\n\
         0100 0100\n\
         0101 0101\n\
         0110 0110\n\
         0111 0111\n\
         1000 1--1\n\
         1001 1--0\n\
         1010 1--1\n\
         1011 1--0\n\
         1100 1--1\n\
         1101 1--0\n\
         1110 1--1\n\
         1111 1--0\n\
         .e\n",
    )
    .unwrap();
    tt.extend();

    let mut pkg = Package::new(4);
    let src = build_dd(&tt, &mut pkg);
    let mut synth = DdSynthesizer::new();
    synth.synthesize(src, &mut pkg);

    assert_eq!(synth.num_gates(), 1);
    assert_realizes(synth.circuit(), &tt);
}

#[test]
fn coding_techniques_recovers_primary_outputs() {
    // non-reversible: output 00 appears twice
    let mut tt = TruthTable::new();
    tt.insert(Cube::from_integer(0b00, 2), Cube::from_integer(0b00, 2));
    tt.insert(Cube::from_integer(0b01, 2), Cube::from_integer(0b01, 2));
    tt.insert(Cube::from_integer(0b10, 2), Cube::from_integer(0b10, 2));
    tt.insert(Cube::from_integer(0b11, 2), Cube::from_integer(0b00, 2));

    let circuit = DdSynthesizer::synthesize_coding_techniques(&tt, true);
    let lines = circuit.lines() as usize;
    assert_eq!(lines, 3);

    for (input, output) in tt.iter() {
        let mut bits = vec![false; lines];
        for (pos, value) in input.0.iter().enumerate() {
            bits[tt.n_inputs() - 1 - pos] = value.unwrap();
        }
        // constant lines start at their declared value
        for (line, constant) in circuit.constants().iter().enumerate() {
            if let Some(value) = constant {
                bits[line] = *value;
            }
        }

        let result = simulate(&circuit, &bits).unwrap();

        // primary outputs are the non-garbage lines, most significant first
        let primary: Vec<bool> = (0..lines)
            .rev()
            .filter(|&line| !circuit.garbage()[line])
            .map(|line| result[line])
            .collect();
        let expected: Vec<bool> = output.0.iter().map(|v| v.unwrap()).collect();
        assert_eq!(primary, expected, "input {input}");
    }
}

#[test]
fn one_pass_realizes_reversible_tables() {
    let mut tt = TruthTable::new();
    let perm = [2u64, 0, 3, 1];
    for (input, &output) in perm.iter().enumerate() {
        tt.insert(Cube::from_integer(input as u64, 2), Cube::from_integer(output, 2));
    }

    let circuit = DdSynthesizer::synthesize_one_pass(&tt);
    assert_eq!(circuit.lines(), 2);
    assert_realizes(&circuit, &tt);
}
