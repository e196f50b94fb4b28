//! Huffman-style output encoding of non-reversible truth tables.
//!
//! A table in which some output pattern repeats cannot be realised
//! reversibly as-is. The encoder replaces each output pattern with a
//! prefix-free code whose length absorbs the pattern's multiplicity; the
//! returned codeword map drives the decoder circuit emitted after
//! synthesis.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use tracing::debug;

use crate::cube::Cube;
use crate::table::TruthTable;

/// Codeword map of the with-additional-line encoding: one code per output
/// pattern.
pub type CodewordMap = BTreeMap<Cube, Cube>;

/// Codeword map of the without-additional-line encoding: several codes per
/// output pattern (one per power-of-two frequency slice).
pub type CodewordMultiMap = BTreeMap<Cube, Vec<Cube>>;

/// Node of the Huffman tree. Leaves carry an output pattern; internal
/// nodes carry an empty cube.
struct HuffmanNode {
    freq: usize,
    data: Cube,
    left: Option<Box<HuffmanNode>>,
    right: Option<Box<HuffmanNode>>,
}

impl HuffmanNode {
    fn leaf(data: Cube, freq: usize) -> Self {
        Self {
            freq,
            data,
            left: None,
            right: None,
        }
    }

    /// Walk the tree, reporting each leaf with its root path (0 = left,
    /// 1 = right).
    fn traverse<F: FnMut(&Cube, Cube)>(&self, code: Cube, f: &mut F) {
        if !self.data.is_empty() {
            f(&self.data, code);
            return;
        }
        if let Some(left) = &self.left {
            left.traverse(code.clone().append_zero(), f);
        }
        if let Some(right) = &self.right {
            right.traverse(code.append_one(), f);
        }
    }
}

impl PartialEq for HuffmanNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HuffmanNode {}

impl PartialOrd for HuffmanNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HuffmanNode {
    /// Min-ordering key: weight, then leaves before internal nodes, then
    /// pattern. Leaf-before-internal is what hands equal-weight leaves the
    /// shorter codes.
    fn cmp(&self, other: &Self) -> Ordering {
        self.freq
            .cmp(&other.freq)
            .then_with(|| self.data.is_empty().cmp(&other.data.is_empty()))
            .then_with(|| self.data.cmp(&other.data))
    }
}

fn ceil_log2(n: usize) -> usize {
    (n as f64).log2().ceil() as usize
}

/// Build the Huffman tree over `(pattern, frequency)` leaves with leaf
/// weight ⌈log₂ freq⌉ and parent weight `max(children) + 1`.
fn huffman_tree(leaves: Vec<(Cube, usize)>) -> HuffmanNode {
    let mut heap: BinaryHeap<std::cmp::Reverse<HuffmanNode>> = leaves
        .into_iter()
        .map(|(data, freq)| std::cmp::Reverse(HuffmanNode::leaf(data, ceil_log2(freq))))
        .collect();

    while heap.len() > 1 {
        let left = heap.pop().expect("len > 1").0;
        let right = heap.pop().expect("len > 1").0;
        let parent = HuffmanNode {
            freq: left.freq.max(right.freq) + 1,
            data: Cube::new(),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        };
        heap.push(std::cmp::Reverse(parent));
    }
    heap.pop().expect("at least one leaf").0
}

/// Fill the redundant don't-care positions of each codeword from the
/// pattern it encodes, and mark the non-primary output lines as garbage.
fn finish_codewords<'a>(
    tt: &mut TruthTable,
    codes: impl Iterator<Item = (&'a Cube, &'a mut Cube)>,
    required_garbage: usize,
) {
    let additional = tt.minimum_additional_lines();
    let n_bits = tt.n_inputs().max(tt.n_outputs() + additional);
    let r = n_bits - required_garbage;
    let n_primary = tt.n_primary_outputs();

    tt.garbage_mut().resize(required_garbage, false);
    let garbage_bits = n_bits - n_primary;
    debug_assert!(garbage_bits <= required_garbage);
    for i in 0..garbage_bits {
        tt.set_garbage(i);
    }

    for (pattern, code) in codes {
        let mut out_cube = pattern.clone();
        out_cube.resize(n_bits);

        let filled: Cube = (0..required_garbage)
            .map(|i| match code.0[i] {
                Some(bit) => Some(bit),
                None => out_cube.0[r + i],
            })
            .collect();
        *code = filled;
    }
}

/// Encode the outputs with one Huffman code per pattern, assuming an
/// additional line may be spent.
///
/// Returns the pattern → codeword map for the decoder stage; empty when the
/// table is already reversible.
pub fn encode_with_additional_line(tt: &mut TruthTable) -> CodewordMap {
    let mut output_freq: BTreeMap<Cube, usize> = BTreeMap::new();
    for (_, output) in tt.iter() {
        *output_freq.entry(output.clone()).or_insert(0) += 1;
    }

    if output_freq.len() == tt.size() {
        return CodewordMap::new();
    }

    let top = huffman_tree(output_freq.into_iter().collect());
    let required_garbage = top.freq;

    let mut encoding = CodewordMap::new();
    top.traverse(Cube::new(), &mut |pattern, code| {
        let mut code = code;
        code.resize(required_garbage);
        encoding.insert(pattern.clone(), code);
    });

    finish_codewords(
        tt,
        encoding.iter_mut().map(|(k, v)| (k, v)),
        required_garbage,
    );

    debug!(codewords = encoding.len(), width = required_garbage, "encoded outputs");

    let lookup = encoding.clone();
    for (_, output) in tt.iter_mut() {
        *output = lookup[output].clone();
    }

    encoding
}

/// Encode the outputs without spending an additional line: frequencies are
/// first split into powers of two, and the codes of each split slice are
/// handed out round-robin across the pattern's occurrences.
pub fn encode_without_additional_line(tt: &mut TruthTable) -> CodewordMultiMap {
    let mut output_freq: BTreeMap<Cube, usize> = BTreeMap::new();
    for (_, output) in tt.iter() {
        *output_freq.entry(output.clone()).or_insert(0) += 1;
    }

    // split every frequency into powers of two
    let mut leaves: Vec<(Cube, usize)> = Vec::new();
    for (pattern, &freq) in &output_freq {
        if freq & (freq - 1) == 0 {
            leaves.push((pattern.clone(), freq));
            continue;
        }
        for bit in 0..usize::BITS {
            if (freq >> bit) & 1 == 1 {
                leaves.push((pattern.clone(), 1 << bit));
            }
        }
    }

    if leaves.len() == tt.size() {
        return CodewordMultiMap::new();
    }

    let top = huffman_tree(leaves);
    let required_garbage = top.freq;

    let mut encoding = CodewordMultiMap::new();
    top.traverse(Cube::new(), &mut |pattern, code| {
        encoding.entry(pattern.clone()).or_default().push(code);
    });

    // per-pattern stacks of (replicated) codes, before don't-care filling
    let mut code_stacks: BTreeMap<Cube, Vec<Cube>> = BTreeMap::new();
    for (pattern, codes) in &mut encoding {
        for code in codes {
            let copies = 1usize << (required_garbage - code.len());
            code.resize(required_garbage);
            for _ in 0..copies {
                code_stacks.entry(pattern.clone()).or_default().push(code.clone());
            }
        }
    }

    finish_codewords(
        tt,
        encoding
            .iter_mut()
            .flat_map(|(k, v)| v.iter_mut().map(move |c| (k, c))),
        required_garbage,
    );

    for (_, output) in tt.iter_mut() {
        let stack = code_stacks.get_mut(output).expect("every output has codes");
        *output = stack.pop().expect("stack sized to the frequency");
    }

    encoding
}

/// Widen the table to `n_bits`: constants are prepended on the most
/// significant side by default, or appended as zeros on the least
/// significant side when `append_zeros` is set. Constant and garbage
/// column flags track the added lines.
pub fn augment_with_constants(tt: &mut TruthTable, n_bits: usize, append_zeros: bool) {
    let out_add = n_bits.saturating_sub(tt.n_outputs());
    let in_add = n_bits.saturating_sub(tt.n_inputs());

    for _ in 0..out_add {
        if tt.garbage().len() >= n_bits {
            break;
        }
        if append_zeros {
            tt.garbage_mut().insert(0, true);
        } else {
            let len = tt.garbage().len();
            tt.garbage_mut().resize(len + 1, false);
        }
    }
    for _ in 0..in_add {
        if tt.constants().len() >= n_bits {
            break;
        }
        if append_zeros {
            tt.constants_mut().insert(0, true);
        } else {
            tt.constants_mut().push(true);
        }
    }

    tt.rebuild(|mut input, mut output| {
        for _ in 0..out_add {
            if append_zeros {
                output = output.append_zero();
            } else {
                output.insert_zero();
            }
        }
        if input.len() < output.len() {
            let add = output.len() - input.len();
            for _ in 0..add {
                if append_zeros {
                    input = input.append_zero();
                } else {
                    input.insert_zero();
                }
            }
        }
        (input, output)
    });
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
    fn test_reversible_table_is_left_alone() {
        let mut tt = TruthTable::new();
        for v in 0..4u64 {
            tt.insert(Cube::from_integer(v, 2), Cube::from_integer(v, 2));
        }
        let before = tt.clone();
        let codes = encode_with_additional_line(&mut tt);
        assert!(codes.is_empty());
        assert_eq!(tt, before);
    }

    #[test]
    fn test_encoding_with_repeated_outputs() {
        // frequencies 00:2, 01:1, 10:1 -> codes 0-, 10, 11
        let mut tt = TruthTable::new();
        tt.insert(cube("00"), cube("00"));
        tt.insert(cube("01"), cube("01"));
        tt.insert(cube("10"), cube("10"));
        tt.insert(cube("11"), cube("00"));

        let codes = encode_with_additional_line(&mut tt);

        assert_eq!(tt.n_outputs(), 2);
        assert!(tt.find(0b00, 2).unwrap().1.matches_integer(0b00, 2));
        assert!(tt.find(0b11, 2).unwrap().1.matches_integer(0b00, 2));
        assert!(tt.find(0b01, 2).unwrap().1.matches("1-"));
        assert!(tt.find(0b10, 2).unwrap().1.matches("1-"));

        // repeated pattern gets the short code
        assert!(codes[&cube("00")].matches("0-"));
        assert_eq!(codes[&cube("01")].len(), 2);
        assert_eq!(codes[&cube("10")].len(), 2);
        assert_ne!(codes[&cube("01")], codes[&cube("10")]);

        // the code's don't-care position became a garbage output
        assert_eq!(tt.garbage(), &[true, false]);
    }

    #[test]
    fn test_encoding_grows_outputs_when_needed() {
        // one pattern appearing three times needs two garbage bits
        let mut tt = TruthTable::new();
        tt.insert(cube("00"), cube("00"));
        tt.insert(cube("01"), cube("11"));
        tt.insert(cube("10"), cube("11"));
        tt.insert(cube("11"), cube("11"));

        encode_with_additional_line(&mut tt);

        assert_eq!(tt.n_outputs(), 3);
        assert!(tt.find(0b00, 2).unwrap().1.matches("0--"));
        for v in [0b01, 0b10, 0b11] {
            assert!(tt.find(v, 2).unwrap().1.matches("1--"));
        }
    }

    #[test]
    fn test_encoding_without_additional_line_splits_frequencies() {
        // frequency 3 splits into 2 + 1; the three occurrences share codes
        // under the same leading bit
        let mut tt = TruthTable::new();
        tt.insert(cube("00"), cube("00"));
        tt.insert(cube("01"), cube("11"));
        tt.insert(cube("10"), cube("11"));
        tt.insert(cube("11"), cube("11"));

        let codes = encode_without_additional_line(&mut tt);

        // the split pattern owns one short and one full-length code
        assert_eq!(codes[&cube("11")].len(), 2);
        assert_eq!(codes[&cube("00")].len(), 1);

        // output width is unchanged and every occurrence of the repeated
        // pattern received a code from its own bucket
        assert_eq!(tt.n_outputs(), 2);
        let outputs: Vec<String> = tt.iter().map(|(_, o)| o.to_string()).collect();
        assert_eq!(outputs.iter().filter(|o| o.starts_with('0')).count(), 2);
        assert_eq!(outputs[0], "10");
    }

    #[test]
    fn test_augment_prepends_constants() {
        let mut tt = TruthTable::new();
        tt.insert(cube("00"), cube("0--"));
        tt.insert(cube("01"), cube("1--"));
        augment_with_constants(&mut tt, 4, false);

        assert_eq!(tt.n_inputs(), 4);
        assert_eq!(tt.n_outputs(), 4);
        assert!(tt.find(0b0000, 4).is_some());
        assert!(tt.find(0b0001, 4).is_some());
        // two added input columns on the MSB side
        assert_eq!(tt.constants(), &[true, true]);
    }

    #[test]
    fn test_augment_appends_zeros() {
        let mut tt = TruthTable::new();
        tt.insert(cube("0"), cube("1"));
        augment_with_constants(&mut tt, 2, true);

        let (input, output) = tt.iter().next().unwrap();
        assert!(input.matches("00"));
        assert!(output.matches("10"));
        assert_eq!(tt.garbage(), &[true]);
        assert_eq!(tt.constants(), &[true]);
    }
}
