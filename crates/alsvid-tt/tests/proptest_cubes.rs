//! Property tests for cube arithmetic and table extension.

use alsvid_tt::{Cube, TruthTable};
use proptest::prelude::*;

proptest! {
    #[test]
    fn cube_integer_round_trip(value in 0u64..1024, width in 10usize..16) {
        let cube = Cube::from_integer(value, width);
        prop_assert_eq!(cube.to_integer(), Some(value));
        prop_assert_eq!(cube.len(), width);
    }

    #[test]
    fn complete_cubes_cover_exactly_the_pattern(bits in proptest::collection::vec(0u8..3, 1..8)) {
        let cube: Cube = bits.iter().map(|b| match b {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }).collect();

        let expansions = cube.complete_cubes();
        let dc_count = bits.iter().filter(|&&b| b == 2).count();
        prop_assert_eq!(expansions.len(), 1 << dc_count);

        for concrete in &expansions {
            let value = concrete.to_integer().unwrap();
            prop_assert!(cube.matches_integer(value, bits.len()));
        }
    }

    #[test]
    fn extend_completes_the_table(entries in proptest::collection::vec((0u64..16, 0u64..16), 1..12)) {
        let mut tt = TruthTable::new();
        for (input, output) in entries {
            tt.insert(Cube::from_integer(input, 4), Cube::from_integer(output, 4));
        }
        tt.extend();

        prop_assert_eq!(tt.size(), 16);
        for value in 0..16 {
            let (input, _) = tt.find(value, 4).unwrap();
            prop_assert!(input.is_concrete());
        }
    }
}
