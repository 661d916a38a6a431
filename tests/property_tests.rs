//! Property-based tests for the mask generator using proptest.

use enmascarar::masks::{MaskGenerator, OrderingMode};
use enmascarar::primitives::Matrix;
use proptest::prelude::*;

fn bool_matmul(a: &Matrix<bool>, b: &Matrix<bool>) -> Matrix<bool> {
    Matrix::from_fn(a.n_rows(), b.n_cols(), |i, j| {
        (0..a.n_cols()).any(|k| a.get(i, k) && b.get(k, j))
    })
}

fn arbitrary_mode() -> impl Strategy<Value = OrderingMode> {
    prop_oneof![Just(OrderingMode::Natural), Just(OrderingMode::Random)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn generation_is_deterministic(
        nin in 2usize..16,
        hidden in proptest::collection::vec(1usize..10, 0..3),
        seed in any::<u64>(),
        mode in arbitrary_mode(),
    ) {
        let a = MaskGenerator::new(nin, hidden.clone())
            .with_seed(seed)
            .with_ordering(mode)
            .generate()
            .expect("valid arguments");
        let b = MaskGenerator::new(nin, hidden)
            .with_seed(seed)
            .with_ordering(mode)
            .generate()
            .expect("valid arguments");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn shapes_chain_through_the_network(
        nin in 2usize..16,
        hidden in proptest::collection::vec(1usize..10, 0..3),
        seed in any::<u64>(),
        mode in arbitrary_mode(),
    ) {
        let masks = MaskGenerator::new(nin, hidden.clone())
            .with_seed(seed)
            .with_ordering(mode)
            .generate()
            .expect("valid arguments");

        prop_assert_eq!(masks.len(), hidden.len() + 1);
        let mut widths = vec![nin];
        widths.extend_from_slice(&hidden);
        widths.push(nin);
        for l in 0..masks.len() {
            prop_assert_eq!(masks.mask(l).shape(), (widths[l], widths[l + 1]));
        }
    }

    #[test]
    fn reachability_respects_the_ordering(
        nin in 2usize..12,
        hidden in proptest::collection::vec(1usize..10, 0..3),
        seed in any::<u64>(),
        mode in arbitrary_mode(),
    ) {
        let masks = MaskGenerator::new(nin, hidden)
            .with_seed(seed)
            .with_ordering(mode)
            .generate()
            .expect("valid arguments");

        // Compose every mask: reach[i][j] = some path from input i to
        // output j survives the masking.
        let mut reach = masks.mask(0).clone();
        for l in 1..masks.len() {
            reach = bool_matmul(&reach, masks.mask(l));
        }

        let ordering = masks.ordering();
        for i in 0..nin {
            for j in 0..nin {
                if reach.get(i, j) {
                    prop_assert!(
                        ordering[i] < ordering[j],
                        "path from input {} (rank {}) to output {} (rank {})",
                        i, ordering[i], j, ordering[j]
                    );
                }
            }
        }
    }

    #[test]
    fn natural_ordering_is_identity(
        nin in 2usize..16,
        seed in any::<u64>(),
    ) {
        let masks = MaskGenerator::new(nin, vec![4])
            .with_seed(seed)
            .with_ordering(OrderingMode::Natural)
            .generate()
            .expect("valid arguments");
        let identity: Vec<usize> = (0..nin).collect();
        prop_assert_eq!(masks.ordering(), identity.as_slice());
    }

    #[test]
    fn minimum_rank_output_column_is_empty(
        nin in 2usize..12,
        hidden in proptest::collection::vec(1usize..10, 1..3),
        seed in any::<u64>(),
        mode in arbitrary_mode(),
    ) {
        let masks = MaskGenerator::new(nin, hidden)
            .with_seed(seed)
            .with_ordering(mode)
            .generate()
            .expect("valid arguments");
        let out = masks.mask(masks.len() - 1);
        let j0 = masks
            .ordering()
            .iter()
            .position(|&rank| rank == 0)
            .expect("ordering is a permutation");
        for i in 0..out.n_rows() {
            prop_assert!(!out.get(i, j0));
        }
    }
}
