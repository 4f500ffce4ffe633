mod compress;
mod domain_tree;
mod error;
mod fast_set;
mod naive;
mod segment_tree;
mod sortable;

pub mod policy;
pub mod traits;

pub use compress::KeyCompressor;
pub use error::{Result, SortableError};
pub use fast_set::FastSet;
pub use naive::NaiveSequence;
pub use policy::{Affine, AffineComposite, Coefficient, Monoid, RangeSum};
pub use segment_tree::SegmentTree;
pub use sortable::{SortableSegmentTree, required_capacity};
pub use traits::RangeSortFold;

#[cfg(test)]
mod tests {
    use super::*;
    use modint::ModInt998;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    type Mono = AffineComposite<ModInt998>;
    type F = Affine<ModInt998>;

    fn affine(a: u64, b: u64) -> F {
        Affine::new(ModInt998::new(a), ModInt998::new(b))
    }

    fn random_affine(rng: &mut StdRng) -> F {
        affine(rng.random_range(0..998_244_353), rng.random_range(0..998_244_353))
    }

    fn distinct_keys(rng: &mut StdRng, key_max: usize, n: usize) -> Vec<usize> {
        let mut keys: Vec<usize> = (0..key_max).collect();
        keys.shuffle(rng);
        keys.truncate(n);
        keys
    }

    fn random_range(rng: &mut StdRng, n: usize) -> std::ops::Range<usize> {
        let l = rng.random_range(0..=n);
        let r = rng.random_range(l..=n);
        l..r
    }

    fn fold(items: &[(usize, F)]) -> F {
        items.iter().fold(Mono::unit(), |acc, (_, f)| Mono::op(&acc, f))
    }

    #[test]
    fn sort_set_and_eval_scenario() {
        let keys = [5, 1, 9];
        let values = vec![F::identity(); 3];
        let mut seq = SortableSegmentTree::<Mono>::new(10, &keys, values).unwrap();

        seq.sort_inc(0..3).unwrap();
        let sorted: Vec<usize> = seq.to_vec().into_iter().map(|(k, _)| k).collect();
        assert_eq!(sorted, vec![1, 5, 9]);

        seq.set(1, 7, affine(2, 3)).unwrap();
        let f = seq.prod(0..3).unwrap();
        let expected = Mono::op(&Mono::op(&F::identity(), &affine(2, 3)), &F::identity());
        assert_eq!(f, expected);
        assert_eq!(
            SortableSegmentTree::<Mono>::eval(&f, ModInt998::new(1)),
            ModInt998::new(5)
        );
        assert_eq!(seq.get(1).unwrap(), (7, affine(2, 3)));
        assert_eq!(seq.prod_all(), expected);
    }

    #[test]
    fn composition_follows_position_order() {
        // x -> 2x, then x -> x + 1 gives 2x + 1; the other order gives 2x + 2.
        let keys = [0, 1];
        let values = vec![affine(2, 0), affine(1, 1)];
        let mut seq = SortableSegmentTree::<Mono>::new(2, &keys, values).unwrap();
        let f = seq.prod(0..2).unwrap();
        assert_eq!(f.apply(ModInt998::new(10)), ModInt998::new(21));

        seq.sort_dec(0..2).unwrap();
        let f = seq.prod(0..2).unwrap();
        assert_eq!(f.apply(ModInt998::new(10)), ModInt998::new(22));
        assert_eq!(seq.get(0).unwrap(), (1, affine(1, 1)));
        assert_eq!(seq.get(1).unwrap(), (0, affine(2, 0)));
    }

    #[test]
    fn empty_ranges_and_singletons_are_noops() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 8;
        let keys = distinct_keys(&mut rng, 32, n);
        let values: Vec<F> = (0..n).map(|_| random_affine(&mut rng)).collect();
        let mut seq = SortableSegmentTree::<Mono>::new(32, &keys, values).unwrap();
        let before = seq.to_vec();

        for i in 0..=n {
            assert_eq!(seq.prod(i..i).unwrap(), Mono::unit());
            seq.sort_inc(i..i).unwrap();
            seq.sort_dec(i..i).unwrap();
        }
        for i in 0..n {
            seq.sort_inc(i..i + 1).unwrap();
            seq.sort_dec(i..i + 1).unwrap();
        }
        assert_eq!(seq.to_vec(), before);
    }

    #[test]
    fn empty_sequence() {
        let mut seq = SortableSegmentTree::<Mono>::new(0, &[], Vec::new()).unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.prod(0..0).unwrap(), Mono::unit());
        assert_eq!(seq.prod_all(), Mono::unit());
        seq.sort_inc(0..0).unwrap();
        assert!(seq.to_vec().is_empty());
        assert_eq!(
            seq.set(0, 0, Mono::unit()),
            Err(SortableError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn contract_violations_are_reported() {
        let keys = [3, 0, 2];
        let values = vec![affine(1, 1), affine(2, 2), affine(3, 3)];

        assert_eq!(
            SortableSegmentTree::<Mono>::new(4, &keys, values[..2].to_vec()).unwrap_err(),
            SortableError::LengthMismatch { keys: 3, values: 2 }
        );
        assert_eq!(
            SortableSegmentTree::<Mono>::new(3, &keys, values.clone()).unwrap_err(),
            SortableError::KeyOutOfRange { key: 3, key_max: 3 }
        );
        assert_eq!(
            SortableSegmentTree::<Mono>::new(4, &[1, 2, 1], values.clone()).unwrap_err(),
            SortableError::DuplicateKey { key: 1 }
        );
        let required = required_capacity(3, 4);
        assert_eq!(
            SortableSegmentTree::<Mono>::with_capacity(4, &keys, values.clone(), required - 1)
                .unwrap_err(),
            SortableError::CapacityTooSmall {
                capacity: required - 1,
                required
            }
        );

        let mut seq = SortableSegmentTree::<Mono>::new(4, &keys, values).unwrap();
        seq.sort_inc(0..3).unwrap();
        let before = seq.to_vec();

        assert_eq!(
            seq.set(1, 4, affine(5, 5)),
            Err(SortableError::KeyOutOfRange { key: 4, key_max: 4 })
        );
        assert_eq!(
            seq.set(0, 3, affine(5, 5)),
            Err(SortableError::DuplicateKey { key: 3 })
        );
        assert_eq!(
            seq.set(3, 1, affine(5, 5)),
            Err(SortableError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            seq.get(3),
            Err(SortableError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            seq.prod(2..1),
            Err(SortableError::InvalidRange {
                start: 2,
                end: 1,
                len: 3
            })
        );
        assert_eq!(
            seq.sort_dec(0..4),
            Err(SortableError::InvalidRange {
                start: 0,
                end: 4,
                len: 3
            })
        );
        assert_eq!(seq.to_vec(), before);

        // Reusing a position's own key, or a key freed by an earlier set, is fine.
        seq.set(2, 3, affine(6, 6)).unwrap();
        seq.set(0, 1, affine(7, 7)).unwrap();
        seq.set(1, 0, affine(8, 8)).unwrap();
        assert_eq!(
            seq.to_vec(),
            vec![(1, affine(7, 7)), (0, affine(8, 8)), (3, affine(6, 6))]
        );
    }

    #[test]
    fn sort_moves_values_with_keys() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        let n = 200;
        let key_max = 1000;
        let keys = distinct_keys(&mut rng, key_max, n);
        let values: Vec<F> = (0..n).map(|_| random_affine(&mut rng)).collect();
        let pairs: std::collections::HashMap<usize, F> =
            keys.iter().copied().zip(values.iter().copied()).collect();
        let mut seq = SortableSegmentTree::<Mono>::new(key_max, &keys, values).unwrap();

        for round in 0..100 {
            let range = random_range(&mut rng, n);
            if round % 2 == 0 {
                seq.sort_inc(range.clone()).unwrap();
            } else {
                seq.sort_dec(range.clone()).unwrap();
            }
            let items = seq.to_vec();
            for w in items[range.clone()].windows(2) {
                if round % 2 == 0 {
                    assert!(w[0].0 < w[1].0);
                } else {
                    assert!(w[0].0 > w[1].0);
                }
            }
            for (key, value) in &items {
                assert_eq!(pairs[key], *value);
            }
        }
    }

    #[test]
    fn resorting_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 40;
        let keys = distinct_keys(&mut rng, 100, n);
        let values: Vec<F> = (0..n).map(|_| random_affine(&mut rng)).collect();
        let mut seq = SortableSegmentTree::<Mono>::new(100, &keys, values).unwrap();

        for _ in 0..20 {
            let range = random_range(&mut rng, n);
            let descending = rng.random_bool(0.5);
            let sort = |seq: &mut SortableSegmentTree<Mono>| {
                if descending {
                    seq.sort_dec(range.clone()).unwrap();
                } else {
                    seq.sort_inc(range.clone()).unwrap();
                }
            };
            sort(&mut seq);
            let once: Vec<F> = (0..=n)
                .flat_map(|l| (l..=n).map(move |r| (l, r)))
                .map(|(l, r)| seq.prod(l..r).unwrap())
                .collect();
            sort(&mut seq);
            let twice: Vec<F> = (0..=n)
                .flat_map(|l| (l..=n).map(move |r| (l, r)))
                .map(|(l, r)| seq.prod(l..r).unwrap())
                .collect();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn descending_then_ascending_equals_ascending() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 64;
        let keys = distinct_keys(&mut rng, 256, n);
        let values: Vec<F> = (0..n).map(|_| random_affine(&mut rng)).collect();

        for _ in 0..20 {
            let range = random_range(&mut rng, n);
            let mut flipped =
                SortableSegmentTree::<Mono>::new(256, &keys, values.clone()).unwrap();
            let mut direct = SortableSegmentTree::<Mono>::new(256, &keys, values.clone()).unwrap();
            flipped.sort_dec(range.clone()).unwrap();
            flipped.sort_inc(range.clone()).unwrap();
            direct.sort_inc(range.clone()).unwrap();
            assert_eq!(flipped.to_vec(), direct.to_vec());
            assert_eq!(flipped.prod(0..n).unwrap(), direct.prod(0..n).unwrap());
        }
    }

    fn run_against_naive<M, R>(
        rng: &mut StdRng,
        mut seq: SortableSegmentTree<M>,
        mut naive: NaiveSequence<M>,
        ops: usize,
        mut random_value: R,
    ) -> SortableSegmentTree<M>
    where
        M: Monoid,
        M::Value: PartialEq + std::fmt::Debug,
        R: FnMut(&mut StdRng) -> M::Value,
    {
        let n = seq.len();
        let key_max = seq.key_max();
        for _ in 0..ops {
            match rng.random_range(0..5) {
                0 if n > 0 => {
                    let i = rng.random_range(0..n);
                    let key = rng.random_range(0..key_max);
                    let value = random_value(rng);
                    assert_eq!(seq.set(i, key, value.clone()), naive.set(i, key, value));
                }
                1 => {
                    let range = random_range(rng, n);
                    assert_eq!(seq.prod(range.clone()), naive.prod(range));
                }
                2 => {
                    let range = random_range(rng, n);
                    seq.sort_inc(range.clone()).unwrap();
                    naive.sort_inc(range).unwrap();
                }
                3 => {
                    let range = random_range(rng, n);
                    seq.sort_dec(range.clone()).unwrap();
                    naive.sort_dec(range).unwrap();
                }
                _ if n > 0 => {
                    let i = rng.random_range(0..n);
                    assert_eq!(seq.get(i), naive.get(i));
                }
                _ => {}
            }
            assert_eq!(seq.prod_all(), naive.prod_all());
            assert!(seq.nodes_in_use() <= seq.node_capacity());
        }
        assert_eq!(seq.to_vec(), naive.to_vec());
        seq
    }

    #[test]
    fn random_operations_match_naive() {
        let mut rng = StdRng::seed_from_u64(0xDEAD_BEEF_CAFE_BABE);
        for &(n, key_max) in &[(1, 1), (2, 2), (5, 8), (17, 40), (64, 64), (100, 1 << 12)] {
            let keys = distinct_keys(&mut rng, key_max, n);
            let values: Vec<F> = (0..n).map(|_| random_affine(&mut rng)).collect();
            let seq = SortableSegmentTree::<Mono>::new(key_max, &keys, values.clone()).unwrap();
            let naive = NaiveSequence::<Mono>::new(key_max, &keys, values).unwrap();
            run_against_naive(&mut rng, seq, naive, 2000, random_affine);
        }
    }

    #[test]
    fn rebuild_is_transparent() {
        let mut rng = StdRng::seed_from_u64(0x5EED_BB57);
        let n = 50;
        let key_max = 500;
        let keys = distinct_keys(&mut rng, key_max, n);
        let values: Vec<F> = (0..n).map(|_| random_affine(&mut rng)).collect();
        let capacity = required_capacity(n, key_max);
        let seq =
            SortableSegmentTree::<Mono>::with_capacity(key_max, &keys, values.clone(), capacity)
                .unwrap();
        let naive = NaiveSequence::<Mono>::new(key_max, &keys, values).unwrap();
        let seq = run_against_naive(&mut rng, seq, naive, 5000, random_affine);
        assert!(seq.rebuild_count() > 0);
    }

    #[test]
    fn explicit_rebuild_keeps_contents() {
        let mut rng = StdRng::seed_from_u64(9);
        let n = 30;
        let keys = distinct_keys(&mut rng, 64, n);
        let values: Vec<F> = (0..n).map(|_| random_affine(&mut rng)).collect();
        let mut seq = SortableSegmentTree::<Mono>::new(64, &keys, values).unwrap();
        seq.sort_dec(3..25).unwrap();
        seq.sort_inc(10..30).unwrap();
        seq.prod(7..13).unwrap();

        let before = seq.to_vec();
        let grown = seq.nodes_in_use();
        seq.rebuild();
        assert_eq!(seq.rebuild_count(), 1);
        assert!(seq.nodes_in_use() <= grown);
        assert_eq!(seq.to_vec(), before);
        assert_eq!(seq.prod(0..n).unwrap(), fold(&before));
    }

    #[test]
    fn commutative_policy_matches_naive() {
        type Sum = RangeSum<ModInt998>;
        let mut rng = StdRng::seed_from_u64(13);
        let n = 80;
        let key_max = 300;
        let keys = distinct_keys(&mut rng, key_max, n);
        let values: Vec<ModInt998> = (0..n)
            .map(|_| ModInt998::new(rng.random_range(0..1000)))
            .collect();
        let seq = SortableSegmentTree::<Sum>::new(key_max, &keys, values.clone()).unwrap();
        let naive = NaiveSequence::<Sum>::new(key_max, &keys, values).unwrap();
        let mut seq = run_against_naive(&mut rng, seq, naive, 2000, |rng| {
            ModInt998::new(rng.random_range(0..1000))
        });

        let total = seq.prod(0..n).unwrap();
        assert_eq!(
            SortableSegmentTree::<Sum>::eval(&total, ModInt998::new(1)),
            total + ModInt998::new(1)
        );
    }

    #[test]
    fn affine_inverse_undoes_map() {
        let f = affine(3, 7);
        let inv = f.inverse().unwrap();
        assert_eq!(Mono::op(&f, &inv), F::identity());
        assert_eq!(Mono::op(&inv, &f), F::identity());
        assert_eq!(affine(0, 7).inverse(), None);
    }

    #[test]
    fn key_compressor_maps_densely() {
        let comp = KeyCompressor::new([40, -3, 40, 7, 1_000_000_000]);
        assert_eq!(comp.key_max(), 4);
        assert_eq!(comp.index(-3), Some(0));
        assert_eq!(comp.index(7), Some(1));
        assert_eq!(comp.index(40), Some(2));
        assert_eq!(comp.index(1_000_000_000), Some(3));
        assert_eq!(comp.index(8), None);
        assert_eq!(comp.raw(2), Some(40));
        assert_eq!(comp.raw(4), None);
    }

    #[test]
    fn debug_reports_pool_usage() {
        let seq = SortableSegmentTree::<Mono>::new(16, &[4, 2], vec![F::identity(); 2]).unwrap();
        let text = format!("{seq:?}");
        assert!(text.starts_with("SortableSegmentTree"));
        assert!(text.contains("nodes_in_use: 10"));
    }
}
