//! Property tests over the public API: permutation, orderedness,
//! stability, idempotence, comparator-independence — the universal
//! properties any driftsort-family engine must hold regardless of input
//! shape. Grounded on `proptest`'s use elsewhere in the pack for sort-like
//! crates and `examples/original_source/tests/utils.hpp`'s
//! `ElementWithSrc` (value/original-index pairing) for the stability check.

use proptest::collection::vec;
use proptest::prelude::*;

fn is_multiset_permutation(before: &[i32], after: &[i32]) -> bool {
  let mut a = before.to_vec();
  let mut b = after.to_vec();
  a.sort();
  b.sort();
  a == b
}

proptest! {
  #[test]
  fn sort_produces_a_permutation(mut v in vec(any::<i32>(), 0..500)) {
    let before = v.clone();
    driftsort::sort(&mut v);
    prop_assert!(is_multiset_permutation(&before, &v));
  }

  #[test]
  fn sort_produces_ascending_order(mut v in vec(any::<i32>(), 0..500)) {
    driftsort::sort(&mut v);
    prop_assert!(v.windows(2).all(|w| w[0] <= w[1]));
  }

  #[test]
  fn sort_is_idempotent(mut v in vec(any::<i32>(), 0..500)) {
    driftsort::sort(&mut v);
    let once = v.clone();
    driftsort::sort(&mut v);
    prop_assert_eq!(v, once);
  }

  /// Tag every element with its original index, sort by value only, and
  /// check that equal-valued elements keep their relative index order.
  #[test]
  fn sort_by_key_is_stable(v in vec(0i32..8, 0..500)) {
    let mut tagged: Vec<(i32, usize)> = v.into_iter().enumerate().map(|(i, x)| (x, i)).collect();
    driftsort::sort_by_key(&mut tagged, |&(x, _)| x);
    for pair in tagged.windows(2) {
      let (a, b) = (pair[0], pair[1]);
      prop_assert!(a.0 < b.0 || (a.0 == b.0 && a.1 < b.1));
    }
  }

  /// A comparator equivalent to `Ord::cmp` but expressed differently
  /// (via explicit `Ordering` construction) must agree with `sort`'s
  /// built-in `Ord` path on the same input.
  #[test]
  fn sort_by_agrees_with_sort_for_equivalent_comparator(mut v in vec(any::<i32>(), 0..500)) {
    let mut via_sort_by = v.clone();
    driftsort::sort_by(&mut via_sort_by, |a, b| a.cmp(b));
    driftsort::sort(&mut v);
    prop_assert_eq!(v, via_sort_by);
  }

  /// Sorting with a reversed comparator yields non-increasing order and
  /// the same multiset as the forward sort.
  #[test]
  fn reversed_comparator_yields_non_increasing_order(mut v in vec(any::<i32>(), 0..500)) {
    let before = v.clone();
    driftsort::sort_by(&mut v, |a, b| b.cmp(a));
    prop_assert!(v.windows(2).all(|w| w[0] >= w[1]));
    prop_assert!(is_multiset_permutation(&before, &v));
  }

  /// Strict-weak-order invariance: a comparator expressed directly via
  /// `<` and one logically rewritten via `!(... > ...)` are equivalent for
  /// a total order, and must sort to the same output.
  #[test]
  fn comparator_rewritten_via_negated_swap_agrees(mut v in vec(any::<i32>(), 0..500)) {
    let mut via_lt = v.clone();
    driftsort::sort_by(&mut via_lt, |a, b| a.cmp(b));
    driftsort::sort_by(&mut v, |a, b| {
      if a == b {
        core::cmp::Ordering::Equal
      } else if !(a > b) {
        core::cmp::Ordering::Less
      } else {
        core::cmp::Ordering::Greater
      }
    });
    prop_assert_eq!(v, via_lt);
  }
}

/// Scenario 8 from SPEC_FULL §8: a large randomized input sorts correctly.
/// Kept outside the `proptest!` macro since it's a single fixed-size case,
/// not a generated property.
#[test]
fn sorts_a_million_random_integers() {
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};

  let mut rng = StdRng::seed_from_u64(0x1000000);
  let mut data: Vec<i32> = (0..1_000_000).map(|_| rng.gen()).collect();
  let mut expected = data.clone();
  expected.sort();
  driftsort::sort(&mut data);
  assert_eq!(data, expected);
}
