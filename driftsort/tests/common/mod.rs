//! Shared input-pattern generators for the integration tests in this
//! directory. Grounded on `sort_test_tools/src/tests.rs`'s `patterns`
//! module (named pattern functions taken by length) and
//! `const_sort_rs/src/test.rs`'s `gen_array` (seeded `StdRng` for
//! reproducible "random" input).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lengths exercised by the pattern-based tests, chosen to cross every
/// threshold the engine branches on: below/at/above
/// `MAX_LEN_ALWAYS_INSERTION_SORT` (20), below/at/above `SMALLSORT_THRESHOLD`
/// (32) and its doubling (64), and large enough to exercise the merge tree
/// and scratch allocation's heap arm.
pub const TEST_SIZES: &[usize] = &[0, 1, 2, 3, 8, 16, 20, 21, 32, 33, 64, 65, 127, 256, 1_000, 10_000];

fn rng_for(seed: u64) -> StdRng {
  StdRng::seed_from_u64(seed)
}

pub fn ascending(len: usize) -> Vec<i64> {
  (0..len as i64).collect()
}

pub fn descending(len: usize) -> Vec<i64> {
  (0..len as i64).rev().collect()
}

pub fn all_equal(len: usize) -> Vec<i64> {
  vec![42; len]
}

/// Ascending runs of random length, alternating direction — exercises
/// `find_existing_run`'s ascending/descending branches and the merge tree.
pub fn saw_mixed(len: usize) -> Vec<i64> {
  let mut rng = rng_for(len as u64 ^ 0x5a45);
  let mut out = Vec::with_capacity(len);
  let mut value = 0i64;
  let mut ascending = true;
  while out.len() < len {
    let run_len = rng.gen_range(1..=8).min(len - out.len());
    for _ in 0..run_len {
      out.push(value);
      value += if ascending { 1 } else { -1 };
    }
    ascending = !ascending;
  }
  out
}

pub fn random(len: usize) -> Vec<i64> {
  let mut rng = rng_for(len as u64 ^ 0xbeef);
  (0..len).map(|_| rng.gen_range(i64::MIN..i64::MAX)).collect()
}

/// Random values drawn from a small alphabet, so the sort repeatedly hits
/// duplicate keys and the equal-partition shortcut in `stable_quicksort`.
pub fn random_k_distinct(len: usize, k: i64) -> Vec<i64> {
  let mut rng = rng_for(len as u64 ^ (k as u64) ^ 0xca5e);
  (0..len).map(|_| rng.gen_range(0..k.max(1))).collect()
}
