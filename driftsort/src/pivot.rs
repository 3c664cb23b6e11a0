//! Pivot selection: median-of-3 and the recursive pseudo-median sampling
//! strategy borrowed from glidesort, grounded in
//! `examples/original_source/include/driftsort/pivot.h` and generalized
//! from the teacher's `const_sort_core.rs::choose_pivot` structure (which
//! samples and sorts in place rather than purely selecting, since that one
//! also needs to detect already-sorted input; this stable engine separates
//! that concern out to `crate::drift`'s run discovery).

use crate::blob::Blob;
use crate::comparator::Comparator;

/// Above this sample size, `choose_pivot` recurses into thirds instead of
/// sampling directly.
const PSEUDO_MEDIAN_REC_THRESHOLD: usize = 64;

/// Returns whichever of `a`, `b`, `c` is the median, as judged by `comp`.
fn median_of_3<F>(a: Blob, b: Blob, c: Blob, comp: &mut Comparator<F>) -> Blob
where
  F: FnMut(Blob, Blob) -> bool,
{
  let x = comp.less(a, b);
  let y = comp.less(a, c);
  if x == y {
    // If x=y=false then b,c <= a: want max(b,c). If x=y=true then a<b,c:
    // want min(b,c). XOR-ing the b<c outcome with x selects the right one.
    let z = comp.less(b, c);
    if z ^ x {
      c
    } else {
      b
    }
  } else {
    // Either c <= a < b or b <= a < c, so a is the median.
    a
  }
}

/// Approximates the median of 3 regions of `n` elements each, starting at
/// `a`, `b`, `c`, recursing into thirds of each region when `n` is large
/// enough to keep the total sample at O(n^0.528) — an approximate median of
/// sqrt(n) with good pivot quality and logarithmic recursion depth.
fn recursive_median_of_3<F>(a: Blob, b: Blob, c: Blob, n: usize, comp: &mut Comparator<F>) -> Blob
where
  F: FnMut(Blob, Blob) -> bool,
{
  if n * 8 >= PSEUDO_MEDIAN_REC_THRESHOLD {
    let n8 = n / 8;
    let a = recursive_median_of_3(a, a.offset((n8 * 4) as isize), a.offset((n8 * 7) as isize), n8, comp);
    let b = recursive_median_of_3(b, b.offset((n8 * 4) as isize), b.offset((n8 * 7) as isize), n8, comp);
    let c = recursive_median_of_3(c, c.offset((n8 * 4) as isize), c.offset((n8 * 7) as isize), n8, comp);
    median_of_3(a, b, c, comp)
  } else {
    median_of_3(a, b, c, comp)
  }
}

/// Selects a pivot index into `v[0..length)`, sampling an amount that
/// scales with `length` to approximate a median of sqrt(length).
pub(crate) fn choose_pivot<F>(v: Blob, length: usize, comp: &mut Comparator<F>) -> usize
where
  F: FnMut(Blob, Blob) -> bool,
{
  let length_div_8 = length / 8;
  let a = v;
  let b = v.offset((length_div_8 * 4) as isize);
  let c = v.offset((length_div_8 * 7) as isize);

  let median = if length < PSEUDO_MEDIAN_REC_THRESHOLD {
    median_of_3(a, b, c, comp)
  } else {
    recursive_median_of_3(a, b, c, length_div_8, comp)
  };

  // `median` is always one of the offsets taken from `v`, so this pointer
  // difference (in elements) is a valid index into `v`.
  ((median.as_ptr() as isize - v.as_ptr() as isize) / v.element_size() as isize) as usize
}

#[cfg(test)]
mod test {
  use super::*;

  fn less_i32(a: Blob, b: Blob) -> bool {
    unsafe { *a.as_ptr().cast::<i32>() < *b.as_ptr().cast::<i32>() }
  }

  #[test]
  fn choose_pivot_below_threshold_is_a_valid_index() {
    let mut comp = Comparator::new(4, 4, less_i32);
    let mut data: alloc::vec::Vec<i32> = (0..40i32).rev().collect();
    let v = Blob::new(4, data.as_mut_ptr().cast());
    let idx = choose_pivot(v, data.len(), &mut comp);
    assert!(idx < data.len());
  }

  #[test]
  fn choose_pivot_above_threshold_is_a_valid_index() {
    let mut comp = Comparator::new(4, 4, less_i32);
    let mut data: alloc::vec::Vec<i32> = (0..10_000i32).rev().collect();
    let v = Blob::new(4, data.as_mut_ptr().cast());
    let idx = choose_pivot(v, data.len(), &mut comp);
    assert!(idx < data.len());
  }
}
