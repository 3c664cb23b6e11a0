//! The branchless, scratch-based stable partition: the core primitive that
//! makes the quicksort driver stable without an in-place swap-based
//! partition. Grounded on
//! `examples/original_source/include/driftsort/quicksort.h`'s
//! `stable_partition`; the teacher's own `partition_in_blocks` in
//! `const_sort_core.rs` is the unstable, in-place BlockQuicksort variant
//! and is not directly reusable here, since this spec requires the
//! elements not compared against the pivot to retain their relative order.

use crate::blob::{copy_range, Blob};
use crate::comparator::Comparator;

/// Partitions `v[0..length)` around the pivot at `v[pivot_pos]`, writing
/// the permutation through `scratch[0..length)` and copying it back into
/// `v`. Returns the number of elements that ended up left of the pivot.
///
/// When `inverted` is `false`, elements strictly less than the pivot go
/// left (used for the ordinary partition step). When `inverted` is `true`,
/// elements *not greater* than the pivot go left — i.e. the pivot and
/// everything equal to it joins the left side — used for the
/// equal-partition shortcut that gives this quicksort its O(n log k)
/// behavior on low-cardinality inputs.
///
/// `scratch` must provide at least `length` elements of scratch space.
pub(crate) fn stable_partition<F>(
  v: Blob,
  length: usize,
  scratch: Blob,
  pivot_pos: usize,
  inverted: bool,
  comp: &mut Comparator<F>,
) -> usize
where
  F: FnMut(Blob, Blob) -> bool,
{
  debug_assert!(pivot_pos < length);
  let pivot = v.offset(pivot_pos as isize);
  let pivot_goes_left = inverted;

  let mut scan = v;
  let mut num_left = 0usize;
  let mut scratch_rev = scratch.offset(length as isize);

  for i in 0..length {
    scratch_rev = scratch_rev.offset(-1);
    let towards_left = if i == pivot_pos {
      pivot_goes_left
    } else if inverted {
      !comp.less(pivot, scan)
    } else {
      comp.less(scan, pivot)
    };
    let dst = if towards_left { scratch.offset(num_left as isize) } else { scratch_rev.offset(num_left as isize) };
    scan.copy_nonoverlapping(dst);
    num_left += towards_left as usize;
    scan = scan.offset(1);
  }

  // The first `num_left` scratch slots hold the left-side elements in
  // original order; copy them back directly.
  copy_range(scratch, v, num_left);
  // The remaining slots hold the right-side elements in reverse original
  // order; copy them back reversed so the right side is restored to its
  // original relative order (stability).
  let right_len = length - num_left;
  for i in 0..right_len {
    scratch
      .offset((length - 1 - i) as isize)
      .copy_nonoverlapping(v.offset((num_left + i) as isize));
  }

  num_left
}

#[cfg(test)]
mod test {
  use super::*;
  use alloc::vec::Vec;

  fn less_i32(a: Blob, b: Blob) -> bool {
    unsafe { *a.as_ptr().cast::<i32>() < *b.as_ptr().cast::<i32>() }
  }

  #[test]
  fn partitions_around_pivot_preserving_order_on_each_side() {
    let mut comp = Comparator::new(4, 4, less_i32);
    let mut data: Vec<i32> = alloc::vec![5, 3, 8, 1, 9, 2, 7, 3];
    let len = data.len();
    let mut scratch = alloc::vec![0i32; len];
    let v = Blob::new(4, data.as_mut_ptr().cast());
    let scratch_blob = Blob::new(4, scratch.as_mut_ptr().cast());
    // pivot = data[2] = 8
    let num_left = stable_partition(v, len, scratch_blob, 2, false, &mut comp);
    assert_eq!(&data[..num_left], &[5, 3, 1, 2, 7, 3]);
    assert_eq!(&data[num_left..], &[8, 9]);
  }

  #[test]
  fn equal_partition_sends_pivot_and_equal_elements_left() {
    let mut comp = Comparator::new(4, 4, less_i32);
    let mut data: Vec<i32> = alloc::vec![2, 2, 5, 2, 9, 2];
    let len = data.len();
    let mut scratch = alloc::vec![0i32; len];
    let v = Blob::new(4, data.as_mut_ptr().cast());
    let scratch_blob = Blob::new(4, scratch.as_mut_ptr().cast());
    let mid = stable_partition(v, len, scratch_blob, 0, true, &mut comp);
    assert_eq!(&data[..mid], &[2, 2, 2, 2]);
    assert_eq!(&data[mid..], &[5, 9]);
  }
}
