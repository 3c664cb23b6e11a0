//! The stable pattern-defeating quicksort driver: small-sort leaf dispatch,
//! a depth-limit fallback into the driftsort driver, and the left-ancestor-
//! pivot equal-partition shortcut that gives this sort O(n log k) behavior
//! on inputs with few distinct values.
//!
//! Grounded on `const_sort_core.rs`'s `recurse` (iterate-longer/recurse-
//! shorter shape, `pred: Option<&T>` ancestor check — that one partitions
//! in place and recurses on the *shorter* side instead, since it isn't
//! stable) and, for the exact control flow reproduced here,
//! `examples/original_source/include/driftsort/quicksort.h::stable_quicksort`.

use crate::blob::Blob;
use crate::comparator::Comparator;
use crate::drift;
use crate::partition::stable_partition;
use crate::pivot::choose_pivot;
use crate::smallsort::small_sort_general;
use crate::element_buf::ElementBuf;

/// Below this length, `stable_quicksort` dispatches straight to the
/// small-sort network instead of partitioning.
pub(crate) const SMALLSORT_THRESHOLD: usize = 32;

/// Sorts `v[0..length)` in place, stably. `limit` bounds the recursion
/// depth; reaching zero redirects the remainder through the driftsort
/// driver in eager mode, which guarantees O(n log n) regardless of pivot
/// quality. `left_ancestor_pivot`, when present, is the pivot value of the
/// enclosing call that produced this partition as its left side — used to
/// detect runs of equal elements and strip them out in one O(n) pass.
pub(crate) fn stable_quicksort<F>(
  mut v: Blob,
  mut length: usize,
  scratch: Blob,
  scratch_len: usize,
  mut limit: u32,
  mut left_ancestor_pivot: Option<Blob>,
  comp: &mut Comparator<F>,
) where
  F: FnMut(Blob, Blob) -> bool,
{
  loop {
    if length <= SMALLSORT_THRESHOLD {
      small_sort_general(v, length, scratch, comp);
      return;
    }

    if limit == 0 {
      drift::sort(v, length, scratch, scratch_len, true, comp);
      return;
    }
    limit -= 1;

    let pivot_pos = choose_pivot(v, length, comp);
    debug_assert!(pivot_pos < length);

    let element_size = comp.element_size();
    let mut pivot_storage = ElementBuf::new(element_size, comp.alignment(), comp.alignment_padding());
    pivot_storage.copy_from(v.offset(pivot_pos as isize).as_ptr());
    let pivot_copy = comp.lift(pivot_storage.as_mut_ptr());

    // Choose a pivot, and check whether it equals the left ancestor pivot.
    // If so, do a partition that sends equal elements left and don't
    // recurse on them — this is pdqsort's trick for O(n log k) sorting of
    // inputs with k distinct values.
    let mut perform_equal_partition = match left_ancestor_pivot {
      Some(ancestor) => !comp.less(ancestor, v.offset(pivot_pos as isize)),
      None => false,
    };

    let mut left_partition_len = 0;
    if !perform_equal_partition {
      left_partition_len = stable_partition(v, length, scratch, pivot_pos, false, comp);
      perform_equal_partition = left_partition_len == 0;
    }

    if perform_equal_partition {
      let mid_eq = stable_partition(v, length, scratch, pivot_pos, true, comp);
      v = v.offset(mid_eq as isize);
      length -= mid_eq;
      left_ancestor_pivot = None;
      continue;
    }

    let right = v.offset(left_partition_len as isize);
    let right_len = length - left_partition_len;
    stable_quicksort(right, right_len, scratch, scratch_len, limit, Some(pivot_copy), comp);
    length = left_partition_len;
  }
}
