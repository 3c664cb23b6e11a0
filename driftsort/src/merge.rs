//! The general bidirectional in-place merge used by the driftsort driver to
//! combine two adjacent sorted runs of `v` using `scratch` as save space for
//! the shorter half. Grounded on
//! `TruongNhanNguyen-sort-research-rs/src/new_stable_sort/mod.rs::merge`
//! (the `MergeHole` drop guard, shorter-side-to-scratch strategy) and
//! `examples/original_source/include/driftsort/merge.h`'s `MergeState`.

use crate::blob::{copy_range, Blob};
use crate::comparator::Comparator;

/// A guard that, on any exit path (including a panicking comparator),
/// copies whatever remains of the scratch-held half back into its
/// destination slot in `v`. This is what keeps the merge from losing
/// elements if `comp.less` unwinds partway through.
struct MergeGuard {
  scratch_remaining: Blob,
  dest_remaining: Blob,
  remaining_len: usize,
}

impl Drop for MergeGuard {
  fn drop(&mut self) {
    if self.remaining_len > 0 {
      copy_range(self.scratch_remaining, self.dest_remaining, self.remaining_len);
    }
  }
}

/// Merges `v[0..mid)` and `v[mid..n)`, each already sorted, into a single
/// sorted run occupying `v[0..n)`. `scratch_len` must be at least
/// `max(mid, n - mid)`; if it isn't, this is a no-op rather than a panic,
/// matching the caller contract the driftsort driver relies on.
///
/// Ties take the left run's element, preserving stability.
pub(crate) fn merge<F>(
  v: Blob,
  n: usize,
  scratch: Blob,
  scratch_len: usize,
  mid: usize,
  comp: &mut Comparator<F>,
) where
  F: FnMut(Blob, Blob) -> bool,
{
  if mid == 0 || mid >= n || scratch_len < mid || scratch_len < n - mid {
    return;
  }
  let left_len = mid;
  let right_len = n - mid;

  if left_len <= right_len {
    merge_forward(v, scratch, left_len, right_len, comp);
  } else {
    merge_backward(v, scratch, left_len, right_len, comp);
  }
}

/// Used when the left half is the shorter (or equal): save it to scratch,
/// then merge scratch (left) against the untouched right half of `v`,
/// writing forward into `v` from the start.
fn merge_forward<F>(v: Blob, scratch: Blob, left_len: usize, right_len: usize, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  copy_range(v, scratch, left_len);

  let mut left = scratch;
  let mut right = v.offset(left_len as isize);
  let mut out = v;
  let right_end = v.offset((left_len + right_len) as isize);
  let left_end = scratch.offset(left_len as isize);

  let mut guard = MergeGuard { scratch_remaining: left, dest_remaining: out, remaining_len: left_len };

  while left.as_ptr() != left_end.as_ptr() && right.as_ptr() != right_end.as_ptr() {
    let take_right = comp.less(right, left);
    if take_right {
      right.copy_nonoverlapping(out);
      right = right.offset(1);
    } else {
      left.copy_nonoverlapping(out);
      left = left.offset(1);
      guard.scratch_remaining = left;
      guard.remaining_len -= 1;
    }
    out = out.offset(1);
    guard.dest_remaining = out;
  }
  // If the right side ran out first, the guard copies the remaining
  // scratch-held left elements to their tail slot on drop. If the left
  // side ran out first, `remaining_len` is already 0 and the guard is a
  // no-op.
  drop(guard);
}

/// Used when the right half is strictly shorter: save it to scratch, then
/// merge the untouched left half of `v` against scratch (right), writing
/// backward into `v` from the end.
fn merge_backward<F>(v: Blob, scratch: Blob, left_len: usize, right_len: usize, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  let right_v = v.offset(left_len as isize);
  copy_range(right_v, scratch, right_len);

  let mut left = v.offset(left_len as isize - 1);
  let mut right = scratch.offset(right_len as isize - 1);
  let mut out = v.offset((left_len + right_len) as isize - 1);
  let left_begin_minus_one = v.offset(-1);
  let right_begin_minus_one = scratch.offset(-1);

  // We consume `right` from its top index downward, so whatever remains
  // unconsumed is always the prefix `scratch[0..remaining_len)` — and since
  // `out` and `right` walk downward in lockstep, that prefix's destination
  // is always the fixed prefix `v[0..remaining_len)`, not a moving window.
  let mut guard = MergeGuard {
    scratch_remaining: scratch,
    dest_remaining: v,
    remaining_len: right_len,
  };

  while left.as_ptr() != left_begin_minus_one.as_ptr() && right.as_ptr() != right_begin_minus_one.as_ptr() {
    let take_left = comp.less(right, left);
    if take_left {
      left.copy_nonoverlapping(out);
      left = left.offset(-1);
    } else {
      right.copy_nonoverlapping(out);
      right = right.offset(-1);
      guard.remaining_len -= 1;
    }
    out = out.offset(-1);
  }
  drop(guard);
}
