//! Leaf sorting procedures used at and below `SMALLSORT_THRESHOLD` (32
//! elements): the stable sort-of-4/sort-of-8 networks, the insertion tail,
//! and `small_sort_general`, the dispatcher quicksort falls back to once a
//! partition shrinks small enough.

use crate::blob::{copy_nonoverlapping_bytes, copy_range, Blob};
use crate::comparator::Comparator;
use crate::element_buf::ElementBuf;

/// Sorts exactly 4 elements with 5 comparisons, stably, writing the result
/// to `dest`. `base` and `dest` must not overlap.
///
/// Grounded on `examples/original_source/include/driftsort/smallsort.h`'s
/// `sort4_stable`.
pub(crate) fn sort4_stable<F>(base: Blob, dest: Blob, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  let c1 = comp.less(base.offset(1), base.offset(0));
  let c2 = comp.less(base.offset(3), base.offset(2));
  let a = c1 as isize;
  let b = (!c1) as isize;
  let c = 2 + c2 as isize;
  let d = 2 + (!c2) as isize;

  // c3, c4 | min max unknown_left unknown_right
  //  0, 0  |  a   d    b           c
  //  0, 1  |  a   b    c           d
  //  1, 0  |  c   d    a           b
  //  1, 1  |  c   b    a           d
  let c3 = comp.less(base.offset(c), base.offset(a));
  let c4 = comp.less(base.offset(d), base.offset(b));
  let min = if c3 { c } else { a };
  let max = if c4 { b } else { d };
  let unknown_left = if c3 { a } else if c4 { c } else { b };
  let unknown_right = if c4 { d } else if c3 { b } else { c };

  let c5 = comp.less(base.offset(unknown_right), base.offset(unknown_left));
  let lo = if c5 { unknown_right } else { unknown_left };
  let hi = if c5 { unknown_left } else { unknown_right };

  base.offset(min).copy_nonoverlapping(dest.offset(0));
  base.offset(lo).copy_nonoverlapping(dest.offset(1));
  base.offset(hi).copy_nonoverlapping(dest.offset(2));
  base.offset(max).copy_nonoverlapping(dest.offset(3));
}

/// Sorts exactly 8 elements, stably: two `sort4_stable` calls into `tmp8`
/// (an 8-element scratch area), then merged into `dest`.
pub(crate) fn sort8_stable<F>(base: Blob, dest: Blob, tmp8: Blob, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  sort4_stable(base, tmp8, comp);
  sort4_stable(base.offset(4), tmp8.offset(4), comp);
  merge_two(tmp8, 4, 4, dest, comp);
}

/// Merges two adjacent sorted runs `src[0..left_len)` and
/// `src[left_len..left_len+right_len)` into `dst`. Ties take the left run.
///
/// The merge proceeds from both ends towards the middle (forward pass
/// fills the first half of the output, backward pass fills the second
/// half); if the total length is odd, the single remaining element is
/// copied once both passes have exhausted everything else. This is the
/// bidirectional merge used both standalone here and as the small-sort leaf
/// merge inside `small_sort_general`.
pub(crate) fn merge_two<F>(
  src: Blob,
  left_len: usize,
  right_len: usize,
  dst: Blob,
  comp: &mut Comparator<F>,
) where
  F: FnMut(Blob, Blob) -> bool,
{
  let len = left_len + right_len;
  if len == 0 {
    return;
  }
  if left_len == 0 {
    copy_range(src.offset(left_len as isize), dst, right_len);
    return;
  }
  if right_len == 0 {
    copy_range(src, dst, left_len);
    return;
  }

  let mut left = src;
  let mut right = src.offset(left_len as isize);
  let mut out = dst;
  let mut left_remaining = left_len;
  let mut right_remaining = right_len;

  let mut left_rev = src.offset(left_len as isize - 1);
  let mut right_rev = src.offset(len as isize - 1);
  let mut out_rev = dst.offset(len as isize - 1);
  let mut left_rev_remaining = left_len;
  let mut right_rev_remaining = right_len;

  let half = len / 2;
  for _ in 0..half {
    let take_left = if left_remaining == 0 {
      false
    } else if right_remaining == 0 {
      true
    } else {
      !comp.less(right, left)
    };
    if take_left {
      left.copy_nonoverlapping(out);
      left = left.offset(1);
      left_remaining -= 1;
    } else {
      right.copy_nonoverlapping(out);
      right = right.offset(1);
      right_remaining -= 1;
    }
    out = out.offset(1);

    let take_left_rev = if left_rev_remaining == 0 {
      false
    } else if right_rev_remaining == 0 {
      true
    } else {
      comp.less(right_rev, left_rev)
    };
    if take_left_rev {
      left_rev.copy_nonoverlapping(out_rev);
      left_rev = left_rev.offset(-1);
      left_rev_remaining -= 1;
    } else {
      right_rev.copy_nonoverlapping(out_rev);
      right_rev = right_rev.offset(-1);
      right_rev_remaining -= 1;
    }
    out_rev = out_rev.offset(-1);
  }

  if len % 2 == 1 {
    if left_remaining > 0 {
      left.copy_nonoverlapping(out);
    } else {
      right.copy_nonoverlapping(out);
    }
  }
}

/// A scoped guard that copies `src` back to `dest` on drop, including on
/// unwind. Used to keep `insert_tail`'s gap in a valid state no matter
/// where the comparator panics.
struct InsertionHole {
  src: *const u8,
  dest: *mut u8,
  element_size: usize,
}

impl Drop for InsertionHole {
  #[inline]
  fn drop(&mut self) {
    copy_nonoverlapping_bytes(self.src, self.dest, self.element_size);
  }
}

/// Assuming `[begin, tail)` is sorted, inserts the element at `tail` into
/// its correct position by shifting larger elements one slot to the right.
pub(crate) fn insert_tail<F>(begin: Blob, tail: Blob, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  let element_size = comp.element_size();
  let mut tmp = ElementBuf::new(element_size, comp.alignment(), comp.alignment_padding());
  tmp.copy_from(tail.as_ptr());
  let tmp_blob = Blob::new(element_size, tmp.as_mut_ptr());

  let mut hole = InsertionHole { src: tmp.as_ptr(), dest: tail.as_ptr(), element_size };
  let mut gap = tail;
  while gap.as_ptr() != begin.as_ptr() {
    let prev = gap.offset(-1);
    if !comp.less(tmp_blob, prev) {
      break;
    }
    prev.copy_nonoverlapping(gap);
    gap = prev;
    hole.dest = gap.as_ptr();
  }
  drop(hole);
}

/// Precondition: `[begin, begin+offset)` is sorted and `0 < offset <
/// total`. Extends the sorted prefix to cover `[begin, begin+total)` by
/// inserting each remaining element in turn.
pub(crate) fn insertion_sort_shift_left<F>(
  begin: Blob,
  total: usize,
  offset: usize,
  comp: &mut Comparator<F>,
) where
  F: FnMut(Blob, Blob) -> bool,
{
  debug_assert!(offset > 0 && offset < total);
  for tail_idx in offset..total {
    insert_tail(begin, begin.offset(tail_idx as isize), comp);
  }
}

/// Sorts `base[0..length)` using the small-sort network, with `scratch`
/// providing at least `length + 16` elements of working space (the extra
/// 16 cover the two `sort8_stable` temporaries for the low and high
/// halves).
pub(crate) fn small_sort_general<F>(
  base: Blob,
  length: usize,
  scratch: Blob,
  comp: &mut Comparator<F>,
) where
  F: FnMut(Blob, Blob) -> bool,
{
  if length < 2 {
    return;
  }
  let half = length / 2;
  let right_len = length - half;
  let element_size = comp.element_size();

  let presorted = if element_size <= 16 && length >= 16 {
    let tmp8_low = scratch.offset(length as isize);
    let tmp8_high = scratch.offset(length as isize + 8);
    sort8_stable(base, scratch, tmp8_low, comp);
    sort8_stable(base.offset(half as isize), scratch.offset(half as isize), tmp8_high, comp);
    8
  } else if length >= 8 {
    sort4_stable(base, scratch, comp);
    sort4_stable(base.offset(half as isize), scratch.offset(half as isize), comp);
    4
  } else {
    1
  };

  let presorted_left = presorted.min(half);
  let presorted_right = presorted.min(right_len);
  // When nothing was actually pre-sorted by a network call (the `presorted
  // == 1` branch above), the whole half still needs its initial raw copy
  // into scratch, including what would otherwise be index 0.
  let raw_start_left = if presorted > 1 { presorted_left } else { 0 };
  let raw_start_right = if presorted > 1 { presorted_right } else { 0 };

  copy_range(
    base.offset(raw_start_left as isize),
    scratch.offset(raw_start_left as isize),
    half - raw_start_left,
  );
  copy_range(
    base.offset((half + raw_start_right) as isize),
    scratch.offset((half + raw_start_right) as isize),
    right_len - raw_start_right,
  );

  if presorted_left.max(1) < half {
    insertion_sort_shift_left(scratch, half, presorted_left.max(1), comp);
  }
  if presorted_right.max(1) < right_len {
    insertion_sort_shift_left(
      scratch.offset(half as isize),
      right_len,
      presorted_right.max(1),
      comp,
    );
  }

  merge_two(scratch, half, right_len, base, comp);
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::comparator::Comparator;
  use alloc::vec::Vec;

  fn less_i32(a: Blob, b: Blob) -> bool {
    unsafe { *a.as_ptr().cast::<i32>() < *b.as_ptr().cast::<i32>() }
  }

  fn make_comp() -> Comparator<impl FnMut(Blob, Blob) -> bool> {
    Comparator::new(4, 4, less_i32)
  }

  #[test]
  fn sort4_all_permutations_are_stable_and_sorted() {
    let mut comp = make_comp();
    // Use (value, tag) packed so equal values are distinguishable for a
    // stability check, but the comparator only looks at the i32 value, so
    // encode value in the low bits and keep distinct values here (sort4's
    // stability on exact ties is covered indirectly via small_sort_general
    // below with an explicit duplicate-key case).
    let perms = [
      [3, 1, 4, 2],
      [1, 2, 3, 4],
      [4, 3, 2, 1],
      [2, 2, 1, 1],
      [1, 1, 1, 1],
    ];
    for perm in perms {
      let mut src = perm;
      let mut dst = [0i32; 4];
      let base = Blob::new(4, src.as_mut_ptr().cast());
      let dest = Blob::new(4, dst.as_mut_ptr().cast());
      sort4_stable(base, dest, &mut comp);
      let mut expected = perm;
      expected.sort();
      assert_eq!(dst, expected, "perm {perm:?}");
    }
  }

  #[test]
  fn small_sort_general_sorts_arbitrary_lengths() {
    let mut comp = make_comp();
    for len in 0..=32usize {
      let mut data: Vec<i32> = (0..len as i32).rev().collect();
      let mut scratch = alloc::vec![0i32; len + 16];
      let base = Blob::new(4, data.as_mut_ptr().cast());
      let scratch_blob = Blob::new(4, scratch.as_mut_ptr().cast());
      small_sort_general(base, len, scratch_blob, &mut comp);
      let mut expected: Vec<i32> = (0..len as i32).rev().collect();
      expected.sort();
      assert_eq!(data, expected, "len={len}");
    }
  }

  #[test]
  fn small_sort_general_is_stable_on_duplicate_keys() {
    let mut cmp_calls = 0usize;
    let mut comp = Comparator::new(8, 4, |a: Blob, b: Blob| {
      cmp_calls += 1;
      unsafe {
        let a = &*a.as_ptr().cast::<(i32, i32)>();
        let b = &*b.as_ptr().cast::<(i32, i32)>();
        a.0 < b.0
      }
    });
    let mut data: Vec<(i32, i32)> = alloc::vec![(1, 0), (2, 1), (1, 2), (2, 3), (1, 4)];
    let len = data.len();
    let mut scratch = alloc::vec![(0i32, 0i32); len + 16];
    let base = Blob::new(8, data.as_mut_ptr().cast());
    let scratch_blob = Blob::new(8, scratch.as_mut_ptr().cast());
    small_sort_general(base, len, scratch_blob, &mut comp);
    assert_eq!(data, alloc::vec![(1, 0), (1, 2), (1, 4), (2, 1), (2, 3)]);
  }
}
