//! Sift-down heapsort, the fatal fallback used when scratch allocation
//! fails or the element's conservatively-inferred alignment is too large
//! for the engine's other paths to handle safely. Unlike the rest of this
//! crate it needs no scratch space at all, which is exactly why it exists.
//!
//! Grounded on `const_sort_core.rs`'s `sift_down`/`const_heapsort` (same
//! two-pass build-heap-then-pop-max structure), adapted from const-generic
//! typed slices to untyped `Blob` runs with an `ElementBuf`-backed swap.

use crate::blob::Blob;
use crate::comparator::Comparator;
use crate::element_buf::ElementBuf;

/// Swaps the elements at `a` and `b` through a scoped one-element buffer.
fn swap<F>(a: Blob, b: Blob, comp: &Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  let element_size = comp.element_size();
  let mut tmp = ElementBuf::new(element_size, comp.alignment(), comp.alignment_padding());
  tmp.copy_from(a.as_ptr());
  b.copy_nonoverlapping(a);
  Blob::new(element_size, tmp.as_mut_ptr()).copy_nonoverlapping(b);
}

/// Restores the max-heap invariant at `node` in `v[0..length)`, assuming
/// both children subtrees already satisfy it.
fn sift_down<F>(v: Blob, length: usize, mut node: usize, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  loop {
    let mut child = 2 * node + 1;
    if child >= length {
      break;
    }
    if child + 1 < length && comp.less(v.offset(child as isize), v.offset(child as isize + 1)) {
      child += 1;
    }
    if !comp.less(v.offset(node as isize), v.offset(child as isize)) {
      break;
    }
    swap(v.offset(node as isize), v.offset(child as isize), comp);
    node = child;
  }
}

/// Sorts `v[0..length)` in place with the classical build-heap-then-pop
/// heapsort, guaranteeing O(n log n) regardless of input pattern. Not
/// stable — used only on the paths where stability has already been
/// sacrificed for safety (over-aligned elements, allocation failure).
pub(crate) fn heapsort<F>(v: Blob, length: usize, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  if length < 2 {
    return;
  }

  let mut i = length / 2;
  while i > 0 {
    i -= 1;
    sift_down(v, length, i, comp);
  }

  let mut i = length - 1;
  while i >= 1 {
    swap(v, v.offset(i as isize), comp);
    sift_down(v, i, 0, comp);
    i -= 1;
  }
}
