//! Type-erased fat pointer over a contiguous run of fixed-size elements.
//!
//! `Blob` is the untyped analogue of a `*mut T`: it carries the element
//! size alongside the address so offset arithmetic and copies can be
//! expressed without ever naming a concrete `T`. Every other module in this
//! crate operates in terms of `Blob`, never raw `*mut u8` directly.

use core::ptr;

/// A fat pointer: `(element_size, address)`.
///
/// Offsets are in units of `element_size` bytes, not bytes. `Blob` is
/// `Copy` so passing it around and re-deriving offsets from it is free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Blob {
  element_size: usize,
  data: *mut u8,
}

impl Blob {
  /// Constructs a blob pointer from a raw base address and element size.
  #[inline]
  pub(crate) fn new(element_size: usize, data: *mut u8) -> Self {
    Self { element_size, data }
  }

  #[inline]
  pub(crate) fn element_size(self) -> usize {
    self.element_size
  }

  #[inline]
  pub(crate) fn as_ptr(self) -> *mut u8 {
    self.data
  }

  /// Returns the blob offset by `delta` elements. `delta` may be negative.
  #[inline]
  pub(crate) fn offset(self, delta: isize) -> Self {
    // SAFETY: callers only ever offset within (or one-past-the-end of) a
    // single allocation that they are responsible for bounding.
    let data = unsafe { self.data.offset(delta * self.element_size as isize) };
    Self { element_size: self.element_size, data }
  }

  /// Copies `self`'s element non-overlappingly to `dest`. Callers guarantee
  /// the two element ranges do not overlap.
  #[inline]
  pub(crate) fn copy_nonoverlapping(self, dest: Self) {
    debug_assert_eq!(self.element_size, dest.element_size);
    copy_nonoverlapping_bytes(self.data, dest.data, self.element_size);
  }
}

/// Copies `count` consecutive elements from `src` to `dst`, non-
/// overlappingly.
#[inline]
pub(crate) fn copy_range(src: Blob, dst: Blob, count: usize) {
  for i in 0..count as isize {
    src.offset(i).copy_nonoverlapping(dst.offset(i));
  }
}

/// Copies `n` bytes from `src` to `dst`, specializing the common small
/// sizes with overlapping fixed-width loads/stores instead of a `memcpy`
/// call. This is a pure performance optimization; behavior is identical to
/// `ptr::copy_nonoverlapping` for every `n`.
#[inline]
pub(crate) fn copy_nonoverlapping_bytes(src: *const u8, dst: *mut u8, n: usize) {
  // SAFETY: callers of `Blob::copy_nonoverlapping` guarantee non-overlap
  // and that both pointers are valid for `n` bytes.
  unsafe {
    match n {
      0 => {}
      1 => ptr::copy_nonoverlapping(src, dst, 1),
      2 => copy_fixed::<2>(src, dst),
      3 => ptr::copy_nonoverlapping(src, dst, 3),
      4 => copy_fixed::<4>(src, dst),
      5..=7 => ptr::copy_nonoverlapping(src, dst, n),
      8 => copy_fixed::<8>(src, dst),
      9..=15 => ptr::copy_nonoverlapping(src, dst, n),
      16 => copy_fixed::<16>(src, dst),
      _ => ptr::copy_nonoverlapping(src, dst, n),
    }
  }
}

/// Copies exactly `N` bytes using a single fixed-width load/store pair.
///
/// # Safety
/// `src`/`dst` must be valid for reads/writes of `N` bytes and must not
/// overlap.
#[inline]
unsafe fn copy_fixed<const N: usize>(src: *const u8, dst: *mut u8) {
  let mut buf = [0u8; N];
  unsafe {
    ptr::copy_nonoverlapping(src, buf.as_mut_ptr(), N);
    ptr::copy_nonoverlapping(buf.as_ptr(), dst, N);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use alloc::vec;
  use alloc::vec::Vec;

  #[test]
  fn offset_and_copy_roundtrip() {
    let mut a = [1u32, 2, 3, 4];
    let mut b = [0u32; 4];
    let blob_a = Blob::new(4, a.as_mut_ptr().cast());
    let blob_b = Blob::new(4, b.as_mut_ptr().cast());
    blob_a.offset(2).copy_nonoverlapping(blob_b.offset(0));
    assert_eq!(b[0], 3);
  }

  #[test]
  fn copy_nonoverlapping_bytes_matches_memcpy_for_all_small_sizes() {
    for n in 0..=32usize {
      let src: Vec<u8> = (0..n as u8).collect();
      let mut dst = vec![0u8; n];
      copy_nonoverlapping_bytes(src.as_ptr(), dst.as_mut_ptr(), n);
      assert_eq!(src, dst, "mismatch at n={n}");
    }
  }
}
