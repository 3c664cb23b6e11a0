//! Scoped single-element byte buffer, aligned to the caller's requested
//! alignment.
//!
//! The original engine reaches for `alloca` whenever it needs a one-element
//! scratch slot (pivot copy, insertion-tail hole, heap-sort swap target)
//! because the element size is a runtime value with no compile-time bound.
//! Safe, stable Rust has no dynamic stack allocation, so this crate resolves
//! it the same way it resolves the larger scratch buffer in
//! [`crate::alloc_scratch`]: an inline array sized for the overwhelming
//! majority of real element sizes, spilling to the heap only when an
//! element is larger than that.
//!
//! Both arms are backed by `u128`-typed storage rather than `u8`, which
//! guarantees the buffer's base address starts aligned to
//! `align_of::<u128>()` (16 bytes) regardless of where the allocator or the
//! stack frame happens to place it. [`crate::comparator::Comparator`]'s
//! `alignment`/`alignment_padding` are the mechanism that turns that
//! guarantee into one honoring an arbitrary runtime `alignment`: the extra
//! `alignment_padding` bytes are the worst-case slack needed to find an
//! `alignment`-aligned sub-pointer inside the 16-byte-aligned base via
//! `<*mut u8>::align_offset`, which every access goes through.

use alloc::vec::Vec;
use core::mem::size_of;
use core::ptr;

/// Inline capacity, in bytes, for the element itself, before `ElementBuf`
/// spills to the heap. `alignment_padding` is reserved on top of this, not
/// carved out of it.
const INLINE_CAPACITY: usize = 128;

/// `u128` words backing the inline arm: `INLINE_CAPACITY` bytes plus one
/// extra word of slack, which is enough to re-align up to
/// `crate::comparator::MAX_ALIGNMENT` (32 bytes) from a 16-byte-aligned
/// base.
const INLINE_WORDS: usize = INLINE_CAPACITY / size_of::<u128>() + 1;

enum Storage {
  Inline([u128; INLINE_WORDS]),
  Heap(Vec<u128>),
}

/// A single-element owned byte buffer, used as the scoped temporary behind
/// pivot copies, the insertion-tail hole, and the heap-sort swap slot.
/// [`ElementBuf::as_ptr`]/[`ElementBuf::as_mut_ptr`] expose the
/// alignment-corrected sub-pointer, never the raw storage base.
pub(crate) struct ElementBuf {
  storage: Storage,
  aligned_offset: usize,
  len: usize,
}

impl ElementBuf {
  /// Allocates zeroed storage for one element of `element_size` bytes
  /// whose base address is aligned to `alignment`. `alignment_padding`
  /// must be the caller's `Comparator::alignment_padding()` — the slack
  /// this buffer's `u128` base-alignment guarantee needs to re-align up to
  /// `alignment`.
  pub(crate) fn new(element_size: usize, alignment: usize, alignment_padding: usize) -> Self {
    let needed_bytes = element_size + alignment_padding;
    let mut storage = if needed_bytes <= INLINE_WORDS * size_of::<u128>() {
      Storage::Inline([0u128; INLINE_WORDS])
    } else {
      let words = (needed_bytes + size_of::<u128>() - 1) / size_of::<u128>();
      Storage::Heap(alloc::vec![0u128; words])
    };

    let base = match &mut storage {
      Storage::Inline(buf) => buf.as_mut_ptr().cast::<u8>(),
      Storage::Heap(v) => v.as_mut_ptr().cast::<u8>(),
    };
    // `alignment` is always a power of two (derived from `guess_alignment`),
    // so this never returns `usize::MAX`.
    let aligned_offset = base.align_offset(alignment);

    Self { storage, aligned_offset, len: element_size }
  }

  #[inline]
  fn base_mut_ptr(&mut self) -> *mut u8 {
    match &mut self.storage {
      Storage::Inline(buf) => buf.as_mut_ptr().cast::<u8>(),
      Storage::Heap(v) => v.as_mut_ptr().cast::<u8>(),
    }
  }

  #[inline]
  fn base_ptr(&self) -> *const u8 {
    match &self.storage {
      Storage::Inline(buf) => buf.as_ptr().cast::<u8>(),
      Storage::Heap(v) => v.as_ptr().cast::<u8>(),
    }
  }

  #[inline]
  pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
    let offset = self.aligned_offset;
    // SAFETY: `new` sized storage to cover `aligned_offset + len` bytes.
    unsafe { self.base_mut_ptr().add(offset) }
  }

  #[inline]
  pub(crate) fn as_ptr(&self) -> *const u8 {
    let offset = self.aligned_offset;
    // SAFETY: see `as_mut_ptr`.
    unsafe { self.base_ptr().add(offset) }
  }

  /// Copies `element_size` bytes from `src` into this buffer's aligned
  /// sub-pointer.
  #[inline]
  pub(crate) fn copy_from(&mut self, src: *const u8) {
    let len = self.len;
    // SAFETY: `src` is valid for `len` bytes by caller contract; `self`
    // owns exactly `len` bytes of storage at its aligned offset.
    unsafe { ptr::copy_nonoverlapping(src, self.as_mut_ptr(), len) };
  }
}
