//! Scratch-buffer allocation for the top-level entry point.
//!
//! The original engine sizes its scratch request in elements and hands
//! small requests to `alloca`, falling back to a fallible heap allocation
//! only once that request exceeds 4096 elements — recovering from
//! allocation failure by routing to heap-sort instead. `alloca` has no
//! safe-Rust equivalent (see [`crate::element_buf`] for the same problem at
//! one-element scale), so this resolves it the same way: a fixed-capacity
//! inline byte buffer for the common case, spilling to a heap `Vec<u128>`
//! once the request's *byte* size — not element count, since element size
//! here is a runtime value with no upper bound — exceeds that capacity.
//! The heap arm uses `try_reserve_exact` so allocation failure surfaces as
//! [`AllocOutcome::Failed`] rather than aborting the process. Grounded on
//! `examples/original_source/include/driftsort/driftsort.h`'s
//! heap-vs-alloca branch and its `raw_scratch == nullptr` recovery.
//!
//! Both arms are backed by `u128`-typed storage, not `u8`, for the same
//! reason as [`crate::element_buf::ElementBuf`]: it guarantees a 16-byte
//! base alignment via ordinary safe Rust, which `Comparator::alignment`/
//! `alignment_padding` then re-align up to the caller's runtime alignment
//! via `<*mut u8>::align_offset`.

use alloc::vec::Vec;
use core::mem::size_of;

/// Above this many scratch bytes, allocation spills to the heap. Sized to
/// comfortably cover the clamped minimum scratch request from the entry
/// point (`SMALLSORT_THRESHOLD + 16` elements) for any element size the
/// fast path (alignment ≤ `MAX_ALIGNMENT`) is likely to see in practice.
pub(crate) const HEAP_ALLOC_THRESHOLD: usize = 4096;

const INLINE_WORDS: usize = HEAP_ALLOC_THRESHOLD / size_of::<u128>() + 1;

enum Storage {
  Inline([u128; INLINE_WORDS]),
  Heap(Vec<u128>),
}

/// Owned scratch storage for one top-level sort call, sized for
/// `len` elements of `element_size` bytes each, base-aligned to the
/// comparator's `alignment`.
pub(crate) struct Scratch {
  storage: Storage,
  aligned_offset: usize,
  len: usize,
}

/// The result of requesting scratch space: either ready to use, or a
/// recoverable allocation failure that callers handle by falling back to
/// [`crate::heapsort`].
pub(crate) enum AllocOutcome {
  Ready(Scratch),
  Failed,
}

impl Scratch {
  /// Requests scratch space for `len` elements of `element_size` bytes,
  /// whose base address is aligned to `alignment`. `alignment_padding` is
  /// the caller's `Comparator::alignment_padding()` — the slack this
  /// buffer's `u128` base-alignment guarantee needs to re-align up to
  /// `alignment`. The inline arm never fails; the heap arm uses a fallible
  /// reservation so an allocator-exhaustion condition is recoverable
  /// rather than an abort.
  pub(crate) fn new(len: usize, element_size: usize, alignment: usize, alignment_padding: usize) -> AllocOutcome {
    let total_bytes = len.saturating_mul(element_size);
    let needed_bytes = total_bytes.saturating_add(alignment_padding);

    if needed_bytes <= INLINE_WORDS * size_of::<u128>() {
      log::trace!("scratch: inline buffer, {len} elements x {element_size} bytes");
      let mut storage = Storage::Inline([0u128; INLINE_WORDS]);
      let aligned_offset = Self::align_offset(&mut storage, alignment);
      return AllocOutcome::Ready(Self { storage, aligned_offset, len });
    }

    log::debug!("scratch: heap allocation, {total_bytes} bytes ({len} elements x {element_size} bytes)");
    let words = (needed_bytes + size_of::<u128>() - 1) / size_of::<u128>();
    let mut v = Vec::new();
    if v.try_reserve_exact(words).is_err() {
      log::debug!("scratch: heap allocation failed, falling back to heap-sort");
      return AllocOutcome::Failed;
    }
    v.resize(words, 0u128);
    let mut storage = Storage::Heap(v);
    let aligned_offset = Self::align_offset(&mut storage, alignment);
    AllocOutcome::Ready(Self { storage, aligned_offset, len })
  }

  fn align_offset(storage: &mut Storage, alignment: usize) -> usize {
    let base = match storage {
      Storage::Inline(buf) => buf.as_mut_ptr().cast::<u8>(),
      Storage::Heap(v) => v.as_mut_ptr().cast::<u8>(),
    };
    // `alignment` is always a power of two (from `guess_alignment`), so
    // this never returns `usize::MAX`.
    base.align_offset(alignment)
  }

  #[inline]
  pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
    let offset = self.aligned_offset;
    let base = match &mut self.storage {
      Storage::Inline(buf) => buf.as_mut_ptr().cast::<u8>(),
      Storage::Heap(v) => v.as_mut_ptr().cast::<u8>(),
    };
    // SAFETY: `new` sized storage to cover `aligned_offset` plus the
    // requested byte length.
    unsafe { base.add(offset) }
  }

  /// Number of elements this scratch region was sized for.
  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.len
  }
}
