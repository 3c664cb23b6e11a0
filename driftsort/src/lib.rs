#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]

/*!
## What can this crate do?

`driftsort` is a stable, adaptive, in-place comparison sort over
type-erased, fixed-size byte slices — a Rust-native driftsort/glidesort
implementation targeting the same interface contract as the classical C
library `qsort`/`qsort_r`: an element count, an element size, and a
comparator, with no further assumptions about the element type.

It is `O(n log n)` worst case, `O(n)` on already-sorted or reverse-sorted
input, `O(n log k)` on input with `k` distinct values, and stable in every
case.

## Example

```rust
driftsort::sort(&mut [5, 3, 1, 4, 2]);
```

For a custom ordering or projection, use [`sort_by`] or [`sort_by_key`].

## C ABI

Building with the `c-abi` feature additionally exports `#[no_mangle]`
`sort`/`sort_r` symbols implementing the platform `qsort`/`qsort_r`
contract (GNU argument order by default, Apple argument order under the
`apple-qsort-r` feature). These are off by default so that depending on
this crate as an ordinary Rust library does not force symbol export.
*/

extern crate alloc;

mod alloc_scratch;
mod blob;
mod comparator;
mod drift;
mod element_buf;
mod heapsort;
mod merge;
mod partition;
mod pivot;
mod quicksort;
mod smallsort;

use blob::Blob;
use comparator::{from_typed_ordering, guess_alignment, Comparator, MAX_ALIGNMENT};
use core::cmp::Ordering;
use core::mem::size_of;
use quicksort::SMALLSORT_THRESHOLD;
use smallsort::insertion_sort_shift_left;

/// Below this length, the entry point always runs plain insertion sort:
/// comparator overhead and partition setup cost dominate at this scale, and
/// insertion sort never risks quadratic behavior this small.
const MAX_LEN_ALWAYS_INSERTION_SORT: usize = 20;

/// Upper bound, in bytes, on the scratch buffer the entry point will try to
/// allocate in one shot; above this the scratch request is capped to
/// `length / 2` instead, trading a slower merge for a smaller allocation.
const MAX_FULL_ALLOC_BYTES: usize = 8 * 1024 * 1024;

/// Sorts `v`, stably, using `T`'s natural ordering.
pub fn sort<T: Ord>(v: &mut [T]) {
  sort_by(v, T::cmp);
}

/// Sorts `v`, stably, with a custom comparator.
///
/// `compare` must implement a strict weak order. If it doesn't, the sort
/// still terminates and produces a permutation of `v` — it just won't be
/// meaningfully ordered.
pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
  F: FnMut(&T, &T) -> Ordering,
{
  let length = v.len();
  let element_size = size_of::<T>();
  if element_size == 0 || length < 2 {
    return;
  }
  let base = v.as_mut_ptr().cast::<u8>();
  let less = from_typed_ordering::<T, F>(compare);
  qsort_core(base, length, element_size, less);
}

/// Sorts `v`, stably, by the key `f` extracts from each element.
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
  F: FnMut(&T) -> K,
  K: Ord,
{
  sort_by(v, move |a, b| f(a).cmp(&f(b)));
}

/// The untyped engine entry point, equivalent to the classical C library
/// `qsort_r`: sorts `nmemb` elements of `element_size` bytes each, starting
/// at `base`, using `less` as the strict less-than predicate.
fn qsort_core<F>(base: *mut u8, nmemb: usize, element_size: usize, less: F)
where
  F: FnMut(Blob, Blob) -> bool,
{
  if element_size == 0 || nmemb < 2 {
    return;
  }

  let alignment = guess_alignment(element_size, base);
  let mut comp = Comparator::new(element_size, alignment, less);
  let v = comp.lift(base);

  if nmemb <= MAX_LEN_ALWAYS_INSERTION_SORT {
    log::trace!("qsort_core: {nmemb} elements, insertion-sort path");
    insertion_sort_shift_left(v, nmemb, 1, &mut comp);
    return;
  }

  if alignment > MAX_ALIGNMENT {
    // We can't know a caller's true over-alignment from a raw (base, size)
    // pair, so elements whose conservatively-inferred alignment exceeds the
    // fast path's ceiling take the allocation-free heap-sort fallback
    // instead — the same accommodation glibc's qsort makes.
    log::debug!("qsort_core: alignment {alignment} > {MAX_ALIGNMENT}, routing to heap-sort");
    heapsort::heapsort(v, nmemb, &mut comp);
    return;
  }

  driftsort_entry(v, nmemb, &mut comp);
}

/// Sizes and allocates the scratch buffer, then hands off to the driftsort
/// driver — or, on allocation failure, to heap-sort.
fn driftsort_entry<F>(v: Blob, length: usize, comp: &mut Comparator<F>)
where
  F: FnMut(Blob, Blob) -> bool,
{
  let element_size = comp.element_size();
  let eager_sort = length <= SMALLSORT_THRESHOLD * 2;

  let max_full_alloc = MAX_FULL_ALLOC_BYTES / element_size;
  let alloc_len = (length / 2).max(length.min(max_full_alloc)).max(SMALLSORT_THRESHOLD + 16);

  match alloc_scratch::Scratch::new(alloc_len, element_size, comp.alignment(), comp.alignment_padding()) {
    alloc_scratch::AllocOutcome::Ready(mut scratch) => {
      let scratch_blob = comp.lift(scratch.as_mut_ptr());
      drift::sort(v, length, scratch_blob, scratch.len(), eager_sort, comp);
    }
    alloc_scratch::AllocOutcome::Failed => {
      log::debug!("driftsort_entry: scratch allocation failed, falling back to heap-sort");
      heapsort::heapsort(v, length, comp);
    }
  }
}

#[cfg(feature = "c-abi")]
mod c_abi {
  use super::{blob::Blob, comparator::from_c_three_way, qsort_core};
  use core::ffi::c_void;

  /// GNU/BSD `qsort`-compatible entry point: sorts `nmemb` elements of
  /// `size` bytes starting at `base`, using `compar(a, b)` as a three-way
  /// comparator (negative meaning `a < b`).
  ///
  /// # Safety
  /// `base` must be valid for reads and writes of `nmemb * size` bytes;
  /// `compar` must be safe to call with any two element addresses in that
  /// range for the duration of the call.
  #[no_mangle]
  pub unsafe extern "C" fn sort(
    base: *mut u8,
    nmemb: usize,
    size: usize,
    compar: unsafe extern "C" fn(*const u8, *const u8) -> i32,
  ) {
    let less = from_c_three_way(compar);
    qsort_core(base, nmemb, size, less);
  }

  /// GNU-flavor `qsort_r`: like [`sort`], but `compar` additionally
  /// receives the opaque `arg` context pointer as its last argument.
  ///
  /// # Safety
  /// Same contract as [`sort`]; `arg` is passed through to `compar`
  /// uninspected and must be whatever `compar` expects.
  #[cfg(not(feature = "apple-qsort-r"))]
  #[no_mangle]
  pub unsafe extern "C" fn sort_r(
    base: *mut u8,
    nmemb: usize,
    size: usize,
    compar: unsafe extern "C" fn(*const u8, *const u8, *mut c_void) -> i32,
    arg: *mut c_void,
  ) {
    let less = move |a: Blob, b: Blob| {
      // SAFETY: `compar`/`arg` are caller-guaranteed valid for the call,
      // per this function's own safety contract; `a`/`b` are live element
      // addresses the engine derived from `base`.
      unsafe { compar(a.as_ptr(), b.as_ptr(), arg) < 0 }
    };
    qsort_core(base, nmemb, size, less);
  }

  /// Apple/BSD-flavor `qsort_r`: like the GNU flavor, but with `arg` and
  /// `compar` argument positions swapped and `compar` taking `arg` first.
  ///
  /// # Safety
  /// Same contract as the GNU-flavor [`sort_r`].
  #[cfg(feature = "apple-qsort-r")]
  #[no_mangle]
  pub unsafe extern "C" fn sort_r(
    base: *mut u8,
    nmemb: usize,
    size: usize,
    arg: *mut c_void,
    compar: unsafe extern "C" fn(*mut c_void, *const u8, *const u8) -> i32,
  ) {
    let less = move |a: Blob, b: Blob| {
      // SAFETY: see the GNU-flavor `sort_r` above.
      unsafe { compar(arg, a.as_ptr(), b.as_ptr()) < 0 }
    };
    qsort_core(base, nmemb, size, less);
  }
}
