// Copyright 2026 The native-rsa Authors.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY
// SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN ACTION
// OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF OR IN
// CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

//! Helpers for passing buffers across the backend boundary.

/// FfiSlice exists to provide `as_ffi_ptr` on slices. Calling `as_ptr` on an
/// empty Rust slice may return the alignment of the type, rather than NULL, as
/// the pointer. That is not a valid pointer to hand to a backend, so this
/// method should be used whenever passing a pointer to a slice into one.
pub(crate) trait FfiSlice {
    fn as_ffi_ptr(&self) -> *const u8;
}

impl FfiSlice for [u8] {
    fn as_ffi_ptr(&self) -> *const u8 {
        if self.is_empty() {
            core::ptr::null()
        } else {
            self.as_ptr()
        }
    }
}

/// See the comment [`FfiSlice`].
pub(crate) trait FfiMutSlice {
    fn as_mut_ffi_ptr(&mut self) -> *mut u8;
}

impl FfiMutSlice for [u8] {
    fn as_mut_ffi_ptr(&mut self) -> *mut u8 {
        if self.is_empty() {
            core::ptr::null_mut()
        } else {
            self.as_mut_ptr()
        }
    }
}

/// Allocates `max_len` bytes of output and lets `func` fill a prefix of them.
/// `func` returns how many bytes it wrote, and exactly that many are returned;
/// the rest of the allocation is never exposed.
///
/// Safety: the closure must initialize the first `n` bytes of the buffer if it
/// returns `Ok(n)`, and `n` must not exceed `max_len`.
pub(crate) unsafe fn with_output_vec_fallible<F, E>(max_len: usize, func: F) -> Result<Vec<u8>, E>
where
    F: FnOnce(*mut u8) -> Result<usize, E>,
{
    let mut ret = Vec::with_capacity(max_len);
    let out = ret.spare_capacity_mut();
    let out_ptr = if out.is_empty() {
        core::ptr::null_mut()
    } else {
        out.as_mut_ptr().cast::<u8>()
    };
    let written = func(out_ptr)?;
    assert!(written <= max_len);
    // Safety: `func` promised to initialize `written` bytes, which fit within
    // the capacity reserved above.
    unsafe { ret.set_len(written) };
    Ok(ret)
}
