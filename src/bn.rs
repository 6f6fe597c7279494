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

//! Backend-owned big integers.

use crate::{
    backend::Backend,
    error::Error,
    ffi::{FfiMutSlice, FfiSlice},
    native::{self, Status},
    sys::BIGNUM,
};
use core::{
    cmp::Ordering,
    fmt,
    marker::{PhantomData, PhantomPinned},
    ops::Deref,
    ptr::NonNull,
};

/// A big integer that somebody else owns, such as a field of a key.
///
/// Only ever seen behind a reference whose lifetime is bounded by the owner.
pub struct BigNumRef<B: Backend> {
    _opaque: [u8; 0],
    _marker: PhantomData<(B, *mut u8, PhantomPinned)>,
}

impl<B: Backend> BigNumRef<B> {
    /// # Safety
    ///
    /// `ptr` must be a live integer from `B` that stays valid and unmodified
    /// for `'a`.
    #[inline]
    pub(crate) unsafe fn from_ptr<'a>(ptr: NonNull<BIGNUM>) -> &'a Self {
        unsafe { &*ptr.as_ptr().cast::<Self>() }
    }

    /// The raw pointer, for passing to the backend.
    #[inline]
    pub fn as_ptr(&self) -> *mut BIGNUM {
        self as *const Self as *mut BIGNUM
    }

    /// The position of the highest set bit; zero for zero.
    pub fn num_bits(&self) -> usize {
        // SAFETY: `self` is a live integer.
        unsafe { B::bn_num_bits(self.as_ptr()) as usize }
    }

    /// The length of the minimal big-endian encoding.
    pub fn num_bytes(&self) -> usize {
        (self.num_bits() + 7) / 8
    }

    /// The minimal big-endian encoding; empty for zero.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.num_bytes()];
        // SAFETY: `out` has room for `num_bytes()` bytes.
        let written = unsafe { B::bn_bn2bin(self.as_ptr(), out.as_mut_ffi_ptr()) };
        out.truncate(written);
        out
    }

    /// Whether the value is odd.
    pub fn is_odd(&self) -> bool {
        self.to_be_bytes().last().map_or(false, |b| b & 1 == 1)
    }

    /// A copy of the value that the caller owns.
    pub fn to_owned(&self) -> Result<BigNum<B>, Error> {
        // SAFETY: `self` is a live integer.
        let ptr = unsafe { B::bn_dup(self.as_ptr()) };
        BigNum::adopt(ptr)
    }
}

impl<B: Backend> PartialEq for BigNumRef<B> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<B: Backend> Eq for BigNumRef<B> {}

impl<B: Backend> PartialOrd for BigNumRef<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B: Backend> Ord for BigNumRef<B> {
    fn cmp(&self, other: &Self) -> Ordering {
        // SAFETY: both are live integers.
        unsafe { B::bn_cmp(self.as_ptr(), other.as_ptr()) }.cmp(&0)
    }
}

impl<B: Backend> fmt::Debug for BigNumRef<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Values are often secret.
        f.debug_struct("BigNum")
            .field("bits", &self.num_bits())
            .finish_non_exhaustive()
    }
}

/// A big integer that the caller owns. Dereferences to [`BigNumRef`].
pub struct BigNum<B: Backend> {
    ptr: NonNull<BIGNUM>,
    _backend: PhantomData<B>,
}

impl<B: Backend> BigNum<B> {
    /// Zero.
    pub fn new() -> Result<Self, Error> {
        // SAFETY: no preconditions.
        Self::adopt(unsafe { B::bn_new() })
    }

    /// The value `w`.
    pub fn from_u64(w: u64) -> Result<Self, Error> {
        let bn = Self::new()?;
        // SAFETY: `bn` is a live integer.
        Status::new(unsafe { B::bn_set_word(bn.ptr.as_ptr(), w) })
            .into_result::<B>()
            .map_err(|code| Error::Allocation {
                what: "BIGNUM",
                code,
            })?;
        Ok(bn)
    }

    /// The value of the big-endian `bytes`.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, Error> {
        // SAFETY: `bytes` is valid for its length.
        Self::adopt(unsafe {
            B::bn_bin2bn(bytes.as_ffi_ptr(), bytes.len(), core::ptr::null_mut())
        })
    }

    fn adopt(ptr: *mut BIGNUM) -> Result<Self, Error> {
        let ptr = native::non_null::<B, _>(ptr).map_err(|code| Error::Allocation {
            what: "BIGNUM",
            code,
        })?;
        Ok(Self {
            ptr,
            _backend: PhantomData,
        })
    }
}

impl<B: Backend> Deref for BigNum<B> {
    type Target = BigNumRef<B>;

    fn deref(&self) -> &BigNumRef<B> {
        // SAFETY: `self` owns the integer for as long as the borrow lasts.
        unsafe { BigNumRef::from_ptr(self.ptr) }
    }
}

impl<B: Backend> Drop for BigNum<B> {
    fn drop(&mut self) {
        // SAFETY: nothing else refers to an integer `self` owns.
        unsafe { B::bn_free(self.ptr.as_ptr()) }
    }
}

impl<B: Backend> PartialEq for BigNum<B> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<B: Backend> Eq for BigNum<B> {}

impl<B: Backend> fmt::Debug for BigNum<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (**self).fmt(f)
    }
}
