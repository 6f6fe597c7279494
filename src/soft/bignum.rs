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
//! Big integers.
//!
//! A `*mut BIGNUM` handed out by this backend is a `*mut Bignum` in
//! disguise.

use super::error::{Reason, Result};
use crate::{c, sys, sys::BIGNUM};
use ::rsa::BigUint;
use core::{ptr, slice};
use zeroize::{Zeroize, Zeroizing};

struct Bignum(BigUint);

impl Drop for Bignum {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Moves `value` to the heap and returns it as a native integer.
pub(super) fn into_raw(value: BigUint) -> *mut BIGNUM {
    Box::into_raw(Box::new(Bignum(value))).cast()
}

/// # Safety
///
/// `bn` must be null or a live integer from this backend that stays live,
/// and unchanged, for `'a`.
pub(super) unsafe fn get<'a>(bn: *const BIGNUM) -> Option<&'a BigUint> {
    unsafe { bn.cast::<Bignum>().as_ref() }.map(|bn| &bn.0)
}

/// # Safety
///
/// As for [`get`], and nothing else may refer to the integer for `'a`.
unsafe fn get_mut<'a>(bn: *mut BIGNUM) -> Option<&'a mut BigUint> {
    unsafe { bn.cast::<Bignum>().as_mut() }.map(|bn| &mut bn.0)
}

fn require<'a>(value: Option<&'a BigUint>) -> Result<&'a BigUint> {
    value.ok_or(Reason::bn(sys::ERR_R_PASSED_NULL_PARAMETER))
}

pub(super) fn new() -> *mut BIGNUM {
    into_raw(BigUint::default())
}

/// # Safety
///
/// `bn` must be null or a live integer that nothing else refers to.
pub(super) unsafe fn free(bn: *mut BIGNUM) {
    if !bn.is_null() {
        drop(unsafe { Box::from_raw(bn.cast::<Bignum>()) });
    }
}

/// # Safety
///
/// `bn` must be null or a live integer.
pub(super) unsafe fn dup(bn: *const BIGNUM) -> Result<*mut BIGNUM> {
    let value = require(unsafe { get(bn) })?;
    Ok(into_raw(value.clone()))
}

/// # Safety
///
/// `s` must be valid for `len` bytes unless `len` is zero, and `ret` must be
/// null or a live integer nothing else is looking at.
pub(super) unsafe fn bin2bn(s: *const u8, len: c::size_t, ret: *mut BIGNUM) -> Result<*mut BIGNUM> {
    let bytes: &[u8] = match (len, s.is_null()) {
        (0, _) => &[],
        (_, true) => return Err(Reason::bn(sys::ERR_R_PASSED_NULL_PARAMETER)),
        (len, false) => unsafe { slice::from_raw_parts(s, len) },
    };
    let value = BigUint::from_bytes_be(bytes);
    match unsafe { get_mut(ret) } {
        Some(existing) => {
            existing.zeroize();
            *existing = value;
            Ok(ret)
        }
        None => Ok(into_raw(value)),
    }
}

/// The minimal big-endian encoding of `value`; empty for zero.
pub(super) fn to_be_bytes(value: &BigUint) -> Zeroizing<Vec<u8>> {
    if value.bits() == 0 {
        return Zeroizing::new(Vec::new());
    }
    Zeroizing::new(value.to_bytes_be())
}

/// # Safety
///
/// `bn` must be a live integer and `to` valid for its encoded length.
pub(super) unsafe fn bn2bin(bn: *const BIGNUM, to: *mut u8) -> c::size_t {
    let Some(value) = (unsafe { get(bn) }) else {
        return 0;
    };
    let bytes = to_be_bytes(value);
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), to, bytes.len()) };
    bytes.len()
}

/// # Safety
///
/// `bn` must be null or a live integer.
pub(super) unsafe fn num_bits(bn: *const BIGNUM) -> c::uint {
    unsafe { get(bn) }.map_or(0, |value| {
        c::uint::try_from(value.bits()).unwrap_or(c::uint::MAX)
    })
}

/// # Safety
///
/// `bn` must be null or a live integer nothing else is looking at.
pub(super) unsafe fn set_word(bn: *mut BIGNUM, w: u64) -> Result<()> {
    let value = unsafe { get_mut(bn) }.ok_or(Reason::bn(sys::ERR_R_PASSED_NULL_PARAMETER))?;
    *value = BigUint::from(w);
    Ok(())
}

/// # Safety
///
/// Both must be live integers.
pub(super) unsafe fn cmp(a: *const BIGNUM, b: *const BIGNUM) -> c::int {
    match unsafe { (get(a), get(b)) } {
        (Some(a), Some(b)) => a.cmp(b) as c::int,
        // Null sorts first.
        (a, b) => a.is_some() as c::int - b.is_some() as c::int,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin2bn_reuses_its_target() {
        let bn = new();
        let bytes = [0x01, 0x00, 0x01];
        let same = unsafe { bin2bn(bytes.as_ptr(), bytes.len(), bn) }.unwrap();
        assert_eq!(same, bn);
        assert_eq!(unsafe { num_bits(bn) }, 17);
        assert_eq!(unsafe { get(bn) }, Some(&BigUint::from(65537u32)));
        unsafe { free(bn) };
    }

    #[test]
    fn zero_encodes_as_nothing() {
        let bn = unsafe { bin2bn(ptr::null(), 0, ptr::null_mut()) }.unwrap();
        let mut out = [0xaa; 4];
        assert_eq!(unsafe { bn2bin(bn, out.as_mut_ptr()) }, 0);
        assert_eq!(out, [0xaa; 4]);
        assert_eq!(unsafe { num_bits(bn) }, 0);
        unsafe { free(bn) };
    }

    #[test]
    fn leading_zeros_are_dropped() {
        let bytes = [0x00, 0x00, 0x80, 0x01];
        let bn = unsafe { bin2bn(bytes.as_ptr(), bytes.len(), ptr::null_mut()) }.unwrap();
        let mut out = [0u8; 4];
        assert_eq!(unsafe { bn2bin(bn, out.as_mut_ptr()) }, 2);
        assert_eq!(&out[..2], &[0x80, 0x01]);
        unsafe { free(bn) };
    }

    #[test]
    fn null_input_is_rejected() {
        assert_eq!(
            unsafe { bin2bn(ptr::null(), 3, ptr::null_mut()) },
            Err(Reason::bn(sys::ERR_R_PASSED_NULL_PARAMETER))
        );
        assert!(unsafe { dup(ptr::null()) }.is_err());
    }

    #[test]
    fn comparison() {
        let small = into_raw(BigUint::from(3u8));
        let large = into_raw(BigUint::from(65537u32));
        unsafe {
            assert_eq!(cmp(small, large), -1);
            assert_eq!(cmp(large, small), 1);
            assert_eq!(cmp(small, small), 0);
            assert_eq!(set_word(small, 65537), Ok(()));
            assert_eq!(cmp(small, large), 0);
            free(small);
            free(large);
        }
    }
}
