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
//! The thread-local error queue.

use crate::{c, sys};
use core::ptr;
use std::{cell::RefCell, collections::VecDeque};

thread_local! {
    static QUEUE: RefCell<VecDeque<c::ulong>> = const { RefCell::new(VecDeque::new()) };
}

/// A failure, as a library and reason code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Reason {
    lib: c::int,
    reason: c::int,
}

impl Reason {
    pub(super) const fn new(lib: c::int, reason: c::int) -> Self {
        Self { lib, reason }
    }

    pub(super) const fn bn(reason: c::int) -> Self {
        Self::new(sys::ERR_LIB_BN, reason)
    }

    pub(super) const fn rsa(reason: c::int) -> Self {
        Self::new(sys::ERR_LIB_RSA, reason)
    }

    pub(super) const fn evp(reason: c::int) -> Self {
        Self::new(sys::ERR_LIB_EVP, reason)
    }

    pub(super) const fn pem(reason: c::int) -> Self {
        Self::new(sys::ERR_LIB_PEM, reason)
    }

    /// Pushes the failure onto this thread's queue.
    pub(super) fn raise(self) {
        tracing::trace!(lib = self.lib, reason = self.reason, "backend error");
        QUEUE.with(|queue| {
            queue
                .borrow_mut()
                .push_back(sys::err_pack(self.lib, self.reason))
        });
    }
}

pub(super) type Result<T> = core::result::Result<T, Reason>;

pub(super) fn get() -> c::ulong {
    QUEUE.with(|queue| queue.borrow_mut().pop_front().unwrap_or(0))
}

pub(super) fn clear() {
    QUEUE.with(|queue| queue.borrow_mut().clear())
}

pub(super) fn into_status(result: Result<()>) -> c::int {
    match result {
        Ok(()) => 1,
        Err(reason) => {
            reason.raise();
            0
        }
    }
}

pub(super) fn into_len(result: Result<usize>) -> c::int {
    let result = result.and_then(|len| {
        c::int::try_from(len).map_err(|_| Reason::rsa(sys::ERR_R_INTERNAL_ERROR))
    });
    match result {
        Ok(len) => len,
        Err(reason) => {
            reason.raise();
            -1
        }
    }
}

pub(super) fn into_ptr<T>(result: Result<*mut T>) -> *mut T {
    result.unwrap_or_else(|reason| {
        reason.raise();
        ptr::null_mut()
    })
}

pub(super) fn reason_string(packed: c::ulong) -> Option<&'static str> {
    let lib = ((packed >> 24) & 0xff) as c::int;
    let reason = (packed & 0xfff) as c::int;
    let s = match (lib, reason) {
        (_, sys::ERR_R_MALLOC_FAILURE) => "malloc failure",
        (_, sys::ERR_R_PASSED_NULL_PARAMETER) => "passed a null parameter",
        (_, sys::ERR_R_INTERNAL_ERROR) => "internal error",

        (sys::ERR_LIB_BN, sys::BN_R_BIGNUM_TOO_LONG) => "bignum too long",

        (sys::ERR_LIB_RSA, sys::RSA_R_BAD_E_VALUE) => "bad e value",
        (sys::ERR_LIB_RSA, sys::RSA_R_BAD_PAD_BYTE_COUNT) => "bad pad byte count",
        (sys::ERR_LIB_RSA, sys::RSA_R_BLOCK_TYPE_IS_NOT_01) => "block type is not 01",
        (sys::ERR_LIB_RSA, sys::RSA_R_BLOCK_TYPE_IS_NOT_02) => "block type is not 02",
        (sys::ERR_LIB_RSA, sys::RSA_R_DATA_GREATER_THAN_MOD_LEN) => "data greater than mod len",
        (sys::ERR_LIB_RSA, sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE) => "data too large for key size",
        (sys::ERR_LIB_RSA, sys::RSA_R_DATA_TOO_LARGE_FOR_MODULUS) => "data too large for modulus",
        (sys::ERR_LIB_RSA, sys::RSA_R_DATA_TOO_SMALL_FOR_KEY_SIZE) => "data too small for key size",
        (sys::ERR_LIB_RSA, sys::RSA_R_DMP1_NOT_CONGRUENT_TO_D) => "dmp1 not congruent to d",
        (sys::ERR_LIB_RSA, sys::RSA_R_DMQ1_NOT_CONGRUENT_TO_D) => "dmq1 not congruent to d",
        (sys::ERR_LIB_RSA, sys::RSA_R_IQMP_NOT_INVERSE_OF_Q) => "iqmp not inverse of q",
        (sys::ERR_LIB_RSA, sys::RSA_R_INVALID_HEADER) => "invalid header",
        (sys::ERR_LIB_RSA, sys::RSA_R_INVALID_PADDING) => "invalid padding",
        (sys::ERR_LIB_RSA, sys::RSA_R_INVALID_TRAILER) => "invalid trailer",
        (sys::ERR_LIB_RSA, sys::RSA_R_KEY_SIZE_TOO_SMALL) => "key size too small",
        (sys::ERR_LIB_RSA, sys::RSA_R_KEY_VALIDATION_FAILED) => "key validation failed",
        (sys::ERR_LIB_RSA, sys::RSA_R_MODULUS_TOO_LARGE) => "modulus too large",
        (sys::ERR_LIB_RSA, sys::RSA_R_NULL_BEFORE_BLOCK_MISSING) => "null before block missing",
        (sys::ERR_LIB_RSA, sys::RSA_R_OAEP_DECODING_ERROR) => "oaep decoding error",
        (sys::ERR_LIB_RSA, sys::RSA_R_PADDING_CHECK_FAILED) => "padding check failed",
        (sys::ERR_LIB_RSA, sys::RSA_R_SSLV3_ROLLBACK_ATTACK) => "sslv3 rollback attack",
        (sys::ERR_LIB_RSA, sys::RSA_R_UNKNOWN_PADDING_TYPE) => "unknown padding type",
        (sys::ERR_LIB_RSA, sys::RSA_R_VALUE_MISSING) => "value missing",

        (sys::ERR_LIB_EVP, sys::EVP_R_EXPECTING_AN_RSA_KEY) => "expecting an rsa key",

        (sys::ERR_LIB_PEM, sys::PEM_R_BAD_BASE64_DECODE) => "bad base64 decode",
        (sys::ERR_LIB_PEM, sys::PEM_R_BAD_DECRYPT) => "bad decrypt",
        (sys::ERR_LIB_PEM, sys::PEM_R_BAD_END_LINE) => "bad end line",
        (sys::ERR_LIB_PEM, sys::PEM_R_BAD_PASSWORD_READ) => "bad password read",
        (sys::ERR_LIB_PEM, sys::PEM_R_NO_START_LINE) => "no start line",
        (sys::ERR_LIB_PEM, sys::PEM_R_PROBLEMS_GETTING_PASSWORD) => "problems getting password",
        (sys::ERR_LIB_PEM, sys::PEM_R_UNSUPPORTED_CIPHER) => "unsupported cipher",
        (sys::ERR_LIB_PEM, sys::PEM_R_UNSUPPORTED_ENCRYPTION) => "unsupported encryption",
        (sys::ERR_LIB_PEM, sys::PEM_R_ERROR_CONVERTING_PRIVATE_KEY) => {
            "error converting private key"
        }
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_first_in_first_out() {
        clear();
        Reason::rsa(sys::RSA_R_VALUE_MISSING).raise();
        Reason::pem(sys::PEM_R_NO_START_LINE).raise();
        assert_eq!(get(), sys::err_pack(sys::ERR_LIB_RSA, sys::RSA_R_VALUE_MISSING));
        assert_eq!(get(), sys::err_pack(sys::ERR_LIB_PEM, sys::PEM_R_NO_START_LINE));
        assert_eq!(get(), 0);
    }

    #[test]
    fn failed_conversions_queue_their_reason() {
        clear();
        assert_eq!(into_status(Err(Reason::evp(sys::EVP_R_EXPECTING_AN_RSA_KEY))), 0);
        assert_eq!(into_len(Err(Reason::bn(sys::BN_R_BIGNUM_TOO_LONG))), -1);
        assert!(into_ptr::<u8>(Err(Reason::rsa(sys::ERR_R_MALLOC_FAILURE))).is_null());
        assert_eq!(reason_string(get()), Some("expecting an rsa key"));
        assert_eq!(reason_string(get()), Some("bignum too long"));
        assert_eq!(reason_string(get()), Some("malloc failure"));
        assert_eq!(into_len(Ok(256)), 256);
        assert_eq!(get(), 0);
    }

    #[test]
    fn reasons_are_looked_up_per_library() {
        // PADDING_CHECK_FAILED and BIGNUM_TOO_LONG share a value.
        assert_eq!(
            reason_string(sys::err_pack(sys::ERR_LIB_RSA, 114)),
            Some("padding check failed")
        );
        assert_eq!(
            reason_string(sys::err_pack(sys::ERR_LIB_BN, 114)),
            Some("bignum too long")
        );
        assert_eq!(reason_string(sys::err_pack(sys::ERR_LIB_EVP, 999)), None);
    }
}
