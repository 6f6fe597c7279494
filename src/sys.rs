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

//! Native types and constants shared by the key core and backends.
//!
//! Names follow the C library conventions they mirror.

#![allow(missing_docs, non_camel_case_types, non_upper_case_globals)]

use crate::c;
use core::{
    ffi::c_void,
    marker::{PhantomData, PhantomPinned},
};

pub use crate::rsa::record::rsa_st;

/// The native RSA key record.
pub type RSA = rsa_st;

/// An arbitrary-precision integer owned by the backend. Opaque.
#[repr(C)]
pub struct BIGNUM {
    _opaque: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// A generic key container owned by the backend. Opaque.
#[repr(C)]
pub struct EVP_PKEY {
    _opaque: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// A key-generation progress callback.
pub type bn_gencb_fn = unsafe extern "C" fn(p: c::int, n: c::int, cb: *mut BN_GENCB) -> c::int;

/// Key-generation callback record, in its "new style" (`ver == 2`) form.
#[repr(C)]
pub struct BN_GENCB {
    /// Callback style; always [`BN_GENCB_VERSION`].
    pub ver: c::uint,
    /// Opaque argument for the callback.
    pub arg: *mut c_void,
    /// The callback.
    pub cb: Option<bn_gencb_fn>,
}

/// The value of [`BN_GENCB::ver`].
pub const BN_GENCB_VERSION: c::uint = 2;

/// Reports progress through `cb`, which may be null.
///
/// Returns the callback's verdict, or 1 when there is no callback.
///
/// # Safety
///
/// `cb` must be null or point to a live `BN_GENCB`.
pub unsafe fn bn_gencb_call(cb: *mut BN_GENCB, p: c::int, n: c::int) -> c::int {
    if cb.is_null() {
        return 1;
    }
    // SAFETY: the caller promises `cb` is live.
    match unsafe { (*cb).cb } {
        Some(f) => unsafe { f(p, n, cb) },
        None => 1,
    }
}

/// Supplies a password for PEM encryption or decryption.
///
/// Writes at most `size` bytes into `buf` and returns how many it wrote, or
/// a value `<= 0` to refuse. `rwflag` is 0 when decrypting and 1 when
/// encrypting.
pub type pem_password_cb =
    unsafe extern "C" fn(buf: *mut c::char, size: c::int, rwflag: c::int, u: *mut c_void) -> c::int;

/// The largest password a backend asks a [`pem_password_cb`] for.
pub const PEM_BUFSIZE: c::int = 1024;

pub const NID_undef: c::int = 0;
pub const NID_rsaEncryption: c::int = 6;
pub const NID_aes_128_cbc: c::int = 419;
pub const NID_aes_256_cbc: c::int = 427;

/// [`evp_pkey_id`](crate::backend::Backend::evp_pkey_id) of a container
/// holding an RSA key.
pub const EVP_PKEY_RSA: c::int = NID_rsaEncryption;

pub const RSA_PKCS1_PADDING: c::int = 1;
pub const RSA_SSLV23_PADDING: c::int = 2;
pub const RSA_NO_PADDING: c::int = 3;
pub const RSA_PKCS1_OAEP_PADDING: c::int = 4;
pub const RSA_X931_PADDING: c::int = 5;

pub const RSA_FLAG_CACHE_PUBLIC: c::int = 0x0002;
pub const RSA_FLAG_CACHE_PRIVATE: c::int = 0x0004;
pub const RSA_FLAG_BLINDING: c::int = 0x0008;
pub const RSA_FLAG_NO_CONSTTIME: c::int = 0x0100;

/// Packs a library and reason number into an error-queue code.
pub const fn err_pack(lib: c::int, reason: c::int) -> c::ulong {
    (((lib as c::ulong) & 0xff) << 24) | ((reason as c::ulong) & 0xfff)
}

pub const ERR_LIB_BN: c::int = 3;
pub const ERR_LIB_RSA: c::int = 4;
pub const ERR_LIB_EVP: c::int = 6;
pub const ERR_LIB_PEM: c::int = 9;

pub const ERR_R_MALLOC_FAILURE: c::int = 65;
pub const ERR_R_PASSED_NULL_PARAMETER: c::int = 67;
pub const ERR_R_INTERNAL_ERROR: c::int = 68;

pub const BN_R_BIGNUM_TOO_LONG: c::int = 114;

pub const RSA_R_BAD_E_VALUE: c::int = 101;
pub const RSA_R_BAD_PAD_BYTE_COUNT: c::int = 103;
pub const RSA_R_BLOCK_TYPE_IS_NOT_01: c::int = 106;
pub const RSA_R_BLOCK_TYPE_IS_NOT_02: c::int = 107;
pub const RSA_R_DATA_GREATER_THAN_MOD_LEN: c::int = 108;
pub const RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE: c::int = 110;
pub const RSA_R_DATA_TOO_LARGE_FOR_MODULUS: c::int = 132;
pub const RSA_R_DATA_TOO_SMALL_FOR_KEY_SIZE: c::int = 111;
pub const RSA_R_DMP1_NOT_CONGRUENT_TO_D: c::int = 124;
pub const RSA_R_DMQ1_NOT_CONGRUENT_TO_D: c::int = 125;
pub const RSA_R_IQMP_NOT_INVERSE_OF_Q: c::int = 126;
pub const RSA_R_INVALID_HEADER: c::int = 137;
pub const RSA_R_INVALID_PADDING: c::int = 138;
pub const RSA_R_INVALID_TRAILER: c::int = 139;
pub const RSA_R_KEY_SIZE_TOO_SMALL: c::int = 120;
pub const RSA_R_KEY_VALIDATION_FAILED: c::int = 127;
pub const RSA_R_MODULUS_TOO_LARGE: c::int = 105;
pub const RSA_R_NULL_BEFORE_BLOCK_MISSING: c::int = 113;
pub const RSA_R_OAEP_DECODING_ERROR: c::int = 121;
pub const RSA_R_PADDING_CHECK_FAILED: c::int = 114;
pub const RSA_R_SSLV3_ROLLBACK_ATTACK: c::int = 115;
pub const RSA_R_UNKNOWN_PADDING_TYPE: c::int = 118;
pub const RSA_R_VALUE_MISSING: c::int = 147;

pub const EVP_R_EXPECTING_AN_RSA_KEY: c::int = 127;

pub const PEM_R_BAD_DECRYPT: c::int = 101;
pub const PEM_R_BAD_END_LINE: c::int = 102;
pub const PEM_R_BAD_PASSWORD_READ: c::int = 104;
pub const PEM_R_NO_START_LINE: c::int = 108;
pub const PEM_R_PROBLEMS_GETTING_PASSWORD: c::int = 109;
pub const PEM_R_BAD_BASE64_DECODE: c::int = 100;
pub const PEM_R_UNSUPPORTED_CIPHER: c::int = 113;
pub const PEM_R_UNSUPPORTED_ENCRYPTION: c::int = 114;
pub const PEM_R_ERROR_CONVERTING_PRIVATE_KEY: c::int = 115;
