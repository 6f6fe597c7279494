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
//! A backend implemented in software on the RustCrypto crates.
//!
//! Records are heap-allocated [`rsa_st`](crate::sys::rsa_st)s, integers are
//! boxed `BigUint`s and the error queue is thread-local, so the key core
//! drives this backend exactly as it would drive a C library.
//!
//! The modular exponentiations behind the raw padding modes are not
//! constant-time; records made here carry
//! [`Flags::NO_CONSTTIME`](crate::rsa::Flags::NO_CONSTTIME) to say so.

use crate::{
    backend::Backend,
    bio::MemBio,
    c,
    sys::{pem_password_cb, BIGNUM, BN_GENCB, EVP_PKEY, RSA},
};
use core::ffi::c_void;

mod bignum;
mod error;
mod padding;
mod pem;
mod pkey;
mod rsa;

/// The software backend.
#[derive(Debug)]
pub enum Soft {}

impl Soft {
    /// Queues the error `reason` from library `lib`, as a failing backend
    /// function would.
    #[cfg(test)]
    pub(crate) fn push_error(lib: c::int, reason: c::int) {
        error::Reason::new(lib, reason).raise();
    }
}

// SAFETY: each function below upholds the contract documented on the trait;
// see the submodules for the details.
unsafe impl Backend for Soft {
    fn err_get_error() -> c::ulong {
        error::get()
    }

    fn err_clear_error() {
        error::clear()
    }

    fn err_reason_string(packed: c::ulong) -> Option<&'static str> {
        error::reason_string(packed)
    }

    unsafe fn bn_new() -> *mut BIGNUM {
        bignum::new()
    }

    unsafe fn bn_free(bn: *mut BIGNUM) {
        unsafe { bignum::free(bn) }
    }

    unsafe fn bn_dup(bn: *const BIGNUM) -> *mut BIGNUM {
        error::into_ptr(unsafe { bignum::dup(bn) })
    }

    unsafe fn bn_bin2bn(s: *const u8, len: c::size_t, ret: *mut BIGNUM) -> *mut BIGNUM {
        error::into_ptr(unsafe { bignum::bin2bn(s, len, ret) })
    }

    unsafe fn bn_bn2bin(bn: *const BIGNUM, to: *mut u8) -> c::size_t {
        unsafe { bignum::bn2bin(bn, to) }
    }

    unsafe fn bn_num_bits(bn: *const BIGNUM) -> c::uint {
        unsafe { bignum::num_bits(bn) }
    }

    unsafe fn bn_set_word(bn: *mut BIGNUM, w: u64) -> c::int {
        error::into_status(unsafe { bignum::set_word(bn, w) })
    }

    unsafe fn bn_cmp(a: *const BIGNUM, b: *const BIGNUM) -> c::int {
        unsafe { bignum::cmp(a, b) }
    }

    unsafe fn rsa_new() -> *mut RSA {
        rsa::new()
    }

    unsafe fn rsa_free(rsa: *mut RSA) {
        unsafe { rsa::free(rsa) }
    }

    unsafe fn rsa_up_ref(rsa: *mut RSA) -> c::int {
        error::into_status(unsafe { rsa::up_ref(rsa) })
    }

    unsafe fn rsa_size(rsa: *const RSA) -> c::uint {
        unsafe { rsa::size(rsa) }
    }

    unsafe fn rsa_public_encrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int {
        error::into_len(unsafe { rsa::public_encrypt(flen, from, to, rsa, padding) })
    }

    unsafe fn rsa_private_encrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int {
        error::into_len(unsafe { rsa::private_encrypt(flen, from, to, rsa, padding) })
    }

    unsafe fn rsa_public_decrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int {
        error::into_len(unsafe { rsa::public_decrypt(flen, from, to, rsa, padding) })
    }

    unsafe fn rsa_private_decrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int {
        error::into_len(unsafe { rsa::private_decrypt(flen, from, to, rsa, padding) })
    }

    unsafe fn rsa_check_key(rsa: *const RSA) -> c::int {
        error::into_status(unsafe { rsa::check_key(rsa) })
    }

    unsafe fn rsa_generate_key_ex(
        rsa: *mut RSA,
        bits: c::int,
        e: *const BIGNUM,
        cb: *mut BN_GENCB,
    ) -> c::int {
        error::into_status(unsafe { rsa::generate_key(rsa, bits, e, cb) })
    }

    unsafe fn rsa_print(bio: &mut MemBio, rsa: *const RSA, offset: c::int) -> c::int {
        error::into_status(unsafe { rsa::print(bio, rsa, offset) })
    }

    unsafe fn pem_read_bio_rsa_pubkey(
        bio: &mut MemBio,
        cb: Option<pem_password_cb>,
        u: *mut c_void,
    ) -> *mut RSA {
        // Public keys are never encrypted, so the password is not consulted.
        let _ = (cb, u);
        error::into_ptr(pem::read_public_key(bio))
    }

    unsafe fn pem_read_bio_rsa_private_key(
        bio: &mut MemBio,
        cb: Option<pem_password_cb>,
        u: *mut c_void,
    ) -> *mut RSA {
        error::into_ptr(unsafe { pem::read_private_key(bio, cb, u) })
    }

    unsafe fn pem_write_bio_rsa_pubkey(bio: &mut MemBio, rsa: *const RSA) -> c::int {
        error::into_status(unsafe { pem::write_public_key(bio, rsa) })
    }

    unsafe fn pem_write_bio_rsa_private_key(
        bio: &mut MemBio,
        rsa: *const RSA,
        enc: c::int,
        kstr: *const u8,
        klen: c::size_t,
    ) -> c::int {
        error::into_status(unsafe { pem::write_private_key(bio, rsa, enc, kstr, klen) })
    }

    unsafe fn evp_pkey_new() -> *mut EVP_PKEY {
        pkey::new()
    }

    unsafe fn evp_pkey_free(pkey: *mut EVP_PKEY) {
        unsafe { pkey::free(pkey) }
    }

    unsafe fn evp_pkey_up_ref(pkey: *mut EVP_PKEY) -> c::int {
        error::into_status(unsafe { pkey::up_ref(pkey) })
    }

    unsafe fn evp_pkey_set1_rsa(pkey: *mut EVP_PKEY, rsa: *mut RSA) -> c::int {
        error::into_status(unsafe { pkey::set1_rsa(pkey, rsa) })
    }

    unsafe fn evp_pkey_get1_rsa(pkey: *mut EVP_PKEY) -> *mut RSA {
        error::into_ptr(unsafe { pkey::get1_rsa(pkey) })
    }

    unsafe fn evp_pkey_get0_rsa(pkey: *mut EVP_PKEY) -> *mut RSA {
        error::into_ptr(unsafe { pkey::get0_rsa(pkey) })
    }

    unsafe fn evp_pkey_id(pkey: *const EVP_PKEY) -> c::int {
        unsafe { pkey::id(pkey) }
    }
}
