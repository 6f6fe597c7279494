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

//! The interface to a cryptographic backend.
//!
//! A backend owns every native object the key core touches: big integers,
//! RSA key records and generic key containers. Its functions have the shape
//! of a C library's: raw pointers in and out, `int` status returns, and a
//! thread-local queue of packed error codes describing the last failure.
//! [`soft::Soft`](crate::soft::Soft) is one implementation; a binding to a C
//! library whose `RSA` struct has the [`rsa_st`](crate::sys::rsa_st) layout
//! would be another.
//!
//! Status conventions, unless a function says otherwise:
//!
//! * `int`-returning functions return 1 on success and 0 or a negative value
//!   on failure.
//! * pointer-returning functions return null on failure.
//! * lengths are returned as non-negative `int`s, with -1 for failure.
//!
//! On failure the backend pushes at least one code onto its error queue.

use crate::{
    bio::MemBio,
    c,
    sys::{pem_password_cb, BIGNUM, BN_GENCB, EVP_PKEY, RSA},
};
use core::ffi::c_void;

/// A cryptographic backend.
///
/// # Safety
///
/// Implementations must honour the contracts documented on each function.
/// In particular:
///
/// * `rsa_new` returns a record laid out as [`rsa_st`](crate::sys::rsa_st)
///   with a reference count of one, and the key core is allowed to read and
///   replace the `BIGNUM` pointers in its `n` through `iqmp` slots directly.
///   Integers stored there must be ones `bn_free` accepts.
/// * `rsa_free` and `evp_pkey_free` decrement the reference count and destroy
///   the object only when it reaches zero.
/// * While a record's reference count exceeds one, an integer replaced in
///   one of its slots must not be freed, since another holder of the record
///   may still be looking at it. It is abandoned instead.
/// * Functions taking a `pem_password_cb` call it (if any) only before they
///   return, and treat a null callback with a non-null `u` as a
///   NUL-terminated password.
pub unsafe trait Backend: 'static {
    // Error queue.

    /// Removes and returns the oldest code on this thread's error queue, or 0.
    fn err_get_error() -> c::ulong;

    /// Empties this thread's error queue.
    fn err_clear_error();

    /// A description of the reason packed into `packed`, if known.
    fn err_reason_string(packed: c::ulong) -> Option<&'static str>;

    // Big integers.

    /// Allocates a big integer with the value zero.
    ///
    /// # Safety
    ///
    /// The result must eventually be passed to `bn_free` or stored in a record.
    unsafe fn bn_new() -> *mut BIGNUM;

    /// Frees a big integer. Null is ignored.
    ///
    /// # Safety
    ///
    /// `bn` must be null or a live integer from this backend that nothing else
    /// refers to.
    unsafe fn bn_free(bn: *mut BIGNUM);

    /// Returns a newly-allocated copy of `bn`.
    ///
    /// # Safety
    ///
    /// `bn` must be a live integer from this backend.
    unsafe fn bn_dup(bn: *const BIGNUM) -> *mut BIGNUM;

    /// Sets `ret` (or a new integer if `ret` is null) to the big-endian value
    /// of the `len` bytes at `s` and returns it.
    ///
    /// # Safety
    ///
    /// `s` must be valid for `len` bytes (it may be null when `len` is zero),
    /// and `ret` must be null or a live integer from this backend.
    unsafe fn bn_bin2bn(s: *const u8, len: c::size_t, ret: *mut BIGNUM) -> *mut BIGNUM;

    /// Writes the minimal big-endian encoding of `bn` to `to` and returns its
    /// length, which is `(bn_num_bits(bn) + 7) / 8`.
    ///
    /// # Safety
    ///
    /// `bn` must be a live integer from this backend and `to` must be valid
    /// for that many bytes.
    unsafe fn bn_bn2bin(bn: *const BIGNUM, to: *mut u8) -> c::size_t;

    /// The position of the highest set bit of `bn`, or zero for zero.
    ///
    /// # Safety
    ///
    /// `bn` must be a live integer from this backend.
    unsafe fn bn_num_bits(bn: *const BIGNUM) -> c::uint;

    /// Sets `bn` to `w`.
    ///
    /// # Safety
    ///
    /// `bn` must be a live integer from this backend.
    unsafe fn bn_set_word(bn: *mut BIGNUM, w: u64) -> c::int;

    /// Returns -1, 0 or 1 as `a` is less than, equal to, or greater than `b`.
    ///
    /// # Safety
    ///
    /// Both must be live integers from this backend.
    unsafe fn bn_cmp(a: *const BIGNUM, b: *const BIGNUM) -> c::int;

    // RSA key records.

    /// Allocates an empty record with a reference count of one.
    ///
    /// # Safety
    ///
    /// The result must eventually be passed to `rsa_free`.
    unsafe fn rsa_new() -> *mut RSA;

    /// Gives up one reference to `rsa`. Null is ignored.
    ///
    /// # Safety
    ///
    /// `rsa` must be null or a live record from this backend, and the caller
    /// must hold the reference it gives up.
    unsafe fn rsa_free(rsa: *mut RSA);

    /// Adds a reference to `rsa`.
    ///
    /// # Safety
    ///
    /// `rsa` must be a live record from this backend.
    unsafe fn rsa_up_ref(rsa: *mut RSA) -> c::int;

    /// The length of the modulus in bytes, or zero if it isn't set.
    ///
    /// # Safety
    ///
    /// `rsa` must be a live record from this backend.
    unsafe fn rsa_size(rsa: *const RSA) -> c::uint;

    /// Encrypts `flen` bytes at `from` with the public key, writing
    /// `rsa_size(rsa)` bytes to `to`. Returns the output length or -1.
    ///
    /// # Safety
    ///
    /// `from` must be valid for `flen` bytes, `to` must be valid for
    /// `rsa_size(rsa)` bytes, and `rsa` must be a live record.
    unsafe fn rsa_public_encrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int;

    /// Pads and transforms `flen` bytes at `from` with the private key.
    /// Returns the output length or -1.
    ///
    /// # Safety
    ///
    /// As for `rsa_public_encrypt`.
    unsafe fn rsa_private_encrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int;

    /// Recovers the message inside `flen` bytes at `from` with the public key.
    /// Returns the message length, at most `rsa_size(rsa)`, or -1.
    ///
    /// # Safety
    ///
    /// As for `rsa_public_encrypt`.
    unsafe fn rsa_public_decrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int;

    /// Decrypts `flen` bytes at `from` with the private key. Returns the
    /// message length, at most `rsa_size(rsa)`, or -1.
    ///
    /// # Safety
    ///
    /// As for `rsa_public_encrypt`.
    unsafe fn rsa_private_decrypt(
        flen: c::size_t,
        from: *const u8,
        to: *mut u8,
        rsa: *mut RSA,
        padding: c::int,
    ) -> c::int;

    /// Returns 1 if the private key in `rsa` is consistent, 0 if it isn't and
    /// -1 if the check couldn't be performed.
    ///
    /// # Safety
    ///
    /// `rsa` must be a live record from this backend.
    unsafe fn rsa_check_key(rsa: *const RSA) -> c::int;

    /// Generates a `bits`-bit key with public exponent `e` into `rsa`,
    /// reporting progress through `cb` (which may be null).
    ///
    /// # Safety
    ///
    /// `rsa` must be a live record, `e` a live integer, and `cb` null or a
    /// live callback record.
    unsafe fn rsa_generate_key_ex(
        rsa: *mut RSA,
        bits: c::int,
        e: *const BIGNUM,
        cb: *mut BN_GENCB,
    ) -> c::int;

    /// Writes a human-readable description of `rsa`, indented by `offset`
    /// spaces.
    ///
    /// # Safety
    ///
    /// `rsa` must be a live record from this backend.
    unsafe fn rsa_print(bio: &mut MemBio, rsa: *const RSA, offset: c::int) -> c::int;

    // PEM.

    /// Reads the first `PUBLIC KEY` block (or `RSA PUBLIC KEY` block) from
    /// `bio`, consuming it, and returns a new record holding the key.
    ///
    /// # Safety
    ///
    /// `cb` and `u` must satisfy the password contract described on the
    /// trait.
    unsafe fn pem_read_bio_rsa_pubkey(
        bio: &mut MemBio,
        cb: Option<pem_password_cb>,
        u: *mut c_void,
    ) -> *mut RSA;

    /// Reads the first private key block from `bio`, consuming it, asking
    /// for a password if the block is encrypted.
    ///
    /// # Safety
    ///
    /// As for `pem_read_bio_rsa_pubkey`.
    unsafe fn pem_read_bio_rsa_private_key(
        bio: &mut MemBio,
        cb: Option<pem_password_cb>,
        u: *mut c_void,
    ) -> *mut RSA;

    /// Writes the public half of `rsa` as a `PUBLIC KEY` block.
    ///
    /// # Safety
    ///
    /// `rsa` must be a live record from this backend.
    unsafe fn pem_write_bio_rsa_pubkey(bio: &mut MemBio, rsa: *const RSA) -> c::int;

    /// Writes the private key in `rsa`, encrypted with the cipher named by
    /// `enc` under the `klen`-byte password at `kstr`, or unencrypted when
    /// `enc` is `NID_undef`.
    ///
    /// # Safety
    ///
    /// `rsa` must be a live record and `kstr` valid for `klen` bytes.
    unsafe fn pem_write_bio_rsa_private_key(
        bio: &mut MemBio,
        rsa: *const RSA,
        enc: c::int,
        kstr: *const u8,
        klen: c::size_t,
    ) -> c::int;

    // Generic key containers.

    /// Allocates an empty container with a reference count of one.
    ///
    /// # Safety
    ///
    /// The result must eventually be passed to `evp_pkey_free`.
    unsafe fn evp_pkey_new() -> *mut EVP_PKEY;

    /// Gives up one reference to `pkey`. Null is ignored.
    ///
    /// # Safety
    ///
    /// `pkey` must be null or a live container whose reference the caller
    /// holds.
    unsafe fn evp_pkey_free(pkey: *mut EVP_PKEY);

    /// Adds a reference to `pkey`.
    ///
    /// # Safety
    ///
    /// `pkey` must be a live container.
    unsafe fn evp_pkey_up_ref(pkey: *mut EVP_PKEY) -> c::int;

    /// Stores `rsa` in `pkey`, taking a reference to it.
    ///
    /// # Safety
    ///
    /// Both must be live objects from this backend.
    unsafe fn evp_pkey_set1_rsa(pkey: *mut EVP_PKEY, rsa: *mut RSA) -> c::int;

    /// Returns the record in `pkey` with a new reference, or null.
    ///
    /// # Safety
    ///
    /// `pkey` must be a live container.
    unsafe fn evp_pkey_get1_rsa(pkey: *mut EVP_PKEY) -> *mut RSA;

    /// Returns the record in `pkey` without taking a reference, or null. The
    /// record stays valid while the container holds it.
    ///
    /// # Safety
    ///
    /// `pkey` must be a live container.
    unsafe fn evp_pkey_get0_rsa(pkey: *mut EVP_PKEY) -> *mut RSA;

    /// The type of key in `pkey`, e.g. [`EVP_PKEY_RSA`](crate::sys::EVP_PKEY_RSA),
    /// or `NID_undef` when it is empty.
    ///
    /// # Safety
    ///
    /// `pkey` must be a live container.
    unsafe fn evp_pkey_id(pkey: *const EVP_PKEY) -> c::int;
}
