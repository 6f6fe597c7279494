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
//! RSA records and the operations on them.

use super::{
    bignum,
    error::{Reason, Result},
    padding,
};
use crate::{
    bio::MemBio,
    c,
    rsa::{
        record::{self, rsa_st, Field},
        MAX_BITS, MIN_GENERATED_BITS,
    },
    sys::{self, BIGNUM, BN_GENCB, RSA},
};
use ::rsa::{
    hazmat,
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint, Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey,
};
use core::{
    fmt::Write as _,
    ptr, slice,
    sync::atomic::{fence, Ordering},
};
use rand_core::OsRng;
use sha1::Sha1;
use zeroize::Zeroizing;

pub(super) fn new() -> *mut RSA {
    Box::into_raw(Box::new(rsa_st::new(sys::RSA_FLAG_NO_CONSTTIME)))
}

/// # Safety
///
/// `rsa` must be null or a live record whose reference the caller holds.
pub(super) unsafe fn free(rsa: *mut RSA) {
    if rsa.is_null() {
        return;
    }
    if unsafe { record::references(rsa) }.fetch_sub(1, Ordering::Release) != 1 {
        return;
    }
    fence(Ordering::Acquire);
    for field in Field::ALL {
        unsafe { bignum::free(record::replace(rsa, field, ptr::null_mut())) };
    }
    drop(unsafe { Box::from_raw(rsa) });
}

/// # Safety
///
/// `rsa` must be null or a live record.
pub(super) unsafe fn up_ref(rsa: *mut RSA) -> Result<()> {
    if rsa.is_null() {
        return Err(Reason::rsa(sys::ERR_R_PASSED_NULL_PARAMETER));
    }
    unsafe { record::references(rsa) }.fetch_add(1, Ordering::Relaxed);
    Ok(())
}

/// # Safety
///
/// `rsa` must be a live record.
unsafe fn get<'a>(rsa: *const RSA, field: Field) -> Option<&'a BigUint> {
    unsafe { bignum::get(record::read(rsa, field)) }
}

/// # Safety
///
/// `rsa` must be a live record.
unsafe fn require<'a>(rsa: *const RSA, field: Field) -> Result<&'a BigUint> {
    unsafe { get(rsa, field) }.ok_or(Reason::rsa(sys::RSA_R_VALUE_MISSING))
}

/// Stores `value` in `field`. The integer it replaces is freed only while
/// nobody else holds the record.
///
/// # Safety
///
/// `rsa` must be a live record the caller may mutate.
unsafe fn store(rsa: *mut RSA, field: Field, value: BigUint) {
    let old = unsafe { record::replace(rsa, field, bignum::into_raw(value)) };
    if unsafe { record::references(rsa) }.load(Ordering::Acquire) == 1 {
        unsafe { bignum::free(old) };
    }
}

fn is_odd(value: &BigUint) -> bool {
    bignum::to_be_bytes(value).last().map_or(false, |b| b & 1 == 1)
}

fn byte_len(n: &BigUint) -> usize {
    (n.bits() + 7) / 8
}

/// # Safety
///
/// `rsa` must be a live record.
pub(super) unsafe fn size(rsa: *const RSA) -> c::uint {
    unsafe { get(rsa, Field::N) }.map_or(0, |n| {
        c::uint::try_from(byte_len(n)).unwrap_or(c::uint::MAX)
    })
}

fn key_error(err: ::rsa::Error) -> Reason {
    use ::rsa::Error as E;
    let reason = match err {
        E::ModulusTooLarge => sys::RSA_R_MODULUS_TOO_LARGE,
        E::PublicExponentTooSmall | E::PublicExponentTooLarge | E::InvalidExponent => {
            sys::RSA_R_BAD_E_VALUE
        }
        E::MessageTooLong => sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE,
        _ => sys::RSA_R_KEY_VALIDATION_FAILED,
    };
    Reason::rsa(reason)
}

/// The public key in `rsa`.
///
/// # Safety
///
/// `rsa` must be a live record.
pub(super) unsafe fn public_key(rsa: *const RSA) -> Result<RsaPublicKey> {
    let n = unsafe { require(rsa, Field::N) }?;
    let e = unsafe { require(rsa, Field::E) }?;
    RsaPublicKey::new_with_max_size(n.clone(), e.clone(), MAX_BITS).map_err(key_error)
}

/// The private key in `rsa`, which must have both primes.
///
/// # Safety
///
/// `rsa` must be a live record.
pub(super) unsafe fn private_key(rsa: *const RSA) -> Result<RsaPrivateKey> {
    let [n, e, d, p, q] =
        [Field::N, Field::E, Field::D, Field::P, Field::Q].map(|field| unsafe { get(rsa, field) });
    let (Some(n), Some(e), Some(d), Some(p), Some(q)) = (n, e, d, p, q) else {
        return Err(Reason::rsa(sys::RSA_R_VALUE_MISSING));
    };
    RsaPrivateKey::from_components(n.clone(), e.clone(), d.clone(), vec![p.clone(), q.clone()])
        .map_err(key_error)
}

/// `d mod (p - 1)`, `d mod (q - 1)` and `q^-1 mod p`.
fn crt_params(d: &BigUint, p: &BigUint, q: &BigUint) -> [BigUint; 3] {
    let one = BigUint::from(1u8);
    let two = BigUint::from(2u8);
    [
        d % &(p - &one),
        d % &(q - &one),
        // `p` is prime, so Fermat gives the inverse.
        q.modpow(&(p - &two), p),
    ]
}

/// Fills every field of `rsa` from `key`.
///
/// # Safety
///
/// `rsa` must be a live record the caller may mutate.
pub(super) unsafe fn store_private_key(rsa: *mut RSA, key: &RsaPrivateKey) -> Result<()> {
    let [p, q] = key.primes() else {
        return Err(Reason::rsa(sys::RSA_R_KEY_VALIDATION_FAILED));
    };
    let [dmp1, dmq1, iqmp] = crt_params(key.d(), p, q);
    let values = [
        (Field::N, key.n().clone()),
        (Field::E, key.e().clone()),
        (Field::D, key.d().clone()),
        (Field::P, p.clone()),
        (Field::Q, q.clone()),
        (Field::Dmp1, dmp1),
        (Field::Dmq1, dmq1),
        (Field::Iqmp, iqmp),
    ];
    for (field, value) in values {
        unsafe { store(rsa, field, value) };
    }
    Ok(())
}

/// Fills the public fields of `rsa` from `key`.
///
/// # Safety
///
/// `rsa` must be a live record the caller may mutate.
pub(super) unsafe fn store_public_key(rsa: *mut RSA, key: &RsaPublicKey) {
    unsafe {
        store(rsa, Field::N, key.n().clone());
        store(rsa, Field::E, key.e().clone());
    }
}

/// # Safety
///
/// `from` must be valid for `flen` bytes unless `flen` is zero.
unsafe fn input<'a>(from: *const u8, flen: c::size_t) -> Result<&'a [u8]> {
    match (flen, from.is_null()) {
        (0, _) => Ok(&[]),
        (_, true) => Err(Reason::rsa(sys::ERR_R_PASSED_NULL_PARAMETER)),
        (flen, false) => Ok(unsafe { slice::from_raw_parts(from, flen) }),
    }
}

/// # Safety
///
/// `to` must be valid for `bytes.len()` bytes.
unsafe fn output(to: *mut u8, bytes: &[u8]) -> Result<usize> {
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), to, bytes.len()) };
    Ok(bytes.len())
}

/// `value` as exactly `k` big-endian bytes.
fn left_pad(value: &BigUint, k: usize) -> Zeroizing<Vec<u8>> {
    let bytes = bignum::to_be_bytes(value);
    let mut out = Zeroizing::new(vec![0u8; k]);
    out[k - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Reads an operand no longer than the modulus and smaller than it.
fn operand(bytes: &[u8], n: &BigUint) -> Result<BigUint> {
    if bytes.len() > byte_len(n) {
        return Err(Reason::rsa(sys::RSA_R_DATA_GREATER_THAN_MOD_LEN));
    }
    let value = BigUint::from_bytes_be(bytes);
    if &value >= n {
        return Err(Reason::rsa(sys::RSA_R_DATA_TOO_LARGE_FOR_MODULUS));
    }
    Ok(value)
}

fn raw_public(key: &RsaPublicKey, em: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let m = operand(em, key.n())?;
    Ok(left_pad(&m.modpow(key.e(), key.n()), key.size()))
}

/// The private-key transformation of `em`, blinded and computed with the
/// CRT. The result is checked against the public key before it is returned.
///
/// # Safety
///
/// `rsa` must be a live record.
unsafe fn raw_private(rsa: *const RSA, em: &[u8], x931: bool) -> Result<Zeroizing<Vec<u8>>> {
    let key = unsafe { private_key(rsa) }?;
    let m = operand(em, key.n())?;
    let mut s = hazmat::rsa_decrypt_and_check(&key, Some(&mut OsRng), &m)
        .map_err(|_| Reason::rsa(sys::ERR_R_INTERNAL_ERROR))?;
    if x931 {
        let other = key.n() - &s;
        if other < s {
            s = other;
        }
    }
    Ok(left_pad(&s, key.size()))
}

fn unknown_padding() -> Reason {
    Reason::rsa(sys::RSA_R_UNKNOWN_PADDING_TYPE)
}

/// # Safety
///
/// As for [`Backend::rsa_public_encrypt`](crate::backend::Backend::rsa_public_encrypt).
pub(super) unsafe fn public_encrypt(
    flen: c::size_t,
    from: *const u8,
    to: *mut u8,
    rsa: *mut RSA,
    padding: c::int,
) -> Result<usize> {
    let key = unsafe { public_key(rsa) }?;
    let msg = unsafe { input(from, flen) }?;
    let k = key.size();
    let too_large = |_| Reason::rsa(sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE);
    let out = match padding {
        sys::RSA_PKCS1_PADDING => Zeroizing::new(
            key.encrypt(&mut OsRng, Pkcs1v15Encrypt, msg)
                .map_err(too_large)?,
        ),
        sys::RSA_PKCS1_OAEP_PADDING => Zeroizing::new(
            key.encrypt(&mut OsRng, Oaep::new::<Sha1>(), msg)
                .map_err(too_large)?,
        ),
        sys::RSA_SSLV23_PADDING => {
            raw_public(&key, &padding::add_sslv23(k, msg, &mut OsRng)?)?
        }
        sys::RSA_NO_PADDING => raw_public(&key, &padding::add_none(k, msg)?)?,
        _ => return Err(unknown_padding()),
    };
    unsafe { output(to, &out) }
}

/// # Safety
///
/// As for [`Backend::rsa_private_encrypt`](crate::backend::Backend::rsa_private_encrypt).
pub(super) unsafe fn private_encrypt(
    flen: c::size_t,
    from: *const u8,
    to: *mut u8,
    rsa: *mut RSA,
    padding: c::int,
) -> Result<usize> {
    let msg = unsafe { input(from, flen) }?;
    let k = byte_len(unsafe { require(rsa, Field::N) }?);
    let em = match padding {
        sys::RSA_PKCS1_PADDING => padding::add_pkcs1_type1(k, msg)?,
        sys::RSA_X931_PADDING => padding::add_x931(k, msg)?,
        sys::RSA_NO_PADDING => padding::add_none(k, msg)?,
        _ => return Err(unknown_padding()),
    };
    let em = Zeroizing::new(em);
    let out = unsafe { raw_private(rsa, &em, padding == sys::RSA_X931_PADDING) }?;
    unsafe { output(to, &out) }
}

/// # Safety
///
/// As for [`Backend::rsa_public_decrypt`](crate::backend::Backend::rsa_public_decrypt).
pub(super) unsafe fn public_decrypt(
    flen: c::size_t,
    from: *const u8,
    to: *mut u8,
    rsa: *mut RSA,
    padding: c::int,
) -> Result<usize> {
    if !matches!(
        padding,
        sys::RSA_PKCS1_PADDING | sys::RSA_X931_PADDING | sys::RSA_NO_PADDING
    ) {
        return Err(unknown_padding());
    }
    let key = unsafe { public_key(rsa) }?;
    let c = operand(unsafe { input(from, flen) }?, key.n())?;
    let mut m = c.modpow(key.e(), key.n());
    // An X9.31 block ends in `CC`; if it doesn't, the signer kept `n - s`.
    if padding == sys::RSA_X931_PADDING {
        let low = bignum::to_be_bytes(&m).last().copied().unwrap_or(0);
        if low & 0x0f != 0x0c {
            m = key.n() - &m;
        }
    }
    let em = left_pad(&m, key.size());
    let msg = match padding {
        sys::RSA_PKCS1_PADDING => padding::check_pkcs1_type1(&em)?,
        sys::RSA_X931_PADDING => padding::check_x931(&em)?,
        _ => &em[..],
    };
    unsafe { output(to, msg) }
}

/// # Safety
///
/// As for [`Backend::rsa_private_decrypt`](crate::backend::Backend::rsa_private_decrypt).
pub(super) unsafe fn private_decrypt(
    flen: c::size_t,
    from: *const u8,
    to: *mut u8,
    rsa: *mut RSA,
    padding: c::int,
) -> Result<usize> {
    let ciphertext = unsafe { input(from, flen) }?;
    let msg = match padding {
        sys::RSA_PKCS1_PADDING | sys::RSA_PKCS1_OAEP_PADDING => {
            let key = unsafe { private_key(rsa) }?;
            operand(ciphertext, key.n())?;
            let msg = if padding == sys::RSA_PKCS1_PADDING {
                key.decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, ciphertext)
                    .map_err(|_| Reason::rsa(sys::RSA_R_PADDING_CHECK_FAILED))?
            } else {
                key.decrypt_blinded(&mut OsRng, Oaep::new::<Sha1>(), ciphertext)
                    .map_err(|_| Reason::rsa(sys::RSA_R_OAEP_DECODING_ERROR))?
            };
            Zeroizing::new(msg)
        }
        sys::RSA_SSLV23_PADDING => {
            let em = unsafe { raw_private(rsa, ciphertext, false) }?;
            Zeroizing::new(padding::check_sslv23(&em)?.to_vec())
        }
        sys::RSA_NO_PADDING => unsafe { raw_private(rsa, ciphertext, false) }?,
        _ => return Err(unknown_padding()),
    };
    unsafe { output(to, &msg) }
}

/// Succeeds if the key in `rsa` is consistent, including any CRT values it
/// carries.
///
/// # Safety
///
/// `rsa` must be a live record.
pub(super) unsafe fn check_key(rsa: *const RSA) -> Result<()> {
    let key = unsafe { private_key(rsa) }?;
    key.validate().map_err(key_error)?;
    let [p, q] = key.primes() else {
        return Err(Reason::rsa(sys::RSA_R_KEY_VALIDATION_FAILED));
    };
    let expected = crt_params(key.d(), p, q);
    let checks = [
        (Field::Dmp1, sys::RSA_R_DMP1_NOT_CONGRUENT_TO_D),
        (Field::Dmq1, sys::RSA_R_DMQ1_NOT_CONGRUENT_TO_D),
        (Field::Iqmp, sys::RSA_R_IQMP_NOT_INVERSE_OF_Q),
    ];
    for ((field, reason), expected) in checks.into_iter().zip(&expected) {
        match unsafe { get(rsa, field) } {
            Some(actual) if actual != expected => return Err(Reason::rsa(reason)),
            _ => {}
        }
    }
    Ok(())
}

/// # Safety
///
/// `rsa` must be a live record the caller may mutate, `e` a live integer and
/// `cb` null or a live callback record.
pub(super) unsafe fn generate_key(
    rsa: *mut RSA,
    bits: c::int,
    e: *const BIGNUM,
    cb: *mut BN_GENCB,
) -> Result<()> {
    let e = unsafe { bignum::get(e) }.ok_or(Reason::rsa(sys::ERR_R_PASSED_NULL_PARAMETER))?;
    let bits = usize::try_from(bits).map_err(|_| Reason::rsa(sys::RSA_R_KEY_SIZE_TOO_SMALL))?;
    if bits < MIN_GENERATED_BITS {
        return Err(Reason::rsa(sys::RSA_R_KEY_SIZE_TOO_SMALL));
    }
    if bits > MAX_BITS {
        return Err(Reason::rsa(sys::RSA_R_MODULUS_TOO_LARGE));
    }
    if e.bits() < 2 || !is_odd(e) {
        return Err(Reason::rsa(sys::RSA_R_BAD_E_VALUE));
    }

    // The prime search happens inside `rsa`, so progress is reported at
    // its start and end only.
    if unsafe { sys::bn_gencb_call(cb, 0, 0) } == 0 {
        return Err(Reason::rsa(sys::RSA_R_KEY_VALIDATION_FAILED));
    }
    let key = RsaPrivateKey::new_with_exp(&mut OsRng, bits, e).map_err(key_error)?;
    for n in 0..2 {
        if unsafe { sys::bn_gencb_call(cb, 3, n) } == 0 {
            return Err(Reason::rsa(sys::RSA_R_KEY_VALIDATION_FAILED));
        }
    }
    tracing::trace!(bits, "generated key");
    unsafe { store_private_key(rsa, &key) }
}

fn print_integer(
    out: &mut String,
    indent: usize,
    name: &str,
    value: Option<&BigUint>,
) -> core::fmt::Result {
    let Some(value) = value else {
        return Ok(());
    };
    let bytes = bignum::to_be_bytes(value);
    if bytes.len() <= 8 {
        let small = bytes.iter().fold(0u64, |acc, &b| acc << 8 | u64::from(b));
        return writeln!(out, "{:indent$}{name} {small} (0x{small:x})", "");
    }
    writeln!(out, "{:indent$}{name}", "")?;
    let mut hex = Zeroizing::new(Vec::with_capacity(bytes.len() + 1));
    if bytes[0] & 0x80 != 0 {
        hex.push(0x00);
    }
    hex.extend_from_slice(&bytes);
    let lines = hex.chunks(15).count();
    for (i, line) in hex.chunks(15).enumerate() {
        write!(out, "{:width$}", "", width = indent + 4)?;
        for (j, b) in line.iter().enumerate() {
            if j > 0 {
                out.push(':');
            }
            write!(out, "{b:02x}")?;
        }
        if i + 1 < lines {
            out.push(':');
        }
        out.push('\n');
    }
    Ok(())
}

/// Describes `rsa` in the traditional text form, private parts included.
///
/// # Safety
///
/// `rsa` must be a live record.
pub(super) unsafe fn print(bio: &mut MemBio, rsa: *const RSA, offset: c::int) -> Result<()> {
    let indent = usize::try_from(offset).unwrap_or(0).min(128);
    let n = unsafe { require(rsa, Field::N) }?;
    let private = unsafe { get(rsa, Field::D) }.is_some();
    let value = |field| unsafe { get(rsa, field) };

    let mut out = Zeroizing::new(String::new());
    let written: core::fmt::Result = (|| {
        if private {
            let primes = if value(Field::P).is_some() { 2 } else { 0 };
            writeln!(out, "{:indent$}Private-Key: ({} bit, {primes} primes)", "", n.bits())?;
            print_integer(&mut out, indent, "modulus:", Some(n))?;
            print_integer(&mut out, indent, "publicExponent:", value(Field::E))?;
            print_integer(&mut out, indent, "privateExponent:", value(Field::D))?;
            print_integer(&mut out, indent, "prime1:", value(Field::P))?;
            print_integer(&mut out, indent, "prime2:", value(Field::Q))?;
            print_integer(&mut out, indent, "exponent1:", value(Field::Dmp1))?;
            print_integer(&mut out, indent, "exponent2:", value(Field::Dmq1))?;
            print_integer(&mut out, indent, "coefficient:", value(Field::Iqmp))
        } else {
            writeln!(out, "{:indent$}Public-Key: ({} bit)", "", n.bits())?;
            print_integer(&mut out, indent, "Modulus:", Some(n))?;
            print_integer(&mut out, indent, "Exponent:", value(Field::E))
        }
    })();
    written.map_err(|_| Reason::rsa(sys::ERR_R_INTERNAL_ERROR))?;
    bio.write_str(&out);
    Ok(())
}
