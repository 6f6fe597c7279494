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
//! The padding modes the RustCrypto `rsa` crate doesn't provide: PKCS#1
//! type 1 for raw private-key operations, the SSLv2-compatible PKCS#1 type 2
//! variant, ANSI X9.31, and none at all.
//!
//! Every function works on an encoded message `em` exactly as long as the
//! modulus.

use super::error::{Reason, Result};
use crate::{c, sys};
use core::cmp::Ordering;
use rand_core::RngCore;
use untrusted::{EndOfInput, Input, Reader};

/// The fixed bytes of a PKCS#1 v1.5 block plus its minimum of eight bytes
/// of padding.
pub(super) const PKCS1_PADDING_SIZE: usize = 11;

const SSLV23_MARKER: [u8; 8] = [0x03; 8];

fn read_byte(input: &mut Reader, reason: c::int) -> Result<u8> {
    input.read_byte().map_err(|EndOfInput| Reason::rsa(reason))
}

pub(super) fn add_none(k: usize, msg: &[u8]) -> Result<Vec<u8>> {
    match msg.len().cmp(&k) {
        Ordering::Greater => Err(Reason::rsa(sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE)),
        Ordering::Less => Err(Reason::rsa(sys::RSA_R_DATA_TOO_SMALL_FOR_KEY_SIZE)),
        Ordering::Equal => Ok(msg.to_vec()),
    }
}

/// `00 01 FF.. 00 msg`.
pub(super) fn add_pkcs1_type1(k: usize, msg: &[u8]) -> Result<Vec<u8>> {
    if msg.len() + PKCS1_PADDING_SIZE > k {
        return Err(Reason::rsa(sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE));
    }
    let mut em = Vec::with_capacity(k);
    em.extend_from_slice(&[0x00, 0x01]);
    em.resize(k - msg.len() - 1, 0xff);
    em.push(0x00);
    em.extend_from_slice(msg);
    Ok(em)
}

pub(super) fn check_pkcs1_type1(em: &[u8]) -> Result<&[u8]> {
    if em.len() < PKCS1_PADDING_SIZE {
        return Err(Reason::rsa(sys::RSA_R_DATA_TOO_SMALL_FOR_KEY_SIZE));
    }
    Input::from(em).read_all(Reason::rsa(sys::RSA_R_PADDING_CHECK_FAILED), |input| {
        if read_byte(input, sys::RSA_R_INVALID_PADDING)? != 0x00 {
            return Err(Reason::rsa(sys::RSA_R_INVALID_PADDING));
        }
        if read_byte(input, sys::RSA_R_BLOCK_TYPE_IS_NOT_01)? != 0x01 {
            return Err(Reason::rsa(sys::RSA_R_BLOCK_TYPE_IS_NOT_01));
        }
        let mut pad_len = 0;
        loop {
            match read_byte(input, sys::RSA_R_NULL_BEFORE_BLOCK_MISSING)? {
                0xff => pad_len += 1,
                0x00 => break,
                _ => return Err(Reason::rsa(sys::RSA_R_PADDING_CHECK_FAILED)),
            }
        }
        if pad_len < 8 {
            return Err(Reason::rsa(sys::RSA_R_BAD_PAD_BYTE_COUNT));
        }
        Ok(input.read_bytes_to_end().as_slice_less_safe())
    })
}

/// `00 02 PS 03*8 00 msg`, where `PS` is random and non-zero, telling an
/// SSLv3-capable peer that the sender could have negotiated SSLv3.
pub(super) fn add_sslv23(k: usize, msg: &[u8], rng: &mut impl RngCore) -> Result<Vec<u8>> {
    if msg.len() + PKCS1_PADDING_SIZE > k {
        return Err(Reason::rsa(sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE));
    }
    let mut em = vec![0u8; k];
    em[1] = 0x02;
    let ps_end = k - msg.len() - 1 - SSLV23_MARKER.len();
    fill_non_zero(&mut em[2..ps_end], rng);
    em[ps_end..ps_end + SSLV23_MARKER.len()].copy_from_slice(&SSLV23_MARKER);
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Checks a PKCS#1 type 2 block, refusing one whose padding ends in the
/// SSLv3 marker: a server that understands SSLv3 seeing it means a
/// downgrade happened on the way.
pub(super) fn check_sslv23(em: &[u8]) -> Result<&[u8]> {
    if em.len() < PKCS1_PADDING_SIZE {
        return Err(Reason::rsa(sys::RSA_R_DATA_TOO_SMALL_FOR_KEY_SIZE));
    }
    Input::from(em).read_all(Reason::rsa(sys::RSA_R_PADDING_CHECK_FAILED), |input| {
        let leading = read_byte(input, sys::RSA_R_BLOCK_TYPE_IS_NOT_02)?;
        let block_type = read_byte(input, sys::RSA_R_BLOCK_TYPE_IS_NOT_02)?;
        if (leading, block_type) != (0x00, 0x02) {
            return Err(Reason::rsa(sys::RSA_R_BLOCK_TYPE_IS_NOT_02));
        }
        let rest = input.read_bytes_to_end().as_slice_less_safe();
        let separator = rest
            .iter()
            .position(|&b| b == 0x00)
            .filter(|&pos| pos >= 8)
            .ok_or(Reason::rsa(sys::RSA_R_NULL_BEFORE_BLOCK_MISSING))?;
        if rest[separator - SSLV23_MARKER.len()..separator] == SSLV23_MARKER {
            return Err(Reason::rsa(sys::RSA_R_SSLV3_ROLLBACK_ATTACK));
        }
        Ok(&rest[separator + 1..])
    })
}

/// `6A msg CC` when the message fills the block, else
/// `6B BB.. BA msg CC`.
pub(super) fn add_x931(k: usize, msg: &[u8]) -> Result<Vec<u8>> {
    let pad_len = k
        .checked_sub(msg.len() + 2)
        .ok_or(Reason::rsa(sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE))?;
    let mut em = Vec::with_capacity(k);
    if pad_len == 0 {
        em.push(0x6a);
    } else {
        em.push(0x6b);
        em.resize(pad_len, 0xbb);
        em.push(0xba);
    }
    em.extend_from_slice(msg);
    em.push(0xcc);
    Ok(em)
}

pub(super) fn check_x931(em: &[u8]) -> Result<&[u8]> {
    Input::from(em).read_all(Reason::rsa(sys::RSA_R_INVALID_TRAILER), |input| {
        match read_byte(input, sys::RSA_R_INVALID_HEADER)? {
            0x6a => {}
            0x6b => {
                let mut pad_len = 0;
                loop {
                    match read_byte(input, sys::RSA_R_INVALID_PADDING)? {
                        0xbb => pad_len += 1,
                        0xba => break,
                        _ => return Err(Reason::rsa(sys::RSA_R_INVALID_PADDING)),
                    }
                }
                // At least one `BB` is required, so a block can't end up
                // with a message of exactly `k - 3` bytes.
                if pad_len == 0 {
                    return Err(Reason::rsa(sys::RSA_R_INVALID_PADDING));
                }
            }
            _ => return Err(Reason::rsa(sys::RSA_R_INVALID_HEADER)),
        }
        let rest = input.read_bytes_to_end().as_slice_less_safe();
        match rest.split_last() {
            Some((0xcc, msg)) => Ok(msg),
            _ => Err(Reason::rsa(sys::RSA_R_INVALID_TRAILER)),
        }
    })
}

fn fill_non_zero(buf: &mut [u8], rng: &mut impl RngCore) {
    rng.fill_bytes(buf);
    for b in buf.iter_mut() {
        while *b == 0 {
            let mut one = [0u8; 1];
            rng.fill_bytes(&mut one);
            *b = one[0];
        }
    }
}
