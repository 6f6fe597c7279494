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

//! Ciphers for protecting exported private keys.

use crate::{c, sys};

/// A symmetric cipher, identified by its backend NID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cipher {
    nid: c::int,
    name: &'static str,
}

impl Cipher {
    /// AES-128 in CBC mode.
    pub const fn aes_128_cbc() -> Self {
        Self {
            nid: sys::NID_aes_128_cbc,
            name: "AES-128-CBC",
        }
    }

    /// AES-256 in CBC mode.
    pub const fn aes_256_cbc() -> Self {
        Self {
            nid: sys::NID_aes_256_cbc,
            name: "AES-256-CBC",
        }
    }

    /// The backend's identifier for the cipher.
    pub fn nid(&self) -> c::int {
        self.nid
    }

    /// The cipher's conventional name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}
