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

use crate::{c, sys};

/// How a message is padded to the modulus length before the RSA
/// transformation.
///
/// Which modes a backend accepts for which of the four primitives is up to
/// the backend; the usual pairing is `Pkcs1`, `Oaep`, `SslV23` and `None`
/// for public encryption and private decryption, and `Pkcs1`, `X931` and
/// `None` for private encryption and public decryption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Padding {
    /// PKCS #1 v1.5: block type 2 for encryption, block type 1 for private
    /// encryption.
    Pkcs1,
    /// PKCS #1 v1.5 block type 2 with the SSLv3 rollback marker.
    SslV23,
    /// No padding; the message must be exactly as long as the modulus.
    None,
    /// PKCS #1 v2 OAEP with SHA-1 and MGF1-SHA-1.
    Oaep,
    /// ANSI X9.31.
    X931,
}

impl Padding {
    /// The backend's constant for this mode.
    pub fn as_native(self) -> c::int {
        match self {
            Self::Pkcs1 => sys::RSA_PKCS1_PADDING,
            Self::SslV23 => sys::RSA_SSLV23_PADDING,
            Self::None => sys::RSA_NO_PADDING,
            Self::Oaep => sys::RSA_PKCS1_OAEP_PADDING,
            Self::X931 => sys::RSA_X931_PADDING,
        }
    }

    /// The mode for a backend constant.
    pub fn from_native(padding: c::int) -> Option<Self> {
        match padding {
            sys::RSA_PKCS1_PADDING => Some(Self::Pkcs1),
            sys::RSA_SSLV23_PADDING => Some(Self::SslV23),
            sys::RSA_NO_PADDING => Some(Self::None),
            sys::RSA_PKCS1_OAEP_PADDING => Some(Self::Oaep),
            sys::RSA_X931_PADDING => Some(Self::X931),
            _ => None,
        }
    }

    /// The longest message this mode can pad for a `modulus_len`-byte key,
    /// or `None` if the key is too small for the mode at all.
    pub fn max_message_len(self, modulus_len: usize) -> Option<usize> {
        let overhead = match self {
            Self::Pkcs1 | Self::SslV23 => 11,
            // Two SHA-1 digests plus two bytes.
            Self::Oaep => 2 * 20 + 2,
            Self::None => 0,
            Self::X931 => 2,
        };
        modulus_len.checked_sub(overhead)
    }
}
