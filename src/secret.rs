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

//! Passwords and other secrets held in memory that is wiped on release.

use core::fmt;
use zeroize::Zeroizing;

/// A growable buffer of secret bytes, typically a password.
///
/// The contents are zeroed when the buffer is dropped, and growing it never
/// leaves a stale copy behind in a freed allocation. The bytes are only
/// handed out for the duration of a backend call.
#[derive(Clone, Default)]
pub struct SecretBuffer {
    bytes: Zeroizing<Vec<u8>>,
}

impl SecretBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::with_capacity(bytes.len());
        buffer.bytes.extend_from_slice(bytes);
        buffer
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Zeroizing::new(Vec::with_capacity(capacity)),
        }
    }

    /// Appends the UTF-8 encoding of `c`.
    pub fn push_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        let encoded = c.encode_utf8(&mut utf8);
        self.push_bytes(encoded.as_bytes());
        zeroize::Zeroize::zeroize(&mut utf8);
    }

    /// Appends `bytes`.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let needed = self.bytes.len() + bytes.len();
        if needed > self.bytes.capacity() {
            // Move into a fresh allocation so the old one is wiped by
            // `Zeroizing` rather than released as-is by `Vec`'s growth.
            let mut grown = Self::with_capacity(needed.max(2 * self.bytes.capacity()));
            grown.bytes.extend_from_slice(&self.bytes);
            *self = grown;
        }
        self.bytes.extend_from_slice(bytes);
    }

    /// The number of bytes held.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }

    /// Calls `f` with a NUL-terminated copy of the secret and its length
    /// (excluding the NUL). The copy is wiped when `f` returns or unwinds.
    pub(crate) fn with_c_str<R>(&self, f: impl FnOnce(*const u8, usize) -> R) -> R {
        let mut terminated = Self::with_capacity(self.len() + 1);
        terminated.bytes.extend_from_slice(&self.bytes);
        terminated.bytes.push(0);
        f(terminated.bytes.as_ptr(), self.len())
    }
}

impl From<&str> for SecretBuffer {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<String> for SecretBuffer {
    fn from(s: String) -> Self {
        Self {
            bytes: Zeroizing::new(s.into_bytes()),
        }
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
