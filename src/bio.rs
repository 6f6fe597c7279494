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

//! An in-memory byte channel for PEM text.

use std::io;
use zeroize::Zeroize;

/// A memory-backed source and sink of bytes.
///
/// Writers append at the end; readers consume from the front, so a channel
/// holding several PEM blocks can be read one key at a time. Everything
/// written is wiped when the channel is dropped.
#[derive(Default)]
pub struct MemBio {
    data: Vec<u8>,
    read_pos: usize,
}

impl MemBio {
    /// An empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel holding a copy of `data`, ready to be read.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            read_pos: 0,
        }
    }

    /// Appends `bytes`.
    pub fn write(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Appends `s`.
    pub fn write_str(&mut self, s: &str) {
        self.write(s.as_bytes());
    }

    /// The bytes not yet consumed.
    pub fn pending(&self) -> &[u8] {
        &self.data[self.read_pos..]
    }

    /// Marks the first `n` pending bytes as read.
    pub fn consume(&mut self, n: usize) {
        self.read_pos = self.data.len().min(self.read_pos + n);
    }

    /// Reads everything pending as text. Invalid UTF-8 is replaced.
    pub fn read_string(&mut self) -> String {
        let s = String::from_utf8_lossy(self.pending()).into_owned();
        self.consume(self.len());
        s
    }

    /// The number of bytes not yet consumed.
    pub fn len(&self) -> usize {
        self.data.len() - self.read_pos
    }

    /// Whether everything written has been consumed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for MemBio {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl io::Write for MemBio {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        MemBio::write(self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for MemBio {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.len());
        buf[..n].copy_from_slice(&self.pending()[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl Drop for MemBio {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl core::fmt::Debug for MemBio {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("MemBio")
            .field("pending", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn reads_consume_from_the_front() {
        let mut bio = MemBio::from("first\n");
        bio.write_str("second\n");
        assert_eq!(bio.len(), 13);
        bio.consume(6);
        assert_eq!(bio.pending(), b"second\n");
        assert_eq!(bio.read_string(), "second\n");
        assert!(bio.is_empty());
        assert_eq!(bio.read_string(), "");
    }

    #[test]
    fn consume_saturates() {
        let mut bio = MemBio::from("abc");
        bio.consume(100);
        assert!(bio.is_empty());
    }

    #[test]
    fn io_traits() {
        let mut bio = MemBio::new();
        write!(bio, "{}-{}", 1, 2).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(bio.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"1-");
        let mut rest = Vec::new();
        bio.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"2");
    }
}
