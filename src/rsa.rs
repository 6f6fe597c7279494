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

//! RSA key objects.
//!
//! An [`Rsa`] wraps a native key record. The record belongs to the backend,
//! and the object either owns a reference to it or borrows it (see
//! [`Ownership`](crate::handle::Ownership)). Key material is read and written
//! one field at a time through the record's native layout; see [`record`].

pub use self::{
    key::Rsa,
    padding::Padding,
    record::{Field, Flags},
};

mod key;
mod padding;
pub mod record;

/// The smallest modulus, in bits, [`Rsa::generate_keys`] will produce.
pub const MIN_GENERATED_BITS: usize = 512;

/// The largest modulus, in bits, this crate handles.
pub const MAX_BITS: usize = 16384;
