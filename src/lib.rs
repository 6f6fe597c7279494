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

//! RSA key objects over a native, reference-counted key record.
//!
//! The key material lives in a record owned by a cryptographic backend. An
//! [`rsa::Rsa`] either owns that record (and releases it when dropped) or
//! borrows it from whoever does. Field accessors read and write the record
//! in its native layout, the encryption primitives return exactly the bytes
//! the backend produced, and keys move in and out as PEM text, optionally
//! protected by a password held in a [`secret::SecretBuffer`].
//!
//! The backend is anything implementing [`backend::Backend`]. A software
//! implementation, [`soft::Soft`], is built on the RustCrypto crates.
//!
//! ```
//! # #[cfg(feature = "soft-backend")] {
//! use native_rsa::{bn::BigNum, rsa::{Padding, Rsa}, soft::Soft};
//!
//! let e = BigNum::<Soft>::from_u64(65537)?;
//! let mut key = Rsa::<Soft>::new()?;
//! key.generate_keys(1024, &e)?;
//! assert_eq!(key.size()?, 128);
//!
//! let ciphertext = key.public_encrypt(b"attack at dawn", Padding::Oaep)?;
//! let plaintext = key.private_decrypt(&ciphertext, Padding::Oaep)?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # }
//! # Ok::<(), native_rsa::error::Error>(())
//! ```
//!
//! # Feature Flags
//!
//! <table>
//! <tr><th>Feature
//!     <th>Description
//! <tr><td><code>soft-backend (default)</code>
//!     <td>Build <code>soft::Soft</code>, the software backend, and its
//!         RustCrypto dependencies.
//! <tr><td><code>test_logging</code>
//!     <td>Make the <code>test</code> vector reader print every line it
//!         reads.
//! </table>

#![deny(missing_docs, unsafe_op_in_unsafe_fn)]
#![warn(unused_qualifications)]
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::panic, clippy::expect_used)
)]

pub mod backend;
pub mod bio;
pub mod bn;
pub mod c;
pub mod callback;
pub mod cipher;
pub mod error;
mod ffi;
pub mod handle;
mod native;
pub mod pkey;
pub mod rsa;
pub mod secret;
pub mod sys;

#[cfg(feature = "soft-backend")]
pub mod soft;

#[doc(hidden)]
pub mod test;
