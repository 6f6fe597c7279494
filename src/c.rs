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

//! C types.

// Keep in sync with the layout checks in `rsa::record`.

#![allow(non_camel_case_types)]

/// C `int`.
pub type int = core::ffi::c_int;
/// C `unsigned int`.
pub type uint = core::ffi::c_uint;

/// C `long`. Its width is the platform's: 32 bits on Windows (LLP64) and
/// pointer-sized on LP64 and ILP32 Unix targets.
pub type long = core::ffi::c_long;

/// C `unsigned long`; the width of a packed backend error code.
pub type ulong = core::ffi::c_ulong;

/// C `char`.
pub type char = core::ffi::c_char;

// TODO(https://github.com/rust-lang/rust/issues/88345): Use `core::ffi::c_size_t`.
/// C `size_t`.
pub type size_t = usize;
