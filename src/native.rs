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

//! Conversions of the status values that backend functions return.

use crate::{backend::Backend, c, error::ErrorCode};
use core::ptr::NonNull;

/// An `int` returned from a backend function containing **1** if the function
/// was successful or **0** (or a negative value) if an error occurred.
#[must_use]
#[repr(transparent)]
pub(crate) struct Status(c::int);

impl Status {
    #[inline]
    pub(crate) fn new(ret: c::int) -> Self {
        Self(ret)
    }

    /// Converts the status, draining the backend error queue on failure.
    pub(crate) fn into_result<B: Backend>(self) -> Result<(), ErrorCode> {
        match self.0 {
            1 => Ok(()),
            c => {
                debug_assert!(c <= 0, "status value must be 1, 0 or negative");
                Err(last_error::<B>())
            }
        }
    }
}

/// Converts a returned length, where a negative value signals failure.
pub(crate) fn length<B: Backend>(ret: c::int) -> Result<usize, ErrorCode> {
    usize::try_from(ret).map_err(|_| last_error::<B>())
}

/// Converts a returned pointer, where null signals failure.
pub(crate) fn non_null<B: Backend, T>(ptr: *mut T) -> Result<NonNull<T>, ErrorCode> {
    NonNull::new(ptr).ok_or_else(last_error::<B>)
}

/// Takes the oldest code on the backend error queue and clears the rest.
pub(crate) fn last_error<B: Backend>() -> ErrorCode {
    let packed = B::err_get_error();
    B::err_clear_error();
    ErrorCode::new(packed, B::err_reason_string(packed))
}

/// Discards whatever an earlier call left on the error queue.
#[inline]
pub(crate) fn clear_errors<B: Backend>() {
    B::err_clear_error();
}
