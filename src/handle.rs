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

//! Owned and borrowed handles to reference-counted native objects.

use crate::error::{Error, ErrorCode};
use core::{fmt, ptr::NonNull};

/// A native object type with backend-managed reference counting.
///
/// # Safety
///
/// `up_ref` must atomically add one reference to a live object, and `free`
/// must give one up, destroying the object when none remain.
pub unsafe trait Refcounted {
    /// The native object type.
    type CType;

    /// Adds a reference to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object.
    unsafe fn up_ref(ptr: *mut Self::CType) -> Result<(), ErrorCode>;

    /// Gives up one reference to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object and the caller must hold the
    /// reference being given up.
    unsafe fn free(ptr: *mut Self::CType);
}

/// Whether a [`Handle`] is responsible for releasing its object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// The handle holds a reference and gives it up when dropped.
    Owned,
    /// The handle is a view; whoever produced it keeps the object alive.
    Borrowed,
}

/// A handle to a native object, either owning a reference to it or borrowing
/// one. The ownership is fixed when the handle is created.
///
/// Handles hold a raw pointer and so are neither `Send` nor `Sync`.
pub struct Handle<T: Refcounted> {
    ptr: NonNull<T::CType>,
    ownership: Ownership,
    released: bool,
}

impl<T: Refcounted> Handle<T> {
    /// Wraps `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a live object. If `ownership` is
    /// `Owned`, the caller transfers one reference to the handle; if it is
    /// `Borrowed`, the object must outlive the handle.
    pub unsafe fn new(ptr: *mut T::CType, ownership: Ownership) -> Result<Self, Error> {
        let ptr = NonNull::new(ptr).ok_or(Error::InvalidHandle)?;
        Ok(Self::from_non_null(ptr, ownership))
    }

    pub(crate) fn from_non_null(ptr: NonNull<T::CType>, ownership: Ownership) -> Self {
        Self {
            ptr,
            ownership,
            released: false,
        }
    }

    /// The raw pointer, for passing to the backend.
    #[inline]
    pub fn as_ptr(&self) -> *mut T::CType {
        debug_assert!(!self.released, "handle used after release");
        self.ptr.as_ptr()
    }

    /// The ownership fixed when the handle was created.
    #[inline]
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Whether dropping the handle gives up a reference.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.ownership == Ownership::Owned
    }

    /// Takes a new reference to the object and returns an owning handle for
    /// it. This is the only way to turn a borrowed view into something that
    /// keeps the object alive by itself.
    pub fn take_reference(&self) -> Result<Self, Error> {
        // SAFETY: the object is live for as long as `self` is, owned or not.
        unsafe { T::up_ref(self.as_ptr()) }.map_err(|code| Error::Operation {
            operation: "up_ref",
            code,
        })?;
        Ok(Self::from_non_null(self.ptr, Ownership::Owned))
    }

    fn release(&mut self) {
        debug_assert!(!self.released, "handle released twice");
        if self.released {
            return;
        }
        self.released = true;
        if self.is_owned() {
            // SAFETY: an owned handle holds exactly one reference, given up
            // here and never again.
            unsafe { T::free(self.ptr.as_ptr()) };
        }
    }
}

impl<T: Refcounted> Drop for Handle<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Refcounted> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T: Refcounted> Eq for Handle<T> {}

impl<T: Refcounted> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Handle")
            .field("ptr", &self.ptr)
            .field("ownership", &self.ownership)
            .finish()
    }
}
