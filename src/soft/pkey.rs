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
//! Generic key containers.

use super::{
    error::{Reason, Result},
    rsa as record_ops,
};
use crate::{
    c,
    sys::{self, EVP_PKEY, RSA},
};
use core::{
    ptr,
    sync::atomic::{fence, AtomicI32, Ordering},
};

struct PKey {
    references: AtomicI32,
    id: c::int,
    rsa: *mut RSA,
}

/// # Safety
///
/// `pkey` must be null or a live container that stays live for `'a`.
unsafe fn get<'a>(pkey: *const EVP_PKEY) -> Result<&'a PKey> {
    unsafe { pkey.cast::<PKey>().as_ref() }.ok_or(Reason::evp(sys::ERR_R_PASSED_NULL_PARAMETER))
}

pub(super) fn new() -> *mut EVP_PKEY {
    let pkey = PKey {
        references: AtomicI32::new(1),
        id: sys::NID_undef,
        rsa: ptr::null_mut(),
    };
    Box::into_raw(Box::new(pkey)).cast()
}

/// # Safety
///
/// `pkey` must be null or a live container whose reference the caller holds.
pub(super) unsafe fn free(pkey: *mut EVP_PKEY) {
    let Ok(container) = (unsafe { get(pkey) }) else {
        return;
    };
    if container.references.fetch_sub(1, Ordering::Release) != 1 {
        return;
    }
    fence(Ordering::Acquire);
    let container = unsafe { Box::from_raw(pkey.cast::<PKey>()) };
    unsafe { record_ops::free(container.rsa) };
}

/// # Safety
///
/// `pkey` must be null or a live container.
pub(super) unsafe fn up_ref(pkey: *mut EVP_PKEY) -> Result<()> {
    unsafe { get(pkey) }?
        .references
        .fetch_add(1, Ordering::Relaxed);
    Ok(())
}

/// # Safety
///
/// `pkey` must be null or a live container nobody else is using, and `rsa`
/// null or a live record.
pub(super) unsafe fn set1_rsa(pkey: *mut EVP_PKEY, rsa: *mut RSA) -> Result<()> {
    unsafe { get(pkey) }?;
    unsafe { record_ops::up_ref(rsa) }?;
    // SAFETY: checked non-null above; the caller promises exclusive use.
    let container = unsafe { &mut *pkey.cast::<PKey>() };
    let old = core::mem::replace(&mut container.rsa, rsa);
    container.id = sys::EVP_PKEY_RSA;
    unsafe { record_ops::free(old) };
    Ok(())
}

/// # Safety
///
/// `pkey` must be null or a live container.
pub(super) unsafe fn get0_rsa(pkey: *mut EVP_PKEY) -> Result<*mut RSA> {
    let container = unsafe { get(pkey) }?;
    if container.rsa.is_null() {
        return Err(Reason::evp(sys::EVP_R_EXPECTING_AN_RSA_KEY));
    }
    Ok(container.rsa)
}

/// # Safety
///
/// `pkey` must be null or a live container.
pub(super) unsafe fn get1_rsa(pkey: *mut EVP_PKEY) -> Result<*mut RSA> {
    let rsa = unsafe { get0_rsa(pkey) }?;
    unsafe { record_ops::up_ref(rsa) }?;
    Ok(rsa)
}

/// # Safety
///
/// `pkey` must be null or a live container.
pub(super) unsafe fn id(pkey: *const EVP_PKEY) -> c::int {
    unsafe { get(pkey) }.map_or(sys::NID_undef, |container| container.id)
}
