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

//! Adapters that let the backend call back into Rust during a call.
//!
//! Each adapter puts a thunk holding the caller's closure on the stack, hands
//! the backend an `extern "C"` trampoline plus a pointer to the thunk, and
//! tears the thunk down when the backend call returns. Panics never unwind
//! through the backend: the trampoline catches the first one, reports
//! failure, and the adapter re-raises it once the backend has returned.

use crate::{
    c,
    secret::SecretBuffer,
    sys::{pem_password_cb, BN_GENCB, BN_GENCB_VERSION},
};
use core::ffi::c_void;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

/// Why a password is being asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordPurpose {
    /// To decrypt a key being read.
    Decrypt,
    /// To encrypt a key being written.
    Encrypt,
}

/// A key-generation progress report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    stage: c::int,
    count: c::int,
}

impl Progress {
    /// What the backend is doing.
    pub fn stage(&self) -> Stage {
        match self.stage {
            0 => Stage::Candidate,
            1 => Stage::Testing,
            2 => Stage::Rejected,
            3 => Stage::Found,
            other => Stage::Other(other),
        }
    }

    /// Which candidate, round, or prime the report is about.
    pub fn count(&self) -> c::int {
        self.count
    }
}

/// The stages of a [`Progress`] report, numbered as the backends number them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// A candidate prime was generated.
    Candidate,
    /// A primality test round ran.
    Testing,
    /// A candidate was discarded.
    Rejected,
    /// A prime was found.
    Found,
    /// A backend-specific stage.
    Other(c::int),
}

struct Thunk<F> {
    callback: F,
    panic: Option<Box<dyn Any + Send + 'static>>,
}

impl<F> Thunk<F> {
    fn new(callback: F) -> Self {
        Self {
            callback,
            panic: None,
        }
    }

    /// Runs `f` on the callback unless an earlier call panicked. A panic is
    /// stored, and `failed` is returned instead.
    fn call<R>(&mut self, failed: R, f: impl FnOnce(&mut F) -> R) -> R {
        if self.panic.is_some() {
            return failed;
        }
        let callback = &mut self.callback;
        match panic::catch_unwind(AssertUnwindSafe(|| f(callback))) {
            Ok(r) => r,
            Err(payload) => {
                self.panic = Some(payload);
                failed
            }
        }
    }

    fn finish(self) {
        if let Some(payload) = self.panic {
            tracing::warn!("callback panicked during a backend call; resuming the panic");
            panic::resume_unwind(payload);
        }
    }
}

unsafe extern "C" fn password_trampoline<F>(
    buf: *mut c::char,
    size: c::int,
    rwflag: c::int,
    u: *mut c_void,
) -> c::int
where
    F: FnMut(PasswordPurpose) -> Option<SecretBuffer>,
{
    // SAFETY: `u` is the thunk `with_password_callback` installed, which is
    // alive and not otherwise borrowed while the backend call runs.
    let thunk = unsafe { &mut *u.cast::<Thunk<F>>() };
    let purpose = if rwflag == 0 {
        PasswordPurpose::Decrypt
    } else {
        PasswordPurpose::Encrypt
    };
    let Some(password) = thunk.call(None, |callback| callback(purpose)) else {
        return -1;
    };
    let bytes = password.expose();
    let fits = usize::try_from(size).map_or(false, |size| bytes.len() <= size);
    if buf.is_null() || !fits {
        return -1;
    }
    // SAFETY: the backend provided `size` writable bytes at `buf`.
    unsafe { core::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), bytes.len()) };
    c::int::try_from(bytes.len()).unwrap_or(-1)
}

/// Calls `f` with a password callback and its argument, both valid until
/// `f` returns, that ask `callback` for the password.
pub(crate) fn with_password_callback<F, R>(
    callback: F,
    f: impl FnOnce(pem_password_cb, *mut c_void) -> R,
) -> R
where
    F: FnMut(PasswordPurpose) -> Option<SecretBuffer>,
{
    let mut thunk = Thunk::new(callback);
    let ret = f(password_trampoline::<F>, (&mut thunk as *mut Thunk<F>).cast());
    thunk.finish();
    ret
}

unsafe extern "C" fn progress_trampoline<F>(p: c::int, n: c::int, cb: *mut BN_GENCB) -> c::int
where
    F: FnMut(Progress),
{
    // SAFETY: `cb` is the record `with_gencb` built, whose `arg` is the live
    // thunk.
    let thunk = unsafe { &mut *(*cb).arg.cast::<Thunk<F>>() };
    thunk.call((), |callback| callback(Progress { stage: p, count: n }));
    // Progress reports can't stop generation.
    1
}

/// Calls `f` with a generation callback record, valid until `f` returns, that
/// forwards progress to `callback`.
pub(crate) fn with_gencb<F, R>(callback: F, f: impl FnOnce(*mut BN_GENCB) -> R) -> R
where
    F: FnMut(Progress),
{
    let mut thunk = Thunk::new(callback);
    let mut cb = BN_GENCB {
        ver: BN_GENCB_VERSION,
        arg: (&mut thunk as *mut Thunk<F>).cast(),
        cb: Some(progress_trampoline::<F>),
    };
    let ret = f(&mut cb);
    thunk.finish();
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys;

    fn ask(cb: pem_password_cb, u: *mut c_void, rwflag: c::int) -> Option<Vec<u8>> {
        let mut buf = [0 as c::char; 16];
        let n = unsafe { cb(buf.as_mut_ptr(), buf.len() as c::int, rwflag, u) };
        let n = usize::try_from(n).ok()?;
        Some(buf[..n].iter().map(|&b| b as u8).collect())
    }

    #[test]
    fn password_is_copied_out() {
        let mut purposes = Vec::new();
        let got = with_password_callback(
            |purpose| {
                purposes.push(purpose);
                Some(SecretBuffer::from("swordfish"))
            },
            |cb, u| (ask(cb, u, 0), ask(cb, u, 1)),
        );
        assert_eq!(got.0.as_deref(), Some(&b"swordfish"[..]));
        assert_eq!(got.1.as_deref(), Some(&b"swordfish"[..]));
        assert_eq!(purposes, [PasswordPurpose::Decrypt, PasswordPurpose::Encrypt]);
    }

    #[test]
    fn refused_or_oversized_password_fails() {
        let got = with_password_callback(|_| None, |cb, u| ask(cb, u, 0));
        assert_eq!(got, None);

        let got = with_password_callback(
            |_| Some(SecretBuffer::from("far too long for sixteen bytes")),
            |cb, u| ask(cb, u, 0),
        );
        assert_eq!(got, None);
    }

    #[test]
    fn panic_is_deferred_until_the_backend_returns() {
        let mut calls = 0;
        let mut backend_returned = false;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            with_gencb(
                |_| {
                    calls += 1;
                    panic!("progress");
                },
                |cb| {
                    assert_eq!(unsafe { sys::bn_gencb_call(cb, 0, 0) }, 1);
                    // Later reports are swallowed.
                    assert_eq!(unsafe { sys::bn_gencb_call(cb, 3, 0) }, 1);
                    backend_returned = true;
                },
            )
        }));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"progress"));
        assert_eq!(calls, 1);
        assert!(backend_returned);
    }

    #[test]
    fn progress_reports_are_forwarded() {
        let mut reports = Vec::new();
        with_gencb(
            |progress| reports.push((progress.stage(), progress.count())),
            |cb| unsafe {
                sys::bn_gencb_call(cb, 0, 7);
                sys::bn_gencb_call(cb, 3, 1);
                sys::bn_gencb_call(cb, 9, 2);
            },
        );
        assert_eq!(
            reports,
            [(Stage::Candidate, 7), (Stage::Found, 1), (Stage::Other(9), 2)]
        );
    }
}
