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

//! The native RSA key record and per-field access to it.
//!
//! The layout must match the backend's `struct rsa_st` exactly, including the
//! platform's width of C `long` for `version`. Every accessor here computes
//! the address of a single slot and touches only that slot; nothing copies
//! the record as a whole, so concurrent backend updates to other fields are
//! never overwritten with stale values.

use crate::{c, sys};
use core::{
    ffi::c_void,
    mem::{offset_of, size_of},
    ptr::{self, addr_of, addr_of_mut},
    sync::atomic::AtomicI32,
};

/// The native RSA key record.
///
/// Backends allocate it; the key core reads `version`, `flags` and
/// `references`, and reads and replaces the integer slots.
#[allow(missing_docs, non_camel_case_types)]
#[repr(C)]
pub struct rsa_st {
    pub pad: c::int,
    pub version: c::long,
    pub meth: *const c_void,
    pub engine: *mut c_void,
    pub n: *mut sys::BIGNUM,
    pub e: *mut sys::BIGNUM,
    pub d: *mut sys::BIGNUM,
    pub p: *mut sys::BIGNUM,
    pub q: *mut sys::BIGNUM,
    pub dmp1: *mut sys::BIGNUM,
    pub dmq1: *mut sys::BIGNUM,
    pub iqmp: *mut sys::BIGNUM,
    pub ex_data_sk: *mut c_void,
    pub ex_data_dummy: c::int,
    pub references: AtomicI32,
    pub flags: c::int,
    pub _method_mod_n: *mut c_void,
    pub _method_mod_p: *mut c_void,
    pub _method_mod_q: *mut c_void,
    pub bignum_data: *mut c::char,
    pub blinding: *mut c_void,
    pub mt_blinding: *mut c_void,
}

impl rsa_st {
    /// An empty record with one reference and the given flags.
    pub const fn new(flags: c::int) -> Self {
        Self {
            pad: 0,
            version: 0,
            meth: ptr::null(),
            engine: ptr::null_mut(),
            n: ptr::null_mut(),
            e: ptr::null_mut(),
            d: ptr::null_mut(),
            p: ptr::null_mut(),
            q: ptr::null_mut(),
            dmp1: ptr::null_mut(),
            dmq1: ptr::null_mut(),
            iqmp: ptr::null_mut(),
            ex_data_sk: ptr::null_mut(),
            ex_data_dummy: 0,
            references: AtomicI32::new(1),
            flags,
            _method_mod_n: ptr::null_mut(),
            _method_mod_p: ptr::null_mut(),
            _method_mod_q: ptr::null_mut(),
            bignum_data: ptr::null_mut(),
            blinding: ptr::null_mut(),
            mt_blinding: ptr::null_mut(),
        }
    }
}

// The reference count is a C `int` that is updated atomically.
const _: () = assert!(size_of::<AtomicI32>() == size_of::<c::int>());

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        const _: () = assert!(size_of::<c::long>() == 4);
    } else {
        const _: () = assert!(size_of::<c::long>() == size_of::<usize>());
    }
}

/// An arbitrary-precision field of the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The modulus.
    N,
    /// The public exponent.
    E,
    /// The private exponent.
    D,
    /// The first prime factor.
    P,
    /// The second prime factor.
    Q,
    /// `d mod (p - 1)`.
    Dmp1,
    /// `d mod (q - 1)`.
    Dmq1,
    /// `q^-1 mod p`.
    Iqmp,
}

impl Field {
    /// Every field, in record order.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::E,
        Self::D,
        Self::P,
        Self::Q,
        Self::Dmp1,
        Self::Dmq1,
        Self::Iqmp,
    ];

    /// The field's name in the record.
    pub fn name(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::E => "e",
            Self::D => "d",
            Self::P => "p",
            Self::Q => "q",
            Self::Dmp1 => "dmp1",
            Self::Dmq1 => "dmq1",
            Self::Iqmp => "iqmp",
        }
    }

    /// The byte offset of the field's slot within [`rsa_st`].
    pub fn offset(self) -> usize {
        match self {
            Self::N => offset_of!(rsa_st, n),
            Self::E => offset_of!(rsa_st, e),
            Self::D => offset_of!(rsa_st, d),
            Self::P => offset_of!(rsa_st, p),
            Self::Q => offset_of!(rsa_st, q),
            Self::Dmp1 => offset_of!(rsa_st, dmp1),
            Self::Dmq1 => offset_of!(rsa_st, dmq1),
            Self::Iqmp => offset_of!(rsa_st, iqmp),
        }
    }

    /// Whether the field is part of the private key only.
    pub fn is_private(self) -> bool {
        !matches!(self, Self::N | Self::E)
    }
}

/// Bits of the record's `flags` word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags(c::int);

impl Flags {
    /// Montgomery context for `n` is cached.
    pub const CACHE_PUBLIC: Self = Self(sys::RSA_FLAG_CACHE_PUBLIC);
    /// Montgomery contexts for `p` and `q` are cached.
    pub const CACHE_PRIVATE: Self = Self(sys::RSA_FLAG_CACHE_PRIVATE);
    /// Blinding is applied to private-key operations.
    pub const BLINDING: Self = Self(sys::RSA_FLAG_BLINDING);
    /// Private-key operations are not constant time.
    pub const NO_CONSTTIME: Self = Self(sys::RSA_FLAG_NO_CONSTTIME);

    /// The raw flag word.
    pub fn bits(self) -> c::int {
        self.0
    }

    /// Whether every bit in `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// The address of `field`'s slot.
///
/// # Safety
///
/// `record` must point to a live record.
unsafe fn slot(record: *mut rsa_st, field: Field) -> *mut *mut sys::BIGNUM {
    // SAFETY: `record` is live, so projecting to one of its fields is in
    // bounds. No reference to the record is created.
    unsafe {
        match field {
            Field::N => addr_of_mut!((*record).n),
            Field::E => addr_of_mut!((*record).e),
            Field::D => addr_of_mut!((*record).d),
            Field::P => addr_of_mut!((*record).p),
            Field::Q => addr_of_mut!((*record).q),
            Field::Dmp1 => addr_of_mut!((*record).dmp1),
            Field::Dmq1 => addr_of_mut!((*record).dmq1),
            Field::Iqmp => addr_of_mut!((*record).iqmp),
        }
    }
}

/// Reads the integer pointer stored in `field`.
///
/// # Safety
///
/// `record` must point to a live record.
pub(crate) unsafe fn read(record: *const rsa_st, field: Field) -> *mut sys::BIGNUM {
    unsafe { slot(record.cast_mut(), field).read() }
}

/// Stores `value` in `field` and returns what was there.
///
/// # Safety
///
/// `record` must point to a live record the caller may mutate, and `value`
/// must be null or an integer the record may own.
pub(crate) unsafe fn replace(
    record: *mut rsa_st,
    field: Field,
    value: *mut sys::BIGNUM,
) -> *mut sys::BIGNUM {
    unsafe { slot(record, field).replace(value) }
}

/// # Safety
///
/// `record` must point to a live record.
pub(crate) unsafe fn version(record: *const rsa_st) -> c::long {
    unsafe { addr_of!((*record).version).read() }
}

/// # Safety
///
/// `record` must point to a live record.
pub(crate) unsafe fn flags(record: *const rsa_st) -> Flags {
    Flags(unsafe { addr_of!((*record).flags).read() })
}

/// # Safety
///
/// `record` must point to a record that stays live for `'a`.
pub(crate) unsafe fn references<'a>(record: *const rsa_st) -> &'a AtomicI32 {
    unsafe { &*addr_of!((*record).references) }
}
