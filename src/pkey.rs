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

use crate::{
    backend::Backend,
    c,
    error::{Error, ErrorCode},
    handle::{Handle, Ownership, Refcounted},
    native::{self, Status},
    rsa::Rsa,
    sys::{self, EVP_PKEY},
};
use core::{fmt, marker::PhantomData, ops::Deref};

struct PKeyObject<B>(PhantomData<B>);

unsafe impl<B: Backend> Refcounted for PKeyObject<B> {
    type CType = EVP_PKEY;

    unsafe fn up_ref(ptr: *mut EVP_PKEY) -> Result<(), ErrorCode> {
        Status::new(unsafe { B::evp_pkey_up_ref(ptr) }).into_result::<B>()
    }

    unsafe fn free(ptr: *mut EVP_PKEY) {
        unsafe { B::evp_pkey_free(ptr) }
    }
}

/// A backend key container, the form in which keys are handed to APIs that
/// work with any key type.
pub struct PKey<B: Backend> {
    handle: Handle<PKeyObject<B>>,
}

impl<B: Backend> PKey<B> {
    /// An empty container.
    pub fn new() -> Result<Self, Error> {
        // SAFETY: no preconditions.
        let ptr = unsafe { B::evp_pkey_new() };
        let ptr = native::non_null::<B, _>(ptr).map_err(|code| Error::Allocation {
            what: "EVP_PKEY",
            code,
        })?;
        Ok(Self {
            handle: Handle::from_non_null(ptr, Ownership::Owned),
        })
    }

    /// A container holding a reference to `rsa`'s record.
    pub fn from_rsa(rsa: &Rsa<B>) -> Result<Self, Error> {
        let mut pkey = Self::new()?;
        pkey.set_rsa(rsa)?;
        Ok(pkey)
    }

    /// Wraps an existing container.
    ///
    /// # Safety
    ///
    /// As for [`Rsa::from_ptr`].
    pub unsafe fn from_ptr(ptr: *mut EVP_PKEY, ownership: Ownership) -> Result<Self, Error> {
        Ok(Self {
            handle: unsafe { Handle::new(ptr, ownership) }?,
        })
    }

    /// The container, for passing to the backend.
    pub fn as_ptr(&self) -> *mut EVP_PKEY {
        self.handle.as_ptr()
    }

    /// Another owning handle to the same container.
    pub fn add_reference(&self) -> Result<Self, Error> {
        Ok(Self {
            handle: self.handle.take_reference()?,
        })
    }

    /// Puts `rsa` in the container, which takes its own reference to it.
    pub fn set_rsa(&mut self, rsa: &Rsa<B>) -> Result<(), Error> {
        native::clear_errors::<B>();
        // SAFETY: both objects are live.
        Status::new(unsafe { B::evp_pkey_set1_rsa(self.as_ptr(), rsa.as_ptr()) })
            .into_result::<B>()
            .map_err(|code| Error::Operation {
                operation: "set_rsa",
                code,
            })
    }

    /// The type of key held, e.g. [`sys::EVP_PKEY_RSA`].
    pub fn id(&self) -> c::int {
        // SAFETY: the container is live.
        unsafe { B::evp_pkey_id(self.as_ptr()) }
    }

    /// The RSA key held, as an owning key.
    pub fn rsa(&self) -> Result<Rsa<B>, Error> {
        self.require_rsa()?;
        // SAFETY: the container is live. The record comes with a reference
        // for us.
        let ptr = unsafe { B::evp_pkey_get1_rsa(self.as_ptr()) };
        unsafe { Rsa::from_ptr(ptr, Ownership::Owned) }
    }

    /// The RSA key held, as a view that borrows the container.
    pub fn rsa_ref(&self) -> Result<RsaRef<'_, B>, Error> {
        self.require_rsa()?;
        // SAFETY: the container is live and keeps the record alive for as
        // long as `self` is borrowed.
        let ptr = unsafe { B::evp_pkey_get0_rsa(self.as_ptr()) };
        let rsa = unsafe { Rsa::from_ptr(ptr, Ownership::Borrowed) }?;
        Ok(RsaRef {
            rsa,
            _pkey: PhantomData,
        })
    }

    fn require_rsa(&self) -> Result<(), Error> {
        if self.id() == sys::EVP_PKEY_RSA {
            Ok(())
        } else {
            Err(Error::KeyState("RSA key"))
        }
    }
}

impl<B: Backend> fmt::Debug for PKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PKey")
            .field("ptr", &self.as_ptr())
            .field("id", &self.id())
            .finish()
    }
}

/// A borrowed view of the RSA key inside a [`PKey`].
///
/// Dropping the view leaves the record alone; call
/// [`add_reference`](Rsa::add_reference) to keep the key beyond the
/// container's lifetime.
pub struct RsaRef<'a, B: Backend> {
    rsa: Rsa<B>,
    _pkey: PhantomData<&'a PKey<B>>,
}

impl<B: Backend> Deref for RsaRef<'_, B> {
    type Target = Rsa<B>;

    fn deref(&self) -> &Rsa<B> {
        &self.rsa
    }
}

impl<B: Backend> fmt::Debug for RsaRef<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.rsa.fmt(f)
    }
}

#[cfg(all(test, feature = "soft-backend"))]
mod tests {
    use super::*;
    use crate::soft::Soft;

    #[test]
    fn container_takes_its_own_reference() {
        let rsa = Rsa::<Soft>::new().unwrap();
        let pkey = rsa.to_pkey().unwrap();
        assert_eq!(pkey.id(), sys::EVP_PKEY_RSA);
        assert_eq!(rsa.references(), 2);

        let extracted = pkey.rsa().unwrap();
        assert_eq!(extracted, rsa);
        assert_eq!(extracted.ownership(), Ownership::Owned);
        assert_eq!(rsa.references(), 3);
        drop(extracted);

        drop(pkey);
        assert_eq!(rsa.references(), 1);
    }

    #[test]
    fn borrowed_view_does_not_release() {
        let rsa = Rsa::<Soft>::new().unwrap();
        let pkey = PKey::from_rsa(&rsa).unwrap();
        {
            let view = pkey.rsa_ref().unwrap();
            assert_eq!(view.ownership(), Ownership::Borrowed);
            assert_eq!(*view, rsa);
        }
        assert_eq!(rsa.references(), 2);

        // Promote the view so the key outlives the container.
        let kept = pkey.rsa_ref().unwrap().add_reference().unwrap();
        drop(pkey);
        assert_eq!(kept.references(), 2);
        drop(rsa);
        assert_eq!(kept.references(), 1);
    }

    #[test]
    fn empty_container_has_no_rsa_key() {
        let pkey = PKey::<Soft>::new().unwrap();
        assert_eq!(pkey.id(), sys::NID_undef);
        assert_eq!(pkey.rsa().unwrap_err(), Error::KeyState("RSA key"));
        assert!(pkey.rsa_ref().is_err());
    }
}
