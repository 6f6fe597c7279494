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

use super::{
    padding::Padding,
    record::{self, Field, Flags},
    MAX_BITS, MIN_GENERATED_BITS,
};
use crate::{
    backend::Backend,
    bio::MemBio,
    bn::BigNumRef,
    c,
    callback::{self, PasswordPurpose, Progress},
    cipher::Cipher,
    error::{Error, ErrorCode},
    ffi::{self, FfiSlice},
    handle::{Handle, Ownership, Refcounted},
    native::{self, Status},
    pkey::PKey,
    secret::SecretBuffer,
    sys::{self, pem_password_cb, BN_GENCB, RSA},
};
use core::{
    ffi::c_void,
    fmt,
    marker::PhantomData,
    ptr::{self, NonNull},
    sync::atomic::Ordering,
};
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

pub(crate) struct RsaObject<B>(PhantomData<B>);

unsafe impl<B: Backend> Refcounted for RsaObject<B> {
    type CType = RSA;

    unsafe fn up_ref(ptr: *mut RSA) -> Result<(), ErrorCode> {
        Status::new(unsafe { B::rsa_up_ref(ptr) }).into_result::<B>()
    }

    unsafe fn free(ptr: *mut RSA) {
        unsafe { B::rsa_free(ptr) }
    }
}

/// The longest password a PEM reader asks a callback for.
const MAX_PASSWORD_LEN: usize = sys::PEM_BUFSIZE as usize;

/// The shape of the four RSA primitives.
type Primitive = unsafe fn(c::size_t, *const u8, *mut u8, *mut RSA, c::int) -> c::int;

/// An RSA key held in a native record of backend `B`.
///
/// An `Rsa` created by this crate owns a reference to its record. One made
/// with [`Rsa::from_ptr`] may instead borrow the record, in which case
/// dropping it leaves the record alone. [`add_reference`](Self::add_reference)
/// returns a second owning `Rsa` for the same record; changes made through
/// either are visible through both.
///
/// `Rsa` is neither `Send` nor `Sync`, and every mutation takes `&mut self`.
pub struct Rsa<B: Backend> {
    handle: Handle<RsaObject<B>>,
}

impl<B: Backend> Rsa<B> {
    /// A new, empty key that owns its record.
    pub fn new() -> Result<Self, Error> {
        // SAFETY: no preconditions.
        let ptr = unsafe { B::rsa_new() };
        let ptr = native::non_null::<B, _>(ptr).map_err(|code| Error::Allocation {
            what: "RSA",
            code,
        })?;
        debug!("allocated RSA key record");
        Ok(Self::owning(ptr))
    }

    fn owning(ptr: NonNull<RSA>) -> Self {
        Self {
            handle: Handle::from_non_null(ptr, Ownership::Owned),
        }
    }

    /// Wraps an existing record.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live record from `B`. With
    /// [`Ownership::Owned`] the caller hands one reference over to the key;
    /// with [`Ownership::Borrowed`] the record must outlive the key.
    pub unsafe fn from_ptr(ptr: *mut RSA, ownership: Ownership) -> Result<Self, Error> {
        let handle = unsafe { Handle::new(ptr, ownership) }?;
        debug!(?ownership, "adopted RSA key record");
        Ok(Self { handle })
    }

    /// The record, for passing to the backend.
    #[inline]
    pub fn as_ptr(&self) -> *mut RSA {
        self.handle.as_ptr()
    }

    /// Whether this key owns a reference to its record.
    pub fn ownership(&self) -> Ownership {
        self.handle.ownership()
    }

    /// Another owning key for the same record.
    pub fn add_reference(&self) -> Result<Self, Error> {
        Ok(Self {
            handle: self.handle.take_reference()?,
        })
    }

    /// Reads a public key from the first `PUBLIC KEY` block in `bio`.
    pub fn from_public_key(bio: &mut MemBio) -> Result<Self, Error> {
        Self::read_public_key(bio, None, ptr::null_mut())
    }

    /// Reads a public key, offering `password` if the backend asks for one.
    pub fn from_public_key_with_password(
        bio: &mut MemBio,
        password: &SecretBuffer,
    ) -> Result<Self, Error> {
        Self::from_public_key_with_callback(bio, |_| Some(password.clone()))
    }

    /// Reads a public key, calling `callback` if the backend asks for a
    /// password.
    pub fn from_public_key_with_callback<F>(bio: &mut MemBio, callback: F) -> Result<Self, Error>
    where
        F: FnMut(PasswordPurpose) -> Option<SecretBuffer>,
    {
        callback::with_password_callback(callback, |cb, u| Self::read_public_key(bio, Some(cb), u))
    }

    /// Reads a private key from the first private key block in `bio`. The
    /// block must not be encrypted.
    pub fn from_private_key(bio: &mut MemBio) -> Result<Self, Error> {
        Self::read_private_key(bio, None, ptr::null_mut())
    }

    /// Reads a private key that may be encrypted under `password`. The
    /// password is handed over with its length, so it may contain NULs.
    pub fn from_private_key_with_password(
        bio: &mut MemBio,
        password: &SecretBuffer,
    ) -> Result<Self, Error> {
        Self::from_private_key_with_callback(bio, |_| Some(password.clone()))
    }

    /// Reads a private key, calling `callback` for the password if the block
    /// is encrypted.
    pub fn from_private_key_with_callback<F>(bio: &mut MemBio, callback: F) -> Result<Self, Error>
    where
        F: FnMut(PasswordPurpose) -> Option<SecretBuffer>,
    {
        callback::with_password_callback(callback, |cb, u| {
            Self::read_private_key(bio, Some(cb), u)
        })
    }

    /// Reads a public key from PEM text.
    pub fn public_key_from_pem(pem: &str) -> Result<Self, Error> {
        Self::from_public_key(&mut MemBio::from(pem))
    }

    /// Reads an unencrypted private key from PEM text.
    pub fn private_key_from_pem(pem: &str) -> Result<Self, Error> {
        Self::from_private_key(&mut MemBio::from(pem))
    }

    /// Reads a private key, encrypted under `password`, from PEM text.
    pub fn private_key_from_pem_with_password(
        pem: &str,
        password: &SecretBuffer,
    ) -> Result<Self, Error> {
        Self::from_private_key_with_password(&mut MemBio::from(pem), password)
    }

    fn read_public_key(
        bio: &mut MemBio,
        cb: Option<pem_password_cb>,
        u: *mut c_void,
    ) -> Result<Self, Error> {
        native::clear_errors::<B>();
        // SAFETY: `cb` and `u` are both null, or a callback and the thunk it
        // expects, which outlives the call.
        let ptr = unsafe { B::pem_read_bio_rsa_pubkey(bio, cb, u) };
        Self::adopt_decoded(ptr, "public")
    }

    fn read_private_key(
        bio: &mut MemBio,
        cb: Option<pem_password_cb>,
        u: *mut c_void,
    ) -> Result<Self, Error> {
        native::clear_errors::<B>();
        // SAFETY: as in `read_public_key`.
        let ptr = unsafe { B::pem_read_bio_rsa_private_key(bio, cb, u) };
        Self::adopt_decoded(ptr, "private")
    }

    fn adopt_decoded(ptr: *mut RSA, kind: &'static str) -> Result<Self, Error> {
        let ptr = native::non_null::<B, _>(ptr).map_err(|code| {
            debug!(kind, %code, "cannot read key from PEM");
            Error::Decode(code)
        })?;
        debug!(kind, "read key from PEM");
        Ok(Self::owning(ptr))
    }

    /// The record's `version` word.
    pub fn version(&self) -> c::long {
        // SAFETY: the record is live while `self` is.
        unsafe { record::version(self.as_ptr()) }
    }

    /// The record's flags.
    pub fn flags(&self) -> Flags {
        // SAFETY: the record is live while `self` is.
        unsafe { record::flags(self.as_ptr()) }
    }

    /// The record's current reference count.
    pub fn references(&self) -> i32 {
        // SAFETY: the record is live while `self` is.
        unsafe { record::references(self.as_ptr()) }.load(Ordering::Acquire)
    }

    fn is_exclusive(&self) -> bool {
        self.handle.is_owned() && self.references() == 1
    }

    /// The integer stored in `field`, if any. The key keeps ownership.
    pub fn field(&self, field: Field) -> Option<&BigNumRef<B>> {
        // SAFETY: the record is live while `self` is. The integer stays in
        // place until a setter, which needs `&mut self`, replaces it, and an
        // integer replaced while the record is shared is never freed.
        let ptr = unsafe { record::read(self.as_ptr(), field) };
        NonNull::new(ptr).map(|ptr| unsafe { BigNumRef::from_ptr(ptr) })
    }

    /// Stores a copy of `value` in `field`.
    ///
    /// The integer previously stored there is freed if this key is the only
    /// holder of the record. Otherwise it is left to the other holders, any
    /// of which may still be looking at it.
    pub fn set_field(&mut self, field: Field, value: &BigNumRef<B>) -> Result<(), Error> {
        // SAFETY: `value` is a live integer.
        let copy = unsafe { B::bn_dup(value.as_ptr()) };
        let copy = native::non_null::<B, _>(copy).map_err(|code| Error::Allocation {
            what: "BIGNUM",
            code,
        })?;
        // SAFETY: the record is live and `&mut self` excludes views through
        // this key; `copy` is ours to give away.
        let old = unsafe { record::replace(self.as_ptr(), field, copy.as_ptr()) };
        if !old.is_null() {
            if self.is_exclusive() {
                // SAFETY: nothing else can refer to `old`.
                unsafe { B::bn_free(old) };
            } else {
                debug!(field = field.name(), "record is shared; abandoning replaced integer");
            }
        }
        trace!(field = field.name(), "set key field");
        Ok(())
    }

    /// The modulus `n`.
    pub fn public_modulus(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::N)
    }

    /// Sets the modulus `n`.
    pub fn set_public_modulus(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::N, value)
    }

    /// The public exponent `e`.
    pub fn public_exponent(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::E)
    }

    /// Sets the public exponent `e`.
    pub fn set_public_exponent(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::E, value)
    }

    /// The private exponent `d`.
    pub fn private_exponent(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::D)
    }

    /// Sets the private exponent `d`.
    pub fn set_private_exponent(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::D, value)
    }

    /// The first prime factor `p`.
    pub fn secret_prime_factor_p(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::P)
    }

    /// Sets the first prime factor `p`.
    pub fn set_secret_prime_factor_p(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::P, value)
    }

    /// The second prime factor `q`.
    pub fn secret_prime_factor_q(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::Q)
    }

    /// Sets the second prime factor `q`.
    pub fn set_secret_prime_factor_q(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::Q, value)
    }

    /// `d mod (p - 1)`.
    pub fn dmp1(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::Dmp1)
    }

    /// Sets `d mod (p - 1)`.
    pub fn set_dmp1(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::Dmp1, value)
    }

    /// `d mod (q - 1)`.
    pub fn dmq1(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::Dmq1)
    }

    /// Sets `d mod (q - 1)`.
    pub fn set_dmq1(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::Dmq1, value)
    }

    /// The CRT coefficient `q^-1 mod p`.
    pub fn iqmp(&self) -> Option<&BigNumRef<B>> {
        self.field(Field::Iqmp)
    }

    /// Sets the CRT coefficient `q^-1 mod p`.
    pub fn set_iqmp(&mut self, value: &BigNumRef<B>) -> Result<(), Error> {
        self.set_field(Field::Iqmp, value)
    }

    /// The length of the modulus in bytes, which is also the length of every
    /// ciphertext and the most any primitive produces.
    pub fn size(&self) -> Result<usize, Error> {
        self.field(Field::N).ok_or(Error::KeyState("modulus"))?;
        // SAFETY: the record is live.
        match unsafe { B::rsa_size(self.as_ptr()) } {
            0 => Err(Error::KeyState("modulus")),
            size => Ok(size as usize),
        }
    }

    /// Encrypts `from` with the public key.
    pub fn public_encrypt(&self, from: &[u8], padding: Padding) -> Result<Vec<u8>, Error> {
        self.primitive("public_encrypt", B::rsa_public_encrypt, from, padding)
    }

    /// Transforms `from` with the private key, as in signing.
    pub fn private_encrypt(&self, from: &[u8], padding: Padding) -> Result<Vec<u8>, Error> {
        self.field(Field::D).ok_or(Error::KeyState("private exponent"))?;
        self.primitive("private_encrypt", B::rsa_private_encrypt, from, padding)
    }

    /// Recovers what [`private_encrypt`](Self::private_encrypt) padded.
    pub fn public_decrypt(&self, from: &[u8], padding: Padding) -> Result<Vec<u8>, Error> {
        self.primitive("public_decrypt", B::rsa_public_decrypt, from, padding)
    }

    /// Decrypts `from` with the private key.
    pub fn private_decrypt(&self, from: &[u8], padding: Padding) -> Result<Vec<u8>, Error> {
        self.field(Field::D).ok_or(Error::KeyState("private exponent"))?;
        self.primitive("private_decrypt", B::rsa_private_decrypt, from, padding)
    }

    fn primitive(
        &self,
        operation: &'static str,
        f: Primitive,
        from: &[u8],
        padding: Padding,
    ) -> Result<Vec<u8>, Error> {
        let max_len = self.size()?;
        native::clear_errors::<B>();
        // SAFETY: `from` is valid for its length, and no primitive writes
        // more than `size()` bytes.
        let out = unsafe {
            ffi::with_output_vec_fallible(max_len, |to| {
                let ret = f(from.len(), from.as_ffi_ptr(), to, self.as_ptr(), padding.as_native());
                native::length::<B>(ret)
            })
        }
        .map_err(|code| Error::Operation { operation, code })?;
        trace!(
            operation,
            ?padding,
            input_len = from.len(),
            output_len = out.len()
        );
        Ok(out)
    }

    /// Whether the private key is consistent. A key that fails validation,
    /// or that can't be validated, is reported as `false`.
    pub fn check(&self) -> bool {
        native::clear_errors::<B>();
        // SAFETY: the record is live.
        match unsafe { B::rsa_check_key(self.as_ptr()) } {
            1 => true,
            0 => {
                let code = native::last_error::<B>();
                debug!(%code, "key failed validation");
                false
            }
            _ => {
                let code = native::last_error::<B>();
                warn!(%code, "key could not be validated");
                false
            }
        }
    }

    /// Writes the public key to `bio` as a `PUBLIC KEY` block.
    pub fn write_public_key(&self, bio: &mut MemBio) -> Result<(), Error> {
        native::clear_errors::<B>();
        // SAFETY: the record is live.
        Status::new(unsafe { B::pem_write_bio_rsa_pubkey(bio, self.as_ptr()) })
            .into_result::<B>()
            .map_err(Error::Encode)?;
        debug!("wrote public key as PEM");
        Ok(())
    }

    /// Writes the private key to `bio`, encrypted with `cipher` under
    /// `password` when both are given and in the clear when neither is.
    /// Passwords longer than the readers accept are refused.
    pub fn write_private_key(
        &self,
        bio: &mut MemBio,
        cipher: Option<Cipher>,
        password: Option<&SecretBuffer>,
    ) -> Result<(), Error> {
        match (cipher, password) {
            (None, None) => self.write_private_key_raw(bio, sys::NID_undef, ptr::null(), 0),
            (Some(_), Some(password)) if password.len() > MAX_PASSWORD_LEN => {
                Err(Error::InvalidArgument("password is longer than 1024 bytes"))
            }
            (Some(cipher), Some(password)) => password.with_c_str(|kstr, klen| {
                self.write_private_key_raw(bio, cipher.nid(), kstr, klen)
            }),
            (Some(_), None) => Err(Error::InvalidArgument("a cipher needs a password")),
            (None, Some(_)) => Err(Error::InvalidArgument("a password needs a cipher")),
        }
    }

    fn write_private_key_raw(
        &self,
        bio: &mut MemBio,
        enc: c::int,
        kstr: *const u8,
        klen: usize,
    ) -> Result<(), Error> {
        native::clear_errors::<B>();
        // SAFETY: the record is live and `kstr` is valid for `klen` bytes.
        Status::new(unsafe { B::pem_write_bio_rsa_private_key(bio, self.as_ptr(), enc, kstr, klen) })
            .into_result::<B>()
            .map_err(Error::Encode)?;
        debug!(encrypted = enc != sys::NID_undef, "wrote private key as PEM");
        Ok(())
    }

    /// The public key as PEM text.
    pub fn public_key_pem(&self) -> Result<String, Error> {
        let mut bio = MemBio::new();
        self.write_public_key(&mut bio)?;
        Ok(bio.read_string())
    }

    /// The private key as unencrypted PEM text.
    pub fn private_key_pem(&self) -> Result<Zeroizing<String>, Error> {
        let mut bio = MemBio::new();
        self.write_private_key(&mut bio, None, None)?;
        Ok(Zeroizing::new(bio.read_string()))
    }

    /// The private key as PEM text encrypted with `cipher` under `password`.
    pub fn private_key_pem_encrypted(
        &self,
        cipher: Cipher,
        password: &SecretBuffer,
    ) -> Result<Zeroizing<String>, Error> {
        let mut bio = MemBio::new();
        self.write_private_key(&mut bio, Some(cipher), Some(password))?;
        Ok(Zeroizing::new(bio.read_string()))
    }

    /// Replaces the key material with a freshly generated `bits`-bit key
    /// with public exponent `e`. Blocks until done.
    pub fn generate_keys(&mut self, bits: usize, e: &BigNumRef<B>) -> Result<(), Error> {
        let bits = check_generation_params(bits, e)?;
        self.generate(bits, e, ptr::null_mut())
    }

    /// As [`generate_keys`](Self::generate_keys), reporting progress to
    /// `progress` along the way. A panic in `progress` is re-raised once the
    /// backend returns.
    pub fn generate_keys_with_progress<F>(
        &mut self,
        bits: usize,
        e: &BigNumRef<B>,
        progress: F,
    ) -> Result<(), Error>
    where
        F: FnMut(Progress),
    {
        let bits = check_generation_params(bits, e)?;
        callback::with_gencb(progress, |cb| self.generate(bits, e, cb))
    }

    fn generate(&mut self, bits: c::int, e: &BigNumRef<B>, cb: *mut BN_GENCB) -> Result<(), Error> {
        debug!(bits, "generating key pair");
        native::clear_errors::<B>();
        // SAFETY: the record and `e` are live, and `cb` is null or outlives
        // the call.
        Status::new(unsafe { B::rsa_generate_key_ex(self.as_ptr(), bits, e.as_ptr(), cb) })
            .into_result::<B>()
            .map_err(|code| Error::Operation {
                operation: "generate_keys",
                code,
            })?;
        debug!(bits, "generated key pair");
        Ok(())
    }

    /// Writes a human-readable description of the key, private parts
    /// included, to `bio`.
    pub fn print(&self, bio: &mut MemBio) -> Result<(), Error> {
        native::clear_errors::<B>();
        // SAFETY: the record is live.
        Status::new(unsafe { B::rsa_print(bio, self.as_ptr(), 0) })
            .into_result::<B>()
            .map_err(Error::Encode)
    }

    /// A generic key container holding (a reference to) this key.
    pub fn to_pkey(&self) -> Result<PKey<B>, Error> {
        PKey::from_rsa(self)
    }
}

fn check_generation_params<B: Backend>(bits: usize, e: &BigNumRef<B>) -> Result<c::int, Error> {
    if !(MIN_GENERATED_BITS..=MAX_BITS).contains(&bits) {
        return Err(Error::InvalidArgument(
            "modulus size must be between 512 and 16384 bits",
        ));
    }
    if e.num_bits() < 2 || !e.is_odd() {
        return Err(Error::InvalidArgument(
            "public exponent must be odd and greater than one",
        ));
    }
    c::int::try_from(bits).map_err(|_| Error::InvalidArgument("modulus size"))
}

impl<B: Backend> PartialEq for Rsa<B> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<B: Backend> Eq for Rsa<B> {}

impl<B: Backend> fmt::Debug for Rsa<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rsa")
            .field("ptr", &self.as_ptr())
            .field("ownership", &self.ownership())
            .field("bits", &self.public_modulus().map(|n| n.num_bits()))
            .finish()
    }
}

impl<B: Backend> Drop for Rsa<B> {
    fn drop(&mut self) {
        trace!(ownership = ?self.ownership(), "dropping RSA key");
    }
}
