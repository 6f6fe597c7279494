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

//! Error reporting.

pub use self::code::ErrorCode;

mod code;

/// An error from an operation on a key, a key container, or a handle.
///
/// Errors that the backend reported carry its [`ErrorCode`]. The code is
/// meant for diagnostics; which codes a backend reports for which failure is
/// up to the backend, so applications shouldn't branch on them.
///
/// Here is an incomplete list of reasons for each kind of failure:
///
/// * `Decode`: the input isn't PEM, contains no block with a suitable label,
///   holds a key of another type, is encrypted and no password was given, or
///   the password is wrong.
///
/// * `KeyState`: a field the operation needs (the modulus, say) was never
///   set, e.g. encrypting with a freshly constructed key.
///
/// * `Operation`: the backend rejected the input of a primitive, e.g. the
///   message is too long for the padding mode or the padding doesn't check
///   out on decryption.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A native handle was null.
    #[error("native handle is null")]
    InvalidHandle,

    /// The backend couldn't allocate an object.
    #[error("cannot allocate {what}: {code}")]
    Allocation {
        /// What was being allocated.
        what: &'static str,
        /// The backend's diagnostic.
        code: ErrorCode,
    },

    /// Key material couldn't be read.
    #[error("cannot decode key: {0}")]
    Decode(ErrorCode),

    /// Key material couldn't be written.
    #[error("cannot encode key: {0}")]
    Encode(ErrorCode),

    /// The key lacks the named field.
    #[error("key has no {0}")]
    KeyState(&'static str),

    /// An argument was rejected before the backend was asked.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The backend rejected a primitive operation.
    #[error("{operation} failed: {code}")]
    Operation {
        /// The name of the operation.
        operation: &'static str,
        /// The backend's diagnostic.
        code: ErrorCode,
    },
}

impl Error {
    /// The backend's diagnostic, if the backend was involved in the failure.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Allocation { code, .. } | Self::Operation { code, .. } => Some(*code),
            Self::Decode(code) | Self::Encode(code) => Some(*code),
            Self::InvalidHandle | Self::KeyState(_) | Self::InvalidArgument(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys;

    #[test]
    fn display_includes_backend_diagnostic() {
        let code = ErrorCode::new(
            sys::err_pack(sys::ERR_LIB_RSA, sys::RSA_R_DATA_TOO_LARGE_FOR_KEY_SIZE),
            Some("data too large for key size"),
        );
        let err = Error::Operation {
            operation: "public_encrypt",
            code,
        };
        assert_eq!(
            err.to_string(),
            "public_encrypt failed: error:0400006E:lib(4):reason(110): data too large for key size"
        );
        assert_eq!(err.code(), Some(code));
    }

    #[test]
    fn precondition_errors_have_no_code() {
        assert_eq!(Error::KeyState("modulus").to_string(), "key has no modulus");
        assert_eq!(Error::KeyState("modulus").code(), None);
        assert_eq!(Error::InvalidHandle.code(), None);
    }
}
