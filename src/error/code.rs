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

use crate::c;
use core::fmt;

/// A diagnostic code taken from the backend's error queue.
///
/// The code packs a library number and a reason number the way OpenSSL
/// does: `lib << 24 | reason`. Zero means the backend queued nothing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    packed: c::ulong,
    reason_string: Option<&'static str>,
}

impl ErrorCode {
    pub(crate) fn new(packed: c::ulong, reason_string: Option<&'static str>) -> Self {
        Self {
            packed,
            reason_string,
        }
    }

    /// The packed value exactly as the backend reported it.
    pub fn packed(&self) -> u64 {
        u64::from(self.packed)
    }

    /// The library that raised the error.
    pub fn lib(&self) -> c::int {
        ((self.packed() >> 24) & 0xff) as c::int
    }

    /// The library-specific reason.
    pub fn reason(&self) -> c::int {
        (self.packed() & 0xfff) as c::int
    }

    /// The backend's description of the reason, if it has one.
    pub fn reason_string(&self) -> Option<&'static str> {
        self.reason_string
    }

    /// Whether the backend queued no error at all.
    pub fn is_none(&self) -> bool {
        self.packed == 0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_none() {
            return f.write_str("no backend diagnostic");
        }
        write!(
            f,
            "error:{:08X}:lib({}):reason({})",
            self.packed(),
            self.lib(),
            self.reason()
        )?;
        if let Some(reason) = self.reason_string {
            write!(f, ": {reason}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErrorCode")
            .field("lib", &self.lib())
            .field("reason", &self.reason())
            .field("reason_string", &self.reason_string)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys;

    #[test]
    fn unpacks_lib_and_reason() {
        let code = ErrorCode::new(sys::err_pack(sys::ERR_LIB_PEM, sys::PEM_R_NO_START_LINE), None);
        assert_eq!(code.lib(), sys::ERR_LIB_PEM);
        assert_eq!(code.reason(), sys::PEM_R_NO_START_LINE);
        assert!(!code.is_none());
        assert_eq!(code.to_string(), "error:0900006C:lib(9):reason(108)");
    }

    #[test]
    fn empty_queue() {
        let code = ErrorCode::new(0, None);
        assert!(code.is_none());
        assert_eq!(code.to_string(), "no backend diagnostic");
    }
}
