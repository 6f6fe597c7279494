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
//! Testing framework.
//!
//! Unlike the rest of the crate, this testing framework uses panics pretty
//! liberally. It was designed for internal use: it drives the known-answer
//! tests, and so it is optimized for getting tests written quickly at the
//! expense of some usability.
//!
//! # Example
//!
//! Input files look like this:
//!
//! ```text
//! # This is a comment.
//!
//! [PrivateEncrypt]
//!
//! Padding = PKCS1
//! Msg = "hello"
//! Output = 1f2e...
//!
//! Padding = None
//! Msg = 00010203...
//! Output = 4a5b...
//! ```
//!
//! Test cases are separated with blank lines, and a `[Name]` line starts a
//! named section that lasts until the next one. Bytes may be given as hex or
//! as a quoted string; the empty sequence of bytes can only be represented
//! with the quoted string form (`""`).
//!
//! Here's how you would consume the test data:
//!
//! ```ignore
//! use native_rsa::test;
//!
//! test::from_file("tests/rsa_primitive_tests.txt", |section, test_case| {
//!     let padding = test_case.consume_padding("Padding");
//!     let msg = test_case.consume_bytes("Msg");
//!     let output = test_case.consume_bytes("Output");
//!
//!     // Do the actual testing here
//!     Ok(())
//! });
//! ```

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use crate::{error::Error, rsa::Padding};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader, Lines},
};

/// A test case. A test case consists of a set of named attributes. Every
/// attribute in the test case must be consumed exactly once; this helps catch
/// typos and omissions.
#[derive(Debug)]
pub struct TestCase {
    attributes: HashMap<String, String>,
}

impl TestCase {
    /// Maps "PKCS1", "SSLv23", "None", "OAEP" and "X931" to a padding mode,
    /// and panics on other (erroneous) inputs.
    pub fn consume_padding(&mut self, key: &str) -> Padding {
        let name = self.consume_string(key);
        match name.as_str() {
            "PKCS1" => Padding::Pkcs1,
            "SSLv23" => Padding::SslV23,
            "None" => Padding::None,
            "OAEP" => Padding::Oaep,
            "X931" => Padding::X931,
            _ => panic!("Unsupported padding: {name}"),
        }
    }

    /// Returns the value of an attribute that is encoded as a sequence of an
    /// even number of hex digits, or as a double-quoted UTF-8 string. The
    /// empty (zero-length) value is represented as "".
    pub fn consume_bytes(&mut self, key: &str) -> Vec<u8> {
        let s = self.consume_string(key);
        if let Some(quoted) = s.strip_prefix('"') {
            // XXX: We don't deal with any inner quotes.
            let unquoted = quoted
                .strip_suffix('"')
                .unwrap_or_else(|| panic!("expected quoted string, found {s}"));
            unquoted.as_bytes().to_vec()
        } else {
            from_hex(&s).unwrap_or_else(|err| panic!("{err} in {s}"))
        }
    }

    /// Returns the value of an attribute that is an integer, in decimal
    /// notation.
    pub fn consume_usize(&mut self, key: &str) -> usize {
        let s = self.consume_string(key);
        s.parse::<usize>().unwrap()
    }

    /// Returns the raw value of an attribute, without any unquoting or
    /// other interpretation.
    pub fn consume_string(&mut self, key: &str) -> String {
        self.consume_optional_string(key)
            .unwrap_or_else(|| panic!("No attribute named \"{key}\""))
    }

    /// Like `consume_string()` except it returns `None` if the test case
    /// doesn't have the attribute.
    pub fn consume_optional_string(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }
}

/// Reads test cases out of the file with the path given by
/// `test_file_path`, calling `f` on each vector until `f` fails or until all
/// the test vectors have been read. `f` can indicate failure either by
/// returning `Err()` or by panicking.
pub fn from_file<F>(test_file_path: &str, mut f: F)
where
    F: FnMut(&str, &mut TestCase) -> Result<(), Error>,
{
    let file = File::open(test_file_path)
        .unwrap_or_else(|err| panic!("cannot open {test_file_path}: {err}"));
    let mut lines = BufReader::new(file).lines();

    let mut current_section = String::new();
    let mut failed = false;

    while let Some(mut test_case) = parse_test_case(&mut current_section, &mut lines) {
        if let Err(err) = f(&current_section, &mut test_case) {
            println!("Test case failed: {err}");
            println!("{test_case:?}");
            failed = true;
        }

        // Make sure all the attributes in the test case were consumed.
        assert!(
            test_case.attributes.is_empty(),
            "unconsumed attributes: {:?}",
            test_case.attributes
        );
    }

    assert!(!failed, "some test cases in {test_file_path} failed");
}

/// Decodes a string of hex digits into a sequence of bytes. The input must
/// have an even number of digits.
pub fn from_hex(hex_str: &str) -> Result<Vec<u8>, String> {
    if hex_str.len() % 2 != 0 {
        return Err(String::from(
            "Hex string does not have an even number of digits",
        ));
    }

    fn from_hex_digit(d: u8) -> Result<u8, String> {
        match d {
            b'0'..=b'9' => Ok(d - b'0'),
            b'a'..=b'f' => Ok(d - b'a' + 10),
            b'A'..=b'F' => Ok(d - b'A' + 10),
            _ => Err(format!("Invalid hex digit '{}'", d as char)),
        }
    }

    hex_str
        .as_bytes()
        .chunks(2)
        .map(|digits| -> Result<u8, String> {
            Ok((from_hex_digit(digits[0])? << 4) | from_hex_digit(digits[1])?)
        })
        .collect()
}

type FileLines = Lines<BufReader<File>>;

fn parse_test_case(current_section: &mut String, lines: &mut FileLines) -> Option<TestCase> {
    let mut attributes = HashMap::new();

    let mut is_first_line = true;
    loop {
        let line = lines.next().map(|result| result.unwrap());

        if cfg!(feature = "test_logging") {
            if let Some(text) = &line {
                println!("Line: {text}");
            }
        }

        match line {
            // If we get to EOF when we're not in the middle of a test case,
            // then we're done.
            None if is_first_line => {
                return None;
            }

            // End of the file on a non-empty test cases ends the test case.
            None => {
                return Some(TestCase { attributes });
            }

            // A blank line ends a test case if the test case isn't empty.
            Some(line) if line.is_empty() => {
                if !is_first_line {
                    return Some(TestCase { attributes });
                }
                // Ignore leading blank lines.
            }

            // Comments start with '#'; ignore them.
            Some(line) if line.starts_with('#') => {}

            Some(line) if line.starts_with('[') => {
                assert!(is_first_line);
                let name = line
                    .strip_prefix('[')
                    .and_then(|line| line.strip_suffix(']'))
                    .unwrap_or_else(|| panic!("malformed section header: {line}"));
                current_section.clear();
                current_section.push_str(name);
            }

            Some(line) => {
                is_first_line = false;

                let (key, value) = line
                    .split_once(" = ")
                    .unwrap_or_else(|| panic!("malformed attribute: {line}"));
                let key = key.trim();
                let value = value.trim();

                // Don't allow the value to be omitted. An empty value can be
                // represented as an empty quoted string.
                assert!(!value.is_empty());

                // Checking is_none() ensures we don't accept duplicate keys.
                assert!(attributes
                    .insert(String::from(key), String::from(value))
                    .is_none());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_decoding() {
        assert_eq!(from_hex(""), Ok(vec![]));
        assert_eq!(from_hex("00fFa5"), Ok(vec![0x00, 0xff, 0xa5]));
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }

    #[test]
    fn bytes_may_be_quoted() {
        let mut test_case = TestCase {
            attributes: HashMap::from([
                (String::from("Msg"), String::from("\"hi\"")),
                (String::from("Empty"), String::from("\"\"")),
                (String::from("Padding"), String::from("X931")),
            ]),
        };
        assert_eq!(test_case.consume_bytes("Msg"), b"hi");
        assert_eq!(test_case.consume_bytes("Empty"), b"");
        assert_eq!(test_case.consume_padding("Padding"), Padding::X931);
        assert_eq!(test_case.consume_optional_string("Padding"), None);
    }
}
