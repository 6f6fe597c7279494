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
//! Helpers shared by the integration tests.

#![allow(dead_code)]

use native_rsa::{
    bn::BigNum,
    rsa::{Field, Rsa},
    soft::Soft,
    test,
};
use std::sync::{Once, OnceLock};
use tracing_subscriber::EnvFilter;

/// Sends the crate's logs to the test harness' captured output, filtered by
/// `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The 1024-bit key in `tests/rsa_test_key.txt`, assembled field by field.
pub fn test_key() -> Rsa<Soft> {
    let mut key = Rsa::<Soft>::new().unwrap();
    test::from_file("tests/rsa_test_key.txt", |section, test_case| {
        assert_eq!(section, "");
        for field in Field::ALL {
            let bytes = test_case.consume_bytes(&field.name().to_ascii_uppercase());
            let value: BigNum<Soft> = BigNum::from_be_bytes(&bytes)?;
            key.set_field(field, &value)?;
        }
        Ok(())
    });
    key
}

/// A freshly generated 1024-bit key, shared across the tests in one binary
/// as PEM so that each test gets a record of its own.
pub fn generated_key() -> Rsa<Soft> {
    static PEM: OnceLock<String> = OnceLock::new();
    let pem = PEM.get_or_init(|| {
        let mut key = Rsa::<Soft>::new().unwrap();
        key.generate_keys(1024, &BigNum::from_u64(65537).unwrap())
            .unwrap();
        key.private_key_pem().unwrap().to_string()
    });
    Rsa::private_key_from_pem(pem).unwrap()
}

/// Reads a file under `tests/data`.
pub fn data(name: &str) -> String {
    let path = format!("tests/data/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("cannot read {path}: {err}"))
}
