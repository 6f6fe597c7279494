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
#![cfg(feature = "soft-backend")]

use native_rsa::{rsa::Padding, test};

mod common;

#[test]
fn rsa_primitive_known_answers() {
    common::init_tracing();
    let key = common::test_key();

    test::from_file("tests/rsa_primitive_tests.txt", |section, test_case| {
        let padding = test_case.consume_padding("Padding");
        match section {
            "PrivateEncrypt" => {
                let msg = test_case.consume_bytes("Msg");
                let expected = test_case.consume_bytes("Output");
                // Deterministic paddings make the output reproducible.
                assert_eq!(key.private_encrypt(&msg, padding)?, expected);
                assert_eq!(key.public_decrypt(&expected, padding)?, msg);
            }
            "PublicEncrypt" => {
                assert_eq!(padding, Padding::None);
                let msg = test_case.consume_bytes("Msg");
                let expected = test_case.consume_bytes("Output");
                assert_eq!(key.public_encrypt(&msg, padding)?, expected);
                assert_eq!(key.private_decrypt(&expected, padding)?, msg);
            }
            "PrivateDecrypt" => {
                let input = test_case.consume_bytes("Input");
                let expected = test_case.consume_bytes("Output");
                assert_eq!(key.private_decrypt(&input, padding)?, expected);
            }
            _ => unreachable!("unknown section {section}"),
        }
        Ok(())
    });
}

#[test]
fn rsa_primitive_rejects_corrupted_ciphertexts() {
    common::init_tracing();
    let key = common::test_key();

    test::from_file("tests/rsa_primitive_tests.txt", |section, test_case| {
        let padding = test_case.consume_padding("Padding");
        if section != "PrivateDecrypt" {
            let _ = test_case.consume_bytes("Msg");
            let _ = test_case.consume_bytes("Output");
            return Ok(());
        }
        let mut input = test_case.consume_bytes("Input");
        let _ = test_case.consume_bytes("Output");
        let last = input.len() - 1;
        input[last] ^= 0x01;
        assert!(key.private_decrypt(&input, padding).is_err());
        Ok(())
    });
}

#[test]
fn rsa_primitive_input_may_not_exceed_the_modulus() {
    common::init_tracing();
    let key = common::test_key();
    let modulus = key.public_modulus().unwrap().to_be_bytes();

    let err = key.private_decrypt(&modulus, Padding::None).unwrap_err();
    assert_eq!(err.code().unwrap().reason_string(), Some("data too large for modulus"));

    let mut longer = vec![0u8];
    longer.extend_from_slice(&modulus);
    let err = key.public_decrypt(&longer, Padding::None).unwrap_err();
    assert_eq!(err.code().unwrap().reason_string(), Some("data greater than mod len"));
}
