// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use proptest::prelude::*;
use rankscope::infrastructure::billing::signature::{signature_header, verify, SignatureError};

const SECRET: &str = "whsec_unit";

#[test]
fn test_header_with_extra_schemes_still_verifies() {
    let payload = br#"{"type":"invoice.payment_failed"}"#;
    let header = format!("{},v0=legacy", signature_header(SECRET, 1_700_000_000, payload));
    assert!(verify(payload, Some(&header), SECRET, 300, 1_700_000_100).is_ok());
}

#[test]
fn test_stale_timestamp_is_rejected() {
    let payload = b"{}";
    let header = signature_header(SECRET, 1_700_000_000, payload);
    assert!(matches!(
        verify(payload, Some(&header), SECRET, 300, 1_700_000_301),
        Err(SignatureError::Expired)
    ));
    // Zero tolerance disables the age check
    assert!(verify(payload, Some(&header), SECRET, 0, 1_800_000_000).is_ok());
}

proptest! {
    #[test]
    fn test_any_payload_change_breaks_signature(payload in proptest::collection::vec(any::<u8>(), 1..256), flip in any::<usize>()) {
        let header = signature_header(SECRET, 1_700_000_000, &payload);
        prop_assert!(verify(&payload, Some(&header), SECRET, 300, 1_700_000_000).is_ok());

        let mut tampered = payload.clone();
        let index = flip % tampered.len();
        tampered[index] ^= 0x01;
        prop_assert!(verify(&tampered, Some(&header), SECRET, 300, 1_700_000_000).is_err());
    }
}
