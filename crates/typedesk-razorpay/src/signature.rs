//! # Signature Verification
//!
//! The security core of the pipeline: proof that a payment completion event
//! actually originated from Razorpay and was not forged by a client. A
//! client-reported "success" flag is never trusted without this check.
//!
//! Two distinct signing schemes share the HMAC-SHA256 primitive but must
//! never be conflated:
//! - payment verification signs `"{order_id}|{payment_id}"`
//! - webhook verification signs the raw callback body

use hmac::{Hmac, Mac};
use sha2::Sha256;
use typedesk_core::{OrderError, OrderResult};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over `message`, keyed by `secret`, as lowercase hex
pub fn compute_hmac_sha256(secret: &str, message: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// The expected payment signature for an order/payment pair
pub fn payment_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    compute_hmac_sha256(secret, format!("{}|{}", order_id, payment_id).as_bytes())
}

/// Verify a Razorpay payment signature against the shared secret.
///
/// Fails fast with `MissingField` before computing anything if any required
/// input is empty. Returns `Ok(true)` only on an exact match of the
/// lowercase hex digests.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> OrderResult<bool> {
    if order_id.is_empty() {
        return Err(OrderError::MissingField {
            field: "razorpay_order_id",
        });
    }
    if payment_id.is_empty() {
        return Err(OrderError::MissingField {
            field: "razorpay_payment_id",
        });
    }
    if signature.is_empty() {
        return Err(OrderError::MissingField {
            field: "razorpay_signature",
        });
    }

    let expected = payment_signature(order_id, payment_id, secret);
    Ok(constant_time_compare(
        &expected,
        &signature.to_lowercase(),
    ))
}

/// Verify a Razorpay webhook signature over the raw callback body.
///
/// Structurally like payment verification but signs the body bytes, not
/// `order_id|payment_id`; the two schemes stay separate.
pub fn verify_webhook_signature(body: &[u8], signature: &str, secret: &str) -> OrderResult<bool> {
    if signature.is_empty() {
        return Err(OrderError::MissingField {
            field: "x-razorpay-signature",
        });
    }

    let expected = compute_hmac_sha256(secret, body);
    Ok(constant_time_compare(
        &expected,
        &signature.to_lowercase(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key";

    #[test]
    fn test_genuine_payment_signature_verifies() {
        let sig = payment_signature("order_abc", "pay_xyz", SECRET);
        assert_eq!(sig.len(), 64);

        assert!(verify_payment_signature("order_abc", "pay_xyz", &sig, SECRET).unwrap());
    }

    #[test]
    fn test_single_character_mutations_fail() {
        let sig = payment_signature("order_abc", "pay_xyz", SECRET);

        // Mutate the signature
        let mut tampered = sig.clone().into_bytes();
        tampered[0] = if tampered[0] == b'a' { b'b' } else { b'a' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(!verify_payment_signature("order_abc", "pay_xyz", &tampered, SECRET).unwrap());

        // Mutate the order id
        assert!(!verify_payment_signature("order_abd", "pay_xyz", &sig, SECRET).unwrap());

        // Mutate the payment id
        assert!(!verify_payment_signature("order_abc", "pay_xyy", &sig, SECRET).unwrap());
    }

    #[test]
    fn test_missing_fields_fail_fast() {
        let err = verify_payment_signature("", "pay_xyz", "deadbeef", SECRET).unwrap_err();
        assert!(matches!(
            err,
            OrderError::MissingField {
                field: "razorpay_order_id"
            }
        ));

        let err = verify_payment_signature("order_abc", "", "deadbeef", SECRET).unwrap_err();
        assert!(matches!(
            err,
            OrderError::MissingField {
                field: "razorpay_payment_id"
            }
        ));

        let err = verify_payment_signature("order_abc", "pay_xyz", "", SECRET).unwrap_err();
        assert!(matches!(
            err,
            OrderError::MissingField {
                field: "razorpay_signature"
            }
        ));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let sig = payment_signature("order_abc", "pay_xyz", SECRET).to_uppercase();
        assert!(verify_payment_signature("order_abc", "pay_xyz", &sig, SECRET).unwrap());
    }

    #[test]
    fn test_webhook_signature_round_trip() {
        let body = br#"{"event":"payment.captured","payload":{}}"#;
        let sig = compute_hmac_sha256(SECRET, body);

        assert!(verify_webhook_signature(body, &sig, SECRET).unwrap());
        assert!(!verify_webhook_signature(b"tampered body", &sig, SECRET).unwrap());
    }

    #[test]
    fn test_schemes_are_distinct() {
        // A webhook signature over "oid|pid" must not verify as a payment
        // signature and vice versa; the message formats differ even when
        // the raw inputs coincide.
        let payment_sig = payment_signature("order_abc", "pay_xyz", SECRET);
        let webhook_sig = compute_hmac_sha256(SECRET, b"order_abc,pay_xyz");

        assert_ne!(payment_sig, webhook_sig);
        assert!(!verify_webhook_signature(b"order_abc,pay_xyz", &payment_sig, SECRET).unwrap());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
