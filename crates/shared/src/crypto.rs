//! Cryptographic utilities for API key digests and webhook signatures.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Signs a payload with HMAC-SHA256 and returns a `sha256=<hex>` signature
/// in the format used on provider webhook headers.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a `sha256=<hex>` signature against the payload.
///
/// Comparison goes through the HMAC verify path so it is constant-time.
pub fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Some(hex_part) = signature.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_part) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }

    #[test]
    fn test_sign_payload_format() {
        let sig = sign_payload("secret", b"{}");
        assert!(sig.starts_with("sha256="));
        // 32 bytes of SHA-256 output as hex
        assert_eq!(sig.len(), "sha256=".len() + 64);
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let payload = br#"{"event":"delivered","attempt_id":"abc"}"#;
        let sig = sign_payload("webhook-secret", payload);
        assert!(verify_signature("webhook-secret", payload, &sig));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let sig = sign_payload("secret-a", b"payload");
        assert!(!verify_signature("secret-b", b"payload", &sig));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let sig = sign_payload("secret", b"payload");
        assert!(!verify_signature("secret", b"payload2", &sig));
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        assert!(!verify_signature("secret", b"payload", "not-a-signature"));
        assert!(!verify_signature("secret", b"payload", "sha256=zzzz"));
        assert!(!verify_signature("secret", b"payload", ""));
    }
}
