//! Webhook signature verification.
//!
//! The provider signs the raw request body with HMAC-SHA256 keyed by the API
//! secret and sends the hex digest in the `x-signature` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length, so this cannot fail
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a hex signature. An empty secret never verifies.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "webhook-secret";

    #[test]
    fn test_valid_signature() {
        let body = br#"{"type":"call.session_started"}"#;
        let signature = sign(SECRET, body);
        assert_eq!(signature.len(), 64);
        assert!(verify(SECRET, body, &signature));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let body = b"{}";
        let signature = sign(SECRET, body).to_uppercase();
        assert!(verify(SECRET, body, &signature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let signature = sign(SECRET, br#"{"type":"a"}"#);
        assert!(!verify(SECRET, br#"{"type":"b"}"#, &signature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"{}";
        let signature = sign("other-secret", body);
        assert!(!verify(SECRET, body, &signature));
    }

    #[test]
    fn test_garbage_signature_rejected() {
        assert!(!verify(SECRET, b"{}", "not-hex"));
        assert!(!verify(SECRET, b"{}", ""));
    }

    #[test]
    fn test_empty_secret_never_verifies() {
        let signature = sign("", b"{}");
        assert!(!verify("", b"{}", &signature));
    }
}
