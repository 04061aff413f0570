use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a `sha256=<hex>` webhook signature against `secret`.
///
/// An absent `secret` means verification is skipped entirely, matching the
/// reference implementation's optional-secret behavior — a webhook source
/// that was never given a secret cannot be expected to produce one.
pub fn verify_signature(payload: &[u8], signature_header: Option<&str>, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return true;
    };

    let Some(header) = signature_header else {
        return false;
    };

    let Some(hex_digest) = header.strip_prefix("sha256=") else {
        return false;
    };

    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn valid_signature_passes() {
        let payload = b"{\"hello\":\"world\"}";
        let sig = sign("s3cr3t", payload);
        assert!(verify_signature(payload, Some(&sig), Some("s3cr3t")));
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = b"{\"hello\":\"world\"}";
        let sig = sign("s3cr3t", payload);
        assert!(!verify_signature(payload, Some(&sig), Some("other")));
    }

    #[test]
    fn missing_secret_skips_verification() {
        assert!(verify_signature(b"anything", None, None));
    }

    #[test]
    fn missing_header_with_configured_secret_fails() {
        assert!(!verify_signature(b"anything", None, Some("s3cr3t")));
    }

    #[test]
    fn malformed_header_fails() {
        assert!(!verify_signature(b"anything", Some("not-a-signature"), Some("s3cr3t")));
    }
}
