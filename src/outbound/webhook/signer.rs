use sha2::Sha256;

/// HMAC-SHA256 signer for webhook payload integrity
pub struct HmacSigner {
    secret: String,
}

impl HmacSigner {
    /// New HMAC signer keyed with the given shared secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign the exact byte sequence that will be transmitted as the request body.
    ///
    /// The digest is only verifiable by the receiver if it is computed over
    /// byte-identical content to what goes on the wire, so callers must sign
    /// the already-encoded body, not a re-serialization of it.
    pub fn sign(&self, body: &[u8]) -> String {
        use hmac::{Hmac, Mac};
        type HmacSha256 = Hmac<Sha256>;

        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC key can be of any size, as per crate documentation"),
        };

        mac.update(body);

        let result = mac.finalize();
        hex::encode(result.into_bytes())
    }

    /// Verify a received body against a hex digest (receiver side)
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<(), String> {
        let expected = self.sign(body);
        if signature != expected {
            return Err("Invalid signature".to_string());
        }
        Ok(())
    }
}

/// Helper function to format signature for HTTP header
pub fn format_signature_header(signature: &str) -> String {
    format!("sha256={}", signature)
}

/// Helper function to parse signature from HTTP header
pub fn parse_signature_header(header: &str) -> Result<String, String> {
    if let Some(sig) = header.strip_prefix("sha256=") {
        Ok(sig.to_string())
    } else {
        Err(format!("Invalid signature header format: {header}"))
    }
}
