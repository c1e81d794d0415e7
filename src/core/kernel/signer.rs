use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Signer trait for request authentication
///
/// Implementations must be pure: the same payload and secret always produce
/// the same signature.
pub trait Signer: Send + Sync {
    /// Sign `payload` with `secret` and return the printable signature
    fn sign(&self, payload: &str, secret: &str) -> String;
}

/// HMAC-SHA256 rendered as lowercase hex, as used by Binance
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256Signer;

impl Signer for HmacSha256Signer {
    fn sign(&self, payload: &str, secret: &str) -> String {
        hmac_sha256_hex(payload, secret)
    }
}

/// HMAC-SHA256 of `payload` keyed with `secret`, as lowercase hex
pub fn hmac_sha256_hex(payload: &str, secret: &str) -> String {
    // HMAC accepts keys of any length, so this only fails if the crate changes contract
    HmacSha256::new_from_slice(secret.as_bytes()).map_or_else(
        |e| {
            warn!(error = %e, "hmac key rejected, request goes out with an empty signature");
            String::new()
        },
        |mut mac| {
            mac.update(payload.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        },
    )
}
