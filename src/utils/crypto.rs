// Cryptographic primitives behind callback signature verification

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Derive the HMAC key from a secret: the SHA-256 digest of its raw bytes
#[must_use]
pub fn derive_signing_key(secret: &[u8]) -> [u8; 32] {
    Sha256::digest(secret).into()
}

/// HMAC-SHA256 of `message`, rendered as lowercase hex
///
/// Returns `None` only if the key is rejected by the MAC implementation.
#[must_use]
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> Option<String> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).ok()?;
    mac.update(message);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Compare two byte strings without short-circuiting on the first difference
///
/// Lengths are not secret here (a hex digest is always 64 bytes), so a length
/// mismatch returns early.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
