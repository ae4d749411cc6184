//! Opaque token generation and double-submit CSRF verification.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

/// Header that must echo the CSRF cookie (`X-CSRF-Token`, case-insensitive).
pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_BYTES: usize = 32;

/// 32 bytes from the thread-local CSPRNG, base64url without padding.
///
/// Used for both session and CSRF tokens.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Check a double-submit pair: both present, non-empty, and identical.
pub fn verify_double_submit(header: Option<&str>, cookie: Option<&str>) -> bool {
    match (header, cookie) {
        (Some(header), Some(cookie)) if !header.is_empty() && !cookie.is_empty() => {
            constant_time_eq(header.as_bytes(), cookie.as_bytes())
        }
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
