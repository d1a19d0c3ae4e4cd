//! Session identifier generation.

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;

/// Random bytes behind every identifier (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Length of an encoded identifier: 32 bytes in unpadded base64url.
pub const TOKEN_LEN: usize = 43;

/// Create a new URL-safe session identifier from the OS CSPRNG.
///
/// # Errors
/// Returns an error if the operating system cannot provide randomness.
pub fn generate() -> Result<String, rand::Error> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Check that a presented value could have been produced by [`generate`].
pub fn is_well_formed(token: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9_-]{43}$").is_ok_and(|re| re.is_match(token))
}

/// Leading characters of an identifier, safe to put in logs.
pub fn prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
