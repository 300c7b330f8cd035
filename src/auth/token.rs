//! Access token generation

use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per token before hex encoding
pub const TOKEN_BYTES: usize = 128;

/// Length of an encoded token (two hex chars per byte)
pub const TOKEN_HEX_LEN: usize = TOKEN_BYTES * 2;

/// Generate an opaque bearer token from the OS random source.
pub fn generate_access_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
