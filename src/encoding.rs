//! URL-safe base64 helpers.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use crate::UtilError;

/// Encodes a string with the padded URL-safe base64 alphabet.
pub fn encrypt_base64(s: &str) -> String {
    URL_SAFE.encode(s.as_bytes())
}

/// Decodes a string produced by [`encrypt_base64`].
///
/// Line breaks in the input are ignored.
pub fn decrypt_base64(encoded: &str) -> Result<String, UtilError> {
    let compact: String = encoded.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    let bytes = URL_SAFE
        .decode(compact)
        .map_err(|_| UtilError::InvalidBase64)?;
    String::from_utf8(bytes).map_err(|_| UtilError::InvalidUtf8)
}
