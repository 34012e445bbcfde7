//! Input decoding.

use std::borrow::Cow;

/// Decode an export file's bytes.
///
/// Exports are UTF-8 (a BOM is stripped). Files that went through an editor
/// on Windows are sometimes re-saved as Windows-1252, so that is the
/// fallback when the bytes are not valid UTF-8.
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    log::warn!("input is not valid UTF-8, decoding as Windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}
