//! Message body extraction from the content tree

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::error::{GmailError, Result};
use crate::models::ContentPart;

/// URL-safe alphabet, padding optional on decode
///
/// Gmail is not consistent about trailing `=`, so both forms are accepted.
pub const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64url body data into text
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn decode_body_data(data: &str) -> Result<String> {
    let bytes = BODY_ENGINE.decode(data)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Find and decode the first body in a content tree
///
/// A node's own body wins over its children. Without one, only the first
/// child is searched: if that subtree has no body the result is
/// `BodyNotFound`, even when a later sibling carries one.
pub fn extract_body(part: &ContentPart) -> Result<String> {
    if let Some(data) = part.body_data() {
        return decode_body_data(data);
    }

    match part.parts.first() {
        Some(first) => extract_body(first),
        None => Err(GmailError::BodyNotFound),
    }
}
