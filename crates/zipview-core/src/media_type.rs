//! Media type guessing from file extensions.

/// Non-`text/*` media types whose bodies are text.
const TEXTUAL_APPLICATION_TYPES: &[&str] = &[
    "application/javascript",
    "application/json",
    "application/xml",
    "application/yaml",
];

/// Guesses the media type of a file from its extension.
///
/// Only the extension of the final path segment is considered, matched
/// case-insensitively against the `mime_guess` table. Returns `None` when
/// there is no guess, in which case callers should omit `Content-Type`
/// entirely.
///
/// # Examples
///
/// ```
/// use zipview_core::guess_media_type;
///
/// assert_eq!(guess_media_type("data.json"), Some("application/json"));
/// assert_eq!(guess_media_type("logs/OUT.TXT"), Some("text/plain"));
/// assert_eq!(guess_media_type("Makefile"), None);
/// ```
#[must_use]
pub fn guess_media_type(file_name: &str) -> Option<&'static str> {
    mime_guess::from_path(file_name).first_raw()
}

/// Returns `true` if bodies of this media type are text and should carry a
/// charset parameter.
#[must_use]
pub fn is_textual(media_type: &str) -> bool {
    media_type.starts_with("text/") || TEXTUAL_APPLICATION_TYPES.contains(&media_type)
}
