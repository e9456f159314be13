//! # Path Matching
//!
//! The gateway serves exactly one route shape:
//!
//! ```text
//! /audio/<fileId>.<ext>      ext ∈ {mp3, m4a}
//! ```
//!
//! `<fileId>` is a single path segment without dots. It may be percent-encoded
//! and is decoded before it is used as part of the storage key. Anything else,
//! including partial matches, is rejected with [`AppError::BadPath`].

use percent_encoding::percent_decode_str;

use crate::constants::AUDIO_PATH_PREFIX;
use crate::errors::{AppError, AppResult};
use crate::models::{AudioExtension, ObjectKey};

/// Extracts the object key from a raw request path.
///
/// # Errors
///
/// - `BadPath`: wrong prefix, nested segments, no extension, more than one dot,
///   an unsupported extension, or a file id that decodes to invalid UTF-8 or
///   contains a `/`.
///
/// # Example
///
/// ```rust
/// let key = match_audio_path("/audio/episode%2001.mp3")?;
/// assert_eq!(key.file_id, "episode 01");
/// ```
pub fn match_audio_path(path: &str) -> AppResult<ObjectKey> {
    let file_name = path
        .strip_prefix(AUDIO_PATH_PREFIX)
        .ok_or(AppError::BadPath)?;

    if file_name.contains('/') {
        return Err(AppError::BadPath);
    }

    let (raw_id, ext) = file_name.split_once('.').ok_or(AppError::BadPath)?;
    if raw_id.is_empty() || ext.contains('.') {
        return Err(AppError::BadPath);
    }

    let extension = AudioExtension::from_extension(ext).ok_or(AppError::BadPath)?;

    let file_id = percent_decode_str(raw_id)
        .decode_utf8()
        .map_err(|_| AppError::BadPath)?;
    if file_id.contains('/') {
        return Err(AppError::BadPath);
    }

    Ok(ObjectKey::new(file_id.into_owned(), extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_supported_extensions() {
        let key = match_audio_path("/audio/abc123.mp3").unwrap();
        assert_eq!(key, ObjectKey::new("abc123", AudioExtension::Mp3));

        let key = match_audio_path("/audio/abc123.m4a").unwrap();
        assert_eq!(key.extension, AudioExtension::M4a);
    }

    #[test]
    fn decodes_percent_encoded_ids() {
        let key = match_audio_path("/audio/my%20track.mp3").unwrap();
        assert_eq!(key.file_id, "my track");
    }

    #[test]
    fn rejects_unsupported_extension() {
        assert!(matches!(match_audio_path("/audio/abc.wav"), Err(AppError::BadPath)));
        assert!(matches!(match_audio_path("/audio/abc.MP3"), Err(AppError::BadPath)));
    }

    #[test]
    fn rejects_malformed_shapes() {
        for path in [
            "/audio/abc",
            "/audio/.mp3",
            "/audio/a.b.mp3",
            "/audio/abc.mp3.mp3",
            "/audio/nested/abc.mp3",
            "/audio/abc.mp3/",
            "/audios/abc.mp3",
            "/abc.mp3",
            "audio/abc.mp3",
            "/audio/",
        ] {
            assert!(
                matches!(match_audio_path(path), Err(AppError::BadPath)),
                "{path} should not match"
            );
        }
    }

    #[test]
    fn rejects_encoded_slash_and_invalid_utf8() {
        assert!(matches!(match_audio_path("/audio/a%2Fb.mp3"), Err(AppError::BadPath)));
        assert!(matches!(match_audio_path("/audio/%FF.mp3"), Err(AppError::BadPath)));
    }
}
