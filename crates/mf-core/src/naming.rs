//! Download-name derivation for converted audio.
//!
//! The client-supplied upload filename only ever feeds the
//! `Content-Disposition` header; it never becomes an on-disk path.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Extension given to every converted file.
pub const MP3_EXTENSION: &str = "mp3";

/// Stem used when the upload name has nothing left after stripping.
const FALLBACK_STEM: &str = "audio";

/// RFC 5987 `attr-char` set: everything else is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Derive the suggested download name for an uploaded file.
///
/// Directory components (either separator) are dropped, then the last
/// extension is replaced with `.mp3`. A dot that only leads the name
/// (`.hidden`) does not start an extension.
///
/// ```
/// use mf_core::download_name;
///
/// assert_eq!(download_name("clip.mov"), "clip.mp3");
/// assert_eq!(download_name("my.video.mp4"), "my.video.mp3");
/// assert_eq!(download_name("noext"), "noext.mp3");
/// ```
pub fn download_name(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let stem = split_extension(base).0;
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };

    format!("{stem}.{MP3_EXTENSION}")
}

/// Split `name` into `(stem, extension)`; the extension keeps its dot.
fn split_extension(name: &str) -> (&str, &str) {
    let Some(dot) = name.rfind('.') else {
        return (name, "");
    };

    // Leading dots belong to the stem.
    if name[..dot].chars().all(|c| c == '.') {
        return (name, "");
    }

    name.split_at(dot)
}

/// Build an `attachment` `Content-Disposition` header value for `filename`.
///
/// Names that are plain printable ASCII go out as a quoted `filename`.
/// Anything else gets an ASCII fallback in `filename` plus the exact
/// name as an RFC 5987 `filename*` parameter.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{filename}\"")
    } else {
        let encoded = utf8_percent_encode(filename, ATTR_CHAR);
        format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
    }
}
