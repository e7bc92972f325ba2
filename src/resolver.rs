//! Extracts the 11-character video identifier from a pasted YouTube URL.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Length every identifier must have, counted in UTF-16 code units.
pub const VIDEO_ID_LEN: usize = 11;

// Greedy prefix: the last recognised shape on the first line wins. A line
// ends at \n, \r, U+2028 or U+2029, so `.` is spelled out as that class.
static VIDEO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[^\n\r\x{2028}\x{2029}]*",
        r"(youtu[^\n\r\x{2028}\x{2029}]be/|v/|u/(?-u:\w)/|embed/|watch\?v=|&v=)",
        r"([^#&?]*)",
        r"[^\n\r\x{2028}\x{2029}]*",
    ))
    .expect("video URL pattern is valid")
});

/// Opaque video token. Only ever built by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the identifier if `input` matches a known URL shape and the
/// captured run is exactly [`VIDEO_ID_LEN`] long. Empty input, unknown
/// shapes and wrong-length runs all yield `None`.
pub fn resolve(input: &str) -> Option<VideoId> {
    let caps = VIDEO_URL.captures(input)?;
    let token = caps.get(2)?.as_str();
    (token.encode_utf16().count() == VIDEO_ID_LEN).then(|| VideoId(token.to_string()))
}
