//! Framing of transmitted strings for the serial console.

use crate::config::STRING_CAPACITY;
use heapless::Vec;

const PREFIX: &[u8] = b"TRANSMITTED STRING: \"";
const SUFFIX: &[u8] = b"\"\r\n";

/// Room for the prefix, a full string and the suffix.
pub const LINE_CAPACITY: usize = 96;

/// Text sent over the wire for one finalized string.
pub type Line = Vec<u8, LINE_CAPACITY>;

/// Build `TRANSMITTED STRING: "<text>"\r\n`.
///
/// `text` longer than `STRING_CAPACITY` is truncated.
pub fn transmission_line(text: &[u8]) -> Line {
    let text = &text[..text.len().min(STRING_CAPACITY)];
    let mut line = Line::new();
    // Cannot overflow: 21 + 63 + 3 < LINE_CAPACITY.
    let _ = line.extend_from_slice(PREFIX);
    let _ = line.extend_from_slice(text);
    let _ = line.extend_from_slice(SUFFIX);
    line
}
