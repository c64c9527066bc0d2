#![forbid(unsafe_code)]

//! Removing in-band formatting from text.
//!
//! Message text can carry three kinds of in-band formatting:
//!
//! - SGR colour sequences (`ESC [ … m`),
//! - backspace overstrike, as produced by `nroff`: `_\bX` underlines `X`,
//!   `X\bX` emboldens it,
//! - private markers (`ESC ] … BEL`) that tag attachment banners and
//!   protected headers.
//!
//! Classification and searching work on the stripped text.

use crate::ansi::sgr_len;

/// Marker written before an attachment banner.
pub const ATTACHMENT_MARKER: &[u8] = b"\x1b]9;mtui-attachment\x07";
/// Marker written before a protected (encrypted) header block.
pub const PROTECTED_HEADER_MARKER: &[u8] = b"\x1b]8;mtui-protected-header\x07";

/// Does `bytes` start with one of the private markers?
pub fn starts_with_marker(bytes: &[u8]) -> bool {
    bytes.starts_with(ATTACHMENT_MARKER) || bytes.starts_with(PROTECTED_HEADER_MARKER)
}

/// Length of the private marker at the start of `bytes` (0 if none).
///
/// The marker runs up to and including the terminating BEL.
pub fn marker_len(bytes: &[u8]) -> usize {
    if !starts_with_marker(bytes) {
        return 0;
    }
    bytes
        .iter()
        .position(|b| *b == 0x07)
        .map_or(bytes.len(), |p| p + 1)
}

/// Remove SGR sequences and backspace overstrike, and optionally markers.
pub fn strip_formatting(src: &[u8], strip_markers: bool) -> Vec<u8> {
    let mut dest = Vec::with_capacity(src.len());
    let mut i = 0;
    while i < src.len() {
        if src[i] == 0x08 && i > 0 {
            match src.get(i + 1) {
                Some(b'_') => i += 2,
                Some(&next) if !dest.is_empty() => {
                    dest.pop();
                    dest.push(next);
                    i += 2;
                }
                _ => {
                    dest.push(src[i]);
                    i += 1;
                }
            }
            continue;
        }

        let len = sgr_len(&src[i..]);
        if len > 0 {
            i += len;
            continue;
        }
        if strip_markers {
            let len = marker_len(&src[i..]);
            if len > 0 {
                tracing::trace!("skipping private marker");
                i += len;
                continue;
            }
        }
        dest.push(src[i]);
        i += 1;
    }
    dest
}
