//! Wildcard pattern scans over an image window.
//!
//! Scans are pure reads and never touch bytes outside the window. When the
//! pattern starts with a literal byte (or has one near the front), `memchr`
//! jumps the scan between candidate positions instead of sliding one byte
//! at a time.

use memchr::memchr_iter;

use crate::error::{Error, Result};
use crate::image::ImageWindow;
use crate::scan::Pattern;

/// All match addresses of `pattern` in `image`, in ascending order.
pub fn find_all(image: &ImageWindow<'_>, pattern: &Pattern) -> Vec<u64> {
    let bytes = image.bytes();
    if pattern.is_empty() || bytes.len() < pattern.len() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let last = bytes.len() - pattern.len();

    match pattern.first_literal() {
        Some((skip, value)) => {
            for pos in memchr_iter(value, bytes) {
                let Some(start) = pos.checked_sub(skip) else {
                    continue;
                };
                if start > last {
                    break;
                }
                if pattern.matches_at(&bytes[start..]) {
                    matches.push(image.base() + start as u64);
                }
            }
        }
        None => {
            // All-wildcard pattern: every window position matches.
            matches.extend((0..=last).map(|start| image.base() + start as u64));
        }
    }

    matches
}

/// First match of `pattern` in scan order, or `PatternNotFound` carrying
/// `name` for the initialization log.
pub fn find_first(image: &ImageWindow<'_>, pattern: &Pattern, name: &str) -> Result<u64> {
    let bytes = image.bytes();
    if pattern.is_empty() || bytes.len() < pattern.len() {
        return Err(Error::PatternNotFound {
            name: name.to_string(),
        });
    }

    let last = bytes.len() - pattern.len();
    match pattern.first_literal() {
        Some((skip, value)) => {
            for pos in memchr_iter(value, bytes) {
                let Some(start) = pos.checked_sub(skip) else {
                    continue;
                };
                if start > last {
                    break;
                }
                if pattern.matches_at(&bytes[start..]) {
                    return Ok(image.base() + start as u64);
                }
            }
        }
        None => return Ok(image.base()),
    }

    Err(Error::PatternNotFound {
        name: name.to_string(),
    })
}

/// Matches restricted to the absolute address range `[start, end)`,
/// clamped to the window. Used to search only the first bytes of a
/// previously located function.
pub fn find_in_range(
    image: &ImageWindow<'_>,
    start: u64,
    end: u64,
    pattern: &Pattern,
) -> Vec<u64> {
    find_all(&image.slice(start, end), pattern)
}
