//! # Byte Range Parsing
//!
//! Resolves a single `Range: bytes=<start>-<end>` header against the object
//! size observed in the same request. Multiple ranges and other units are not
//! supported and resolve to "no valid range".

use crate::constants::RANGE_UNIT_BYTES;
use crate::models::RangeSpec;

/// Parses a `Range` header value into a satisfiable interval.
///
/// Returns `None` for syntax errors and for ranges that cannot be satisfied
/// against `size`; the caller decides between a full response and 416.
///
/// # Forms
///
/// - `bytes=-N`: last `min(N, size)` bytes, requires `N > 0` and `size > 0`
/// - `bytes=N-`: from `N` to the end
/// - `bytes=N-M`: from `N` to `M`, with `M` clamped to `size - 1`
pub fn parse_range(header: &str, size: u64) -> Option<RangeSpec> {
    let spec = header
        .trim()
        .strip_prefix(RANGE_UNIT_BYTES)?
        .strip_prefix('=')?
        .trim();
    let (first, last) = spec.split_once('-')?;
    let (first, last) = (first.trim(), last.trim());

    match (first.is_empty(), last.is_empty()) {
        (true, true) => None,
        (true, false) => {
            let suffix = parse_bound(last)?;
            if suffix == 0 || size == 0 {
                return None;
            }
            let length = suffix.min(size);
            Some(RangeSpec {
                start: size - length,
                end: size - 1,
                length,
            })
        }
        (false, _) => {
            let start = parse_position(first)?;
            if start >= size {
                return None;
            }
            let end = if last.is_empty() {
                size - 1
            } else {
                parse_bound(last)?.min(size - 1)
            };
            if end < start {
                return None;
            }
            Some(RangeSpec {
                start,
                end,
                length: end - start + 1,
            })
        }
    }
}

// Digits only: rejects signs and commas from multi-range lists.
fn is_position(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn parse_position(value: &str) -> Option<u64> {
    if !is_position(value) {
        return None;
    }
    value.parse().ok()
}

// End and suffix lengths are clamped to the object anyway, so overflow saturates.
fn parse_bound(value: &str) -> Option<u64> {
    if !is_position(value) {
        return None;
    }
    Some(value.parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(start: u64, end: u64) -> Option<RangeSpec> {
        Some(RangeSpec {
            start,
            end,
            length: end - start + 1,
        })
    }

    #[test]
    fn explicit_range() {
        assert_eq!(parse_range("bytes=0-99", 1000), spec(0, 99));
        assert_eq!(parse_range("bytes=500-500", 1000), spec(500, 500));
    }

    #[test]
    fn open_ended_range() {
        assert_eq!(parse_range("bytes=900-", 1000), spec(900, 999));
    }

    #[test]
    fn end_is_clamped_to_size() {
        assert_eq!(parse_range("bytes=990-5000", 1000), spec(990, 999));
    }

    #[test]
    fn suffix_range() {
        assert_eq!(parse_range("bytes=-100", 1000), spec(900, 999));
        assert_eq!(parse_range("bytes=-5000", 1000), spec(0, 999));
    }

    #[test]
    fn oversized_end_and_suffix_cover_whole_object() {
        assert_eq!(parse_range("bytes=0-99999999999999999999999", 1000), spec(0, 999));
        assert_eq!(parse_range("bytes=10-99999999999999999999999", 1000), spec(10, 999));
        assert_eq!(parse_range("bytes=-99999999999999999999999", 1000), spec(0, 999));
    }

    #[test]
    fn suffix_range_needs_bytes() {
        assert_eq!(parse_range("bytes=-0", 1000), None);
        assert_eq!(parse_range("bytes=-10", 0), None);
    }

    #[test]
    fn start_past_end_of_object() {
        assert_eq!(parse_range("bytes=1000-1010", 1000), None);
        assert_eq!(parse_range("bytes=0-", 0), None);
    }

    #[test]
    fn inverted_range() {
        assert_eq!(parse_range("bytes=50-10", 1000), None);
    }

    #[test]
    fn syntax_errors() {
        for header in [
            "",
            "bytes=",
            "bytes=-",
            "0-99",
            "items=0-99",
            "bytes 0-99",
            "bytes=a-b",
            "bytes=+1-5",
            "bytes=0-10,20-30",
            "bytes=99999999999999999999999-",
        ] {
            assert_eq!(parse_range(header, 1000), None, "{header:?}");
        }
    }

    #[test]
    fn produced_specs_stay_inside_object() {
        for size in [1u64, 2, 7, 1000] {
            for header in ["bytes=0-0", "bytes=0-", "bytes=-1", "bytes=-3", "bytes=3-5", "bytes=1-999999"] {
                if let Some(range) = parse_range(header, size) {
                    assert!(range.start <= range.end && range.end < size, "{header} vs {size}");
                    assert_eq!(range.length, range.end - range.start + 1);
                }
            }
        }
    }
}
