//! Normalization of raw hours cells such as `"6 AM - 11 AM / 3 PM - 9 PM"`.
//!
//! A cell goes through four stages, each exposed on its own:
//! [`repair_boundaries`] → [`split_segments`] → [`extract_ranges`] →
//! [`parse_range`]. Extraction is deliberately looser than parsing so that
//! a range that looks like a time range but does not parse gets reported
//! instead of silently vanishing.

use crate::core::time::parse_time;
use crate::domain::model::{DayHours, TimeRange};
use crate::domain::ports::DiagnosticSink;
use crate::utils::error::{EtlError, Result};
use std::borrow::Cow;

const DASHES: [char; 3] = ['-', '\u{2013}', '\u{2014}'];
const SEGMENT_SEPARATORS: [char; 3] = ['\n', '\r', '/'];

pub struct RangeFormatter<'a> {
    sink: &'a dyn DiagnosticSink,
}

impl<'a> RangeFormatter<'a> {
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    /// Never fails: unparseable ranges are skipped and reported to the sink.
    pub fn format(&self, cell: &str) -> DayHours {
        let cell = cell.trim();
        if cell.eq_ignore_ascii_case(DayHours::CLOSED_LABEL) {
            return DayHours::Closed;
        }

        let repaired = repair_boundaries(cell);
        let mut ranges = Vec::new();

        for segment in split_segments(&repaired) {
            for text in extract_ranges(segment) {
                match parse_range(text) {
                    Ok(range) => ranges.push(range),
                    Err(e) => self
                        .sink
                        .warn(&format!("Skipping invalid time range '{}': {}", text, e)),
                }
            }
        }

        DayHours::Open(ranges)
    }
}

/// Inserts a space wherever a marker character runs straight into a digit,
/// e.g. `"11 AM3 PM"` becomes `"11 AM 3 PM"`.
pub fn repair_boundaries(cell: &str) -> Cow<'_, str> {
    let mut repaired: Option<String> = None;
    let mut prev: Option<char> = None;
    let mut before_prev: Option<char> = None;

    for (idx, ch) in cell.char_indices() {
        let boundary = ch.is_ascii_digit()
            && prev.is_some_and(|p| ends_marker(p, before_prev));
        if boundary {
            repaired
                .get_or_insert_with(|| cell[..idx].to_string())
                .push(' ');
        }
        if let Some(buf) = repaired.as_mut() {
            buf.push(ch);
        }
        before_prev = prev;
        prev = Some(ch);
    }

    repaired.map_or(Cow::Borrowed(cell), Cow::Owned)
}

fn ends_marker(ch: char, before: Option<char>) -> bool {
    match ch {
        'a' | 'A' | 'p' | 'P' | 'm' | 'M' => true,
        '.' => matches!(before, Some('m' | 'M')),
        _ => false,
    }
}

/// Splits on newlines and `/`, dropping blank segments.
pub fn split_segments(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(SEGMENT_SEPARATORS)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Every maximal `time - time` substring of a segment, in order.
/// Surrounding prose is ignored.
pub fn extract_ranges(segment: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = segment.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(segment.len(), |&(b, _)| b);

    let mut found = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let starts_number = chars[i].1.is_ascii_digit()
            && (i == 0 || !matches!(chars[i - 1].1, '0'..='9' | ':'));
        if starts_number {
            if let Some(end) = match_range(&chars, i) {
                found.push(&segment[byte_at(i)..byte_at(end)]);
                i = end;
                continue;
            }
        }
        i += 1;
    }

    found
}

/// Splits extracted range text at its dash and parses both ends.
pub fn parse_range(text: &str) -> Result<TimeRange> {
    let (start, end) = text
        .split_once(DASHES)
        .ok_or_else(|| EtlError::InvalidTimeFormat {
            input: text.to_string(),
        })?;

    Ok(TimeRange::new(parse_time(start.trim())?, parse_time(end.trim())?))
}

fn match_range(chars: &[(usize, char)], start: usize) -> Option<usize> {
    let mut i = match_time(chars, start)?;
    i = skip_spaces(chars, i);
    if !DASHES.contains(&chars.get(i)?.1) {
        return None;
    }
    i = skip_spaces(chars, i + 1);
    if !chars.get(i)?.1.is_ascii_digit() {
        return None;
    }
    match_time(chars, i)
}

/// Loose time shape: 1–2 digits, optional `:digits`, optional spaces and a
/// two-letter marker ending in `M` (`X.M.` included, so it can be reported).
/// Whatever follows the marker is left alone.
fn match_time(chars: &[(usize, char)], start: usize) -> Option<usize> {
    let at = |i: usize| chars.get(i).map(|&(_, c)| c);

    let mut i = start;
    while at(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
    }
    if !(1..=2).contains(&(i - start)) {
        return None;
    }

    if at(i) == Some(':') && at(i + 1).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
        while at(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
    }

    i = skip_spaces(chars, i);
    if !at(i).is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    i += 1;
    if at(i) == Some('.') {
        i += 1;
    }
    if at(i).is_some_and(char::is_whitespace) && matches!(at(i + 1), Some('m' | 'M')) {
        i += 1;
    }
    if !matches!(at(i), Some('m' | 'M')) {
        return None;
    }
    i += 1;
    if at(i) == Some('.') {
        i += 1;
    }
    Some(i)
}

fn skip_spaces(chars: &[(usize, char)], mut i: usize) -> usize {
    while chars.get(i).is_some_and(|&(_, c)| c.is_whitespace()) {
        i += 1;
    }
    i
}
