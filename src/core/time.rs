//! Parsing of single human time tokens such as `6 AM`, `6:30 p.m.` or `12 PM`.
//!
//! The accepted shape is `H[H][:MM] [A|P][.]M[.]`, case-insensitive, with
//! optional leading punctuation noise and any amount of whitespace. Anything
//! after the marker is ignored, so `9 PMdaily` reads as `9 PM`. Hours are
//! converted but not range-checked: `13 PM` yields 2500.

use crate::domain::model::TimeOfDay;
use crate::utils::error::{EtlError, Result};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Maps a 12-hour clock hour onto the 24-hour clock.
    pub fn to_24h(self, hour: u8) -> u8 {
        match (self, hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Pm, h) if h != 12 => h + 12,
            (_, h) => h,
        }
    }
}

/// Converts one time token into a [`TimeOfDay`].
pub struct TimeNormalizer;

impl TimeNormalizer {
    pub fn parse(token: &str) -> Result<TimeOfDay> {
        parse_time(token)
    }
}

pub fn parse_time(token: &str) -> Result<TimeOfDay> {
    let invalid = || EtlError::InvalidTimeFormat {
        input: token.trim().to_string(),
    };

    let cleaned = normalize_token(token);
    let mut scanner = Scanner::new(&cleaned);

    scanner.skip_while(|c| !c.is_alphanumeric());

    let hour = scanner.digits(1..=2).ok_or_else(invalid)?;
    let minute = if scanner.eat(':') {
        scanner.digits(2..=2).ok_or_else(invalid)?
    } else {
        0
    };
    // stray periods before the marker, as in "6. PM"
    scanner.skip_while(|c| c == ' ' || c == '.');
    let meridiem = scanner.meridiem().ok_or_else(invalid)?;

    Ok(TimeOfDay::from_parts(meridiem.to_24h(hour), minute))
}

/// Collapses whitespace runs to one space and trims the ends.
fn normalize_token(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.chars.next_if(|&c| pred(c)).is_some() {}
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if_eq(&expected).is_some()
    }

    fn eat_ignore_case(&mut self, expected: char) -> bool {
        self.chars
            .next_if(|c| c.eq_ignore_ascii_case(&expected))
            .is_some()
    }

    /// Consumes a whole digit run; fails if its length is outside `len`.
    fn digits(&mut self, len: std::ops::RangeInclusive<usize>) -> Option<u8> {
        let mut value: u32 = 0;
        let mut count = 0;
        while let Some(d) = self.chars.next_if(char::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add(d.to_digit(10)?);
            count += 1;
        }
        if len.contains(&count) {
            u8::try_from(value).ok()
        } else {
            None
        }
    }

    fn meridiem(&mut self) -> Option<Meridiem> {
        let meridiem = if self.eat_ignore_case('a') {
            Meridiem::Am
        } else if self.eat_ignore_case('p') {
            Meridiem::Pm
        } else {
            return None;
        };
        // `A. M.` keeps one space inside the marker
        self.eat('.');
        self.eat(' ');
        if !self.eat_ignore_case('m') {
            return None;
        }
        self.eat('.');
        Some(meridiem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hhmm(token: &str) -> u16 {
        parse_time(token).unwrap().as_hhmm()
    }

    #[test]
    fn test_midnight_and_noon() {
        assert_eq!(hhmm("12:00 AM"), 0);
        assert_eq!(hhmm("12 AM"), 0);
        assert_eq!(hhmm("12 PM"), 1200);
        assert_eq!(hhmm("12:30 pm"), 1230);
    }

    #[test]
    fn test_marker_spellings() {
        assert_eq!(hhmm("6:00 pm"), 1800);
        assert_eq!(hhmm("6 a.m."), 600);
        assert_eq!(hhmm("6 A.M."), 600);
        assert_eq!(hhmm("6 A. M."), 600);
        assert_eq!(hhmm("6 a.m"), 600);
        assert_eq!(hhmm("6am"), 600);
        assert_eq!(hhmm("9:45P.M."), 2145);
        assert_eq!(hhmm("11 Pm"), 2300);
        assert_eq!(hhmm("6 a. m."), 600);
        assert_eq!(hhmm("6 A M"), 600);
    }

    #[test]
    fn test_text_after_marker_is_ignored() {
        assert_eq!(hhmm("9 PMdaily"), 2100);
        assert_eq!(hhmm("9 PM.Lap swim"), 2100);
        assert_eq!(hhmm("11 AMClosed"), 1100);
        assert_eq!(hhmm("6 PM5"), 1800);
    }

    #[test]
    fn test_stray_period_before_marker() {
        assert_eq!(hhmm("6. PM"), 1800);
        assert_eq!(hhmm("6:30 . am"), 630);
        assert!(parse_time("6.30 PM").is_err());
    }

    #[test]
    fn test_every_valid_hour_and_minute() {
        for hour in 1..=12u16 {
            for minute in [0u16, 1, 15, 30, 59] {
                let am = format!("{}:{:02} AM", hour, minute);
                let pm = format!("{}:{:02} p.m.", hour, minute);
                let am_hour = if hour == 12 { 0 } else { hour };
                let pm_hour = if hour == 12 { 12 } else { hour + 12 };
                assert_eq!(hhmm(&am), am_hour * 100 + minute, "{}", am);
                assert_eq!(hhmm(&pm), pm_hour * 100 + minute, "{}", pm);
            }
        }
    }

    #[test]
    fn test_whitespace_and_noise() {
        assert_eq!(hhmm("   7   PM  "), 1900);
        assert_eq!(hhmm("\t7:15\nAM"), 715);
        assert_eq!(hhmm("(8 AM"), 800);
        assert_eq!(hhmm("*10:30 PM*"), 2230);
        assert_eq!(hhmm("9 PM (approx)"), 2100);
    }

    #[test]
    fn test_missing_marker_is_invalid() {
        let err = parse_time("6:00").unwrap_err();
        assert!(matches!(err, EtlError::InvalidTimeFormat { ref input } if input == "6:00"));
        assert!(parse_time("6").is_err());
        assert!(parse_time("").is_err());
        assert!(parse_time("   ").is_err());
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        assert!(parse_time("6 XM").is_err());
        assert!(parse_time("6 A").is_err());
        assert!(parse_time("6:0 PM").is_err());
        assert!(parse_time("6:000 PM").is_err());
        assert!(parse_time("123 PM").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_out_of_range_digits_pass_through() {
        let late = parse_time("13 PM").unwrap();
        assert_eq!(late.as_hhmm(), 2500);
        assert!(!late.is_valid());
        assert_eq!(hhmm("6:75 AM"), 675);
        assert_eq!(hhmm("13 AM"), 1300);
        assert_eq!(hhmm("0:30 AM"), 30);
        assert!(parse_time("6:30 PM").unwrap().is_valid());
    }

    #[test]
    fn test_normalizer_is_the_same_function() {
        assert_eq!(
            TimeNormalizer::parse("3 PM").unwrap(),
            parse_time("3 PM").unwrap()
        );
    }
}
