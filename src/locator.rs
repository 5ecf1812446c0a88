use crate::error::RetimeError;
use crate::timestamp::Timestamp;

use std::sync::OnceLock;

use nom::bytes::complete::take_while_m_n;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_opt};
use nom::error::VerboseError;
use nom::IResult;
use regex::bytes::Regex;

/// One timestamp found in a document, with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampMatch {
    pub start: usize,
    pub end: usize,
    pub timestamp: Timestamp,
}

/// Lazily yields the timestamps of a document, left to right and without
/// overlap. Calling [`locate`] again on the same text starts over.
///
/// The document is scanned as bytes, so text in any ASCII-compatible
/// encoding works.
#[derive(Debug)]
pub struct Matches<'t> {
    inner: regex::bytes::Matches<'static, 't>,
}

pub fn locate(text: &[u8]) -> Matches<'_> {
    Matches {
        inner: timestamp_regex().find_iter(text),
    }
}

impl<'t> Iterator for Matches<'t> {
    type Item = Result<TimestampMatch, RetimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let found = self.inner.next()?;
        let span = found.as_bytes();

        // The regex has already checked the shape, so the only way decoding
        // can fail is an hours field too wide for a u64.
        let item = match all_consuming(timestamp)(span) {
            Ok((_, timestamp)) => Ok(TimestampMatch {
                start: found.start(),
                end: found.end(),
                timestamp,
            }),
            Err(_) => Err(RetimeError::overflow(String::from_utf8_lossy(span))),
        };
        Some(item)
    }
}

fn timestamp_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // `\d` would also accept non-ASCII digits.
    REGEX.get_or_init(|| {
        Regex::new(r"[0-9]+:[0-9]{2}:[0-9]{2},[0-9]{3}")
            .unwrap_or_else(|err| unreachable!("Timestamp pattern failed to compile: {}", err))
    })
}

fn timestamp(input: &[u8]) -> IResult<&[u8], Timestamp, VerboseError<&[u8]>> {
    let (input, hours) = map_opt(digit1, decimal)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, minutes) = fixed_digits(2)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, seconds) = fixed_digits(2)(input)?;
    let (input, _) = char(',')(input)?;
    let (input, millis) = fixed_digits(3)(input)?;

    Ok((input, Timestamp::new(hours, minutes, seconds, millis)))
}

fn fixed_digits<'a>(
    width: usize,
) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], u32, VerboseError<&'a [u8]>> {
    map_opt(
        take_while_m_n(width, width, |c: u8| c.is_ascii_digit()),
        |digits: &[u8]| decimal(digits).and_then(|n| u32::try_from(n).ok()),
    )
}

/// Value of a run of ASCII digits, or `None` if it does not fit in a `u64`.
fn decimal(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, digit| {
        acc.checked_mul(10)?
            .checked_add(u64::from(digit.checked_sub(b'0')?))
    })
}
