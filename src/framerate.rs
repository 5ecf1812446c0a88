use crate::error::RetimeError;

use std::fmt;
use std::str::FromStr;

use nom::branch::alt;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, opt};
use nom::sequence::preceded;
use nom::IResult;

/// Frame rates worth knowing about when retiming, with where they show up.
pub const COMMON_FRAME_RATES: &[(&str, &str)] = &[
    ("23.976", "Film, slowed down for NTSC"),
    ("24", "Cinema standard"),
    ("25", "PAL standard (Europe, Australia)"),
    ("29.97", "NTSC standard (North America, Japan)"),
    ("30", "Some digital video"),
    ("50", "PAL high frame rate"),
    ("59.94", "NTSC high frame rate"),
    ("60", "High frame rate digital video"),
];

/// A frame rate held as an exact, reduced fraction of frames per second.
///
/// Decimal input is converted without going through floating point, so
/// `29.97` is exactly `2997/100`. NTSC rates can also be given as their
/// true fractions, e.g. `30000/1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    num: u64,
    den: u64,
}

impl FrameRate {
    pub const DEFAULT: FrameRate = FrameRate { num: 2997, den: 100 };

    pub fn new(num: u64, den: u64) -> Result<Self, RetimeError> {
        let invalid = |reason| RetimeError::InvalidFrameRate {
            value: format!("{}/{}", num, den),
            reason,
        };
        if den == 0 {
            return Err(invalid("the denominator must not be zero"));
        }
        if num == 0 {
            return Err(invalid("the frame rate must be greater than zero"));
        }
        let divisor = gcd(u128::from(num), u128::from(den)) as u64;
        Ok(Self {
            num: num / divisor,
            den: den / divisor,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.num
    }

    pub fn denominator(&self) -> u64 {
        self.den
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

impl FromStr for FrameRate {
    type Err = RetimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| RetimeError::InvalidFrameRate {
            value: s.to_string(),
            reason,
        };

        let (_, text) = all_consuming(rate_text)(s.trim())
            .map_err(|_| invalid("expected a number like 25, 23.976 or 30000/1001"))?;

        let (num, den) = match text {
            RateText::Fraction(num, den) => (num.parse::<u64>(), den.parse::<u64>()),
            RateText::Decimal(whole, None) => (whole.parse::<u64>(), Ok(1)),
            RateText::Decimal(whole, Some(frac)) => {
                let den = u32::try_from(frac.len())
                    .ok()
                    .and_then(|places| 10u64.checked_pow(places))
                    .ok_or_else(|| invalid("too many decimal places"))?;
                (format!("{}{}", whole, frac).parse::<u64>(), Ok(den))
            }
        };

        match (num, den) {
            (Ok(num), Ok(den)) => FrameRate::new(num, den).map_err(|err| match err {
                RetimeError::InvalidFrameRate { reason, .. } => invalid(reason),
                other => other,
            }),
            _ => Err(invalid("the value is too large")),
        }
    }
}

enum RateText<'a> {
    Decimal(&'a str, Option<&'a str>),
    Fraction(&'a str, &'a str),
}

fn rate_text(input: &str) -> IResult<&str, RateText<'_>> {
    let (input, whole) = digit1(input)?;
    alt((
        map(preceded(char('/'), digit1), move |den| {
            RateText::Fraction(whole, den)
        }),
        map(opt(preceded(char('.'), digit1)), move |frac| {
            RateText::Decimal(whole, frac)
        }),
    ))(input)
}

pub(crate) fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
