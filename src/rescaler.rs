use crate::error::RetimeError;
use crate::framerate::{gcd, FrameRate};
use crate::timestamp::Timestamp;

/// Moves timestamps from one frame rate to another.
///
/// The ratio `source / target` is kept as an exact fraction `p / q`, and every
/// rescaled millisecond count is rounded half up, so the same input always
/// gives the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rescaler {
    source: FrameRate,
    target: FrameRate,
    p: u128,
    q: u128,
}

impl Rescaler {
    pub fn new(source: FrameRate, target: FrameRate) -> Self {
        let p = u128::from(source.numerator()) * u128::from(target.denominator());
        let q = u128::from(source.denominator()) * u128::from(target.numerator());
        let divisor = gcd(p, q);
        Self {
            source,
            target,
            p: p / divisor,
            q: q / divisor,
        }
    }

    pub fn source(&self) -> FrameRate {
        self.source
    }

    pub fn target(&self) -> FrameRate {
        self.target
    }

    pub fn ratio(&self) -> f64 {
        self.p as f64 / self.q as f64
    }

    pub fn is_identity(&self) -> bool {
        self.p == self.q
    }

    pub fn rescale(&self, timestamp: &Timestamp) -> Result<Timestamp, RetimeError> {
        let overflow = || RetimeError::overflow(timestamp.to_string());

        let total = timestamp.total_millis().ok_or_else(overflow)?;
        let scaled = self.scale_millis(total).ok_or_else(overflow)?;
        Ok(Timestamp::from_millis(scaled))
    }

    /// `round(total * p / q)` with halves rounded up, or `None` on overflow.
    fn scale_millis(&self, total: u64) -> Option<u64> {
        if self.is_identity() {
            return Some(total);
        }
        let numerator = u128::from(total)
            .checked_mul(self.p)?
            .checked_mul(2)?
            .checked_add(self.q)?;
        let scaled = numerator / self.q.checked_mul(2)?;
        u64::try_from(scaled).ok()
    }
}
