//! A minimal reduced-fraction type for note-length units (`L:` header,
//! durations). Kept local rather than pulled from a crate: the only
//! operations ever needed are construction, reduction, and one division
//! (unit rescaling), which `num-rational` would be overkill for.

use std::fmt;

/// A positive rational number in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    /// Numerator.
    pub num: i64,
    /// Denominator, always positive.
    pub den: i64,
}

impl Fraction {
    /// Build a fraction, reducing to lowest terms.
    ///
    /// # Panics
    /// Panics if `den` is zero.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "fraction with zero denominator");
        let sign = if den < 0 { -1 } else { 1 };
        let (mut num, mut den) = (num * sign, den * sign);
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()).max(1);
        num /= g as i64;
        den /= g as i64;
        Self { num, den }
    }

    /// `self / other`, reduced.
    #[must_use]
    pub fn div(self, other: Self) -> Self {
        Self::new(self.num * other.den, self.den * other.num)
    }

    /// `self * other`, reduced.
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        Self::new(self.num * other.num, self.den * other.den)
    }

    /// Whether `value * self` is an exact integer.
    #[must_use]
    pub fn scales_to_integer(self, value: i64) -> bool {
        (value * self.num) % self.den == 0
    }

    /// `value * self`, truncated; callers should check
    /// [`Self::scales_to_integer`] first.
    #[must_use]
    pub fn scale(self, value: i64) -> i64 {
        (value * self.num) / self.den
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_to_lowest_terms() {
        assert_eq!(Fraction::new(2, 8), Fraction::new(1, 4));
    }

    #[test]
    fn division_is_cross_multiplication() {
        assert_eq!(Fraction::new(1, 4).div(Fraction::new(1, 8)), Fraction::new(2, 1));
    }
}
