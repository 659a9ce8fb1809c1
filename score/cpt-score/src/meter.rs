//! Time signatures (`M:` header).

use std::fmt;

use crate::errors::NotationError;

/// A time signature: `numerator` beats of `denominator`-note length
/// per bar. `C` and `C|` are the conventional abbreviations for
/// common (4/4) and cut (2/2) time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Meter {
    /// Beats per bar.
    pub numerator: u32,
    /// Note-value denominating one beat.
    pub denominator: u32,
}

impl Meter {
    /// Parse an `M:` header value (`"4/4"`, `"C"`, `"C|"`).
    ///
    /// # Errors
    /// Returns [`NotationError::IllFormedMeter`] for anything else.
    pub fn parse(s: &str) -> Result<Self, NotationError> {
        match s.trim() {
            "C" => Ok(Self { numerator: 4, denominator: 4 }),
            "C|" => Ok(Self { numerator: 2, denominator: 2 }),
            other => {
                let (n, d) = other.split_once('/').ok_or_else(|| NotationError::IllFormedMeter(s.to_string()))?;
                let numerator: u32 = n.trim().parse().map_err(|_| NotationError::IllFormedMeter(s.to_string()))?;
                let denominator: u32 = d.trim().parse().map_err(|_| NotationError::IllFormedMeter(s.to_string()))?;
                Ok(Self { numerator, denominator })
            }
        }
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_abbreviations_and_fractions() {
        assert_eq!(Meter::parse("C").unwrap(), Meter { numerator: 4, denominator: 4 });
        assert_eq!(Meter::parse("C|").unwrap(), Meter { numerator: 2, denominator: 2 });
        assert_eq!(Meter::parse("3/8").unwrap(), Meter { numerator: 3, denominator: 8 });
    }

    #[test]
    fn rejects_garbage() {
        assert!(Meter::parse("four-four").is_err());
    }
}
