use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Trailing window of history requested from the service, e.g. `30d` or `1Y`.
///
/// The unit letter is passed through verbatim since the service
/// distinguishes `M` (months) from `m` (minutes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    count: u32,
    unit: char,
}

impl Period {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidPeriod {
            value: input.to_owned(),
        };

        let trimmed = input.trim();
        let unit = trimmed.chars().last().ok_or_else(invalid)?;
        if !unit.is_ascii_alphabetic() {
            return Err(invalid());
        }

        let digits = &trimmed[..trimmed.len() - unit.len_utf8()];
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(invalid());
        }

        let count = digits.parse::<u32>().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }

        Ok(Self { count, unit })
    }

    pub const fn days(count: u32) -> Self {
        Self { count, unit: 'd' }
    }

    pub const fn years(count: u32) -> Self {
        Self { count, unit: 'Y' }
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub const fn unit(&self) -> char {
        self.unit
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.unit)
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Period {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_period() {
        let period = Period::from_str("15d").expect("must parse");
        assert_eq!(period, Period::days(15));
        assert_eq!(Period::parse(" 1Y ").expect("must parse").to_string(), "1Y");
    }

    #[test]
    fn rejects_invalid_period() {
        for value in ["", "d", "0d", "30", "3.5d", "-1d", "1yr"] {
            let err = Period::parse(value).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidPeriod { .. }), "{value}");
        }
    }
}
