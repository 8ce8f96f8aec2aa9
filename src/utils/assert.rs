use crate::error::{Error, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Comparison applied by [`assert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparator {
    /// `"="`
    Equal,
    /// `"!="`
    NotEqual,
}

impl Comparator {
    fn compare<T: PartialEq + ?Sized>(self, value: &T, expected: &T) -> bool {
        match self {
            Comparator::Equal => value == expected,
            Comparator::NotEqual => value != expected,
        }
    }

    fn message<T: Display + ?Sized>(self, value: &T, expected: &T) -> String {
        match self {
            Comparator::Equal => format!("Expected \"{value}\" to equal \"{expected}\""),
            Comparator::NotEqual => format!("Expected \"{value}\" not to equal \"{expected}\""),
        }
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self> {
        match key {
            "=" => Ok(Comparator::Equal),
            "!=" => Ok(Comparator::NotEqual),
            other => Err(Error::UnknownComparator(other.to_string())),
        }
    }
}

/// Check `value` against `expected`.
///
/// `comparator` selects the comparison by key (`"="` when `None`, or `"!="`).
/// An unknown key fails before anything is compared. When the comparison does
/// not hold, the error carries `message` if given, otherwise a generated
/// message naming both operands.
///
/// # Examples
///
/// ```
/// use component_state::utils::assert;
///
/// assert(&1, &1, None, None).unwrap();
/// assert(&1, &2, Some("!="), None).unwrap();
///
/// let err = assert(&1, &2, None, None).unwrap_err();
/// assert_eq!(err.to_string(), "Expected \"1\" to equal \"2\"");
/// ```
pub fn assert<T>(
    value: &T,
    expected: &T,
    comparator: Option<&str>,
    message: Option<&str>,
) -> Result<()>
where
    T: PartialEq + Display + ?Sized,
{
    let comparator: Comparator = comparator.unwrap_or("=").parse()?;

    if comparator.compare(value, expected) {
        return Ok(());
    }

    let message = match message {
        Some(message) => message.to_string(),
        None => comparator.message(value, expected),
    };
    Err(Error::AssertionFailed(message))
}
