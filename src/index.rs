//! Index representation for sequence tokens.
//!
//! A [`Token`] addressing an element of a sequence must consist solely of
//! ASCII digits. Signs, whitespace and the RFC 6902 `-` ("next element")
//! token are rejected with a [`ParseIndexError`], which is distinct from the
//! [`OutOfBoundsError`] produced when a well-formed index does not fit the
//! sequence:
//!
//! ```
//! # use jspointer::{Index, Token};
//! assert_eq!(Token::new("1").to_index(), Ok(Index(1)));
//! assert!(Token::new("+1").to_index().is_err());
//! assert!(Token::new("-").to_index().is_err());
//!
//! assert_eq!(Index(0).for_len(1), Ok(0));
//! assert!(Index(1).for_len(1).is_err());
//! ```

use crate::{OutOfBoundsError, ParseIndexError, Token};
use core::fmt::Display;

/// A non-negative index into a sequence, parsed from a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(pub usize);

impl Index {
    /// Bounds the index for a given sequence length (exclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// # use jspointer::Index;
    /// assert_eq!(Index(0).for_len(1), Ok(0));
    /// assert!(Index(1).for_len(1).is_err());
    /// ```
    /// # Errors
    /// Returns [`OutOfBoundsError`] if the index is not less than `length`.
    pub fn for_len(&self, length: usize) -> Result<usize, OutOfBoundsError> {
        match *self {
            Self(index) if index < length => Ok(index),
            Self(index) => Err(OutOfBoundsError { length, index }),
        }
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl TryFrom<&str> for Index {
    type Error = ParseIndexError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // `usize::from_str` tolerates a leading `+`, so the digits are
        // checked up front
        if let Some(offset) = value.bytes().position(|b| !b.is_ascii_digit()) {
            return Err(ParseIndexError::InvalidCharacter { offset });
        }
        Ok(value.parse::<usize>().map(Index)?)
    }
}

impl TryFrom<&Token<'_>> for Index {
    type Error = ParseIndexError;

    fn try_from(value: &Token) -> Result<Self, Self::Error> {
        Index::try_from(value.decoded())
    }
}

macro_rules! derive_try_from {
    ($($t:ty),+ $(,)?) => {
        $(
            impl TryFrom<$t> for Index {
                type Error = ParseIndexError;

                fn try_from(value: $t) -> Result<Self, Self::Error> {
                    Index::try_from(AsRef::<str>::as_ref(&value))
                }
            }
        )*
    }
}

derive_try_from!(Token<'_>, String, &String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_digits() {
        assert_eq!(Index::try_from("0"), Ok(Index(0)));
        assert_eq!(Index::try_from("42"), Ok(Index(42)));
        assert_eq!(Index::try_from("007"), Ok(Index(7)));
        assert_eq!(Index::try_from(String::from("3")), Ok(Index(3)));
    }

    #[test]
    fn parse_rejects_non_digits() {
        assert_eq!(
            Index::try_from("+1"),
            Err(ParseIndexError::InvalidCharacter { offset: 0 })
        );
        assert_eq!(
            Index::try_from("1 "),
            Err(ParseIndexError::InvalidCharacter { offset: 1 })
        );
        assert_eq!(
            Index::try_from("-1"),
            Err(ParseIndexError::InvalidCharacter { offset: 0 })
        );
        assert!(matches!(
            Index::try_from(""),
            Err(ParseIndexError::InvalidInteger(_))
        ));
        assert!(matches!(
            Index::try_from("99999999999999999999999999"),
            Err(ParseIndexError::InvalidInteger(_))
        ));
    }

    #[test]
    fn for_len() {
        assert_eq!(Index(1).for_len(2), Ok(1));
        assert_eq!(
            Index(2).for_len(2),
            Err(OutOfBoundsError {
                index: 2,
                length: 2
            })
        );
    }

    #[test]
    fn display() {
        assert_eq!(Index(12).to_string(), "12");
    }
}
