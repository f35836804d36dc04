#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

extern crate self as jspointer;

use core::{fmt, num::ParseIntError};

mod assign;
pub use assign::{Assign, AssignError};
mod resolve;
pub use resolve::{Found, Resolve, ResolveError};

pub mod diagnostic;
pub use diagnostic::{Diagnose, Diagnostic, Label, Report};

pub mod prelude;

mod tokens;
pub use tokens::*;
mod pointer;
pub use pointer::*;
mod token;
pub use token::*;
pub mod index;
pub use index::Index;

pub mod node;
pub use node::{Kind, Mapping, Node, Sequence, Shape, ShapeMut, Slot};
pub mod record;
pub use record::{Field, Record};
#[cfg(feature = "derive")]
pub use jspointer_derive::Record;
pub mod field_names;
pub use field_names::{field_names, FieldNames};

mod json;
#[cfg(feature = "toml")]
mod toml;

#[cfg(test)]
mod arbitrary;

/// Indicates that a `Pointer` was malformed and unable to be parsed.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// `Pointer` was not empty and did not start with a slash (`'/'`).
    NoLeadingSlash,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLeadingSlash => {
                write!(
                    f,
                    "json pointer is malformed as it does not start with a slash ('/')"
                )
            }
        }
    }
}

impl ParseError {
    /// Returns `true` if this error is `NoLeadingSlash`; otherwise returns
    /// `false`.
    pub fn is_no_leading_slash(&self) -> bool {
        matches!(self, Self::NoLeadingSlash)
    }

    /// Offset of the character which caused the error. Always `0`, as the
    /// only way to fail parsing is a missing leading slash.
    pub fn offset(&self) -> usize {
        0
    }
}

impl std::error::Error for ParseError {}

/// Indicates that a `Token` could not be parsed as an array index.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseIndexError {
    /// The token consisted of digits but did not fit into a `usize`, or it
    /// was empty.
    InvalidInteger(ParseIntError),
    /// The token contained something other than an ASCII digit, such as a
    /// sign or whitespace.
    InvalidCharacter {
        /// Byte offset of the first offending character within the token.
        offset: usize,
    },
}

impl From<ParseIntError> for ParseIndexError {
    fn from(source: ParseIntError) -> Self {
        Self::InvalidInteger(source)
    }
}

impl fmt::Display for ParseIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInteger(_) => write!(f, "failed to parse token as an integer"),
            Self::InvalidCharacter { offset } => write!(
                f,
                "failed to parse token as an index: non-digit character at offset {offset}"
            ),
        }
    }
}

impl std::error::Error for ParseIndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInteger(source) => Some(source),
            Self::InvalidCharacter { .. } => None,
        }
    }
}

/// Indicates that an `Index` is not within the given bounds.
#[derive(Debug, PartialEq, Eq)]
pub struct OutOfBoundsError {
    /// The length of the sequence. The index is valid only if strictly less
    /// than this value.
    pub length: usize,

    /// The parsed numerical index.
    pub index: usize,
}

impl fmt::Display for OutOfBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} out of bounds (limit: {})",
            self.index, self.length
        )
    }
}

impl std::error::Error for OutOfBoundsError {}

/// Indicates that a `Token` could not be converted into the key type of a
/// mapping whose keys are not strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConversionError {
    /// Name of the key type the token was converted into.
    pub key_type: &'static str,
    /// The decoded token.
    pub token: String,
    /// Message of the underlying decoder.
    pub message: String,
}

impl fmt::Display for KeyConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported conversion of string \"{}\" to {}: {}",
            self.token, self.key_type, self.message
        )
    }
}

impl std::error::Error for KeyConversionError {}

/// Indicates that the target of an assignment was located but could not be
/// overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanNotSetError {
    /// The record field is declared read-only.
    ReadOnly {
        /// Declared name of the field.
        field: &'static str,
    },
    /// The supplied value is not of the slot's type.
    TypeMismatch {
        /// Name of the slot's type.
        expected: &'static str,
    },
}

impl CanNotSetError {
    /// Returns `true` if this error is `ReadOnly`; otherwise returns `false`.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly { .. })
    }

    /// Returns `true` if this error is `TypeMismatch`; otherwise returns
    /// `false`.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

impl fmt::Display for CanNotSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly { field } => write!(f, "field `{field}` is read-only"),
            Self::TypeMismatch { expected } => {
                write!(f, "value is not of the expected type `{expected}`")
            }
        }
    }
}

impl std::error::Error for CanNotSetError {}
