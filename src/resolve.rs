//! # Resolving values by JSON Pointer
//!
//! [`Pointer::get`] and the [`Resolve`] extension trait walk a tree of
//! [`Node`]s one token at a time, choosing the lookup rule from the shape of
//! the node at hand:
//!
//! | shape    | token is                                             |
//! | -------- | ---------------------------------------------------- |
//! | record   | the serialized name of an exported field             |
//! | mapping  | a key, converted into the key type if not `String`   |
//! | sequence | an index made only of ASCII digits                   |
//! | leaf     | never matched                                        |
//!
//! ```rust
//! use jspointer::{Pointer, Resolve};
//! use serde_json::json;
//!
//! let data = json!({ "foo": { "bar": [0, 1] } });
//! let ptr = Pointer::parse("/foo/bar/1").unwrap();
//! let found = data.resolve(&ptr).unwrap();
//! assert_eq!(found.downcast_ref::<serde_json::Value>(), Some(&json!(1)));
//! ```

use core::{any::Any, fmt};

use crate::{
    field_names, Kind, KeyConversionError, Node, OutOfBoundsError, ParseIndexError,
    Pointer, Shape, ShapeMut, Token,
};

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Resolve                                    ║
║                                  ¯¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A type that can resolve a value by JSON Pointer.
///
/// Implemented for every [`Node`].
pub trait Resolve {
    /// Resolve a value based on the path provided by a JSON Pointer.
    ///
    /// ## Errors
    /// Returns a [`ResolveError`] describing the first token that could not be
    /// followed.
    fn resolve(&self, ptr: &Pointer) -> Result<Found<'_>, ResolveError>;
}

impl<T: Node> Resolve for T {
    fn resolve(&self, ptr: &Pointer) -> Result<Found<'_>, ResolveError> {
        resolve_node(ptr, self)
    }
}

impl Resolve for dyn Node {
    fn resolve(&self, ptr: &Pointer) -> Result<Found<'_>, ResolveError> {
        resolve_node(ptr, self)
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Found                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// The value a [`Pointer`] resolved to, along with its [`Kind`].
#[derive(Clone, Copy)]
pub struct Found<'v> {
    /// The located value.
    pub item: &'v dyn Node,
    /// Shape classification of `item`.
    pub kind: Kind,
}

impl<'v> Found<'v> {
    /// Wraps `item`, classifying it.
    pub fn new(item: &'v dyn Node) -> Self {
        Self {
            kind: item.kind(),
            item,
        }
    }

    /// Returns the located value as a `T` if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'v T> {
        let item: &'v dyn Node = self.item;
        item.as_any().downcast_ref::<T>()
    }

    /// Returns `true` if the located value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.item.as_any().is::<T>()
    }
}

impl fmt::Debug for Found<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Found")
            .field("type", &self.item.type_name())
            .field("kind", &self.kind)
            .finish()
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                 ResolveError                                 ║
║                                ¯¯¯¯¯¯¯¯¯¯¯¯¯¯                                ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that the `Pointer` could not be resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// `Pointer` could not be resolved because a `Token` for a sequence
    /// could not be parsed as an index.
    FailedToParseIndex {
        /// Offset of the partial pointer starting with the invalid index.
        offset: usize,
        /// The source `ParseIndexError`
        source: ParseIndexError,
    },

    /// `Pointer` could not be resolved due to an index being out of bounds
    /// within a sequence.
    OutOfBounds {
        /// Offset of the partial pointer starting with the invalid index.
        offset: usize,
        /// The source `OutOfBoundsError`
        source: OutOfBoundsError,
    },

    /// `Pointer` could not be resolved as a segment of the path was not
    /// found: an unknown field, an absent key, or a leaf in the middle of
    /// the path.
    NotFound {
        /// Offset of the pointer starting with the `Token` which was not
        /// found.
        offset: usize,
    },

    /// `Pointer` could not be resolved as a `Token` could not be converted
    /// into the key type of a mapping.
    KeyConversion {
        /// Offset of the partial pointer starting with the unconvertible
        /// key.
        offset: usize,
        /// The source `KeyConversionError`
        source: KeyConversionError,
    },
}

impl ResolveError {
    /// Offset of the partial pointer starting with the token which caused
    /// the error.
    pub fn offset(&self) -> usize {
        match self {
            Self::FailedToParseIndex { offset, .. }
            | Self::OutOfBounds { offset, .. }
            | Self::NotFound { offset }
            | Self::KeyConversion { offset, .. } => *offset,
        }
    }

    /// Returns `true` if this error is `FailedToParseIndex`; otherwise
    /// returns `false`.
    pub fn is_failed_to_parse_index(&self) -> bool {
        matches!(self, Self::FailedToParseIndex { .. })
    }

    /// Returns `true` if this error is `OutOfBounds`; otherwise returns
    /// `false`.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this error is `NotFound`; otherwise returns `false`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this error is `KeyConversion`; otherwise returns
    /// `false`.
    pub fn is_key_conversion(&self) -> bool {
        matches!(self, Self::KeyConversion { .. })
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedToParseIndex { offset, .. } => {
                write!(f, "failed to parse index at offset {offset}")
            }
            Self::OutOfBounds { offset, .. } => {
                write!(f, "index at offset {offset} out of bounds")
            }
            Self::NotFound { offset } => {
                write!(f, "pointer starting at offset {offset} not found")
            }
            Self::KeyConversion { offset, .. } => {
                write!(f, "failed to convert key at offset {offset}")
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FailedToParseIndex { source, .. } => Some(source),
            Self::OutOfBounds { source, .. } => Some(source),
            Self::KeyConversion { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  Traversal                                   ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

pub(crate) fn resolve_node<'v>(
    ptr: &Pointer,
    root: &'v dyn Node,
) -> Result<Found<'v>, ResolveError> {
    let mut node = root;
    for (offset, token) in ptr.positioned() {
        node = step(node, token, offset)?;
    }
    Ok(Found::new(node))
}

/// Follows a single token from `node`. `offset` is the position of the
/// token's leading slash and is only used for errors.
pub(crate) fn step<'v>(
    node: &'v dyn Node,
    token: &Token,
    offset: usize,
) -> Result<&'v dyn Node, ResolveError> {
    match node.shape() {
        Shape::Record(record) => field_names(record)
            .locate(token.decoded())
            .and_then(|index| record.field(index))
            .ok_or(ResolveError::NotFound { offset }),
        Shape::Mapping(mapping) => mapping
            .get(token.decoded())
            .map_err(|source| ResolveError::KeyConversion { offset, source })?
            .ok_or(ResolveError::NotFound { offset }),
        Shape::Sequence(sequence) => {
            let index = sequence_index(token, sequence.len(), offset)?;
            sequence
                .get(index)
                .ok_or(ResolveError::NotFound { offset })
        }
        Shape::Leaf(_) => Err(ResolveError::NotFound { offset }),
    }
}

/// The mutable counterpart of [`step`].
pub(crate) fn step_mut<'v>(
    node: &'v mut dyn Node,
    token: &Token,
    offset: usize,
) -> Result<&'v mut dyn Node, ResolveError> {
    match node.shape_mut() {
        ShapeMut::Record(record) => {
            let index = field_names(&*record)
                .locate(token.decoded())
                .ok_or(ResolveError::NotFound { offset })?;
            record
                .field_mut(index)
                .ok_or(ResolveError::NotFound { offset })
        }
        ShapeMut::Mapping(mapping) => mapping
            .get_mut(token.decoded())
            .map_err(|source| ResolveError::KeyConversion { offset, source })?
            .ok_or(ResolveError::NotFound { offset }),
        ShapeMut::Sequence(sequence) => {
            let index = sequence_index(token, sequence.len(), offset)?;
            sequence
                .get_mut(index)
                .ok_or(ResolveError::NotFound { offset })
        }
        ShapeMut::Leaf(_) => Err(ResolveError::NotFound { offset }),
    }
}

fn sequence_index(token: &Token, len: usize, offset: usize) -> Result<usize, ResolveError> {
    token
        .to_index()
        .map_err(|source| ResolveError::FailedToParseIndex { offset, source })?
        .for_len(len)
        .map_err(|source| ResolveError::OutOfBounds { offset, source })
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Tests                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
