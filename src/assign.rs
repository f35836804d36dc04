//! # Assigning values by JSON Pointer
//!
//! [`Pointer::set`] and the [`Assign`] extension trait overwrite the value a
//! pointer addresses. The path is walked exactly as [`Resolve`](crate::Resolve)
//! walks it; only the final step writes. Nothing is ever created: a missing
//! key or an out of range index fails the assignment and leaves the tree as
//! it was.
//!
//! The new value must have the same concrete type as the slot it replaces,
//! and record fields declared `#[read_only]` refuse assignment:
//!
//! ```rust
//! use jspointer::{Assign, AssignError, Pointer};
//! use std::collections::HashMap;
//!
//! let mut scores: HashMap<String, Vec<u32>> = HashMap::new();
//! scores.insert("ann".into(), vec![1, 2]);
//!
//! let ptr = Pointer::parse("/ann/1").unwrap();
//! scores.assign(&ptr, 20u32).unwrap();
//! assert_eq!(scores["ann"], vec![1, 20]);
//!
//! let err = scores.assign(&ptr, "twenty").unwrap_err();
//! assert!(err.is_can_not_set());
//! ```

use core::{any::Any, fmt};

use crate::{
    field_names,
    resolve::step_mut,
    CanNotSetError, KeyConversionError, Node, OutOfBoundsError, ParseIndexError, Pointer,
    ResolveError, Shape, Slot,
};

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Assign                                    ║
║                                   ¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A type that can overwrite a value by JSON Pointer.
///
/// Implemented for every [`Node`].
pub trait Assign {
    /// Overwrites the value at `ptr` with `value`.
    ///
    /// ## Errors
    /// Returns an [`AssignError`] if the path can not be followed or the
    /// target refuses `value`.
    fn assign<V: Any>(&mut self, ptr: &Pointer, value: V) -> Result<(), AssignError>;
}

impl<T: Node> Assign for T {
    fn assign<V: Any>(&mut self, ptr: &Pointer, value: V) -> Result<(), AssignError> {
        assign_node(ptr, self, Box::new(value))
    }
}

impl Assign for dyn Node {
    fn assign<V: Any>(&mut self, ptr: &Pointer, value: V) -> Result<(), AssignError> {
        assign_node(ptr, self, Box::new(value))
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                 AssignError                                  ║
║                                ¯¯¯¯¯¯¯¯¯¯¯¯¯¯                                ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that an assignment failed.
#[derive(Debug, PartialEq, Eq)]
pub enum AssignError {
    /// A `Token` within the `Pointer` failed to be parsed as a sequence
    /// index.
    FailedToParseIndex {
        /// Offset of the partial pointer starting with the invalid index.
        offset: usize,
        /// The source [`ParseIndexError`]
        source: ParseIndexError,
    },

    /// An index `Token` within the `Pointer` was out of bounds of the target
    /// sequence.
    OutOfBounds {
        /// Offset of the partial pointer starting with the invalid index.
        offset: usize,
        /// The source [`OutOfBoundsError`]
        source: OutOfBoundsError,
    },

    /// A segment of the path does not exist.
    NotFound {
        /// Offset of the partial pointer starting with the missing token.
        offset: usize,
    },

    /// A `Token` could not be converted into the key type of a mapping.
    KeyConversion {
        /// Offset of the partial pointer starting with the unconvertible
        /// key.
        offset: usize,
        /// The source [`KeyConversionError`]
        source: KeyConversionError,
    },

    /// The target was found but refused the value.
    CanNotSet {
        /// Offset of the partial pointer starting with the target's token.
        offset: usize,
        /// The source [`CanNotSetError`]
        source: CanNotSetError,
    },
}

impl AssignError {
    /// Offset of the partial pointer starting with the token which caused
    /// the error.
    pub fn offset(&self) -> usize {
        match self {
            Self::FailedToParseIndex { offset, .. }
            | Self::OutOfBounds { offset, .. }
            | Self::NotFound { offset }
            | Self::KeyConversion { offset, .. }
            | Self::CanNotSet { offset, .. } => *offset,
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

    /// Returns `true` if this error is `CanNotSet`; otherwise returns
    /// `false`.
    pub fn is_can_not_set(&self) -> bool {
        matches!(self, Self::CanNotSet { .. })
    }
}

impl From<ResolveError> for AssignError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::FailedToParseIndex { offset, source } => {
                Self::FailedToParseIndex { offset, source }
            }
            ResolveError::OutOfBounds { offset, source } => Self::OutOfBounds { offset, source },
            ResolveError::NotFound { offset } => Self::NotFound { offset },
            ResolveError::KeyConversion { offset, source } => {
                Self::KeyConversion { offset, source }
            }
        }
    }
}

impl fmt::Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedToParseIndex { offset, .. } => {
                write!(
                    f,
                    "assignment failed due to an invalid index at offset {offset}"
                )
            }
            Self::OutOfBounds { offset, .. } => {
                write!(
                    f,
                    "assignment failed due to index at offset {offset} being out of bounds"
                )
            }
            Self::NotFound { offset } => {
                write!(
                    f,
                    "assignment failed as the pointer starting at offset {offset} was not found"
                )
            }
            Self::KeyConversion { offset, .. } => {
                write!(
                    f,
                    "assignment failed due to an unconvertible key at offset {offset}"
                )
            }
            Self::CanNotSet { offset, source } => {
                write!(
                    f,
                    "assignment failed as the value at offset {offset} can not be set: {source}"
                )
            }
        }
    }
}

impl std::error::Error for AssignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FailedToParseIndex { source, .. } => Some(source),
            Self::OutOfBounds { source, .. } => Some(source),
            Self::KeyConversion { source, .. } => Some(source),
            Self::CanNotSet { source, .. } => Some(source),
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

pub(crate) fn assign_node(
    ptr: &Pointer,
    root: &mut dyn Node,
    value: Box<dyn Any>,
) -> Result<(), AssignError> {
    let mut tokens = ptr.positioned();
    let Some((offset, last)) = tokens.next_back() else {
        return replace(root, value, 0);
    };

    let mut node = root;
    for (offset, token) in tokens {
        node = step_mut(node, token, offset)?;
    }

    if let Shape::Record(record) = node.shape() {
        let field = field_names(record)
            .locate(last.decoded())
            .and_then(|index| record.fields().get(index));
        if let Some(field) = field.filter(|field| field.is_read_only()) {
            return Err(AssignError::CanNotSet {
                offset,
                source: CanNotSetError::ReadOnly {
                    field: field.name(),
                },
            });
        }
    }

    let slot = step_mut(node, last, offset)?;
    replace(slot, value, offset)
}

fn replace(slot: &mut dyn Node, value: Box<dyn Any>, offset: usize) -> Result<(), AssignError> {
    slot.replace_boxed(value)
        .map_err(|_| AssignError::CanNotSet {
            offset,
            source: CanNotSetError::TypeMismatch {
                expected: Slot::type_name(&*slot),
            },
        })
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, Resolve};
    use serde_json::{json, Value};
    use std::collections::{BTreeMap, VecDeque};

    struct Config {
        name: String,
        version: u32,
        limits: BTreeMap<String, u64>,
        hosts: VecDeque<String>,
        secret: String,
        extra: Value,
    }

    record! {
        Config {
            pub name => "name",
            #[read_only]
            pub version => "version",
            pub limits,
            pub hosts,
            secret,
            pub extra => ",omitempty",
        }
    }

    fn config() -> Config {
        Config {
            name: "svc".into(),
            version: 1,
            limits: BTreeMap::from([("cpu".to_string(), 2)]),
            hosts: VecDeque::from(["a".to_string(), "b".to_string()]),
            secret: "s".into(),
            extra: json!({ "tags": ["x"] }),
        }
    }

    fn ptr(s: &str) -> Pointer {
        Pointer::parse(s).unwrap()
    }

    #[test]
    fn set_record_field() {
        let mut c = config();
        c.assign(&ptr("/name"), String::from("api")).unwrap();
        assert_eq!(c.name, "api");
    }

    #[test]
    fn set_through_containers() {
        let mut c = config();
        c.assign(&ptr("/limits/cpu"), 4u64).unwrap();
        c.assign(&ptr("/hosts/1"), String::from("c")).unwrap();
        c.assign(&ptr("/extra/tags/0"), json!("y")).unwrap();
        assert_eq!(c.limits["cpu"], 4);
        assert_eq!(c.hosts, ["a", "c"]);
        assert_eq!(c.extra, json!({ "tags": ["y"] }));
    }

    #[test]
    fn read_only_field() {
        let mut c = config();
        let err = c.assign(&ptr("/version"), 2u32).unwrap_err();
        assert_eq!(
            err,
            AssignError::CanNotSet {
                offset: 0,
                source: CanNotSetError::ReadOnly { field: "version" }
            }
        );
        assert_eq!(c.version, 1);
        assert!(c.resolve(&ptr("/version")).is_ok());
    }

    #[test]
    fn unexported_field_is_not_found() {
        let mut c = config();
        let err = c.assign(&ptr("/secret"), String::from("x")).unwrap_err();
        assert_eq!(err, AssignError::NotFound { offset: 0 });
        assert_eq!(c.secret, "s");
    }

    #[test]
    fn type_mismatch_leaves_tree() {
        let mut c = config();
        let err = c.assign(&ptr("/limits/cpu"), 4u32).unwrap_err();
        assert_eq!(
            err,
            AssignError::CanNotSet {
                offset: 7,
                source: CanNotSetError::TypeMismatch { expected: "u64" }
            }
        );
        assert_eq!(c.limits["cpu"], 2);
    }

    #[test]
    fn offsets_point_into_parsed_text() {
        let mut data = json!({ "a~b": { "c": [1] } });
        let err = ptr("/a~b/c/~x").set(&mut data, json!(2)).unwrap_err();
        assert!(err.is_failed_to_parse_index());
        assert_eq!(err.offset(), 6);

        let err = ptr("/a~b/x/0").set(&mut data, json!(2)).unwrap_err();
        assert_eq!(err, AssignError::NotFound { offset: 4 });
    }

    #[test]
    fn nothing_is_created() {
        let mut c = config();
        assert!(c
            .assign(&ptr("/limits/mem"), 1u64)
            .unwrap_err()
            .is_not_found());
        assert!(!c.limits.contains_key("mem"));

        let err = c.assign(&ptr("/hosts/2"), String::new()).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.offset(), 6);
        assert_eq!(c.hosts.len(), 2);

        let err = c.assign(&ptr("/hosts/-"), String::new()).unwrap_err();
        assert!(err.is_failed_to_parse_index());
    }

    #[test]
    fn replace_root() {
        let mut data = json!({ "a": 1 });
        data.assign(&Pointer::root(), json!([1, 2])).unwrap();
        assert_eq!(data, json!([1, 2]));

        let mut n = 1u8;
        n.assign(&Pointer::root(), 2u8).unwrap();
        assert_eq!(n, 2);
        assert!(n
            .assign(&Pointer::root(), 3i32)
            .unwrap_err()
            .is_can_not_set());
    }

    #[test]
    fn key_conversion() {
        let mut map = BTreeMap::from([(1u16, String::from("one"))]);
        let err = map.assign(&ptr("/x"), String::new()).unwrap_err();
        assert!(err.is_key_conversion());
        map.assign(&ptr("/1"), String::from("uno")).unwrap();
        assert_eq!(map[&1], "uno");
    }

    #[test]
    fn through_dyn_node() {
        let mut v = vec![json!(1), json!(2)];
        let node: &mut dyn Node = &mut v;
        node.assign(&ptr("/1"), json!(3)).unwrap();
        assert_eq!(v, [json!(1), json!(3)]);
    }

    #[test]
    fn error_display() {
        let err = AssignError::CanNotSet {
            offset: 4,
            source: CanNotSetError::ReadOnly { field: "id" },
        };
        assert_eq!(
            err.to_string(),
            "assignment failed as the value at offset 4 can not be set: field `id` is read-only"
        );
        let err: AssignError = ResolveError::NotFound { offset: 2 }.into();
        assert_eq!(err, AssignError::NotFound { offset: 2 });
    }
}
