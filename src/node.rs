//! The shapes a value can take while a [`Pointer`](crate::Pointer) walks it.
//!
//! Every value in a tree implements [`Node`], which classifies it as exactly
//! one of:
//!
//! - a [`Record`]: a struct with named fields, see [`record!`](crate::record)
//! - a [`Mapping`]: a dynamically keyed container such as `HashMap`
//! - a [`Sequence`]: an integer indexed container such as `Vec`
//! - a leaf, tagged with its [`Kind`]
//!
//! Implementations are provided for the standard library collections and
//! scalars, `Option`, `Box`, and `serde_json::Value` (plus `toml::Value` with
//! the `toml` feature).

use core::{
    any::{type_name, Any},
    fmt,
    hash::{BuildHasher, Hash},
};
use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::de::{value::StrDeserializer, DeserializeOwned, IntoDeserializer};

use crate::{KeyConversionError, Record};

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                     Kind                                     ║
║                                    ¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// The shape classification of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// A struct with named fields.
    Record,
    /// A dynamically keyed container.
    Mapping,
    /// An integer indexed container.
    Sequence,
    /// Text.
    String,
    /// A boolean.
    Bool,
    /// A signed integer.
    Int,
    /// An unsigned integer.
    Uint,
    /// A floating point number.
    Float,
    /// A single character.
    Char,
    /// The absence of a value (`null`, `None`, `()`).
    Null,
    /// A leaf of any other sort, such as a TOML datetime.
    Other,
}

impl Kind {
    /// Returns `true` if values of this kind have no addressable children.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Record | Self::Mapping | Self::Sequence)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Record => "record",
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Char => "char",
            Self::Null => "null",
            Self::Other => "other",
        })
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                     Node                                     ║
║                                    ¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Type-erased access to the storage of a value.
///
/// Implemented for every `'static` type; it lets a `dyn Node` be downcast
/// and overwritten without knowing its concrete type.
///
/// ## Note
/// Method calls on a `&mut dyn Node` or `Box<dyn Node>` can resolve to the
/// impl for the reference or box itself. Reborrow first
/// (`Slot::type_name(&*node)`, `(*node).as_any()`) to reach the value.
pub trait Slot: Any {
    /// Upcasts to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The name of the concrete type.
    fn type_name(&self) -> &'static str;

    /// Overwrites `self` with `value` if `value` holds a `Self`; otherwise
    /// hands `value` back untouched.
    ///
    /// ## Errors
    /// Returns `value` if it is not of the same type as `self`.
    fn replace_boxed(&mut self, value: Box<dyn Any>) -> Result<(), Box<dyn Any>>;
}

impl<T: Any> Slot for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn replace_boxed(&mut self, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        *self = *value.downcast::<T>()?;
        Ok(())
    }
}

/// A value that a [`Pointer`](crate::Pointer) can walk through or land on.
///
/// The single required capability is classification: `shape` says whether the
/// value is a record, a mapping, a sequence or a leaf, and hands out the
/// matching view.
///
/// ## Example
/// ```rust
/// use jspointer::{Kind, Node, Shape, ShapeMut};
///
/// struct Celsius(f64);
///
/// impl Node for Celsius {
///     fn shape(&self) -> Shape<'_> {
///         Shape::Leaf(Kind::Float)
///     }
///     fn shape_mut(&mut self) -> ShapeMut<'_> {
///         ShapeMut::Leaf(Kind::Float)
///     }
/// }
///
/// assert_eq!(Celsius(21.5).kind(), Kind::Float);
/// ```
pub trait Node: Slot {
    /// Classifies this value, exposing a read-only view of its children.
    fn shape(&self) -> Shape<'_>;

    /// Classifies this value, exposing a mutable view of its children.
    fn shape_mut(&mut self) -> ShapeMut<'_>;

    /// The [`Kind`] of this value.
    fn kind(&self) -> Kind {
        self.shape().kind()
    }
}

/// A read-only view of a [`Node`] according to its shape.
pub enum Shape<'a> {
    /// The node is a record.
    Record(&'a dyn Record),
    /// The node is a mapping.
    Mapping(&'a dyn Mapping),
    /// The node is a sequence.
    Sequence(&'a dyn Sequence),
    /// The node has no children.
    Leaf(Kind),
}

impl Shape<'_> {
    /// The [`Kind`] of the viewed node.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Record(_) => Kind::Record,
            Self::Mapping(_) => Kind::Mapping,
            Self::Sequence(_) => Kind::Sequence,
            Self::Leaf(kind) => *kind,
        }
    }
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({})", self.kind())
    }
}

/// A mutable view of a [`Node`] according to its shape.
pub enum ShapeMut<'a> {
    /// The node is a record.
    Record(&'a mut dyn Record),
    /// The node is a mapping.
    Mapping(&'a mut dyn Mapping),
    /// The node is a sequence.
    Sequence(&'a mut dyn Sequence),
    /// The node has no children.
    Leaf(Kind),
}

impl fmt::Debug for ShapeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Record(_) => Kind::Record,
            Self::Mapping(_) => Kind::Mapping,
            Self::Sequence(_) => Kind::Sequence,
            Self::Leaf(kind) => *kind,
        };
        write!(f, "ShapeMut({kind})")
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Mapping                                    ║
║                                  ¯¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A dynamically keyed container.
///
/// Keys arrive as decoded tokens; implementations whose key type is not
/// `String` convert the token first (see [`decode_key`]).
pub trait Mapping {
    /// Name of the key type.
    fn key_type(&self) -> &'static str;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the value stored under `key`.
    ///
    /// ## Errors
    /// Returns [`KeyConversionError`] if `key` can not be converted into the
    /// key type.
    fn get(&self, key: &str) -> Result<Option<&dyn Node>, KeyConversionError>;

    /// Looks up the value stored under `key` for mutation.
    ///
    /// ## Errors
    /// Returns [`KeyConversionError`] if `key` can not be converted into the
    /// key type.
    fn get_mut(&mut self, key: &str) -> Result<Option<&mut dyn Node>, KeyConversionError>;
}

/// Converts a decoded token into the key type `K`.
///
/// The token is first offered to `K` as a literal string, which covers
/// textual keys such as `String`, `Box<str>`, `Cow<str>`, `char` and enums
/// with named variants. If `K` refuses a string, the token is decoded as JSON
/// text instead, so `"7"` becomes `7u32` and `"true"` becomes `true`.
///
/// ## Errors
/// Returns [`KeyConversionError`] naming `K` if the token does not decode
/// either way.
///
/// ## Example
/// ```rust
/// use jspointer::node::decode_key;
/// assert_eq!(decode_key::<String>("7"), Ok(String::from("7")));
/// assert_eq!(decode_key::<Box<str>>("7"), Ok(Box::from("7")));
/// assert_eq!(decode_key::<u32>("7"), Ok(7));
/// assert!(decode_key::<u32>("seven").is_err());
/// ```
pub fn decode_key<K>(token: &str) -> Result<K, KeyConversionError>
where
    K: DeserializeOwned,
{
    let literal: StrDeserializer<'_, serde_json::Error> = token.into_deserializer();
    if let Ok(key) = K::deserialize(literal) {
        return Ok(key);
    }
    serde_json::from_str(token).map_err(|err| KeyConversionError {
        key_type: type_name::<K>(),
        token: token.to_owned(),
        message: err.to_string(),
    })
}

impl<K, V, S> Mapping for HashMap<K, V, S>
where
    K: DeserializeOwned + Hash + Eq + 'static,
    V: Node,
    S: BuildHasher + 'static,
{
    fn key_type(&self) -> &'static str {
        type_name::<K>()
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn get(&self, key: &str) -> Result<Option<&dyn Node>, KeyConversionError> {
        let key = decode_key::<K>(key)?;
        Ok(HashMap::get(self, &key).map(|v| v as &dyn Node))
    }

    fn get_mut(&mut self, key: &str) -> Result<Option<&mut dyn Node>, KeyConversionError> {
        let key = decode_key::<K>(key)?;
        Ok(HashMap::get_mut(self, &key).map(|v| v as &mut dyn Node))
    }
}

impl<K, V, S> Node for HashMap<K, V, S>
where
    K: DeserializeOwned + Hash + Eq + 'static,
    V: Node,
    S: BuildHasher + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Mapping(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Mapping(self)
    }
}

impl<K, V> Mapping for BTreeMap<K, V>
where
    K: DeserializeOwned + Ord + 'static,
    V: Node,
{
    fn key_type(&self) -> &'static str {
        type_name::<K>()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, key: &str) -> Result<Option<&dyn Node>, KeyConversionError> {
        let key = decode_key::<K>(key)?;
        Ok(BTreeMap::get(self, &key).map(|v| v as &dyn Node))
    }

    fn get_mut(&mut self, key: &str) -> Result<Option<&mut dyn Node>, KeyConversionError> {
        let key = decode_key::<K>(key)?;
        Ok(BTreeMap::get_mut(self, &key).map(|v| v as &mut dyn Node))
    }
}

impl<K, V> Node for BTreeMap<K, V>
where
    K: DeserializeOwned + Ord + 'static,
    V: Node,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Mapping(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Mapping(self)
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Sequence                                   ║
║                                  ¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// An integer indexed container.
pub trait Sequence {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index`, if in bounds.
    fn get(&self, index: usize) -> Option<&dyn Node>;

    /// The element at `index` for mutation, if in bounds.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node>;
}

impl<T: Node> Sequence for Vec<T> {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Node> {
        <[T]>::get(self, index).map(|v| v as &dyn Node)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        <[T]>::get_mut(self, index).map(|v| v as &mut dyn Node)
    }
}

impl<T: Node> Node for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Sequence(self)
    }
}

impl<T: Node> Sequence for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Node> {
        VecDeque::get(self, index).map(|v| v as &dyn Node)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        VecDeque::get_mut(self, index).map(|v| v as &mut dyn Node)
    }
}

impl<T: Node> Node for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Sequence(self)
    }
}

impl<T: Node, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Node> {
        self.as_slice().get(index).map(|v| v as &dyn Node)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        self.as_mut_slice().get_mut(index).map(|v| v as &mut dyn Node)
    }
}

impl<T: Node, const N: usize> Node for [T; N] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Sequence(self)
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Leaves                                    ║
║                                   ¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

macro_rules! impl_leaf {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Node for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Leaf(Kind::$kind)
                }

                fn shape_mut(&mut self) -> ShapeMut<'_> {
                    ShapeMut::Leaf(Kind::$kind)
                }
            }
        )*
    };
}

impl_leaf!(Int => i8, i16, i32, i64, i128, isize);
impl_leaf!(Uint => u8, u16, u32, u64, u128, usize);
impl_leaf!(Float => f32, f64);
impl_leaf!(String => String, &'static str);
impl_leaf!(Bool => bool);
impl_leaf!(Char => char);
impl_leaf!(Null => ());

// `None` is a null leaf, `Some` is transparent.
impl<T: Node> Node for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Leaf(Kind::Null),
        }
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        match self {
            Some(value) => value.shape_mut(),
            None => ShapeMut::Leaf(Kind::Null),
        }
    }
}

impl<T: Node + ?Sized> Node for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        (**self).shape_mut()
    }
}
