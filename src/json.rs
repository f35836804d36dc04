//! [`Node`] for `serde_json` documents.
//!
//! Objects are mappings with `String` keys and arrays are sequences. Every
//! other value is a leaf whose [`Kind`] follows its JSON type; numbers are
//! `Uint` when they fit a `u64`, `Int` when they fit an `i64`, and `Float`
//! otherwise. Assignments into a document must supply a `serde_json::Value`.

use serde_json::{Map, Value};

use crate::{KeyConversionError, Kind, Mapping, Node, Shape, ShapeMut};

fn leaf_kind(value: &Value) -> Kind {
    match value {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(n) if n.is_u64() => Kind::Uint,
        Value::Number(n) if n.is_i64() => Kind::Int,
        Value::Number(_) => Kind::Float,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Sequence,
        Value::Object(_) => Kind::Mapping,
    }
}

impl Node for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Object(map) => Shape::Mapping(map),
            Value::Array(array) => Shape::Sequence(array),
            leaf => Shape::Leaf(leaf_kind(leaf)),
        }
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        match self {
            Value::Object(map) => ShapeMut::Mapping(map),
            Value::Array(array) => ShapeMut::Sequence(array),
            leaf => ShapeMut::Leaf(leaf_kind(leaf)),
        }
    }
}

impl Mapping for Map<String, Value> {
    fn key_type(&self) -> &'static str {
        core::any::type_name::<String>()
    }

    fn len(&self) -> usize {
        Map::len(self)
    }

    fn get(&self, key: &str) -> Result<Option<&dyn Node>, KeyConversionError> {
        Ok(Map::get(self, key).map(|v| v as &dyn Node))
    }

    fn get_mut(&mut self, key: &str) -> Result<Option<&mut dyn Node>, KeyConversionError> {
        Ok(Map::get_mut(self, key).map(|v| v as &mut dyn Node))
    }
}

impl Node for Map<String, Value> {
    fn shape(&self) -> Shape<'_> {
        Shape::Mapping(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Mapping(self)
    }
}
