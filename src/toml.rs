//! [`Node`] for `toml` documents.
//!
//! Tables are mappings with `String` keys and arrays are sequences.
//! Datetimes have no counterpart among the scalar kinds and are classified
//! as [`Kind::Other`]. Assignments into a document must supply a
//! `toml::Value`.

use ::toml::{map::Map, Value};

use crate::{KeyConversionError, Kind, Mapping, Node, Shape, ShapeMut};

fn leaf_kind(value: &Value) -> Kind {
    match value {
        Value::String(_) => Kind::String,
        Value::Integer(_) => Kind::Int,
        Value::Float(_) => Kind::Float,
        Value::Boolean(_) => Kind::Bool,
        Value::Datetime(_) => Kind::Other,
        Value::Array(_) => Kind::Sequence,
        Value::Table(_) => Kind::Mapping,
    }
}

impl Node for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Table(table) => Shape::Mapping(table),
            Value::Array(array) => Shape::Sequence(array),
            leaf => Shape::Leaf(leaf_kind(leaf)),
        }
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        match self {
            Value::Table(table) => ShapeMut::Mapping(table),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pointer;

    const DOC: &str = r#"
        title = "example"
        born = 1979-05-27T07:32:00Z

        [server]
        ports = [8000, 8001]
        enabled = true
    "#;

    fn doc() -> Value {
        Value::Table(::toml::from_str::<::toml::Table>(DOC).unwrap())
    }

    #[test]
    fn resolve_table() {
        let data = doc();
        let found = Pointer::parse("/server/ports/1").unwrap().get(&data).unwrap();
        assert_eq!(found.kind, Kind::Int);
        assert_eq!(found.downcast_ref::<Value>(), Some(&Value::Integer(8001)));

        let found = Pointer::parse("/born").unwrap().get(&data).unwrap();
        assert_eq!(found.kind, Kind::Other);

        let found = Pointer::parse("/server").unwrap().get(&data).unwrap();
        assert_eq!(found.kind, Kind::Mapping);
    }

    #[test]
    fn assign_table() {
        let mut data = doc();
        let ptr = Pointer::parse("/server/enabled").unwrap();
        ptr.set(&mut data, Value::Boolean(false)).unwrap();
        assert_eq!(data["server"]["enabled"], Value::Boolean(false));

        let err = ptr.set(&mut data, false).unwrap_err();
        assert!(err.is_can_not_set());
    }
}
