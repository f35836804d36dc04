//! Records: structs whose fields are addressed by name.
//!
//! A record lists its fields as [`Field`] descriptors. Each descriptor carries
//! the declared field name, whether the field is exported (visible to
//! pointers at all), an optional serialization tag in the familiar
//! `"name,option,..."` form, and whether the field may be overwritten.
//!
//! `#[derive(Record)]` writes the [`Record`] and [`Node`] implementations
//! from the struct as declared: `pub` fields are exported and serde's
//! `rename`, `skip` and `rename_all` supply the names. The
//! [`record!`](crate::record) macro is the same thing spelled out by hand.
//!
//! ```rust
//! use jspointer::{Pointer, Record};
//! use serde::Serialize;
//!
//! #[derive(Serialize, Record)]
//! #[serde(rename_all = "camelCase")]
//! pub struct Limits {
//!     pub max_conns: u32,
//!     #[serde(rename = "ID")]
//!     #[jspointer(read_only)]
//!     pub id: u64,
//!     #[serde(skip)]
//!     pub scratch: Vec<u8>,
//!     secret: String,
//! }
//!
//! let mut limits = Limits { max_conns: 8, id: 1, scratch: vec![], secret: "s".into() };
//! Pointer::parse("/maxConns").unwrap().set(&mut limits, 16u32).unwrap();
//! assert_eq!(limits.max_conns, 16);
//! assert!(Pointer::parse("/ID").unwrap().set(&mut limits, 2u64).is_err());
//! assert!(Pointer::parse("/scratch").unwrap().get(&limits).is_err());
//! assert!(Pointer::parse("/secret").unwrap().get(&limits).is_err());
//! ```

use crate::{Node, Slot};

/// A struct with named fields.
///
/// Fields are addressed by position; [`field_names`](crate::field_names)
/// resolves a token to that position once per record type.
pub trait Record: Slot {
    /// Descriptors of all fields, in declaration order.
    fn fields(&self) -> &'static [Field];

    /// The field at position `index` of [`Record::fields`].
    fn field(&self, index: usize) -> Option<&dyn Node>;

    /// The field at position `index` of [`Record::fields`], for mutation.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Node>;
}

/// Describes one field of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    name: &'static str,
    tag: Option<&'static str>,
    exported: bool,
    read_only: bool,
}

impl Field {
    /// An exported, writable field without a tag.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            tag: None,
            exported: true,
            read_only: false,
        }
    }

    /// Sets the serialization tag, e.g. `"id"`, `"id,omitempty"` or `"-"`.
    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Sets whether pointers may address the field at all.
    pub const fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Sets whether assignments to the field are refused.
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// The declared name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The serialization tag, if any.
    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    /// Returns `true` if pointers may address the field.
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Returns `true` if assignments to the field are refused.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The name a token must equal to address this field, or `None` if the
    /// field can not be addressed.
    ///
    /// Unexported fields and fields tagged `"-"` have no name. Otherwise the
    /// part of the tag before the first `','` is used, falling back to the
    /// declared name when that part is empty or there is no tag.
    ///
    /// ```rust
    /// # use jspointer::Field;
    /// assert_eq!(Field::new("Foo").with_tag("foo,omitempty").serialized_name(), Some("foo"));
    /// assert_eq!(Field::new("Foo").with_tag(",omitempty").serialized_name(), Some("Foo"));
    /// assert_eq!(Field::new("Foo").with_tag("-").serialized_name(), None);
    /// assert_eq!(Field::new("Foo").with_exported(false).serialized_name(), None);
    /// ```
    pub fn serialized_name(&self) -> Option<&'static str> {
        if !self.exported {
            return None;
        }
        match self.tag {
            Some("-") => None,
            Some(tag) => {
                let name = tag.split_once(',').map_or(tag, |(name, _)| name);
                if name.is_empty() {
                    Some(self.name)
                } else {
                    Some(name)
                }
            }
            None => Some(self.name),
        }
    }
}

/// Implements [`Record`] and [`Node`] for a struct.
///
/// Prefer `#[derive(Record)]`, which reads visibility and serde attributes
/// off the struct itself. This macro is for types the derive can not be
/// placed on. Nothing checks the listing against the struct, so keep the
/// two in step.
///
/// Each listed field is written as `vis name => "tag"`, where both the
/// visibility and the tag are optional:
///
/// - `pub` (any `pub(..)` form) marks the field exported. Fields without it
///   are never matched by a pointer.
/// - `=> "tag"` supplies the serialization tag, see
///   [`Field::serialized_name`].
/// - a leading `#[read_only]` makes assignments to the field fail with
///   [`CanNotSetError::ReadOnly`](crate::CanNotSetError::ReadOnly).
///
/// Every field's type must implement [`Node`]. The macro must be invoked
/// where the struct's fields are accessible.
///
/// ## Example
/// ```rust
/// use jspointer::{record, Pointer};
/// use std::collections::HashMap;
///
/// pub struct Service {
///     pub name: String,
///     pub ports: HashMap<String, u16>,
///     pub id: u64,
///     secret: String,
/// }
///
/// record! {
///     Service {
///         pub name => "name",
///         pub ports => "ports,omitempty",
///         #[read_only]
///         pub id,
///         secret,
///     }
/// }
///
/// let mut svc = Service {
///     name: "api".into(),
///     ports: HashMap::from([("http".to_string(), 80)]),
///     id: 7,
///     secret: "hunter2".into(),
/// };
///
/// let ptr = Pointer::parse("/ports/http").unwrap();
/// assert_eq!(ptr.get(&svc).unwrap().downcast_ref::<u16>(), Some(&80));
/// ptr.set(&mut svc, 8080u16).unwrap();
/// assert_eq!(svc.ports["http"], 8080);
///
/// assert!(Pointer::parse("/id").unwrap().set(&mut svc, 8u64).is_err());
/// assert!(Pointer::parse("/secret").unwrap().get(&svc).is_err());
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $( $(#[$attr:ident])* $vis:vis $field:ident $(=> $tag:literal)? ),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&self) -> &'static [$crate::Field] {
                const FIELDS: &[$crate::Field] = &[
                    $(
                        $crate::Field::new(stringify!($field))
                            $(.with_tag($tag))?
                            .with_exported(!stringify!($vis).is_empty())
                            .with_read_only(false $(|| $crate::__record_attr!($attr))*),
                    )*
                ];
                FIELDS
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field(&self, index: usize) -> ::core::option::Option<&dyn $crate::Node> {
                let mut position = 0usize;
                $(
                    if position == index {
                        return ::core::option::Option::Some(&self.$field as &dyn $crate::Node);
                    }
                    position += 1;
                )*
                ::core::option::Option::None
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn $crate::Node> {
                let mut position = 0usize;
                $(
                    if position == index {
                        return ::core::option::Option::Some(&mut self.$field as &mut dyn $crate::Node);
                    }
                    position += 1;
                )*
                ::core::option::Option::None
            }
        }

        impl $crate::Node for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Record(self)
            }

            fn shape_mut(&mut self) -> $crate::ShapeMut<'_> {
                $crate::ShapeMut::Record(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_attr {
    (read_only) => {
        true
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, Pointer};

    struct Sample {
        foo: String,
        bar: u8,
        quux: u8,
        id: u32,
    }

    record! {
        Sample {
            pub foo => "foo,omitempty",
            pub bar,
            quux,
            #[read_only]
            pub id => "ID",
        }
    }

    fn sample() -> Sample {
        Sample {
            foo: "foooooooo".into(),
            bar: 1,
            quux: 2,
            id: 3,
        }
    }

    #[test]
    fn descriptors() {
        let s = sample();
        let fields = s.fields();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].name(), "foo");
        assert_eq!(fields[0].tag(), Some("foo,omitempty"));
        assert!(fields[0].is_exported());
        assert!(!fields[0].is_read_only());
        assert_eq!(fields[1].tag(), None);
        assert!(!fields[2].is_exported());
        assert!(fields[3].is_read_only());
        assert_eq!(fields[3].serialized_name(), Some("ID"));
    }

    #[test]
    fn field_access() {
        let mut s = sample();
        assert_eq!(s.kind(), Kind::Record);
        let bar = s.field(1).unwrap();
        assert_eq!(bar.as_any().downcast_ref::<u8>(), Some(&1));
        assert!(s.field(4).is_none());

        s.field_mut(2)
            .unwrap()
            .replace_boxed(Box::new(9u8))
            .unwrap();
        assert_eq!(s.quux, 9);
    }

    #[test]
    fn serialized_names() {
        assert_eq!(Field::new("Baz").serialized_name(), Some("Baz"));
        assert_eq!(Field::new("Baz").with_tag("").serialized_name(), Some("Baz"));
        assert_eq!(Field::new("Baz").with_tag("-,").serialized_name(), Some("-"));
        assert_eq!(Field::new("Baz").with_tag("baz,string").serialized_name(), Some("baz"));
    }

    #[test]
    fn pointer_through_record() {
        let mut s = sample();
        let ptr = Pointer::parse("/foo").unwrap();
        assert_eq!(
            ptr.get(&s).unwrap().downcast_ref::<String>().unwrap(),
            "foooooooo"
        );
        ptr.set(&mut s, String::from("bar")).unwrap();
        assert_eq!(s.foo, "bar");
    }

    #[cfg(feature = "derive")]
    mod derived {
        use crate::{CanNotSetError, Pointer, Record};
        use serde::Serialize;
        use std::collections::HashMap;

        #[derive(Serialize, Record)]
        pub struct Account {
            #[serde(rename = "user_name")]
            pub name: String,
            #[jspointer(read_only)]
            pub id: u64,
            pub tags: HashMap<String, String>,
            #[serde(skip_serializing)]
            pub cache: u8,
            password: String,
        }

        fn account() -> Account {
            Account {
                name: "ada".into(),
                id: 7,
                tags: HashMap::from([("team".to_string(), "core".to_string())]),
                cache: 0,
                password: "hunter2".into(),
            }
        }

        fn ptr(s: &str) -> Pointer {
            Pointer::parse(s).unwrap()
        }

        #[test]
        fn descriptors_follow_declaration() {
            let fields = account().fields();
            assert_eq!(fields.len(), 5);
            assert_eq!(fields[0].serialized_name(), Some("user_name"));
            assert!(fields[1].is_read_only());
            assert_eq!(fields[2].serialized_name(), Some("tags"));
            assert_eq!(fields[3].tag(), Some("-"));
            assert!(!fields[4].is_exported());
        }

        #[test]
        fn private_field_is_not_found() {
            let mut a = account();
            assert!(ptr("/password").get(&a).unwrap_err().is_not_found());
            let err = ptr("/password").set(&mut a, String::new()).unwrap_err();
            assert!(err.is_not_found());
            assert_eq!(a.password, "hunter2");
        }

        #[test]
        fn renamed_field_resolves_under_serialized_name() {
            let mut a = account();
            assert!(ptr("/name").get(&a).unwrap_err().is_not_found());
            ptr("/user_name").set(&mut a, String::from("grace")).unwrap();
            assert_eq!(a.name, "grace");
            let found = ptr("/tags/team").get(&a).unwrap();
            assert_eq!(found.downcast_ref::<String>().unwrap(), "core");
            assert!(ptr("/cache").get(&a).unwrap_err().is_not_found());
        }

        #[test]
        fn read_only_attribute() {
            let mut a = account();
            let err = ptr("/id").set(&mut a, 8u64).unwrap_err();
            assert!(matches!(
                err,
                crate::AssignError::CanNotSet {
                    source: CanNotSetError::ReadOnly { field: "id" },
                    ..
                }
            ));
            assert_eq!(a.id, 7);
        }
    }
}
