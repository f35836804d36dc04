//! Per-type lookup tables from serialized field names to field positions.
//!
//! Building a table walks every [`Field`](crate::Field) of a record, so the
//! result is computed once per record type and shared through a process-wide
//! cache. Readers never block one another; on a miss the table is built
//! outside the lock and the first table inserted for a type wins.

use core::any::TypeId;
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use crate::{Field, Record};

static FIELD_NAMES: LazyLock<RwLock<HashMap<TypeId, Arc<FieldNames>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Maps the serialized names of a record type's fields to their positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    record: &'static str,
    locators: HashMap<&'static str, usize>,
}

impl FieldNames {
    /// Builds the table for `fields`, the field list of the record type
    /// named `record`.
    ///
    /// Fields without a serialized name are skipped. When two fields share a
    /// name, the one declared first is kept.
    pub fn from_fields(record: &'static str, fields: &[Field]) -> Self {
        let mut locators = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if let Some(name) = field.serialized_name() {
                locators.entry(name).or_insert(position);
            }
        }
        Self { record, locators }
    }

    /// Position of the field serialized as `name`.
    pub fn locate(&self, name: &str) -> Option<usize> {
        self.locators.get(name).copied()
    }

    /// Number of addressable fields.
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Returns `true` if no field is addressable.
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    /// Name of the record type the table was built for.
    pub fn record_type(&self) -> &'static str {
        self.record
    }

    /// The addressable names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.locators.keys().copied()
    }
}

/// Returns the cached [`FieldNames`] of `record`'s concrete type, building
/// it on first use.
///
/// Safe to call from any number of threads.
///
/// ## Example
/// ```rust
/// use jspointer::{field_names, record};
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
/// record! { Point { pub x => "X", pub y } }
///
/// let names = field_names(&Point { x: 1, y: 2 });
/// assert_eq!(names.locate("X"), Some(0));
/// assert_eq!(names.locate("y"), Some(1));
/// assert_eq!(names.locate("x"), None);
/// ```
pub fn field_names(record: &dyn Record) -> Arc<FieldNames> {
    let type_id = record.as_any().type_id();
    {
        let cache = FIELD_NAMES.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(names) = cache.get(&type_id) {
            return Arc::clone(names);
        }
    }

    let built = Arc::new(FieldNames::from_fields(record.type_name(), record.fields()));

    let mut cache = FIELD_NAMES.write().unwrap_or_else(PoisonError::into_inner);
    match cache.entry(type_id) {
        Entry::Occupied(entry) => Arc::clone(entry.get()),
        Entry::Vacant(entry) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                record = built.record_type(),
                fields = built.len(),
                "cached field names"
            );
            Arc::clone(entry.insert(built))
        }
    }
}
