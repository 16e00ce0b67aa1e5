//! Structural values: objects with named fields and identity

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ClassValue, Value};

/// An object with named fields.
///
/// Uses IndexMap to preserve field order (predictable iteration and
/// display). Objects built by a [`ClassValue`] keep a link to it so their
/// instance methods can be found.
#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
    /// The object's type name, if it was constructed from a class or named
    pub type_name: Option<String>,

    /// The object's fields in insertion order
    pub fields: IndexMap<String, Value>,

    class: Option<Arc<ClassValue>>,
}

impl ObjectValue {
    /// Create a new anonymous object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new named object
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Create an empty instance of a class
    pub fn instance_of(class: Arc<ClassValue>) -> Self {
        Self {
            type_name: Some(class.name.clone()),
            fields: IndexMap::new(),
            class: Some(class),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// The class this object was constructed from
    pub fn class(&self) -> Option<&Arc<ClassValue>> {
        self.class.as_ref()
    }
}

/// A shared, mutable handle to an [`ObjectValue`].
///
/// Cloning the handle never clones the object: every clone observes the same
/// fields, and [`ObjectRef::ptr_eq`] tells handles of the same object apart
/// from equal-looking copies.
#[derive(Clone, Default)]
pub struct ObjectRef(Arc<RwLock<ObjectValue>>);

impl ObjectRef {
    /// Wrap an object
    pub fn new(object: ObjectValue) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Lock for reading
    pub fn read(&self) -> RwLockReadGuard<'_, ObjectValue> {
        self.0.read()
    }

    /// Lock for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, ObjectValue> {
        self.0.write()
    }

    /// Lock for reading without blocking
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, ObjectValue>> {
        self.0.try_read()
    }

    /// Read a field
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.read().get(name).cloned()
    }

    /// Write a field
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.write().set(name, value);
    }

    /// The object's type name
    pub fn type_name(&self) -> Option<String> {
        self.0.read().type_name.clone()
    }

    /// Snapshot of the fields in insertion order
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Look up a member: own fields first, then the class's instance methods.
    pub fn member(&self, name: &str) -> Option<Value> {
        let object = self.0.read();
        if let Some(value) = object.get(name) {
            return Some(value.clone());
        }
        object.class().and_then(|class| class.method(name))
    }

    /// Check whether two handles point at the same object
    pub fn ptr_eq(a: &ObjectRef, b: &ObjectRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_the_object() {
        let a = ObjectRef::new(ObjectValue::new());
        let b = a.clone();
        b.set("x", 1);
        assert_eq!(a.get("x"), Some(Value::Int(1)));
        assert!(ObjectRef::ptr_eq(&a, &b));
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let object = ObjectRef::new(
            ObjectValue::named("Pair")
                .with_field("b", 2)
                .with_field("a", 1),
        );
        let names: Vec<_> = object.fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(object.type_name(), Some("Pair".to_string()));
    }

    #[test]
    fn test_member_prefers_fields() {
        let object = ObjectRef::new(ObjectValue::new().with_field("run", "field"));
        assert_eq!(object.member("run"), Some(Value::string("field")));
        assert_eq!(object.member("missing"), None);
    }
}
