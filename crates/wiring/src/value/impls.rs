//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::any::Any;
use std::sync::Arc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Create an object value
    pub fn object(object: ObjectValue) -> Self {
        Value::Object(ObjectRef::new(object))
    }

    /// Create a new empty anonymous object
    pub fn empty_object() -> Self {
        Value::object(ObjectValue::new())
    }

    /// Create a function value from a closure
    pub fn function<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value], &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Value::Function(Arc::new(FunctionValue::new(name, func)))
    }

    /// Create a function value from any invocable
    pub fn invocable(invocable: impl Invocable + 'static) -> Self {
        Value::Function(Arc::new(invocable))
    }

    /// Create a class value
    pub fn class(class: ClassValue) -> Self {
        Value::Class(Arc::new(class))
    }

    /// Wrap an opaque Rust value
    pub fn native<T: Any + Send + Sync>(value: T) -> Self {
        Value::Native(NativeValue::new(value))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════
    /// Check if value is the "no value" sentinel
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if value is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if value can be invoked
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Check if value must be resolved through a container before use
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_) | Value::ReferenceObject(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════
    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract as f64 (converts from integers)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract list as slice
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Extract object handle
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Extract class
    pub fn as_class(&self) -> Option<&Arc<ClassValue>> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Extract container handle
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Value::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Get a shared handle to a native value as `T`
    pub fn downcast_native<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Native(n) => n.downcast::<T>(),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Members and Identity
    // ═══════════════════════════════════════════════════════════════════
    /// Look up a named member.
    ///
    /// Objects expose their fields and then their class's instance methods;
    /// classes expose their static members. Nothing else has members.
    pub fn member(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(o) => o.member(name),
            Value::Class(c) => c.get_static(name),
            _ => None,
        }
    }

    /// Check whether two values are the same value.
    ///
    /// Scalars compare by value; everything that lives behind a shared
    /// handle compares by handle.
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
            (Value::String(x), Value::String(y)) => x == y,
            (Value::List(x), Value::List(y)) => Arc::ptr_eq(x, y),
            (Value::Object(x), Value::Object(y)) => ObjectRef::ptr_eq(x, y),
            (Value::Native(x), Value::Native(y)) => NativeValue::ptr_eq(x, y),
            (Value::Function(x), Value::Function(y)) => same_invocable(x, y),
            (Value::Class(x), Value::Class(y)) => Arc::ptr_eq(x, y),
            (Value::Container(x), Value::Container(y)) => Container::ptr_eq(x, y),
            (Value::Reference(x), Value::Reference(y)) => x == y,
            (Value::ReferenceObject(x), Value::ReferenceObject(y)) => Arc::ptr_eq(x, y),
            _ => false,
        }
    }
}

/// Compare trait objects by data pointer only.
fn same_invocable(a: &Arc<dyn Invocable>, b: &Arc<dyn Invocable>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Strings and lists compare structurally
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,

            // Floats (use IEEE equality for PartialEq)
            (Value::Float(a), Value::Float(b)) => a == b,

            // Everything else: scalars by value, handles by identity
            _ => Value::ptr_eq(self, other),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<ObjectValue> for Value {
    fn from(object: ObjectValue) -> Self {
        Value::object(object)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<FunctionValue> for Value {
    fn from(func: FunctionValue) -> Self {
        Value::Function(Arc::new(func))
    }
}

impl From<ClassValue> for Value {
    fn from(class: ClassValue) -> Self {
        Value::class(class)
    }
}

impl From<Arc<ClassValue>> for Value {
    fn from(class: Arc<ClassValue>) -> Self {
        Value::Class(class)
    }
}

impl From<NativeValue> for Value {
    fn from(native: NativeValue) -> Self {
        Value::Native(native)
    }
}

impl From<Container> for Value {
    fn from(container: Container) -> Self {
        Value::Container(container)
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        Value::Reference(reference)
    }
}

impl From<ReferenceObject> for Value {
    fn from(reference: ReferenceObject) -> Self {
        Value::ReferenceObject(Arc::new(reference))
    }
}
