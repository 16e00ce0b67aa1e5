//! References: pointers to addresses, and structural references built from them

use indexmap::IndexMap;

use crate::container::Container;
use crate::error::Result;
use crate::value::{ObjectValue, Value};

/// A pointer to whatever is registered at an address.
///
/// References are never values in their own right: a container resolves them
/// before they reach a caller or a pipeline action.
///
/// # Example
///
/// ```
/// use wiring::{Container, Reference, Value};
///
/// let container = Container::new();
/// container.add("port", Value::Int(8080)).unwrap();
/// container.add("listen-port", Reference::new("port")).unwrap();
///
/// assert_eq!(container.get("listen-port").unwrap(), Value::Int(8080));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    address: String,
}

impl Reference {
    /// Create a reference to an address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// The referenced address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Resolve through `container`, continuing the caller's resolution stack.
    ///
    /// The stack is passed through unchanged so a chain of references is
    /// tracked as one logical resolution.
    pub fn resolve(&self, container: &Container, stack: &[String]) -> Result<Value> {
        container.get_with_stack(&self.address, stack)
    }
}

/// A structural reference: a mapping whose fields may be references.
///
/// Every resolution produces a new object; the `ReferenceObject` itself is
/// never modified, so one instance can be registered, passed as an argument
/// and nested inside other reference objects at the same time.
#[derive(Debug, Clone, Default)]
pub struct ReferenceObject {
    fields: IndexMap<String, Value>,
}

impl ReferenceObject {
    /// Create an empty reference object
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The unresolved fields
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Resolve every field through `container`.
    ///
    /// Reference fields are dereferenced, list fields have each element
    /// dereferenced, and everything else is copied as is. All of them share
    /// the caller's stack, so a cycle running through this object is still
    /// reported.
    pub fn resolve(&self, container: &Container, stack: &[String]) -> Result<Value> {
        let mut object = ObjectValue::new();

        for (name, field) in &self.fields {
            let mut resolved = container.resolve_with_stack(field, stack)?;

            if let Value::List(items) = &resolved {
                let items = items
                    .iter()
                    .map(|item| container.resolve_with_stack(item, stack))
                    .collect::<Result<Vec<_>>>()?;
                resolved = Value::list(items);
            }

            object.set(name.clone(), resolved);
        }

        Ok(Value::object(object))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ReferenceObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
