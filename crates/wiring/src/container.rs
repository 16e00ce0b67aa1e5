//! The address registry and resolution driver

mod guard;

use std::sync::Arc;
use std::thread::ThreadId;

use dashmap::mapref::entry::Entry as Slot;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::ContainerConfig;
use crate::definition::Definition;
use crate::error::{type_name, ContainerError, ReferenceRecursionError, Result};
use crate::reference::{Reference, ReferenceObject};
use crate::value::Value;

/// Whatever is registered at an address.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A raw value, a reference or a reference object
    Value(Value),

    /// A lazily resolved definition
    Definition(Definition),
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

impl From<Definition> for Entry {
    fn from(definition: Definition) -> Self {
        Entry::Definition(definition)
    }
}

impl From<Reference> for Entry {
    fn from(reference: Reference) -> Self {
        Entry::Value(Value::Reference(reference))
    }
}

impl From<ReferenceObject> for Entry {
    fn from(reference: ReferenceObject) -> Self {
        Entry::Value(reference.into())
    }
}

struct ContainerInner {
    /// Own entries; parents are consulted only when an address is missing here
    registry: DashMap<String, Entry>,

    /// Parent containers in the order they were added
    parents: RwLock<Vec<Container>>,

    /// Addresses currently being resolved through this container, per thread
    active: DashMap<ThreadId, Vec<String>>,

    config: ContainerConfig,
}

/// The dependency-injection container.
///
/// Maps addresses to entries and resolves them on request. A `Container` is a
/// cheap handle: clones share the same registry, which is how a container is
/// handed to decorators.
///
/// # Example
///
/// ```
/// use wiring::{Container, Definition, Reference, Value};
///
/// let container = Container::new();
/// container.add("greeting", Value::string("hello")).unwrap();
/// container
///     .add("shout", Definition::new(Value::function("upper", |args, _| {
///         Ok(Value::string(args[0].as_str().unwrap_or_default().to_uppercase()))
///     })))
///     .unwrap()
///     .call_with(vec![Value::from(Reference::new("greeting"))], ())
///     .unwrap();
///
/// assert_eq!(container.get("shout").unwrap(), Value::string("HELLO"));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Create a new empty container.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create a container with explicit configuration.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: DashMap::new(),
                parents: RwLock::new(Vec::new()),
                active: DashMap::new(),
                config,
            }),
        }
    }

    /// The configuration this container was created with.
    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    // ═══════════════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════════════

    /// Register `entry` at `address` and hand it back unchanged.
    ///
    /// Returning the entry allows chaining on a definition:
    /// `container.add("x", Definition::new(class))?.construct()?`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `address` is empty
    /// - `DuplicateAddress` if this container already has `address`
    ///   (a parent having it does not count)
    pub fn add<E>(&self, address: &str, entry: E) -> Result<E>
    where
        E: Into<Entry> + Clone,
    {
        if address.is_empty() {
            return Err(ContainerError::InvalidArgument(
                "address must be defined".to_string(),
            ));
        }

        match self.inner.registry.entry(address.to_string()) {
            Slot::Occupied(_) => {
                debug!(address, "Rejected duplicate address");
                Err(ContainerError::DuplicateAddress {
                    address: address.to_string(),
                })
            }
            Slot::Vacant(slot) => {
                let stored = entry.clone().into();
                debug!(
                    address,
                    definition = matches!(stored, Entry::Definition(_)),
                    "Registered entry"
                );
                slot.insert(stored);
                Ok(entry)
            }
        }
    }

    /// Fall back to `parent` for addresses this container lacks.
    ///
    /// Parents added later take precedence over parents added earlier.
    pub fn inherits_from(&self, parent: &Container) -> &Self {
        let mut parents = self.inner.parents.write();
        parents.push(parent.clone());
        debug!(parents = parents.len(), "Added parent container");
        self
    }

    /// Dynamic form of [`Container::inherits_from`].
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless `parent` is a `Value::Container`.
    pub fn inherits_from_value(&self, parent: &Value) -> Result<&Self> {
        match parent {
            Value::Container(parent) => Ok(self.inherits_from(parent)),
            other => Err(ContainerError::InvalidArgument(format!(
                "can only inherit from a Container, got {}",
                type_name(other)
            ))),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Resolution
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve `address` to a value.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `address` is empty
    /// - `AddressNotFound` if neither this container nor a parent has it
    /// - `ReferenceRecursion` if references lead back to an address already
    ///   being resolved
    /// - anything a definition pipeline fails with
    pub fn get(&self, address: &str) -> Result<Value> {
        if address.is_empty() {
            return Err(ContainerError::InvalidArgument(
                "address must be defined".to_string(),
            ));
        }
        self.get_with_stack(address, &[address.to_string()])
    }

    /// Resolve `address` as one hop of a larger resolution.
    ///
    /// `stack` is the chain of addresses the current logical `get` has gone
    /// through; references found along the way are checked against it.
    pub fn get_with_stack(&self, address: &str, stack: &[String]) -> Result<Value> {
        let Some((owner, entry)) = self.lookup(address) else {
            debug!(address, "Address not found");
            return Err(ContainerError::AddressNotFound {
                address: address.to_string(),
            });
        };

        if !Container::ptr_eq(self, &owner) {
            trace!(address, "Resolving through parent container");
        }
        owner.resolve_entry(address, entry, stack)
    }

    /// Resolve a value that may be a reference, starting a fresh stack.
    ///
    /// References and reference objects are resolved; anything else is
    /// returned unchanged.
    pub fn resolve_reference(&self, value: &Value) -> Result<Value> {
        self.resolve_with_stack(value, &[])
    }

    /// Resolve a value that may be a reference, continuing `stack`.
    pub fn resolve_with_stack(&self, value: &Value, stack: &[String]) -> Result<Value> {
        match value {
            Value::Reference(reference) => {
                let address = reference.address();
                if stack.iter().any(|a| a == address) {
                    let err = ReferenceRecursionError::new(stack, address);
                    debug!(chain = ?err.address_chain, "Reference cycle detected");
                    return Err(err.into());
                }

                let mut next = stack.to_vec();
                next.push(address.to_string());
                trace!(address, depth = next.len(), "Following reference");
                reference.resolve(self, &next)
            }
            Value::ReferenceObject(object) => object.resolve(self, stack),
            other => Ok(other.clone()),
        }
    }

    fn resolve_entry(&self, address: &str, entry: Entry, stack: &[String]) -> Result<Value> {
        let _guard = self.enter(address)?;

        match entry {
            Entry::Value(value) => self.resolve_with_stack(&value, stack),
            Entry::Definition(definition) => {
                if definition.is_resolving() {
                    let err = ReferenceRecursionError::from_chain(self.active_chain(address));
                    debug!(chain = ?err.address_chain, "Definition requested its own value");
                    return Err(err.into());
                }
                definition.get_value(self)
            }
        }
    }

    /// Find the container that owns `address` and a copy of its entry.
    ///
    /// Own entries shadow inherited ones; parents are searched
    /// most-recently-added first. Each container is visited at most once,
    /// so inheritance loops terminate.
    fn lookup(&self, address: &str) -> Option<(Container, Entry)> {
        let mut visited = Vec::new();
        self.lookup_in(address, &mut visited)
    }

    fn lookup_in(
        &self,
        address: &str,
        visited: &mut Vec<*const ContainerInner>,
    ) -> Option<(Container, Entry)> {
        let id = Arc::as_ptr(&self.inner);
        if visited.contains(&id) {
            return None;
        }
        visited.push(id);

        if let Some(entry) = self.inner.registry.get(address) {
            return Some((self.clone(), entry.value().clone()));
        }

        let parents = self.inner.parents.read().clone();
        parents
            .iter()
            .rev()
            .find_map(|parent| parent.lookup_in(address, visited))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Check if this container's own registry has `address`.
    pub fn contains(&self, address: &str) -> bool {
        self.inner.registry.contains_key(address)
    }

    /// Number of addresses in this container's own registry.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    /// Check if this container's own registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// Check whether two handles refer to the same container.
    pub fn ptr_eq(a: &Container, b: &Container) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("entries", &self.len())
            .field("parents", &self.inner.parents.read().len())
            .finish()
    }
}
