//! Definitions: lazily resolved values with a construction pipeline

mod action;

pub use action::Action;

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex, RwLock};
use tracing::debug;

use crate::config::DefinitionOptions;
use crate::container::Container;
use crate::error::{ContainerError, Result};
use crate::value::Value;

/// Resolution state of a definition.
#[derive(Debug, Clone)]
enum ResolvedState {
    /// Never produced a value
    Unresolved,

    /// Shared and cached
    Resolved(Value),

    /// Unshared; has produced at least one value
    ResolvedUnshared,
}

struct DefinitionInner {
    source: Value,
    shared: bool,
    actions: RwLock<Vec<Action>>,
    state: Mutex<ResolvedState>,
    /// Threads currently running the pipeline
    resolving: Mutex<Vec<ThreadId>>,
    /// Signalled whenever a thread stops running the pipeline
    settled: Condvar,
}

/// What the current thread should do when asked for the value.
enum Turn<'a> {
    /// Run the pipeline while holding the flag
    Run(ResolvingFlag<'a>),

    /// Another run already cached the shared value
    Cached(Value),
}

/// A deferred value plus the pipeline that turns it into the final value.
///
/// Builder methods append one [`Action`] each and hand back the same
/// definition, so they chain. Once the definition has produced a value the
/// pipeline is frozen and every builder fails with `FrozenDefinition`.
///
/// # Example
///
/// ```
/// use wiring::{ClassValue, Container, Definition, Value};
///
/// let counter = ClassValue::new("Counter")
///     .with_constructor(|this, args| {
///         this.set("count", args.first().cloned().unwrap_or(Value::Int(0)));
///         Ok(())
///     });
///
/// let container = Container::new();
/// container
///     .add("counter", Definition::new(counter))
///     .unwrap()
///     .construct_with(vec![Value::Int(5)])
///     .unwrap()
///     .set_prop("label", "visits")
///     .unwrap();
///
/// let counter = container.get("counter").unwrap();
/// let counter = counter.as_object().unwrap();
/// assert_eq!(counter.get("count"), Some(Value::Int(5)));
/// assert_eq!(counter.get("label"), Some(Value::string("visits")));
/// ```
#[derive(Clone)]
pub struct Definition {
    inner: Arc<DefinitionInner>,
}

impl Definition {
    /// Create a shared definition.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_options(value, DefinitionOptions::default())
    }

    /// Create a definition that rebuilds its value on every request.
    pub fn unshared(value: impl Into<Value>) -> Self {
        Self::with_options(value, DefinitionOptions { shared: false })
    }

    /// Create a definition with explicit options.
    pub fn with_options(value: impl Into<Value>, options: DefinitionOptions) -> Self {
        Self {
            inner: Arc::new(DefinitionInner {
                source: value.into(),
                shared: options.shared,
                actions: RwLock::new(Vec::new()),
                state: Mutex::new(ResolvedState::Unresolved),
                resolving: Mutex::new(Vec::new()),
                settled: Condvar::new(),
            }),
        }
    }

    /// Whether the first resolved value is cached.
    pub fn is_shared(&self) -> bool {
        self.inner.shared
    }

    /// Whether the definition has produced a value at least once.
    pub fn has_resolved(&self) -> bool {
        !matches!(*self.inner.state.lock(), ResolvedState::Unresolved)
    }

    /// Whether the current thread is in the middle of resolving this definition.
    pub fn is_resolving(&self) -> bool {
        self.inner.resolving.lock().contains(&thread::current().id())
    }

    /// Number of actions in the pipeline.
    pub fn action_count(&self) -> usize {
        self.inner.actions.read().len()
    }

    /// Check whether two handles refer to the same definition.
    pub fn ptr_eq(a: &Definition, b: &Definition) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Pipeline Builders
    // ═══════════════════════════════════════════════════════════════════

    /// Replace the value with a new instance of it, built without arguments.
    pub fn construct(&self) -> Result<Definition> {
        self.ensure_unfrozen("construct")?;
        self.push(Action::Construct { args: Value::Unit })
    }

    /// Replace the value with a new instance of it.
    ///
    /// `args` is a list, or a reference to one.
    pub fn construct_with(&self, args: impl Into<Value>) -> Result<Definition> {
        self.ensure_unfrozen("construct")?;
        self.push(Action::Construct { args: args.into() })
    }

    /// Replace the value with the result of calling it without arguments.
    pub fn call(&self) -> Result<Definition> {
        self.ensure_unfrozen("call")?;
        self.push(Action::Call {
            args: Value::Unit,
            context: Value::Unit,
        })
    }

    /// Replace the value with the result of calling it with `args` and `context`.
    pub fn call_with(
        &self,
        args: impl Into<Value>,
        context: impl Into<Value>,
    ) -> Result<Definition> {
        self.ensure_unfrozen("call")?;
        self.push(Action::Call {
            args: args.into(),
            context: context.into(),
        })
    }

    /// Call the named method on the value without arguments.
    pub fn call_method(&self, method: impl Into<Value>) -> Result<Definition> {
        self.ensure_unfrozen("call_method")?;
        self.push(Action::CallMethod {
            method: method.into(),
            args: Value::Unit,
        })
    }

    /// Call the named method on the value with `args`.
    pub fn call_method_with(
        &self,
        method: impl Into<Value>,
        args: impl Into<Value>,
    ) -> Result<Definition> {
        self.ensure_unfrozen("call_method")?;
        self.push(Action::CallMethod {
            method: method.into(),
            args: args.into(),
        })
    }

    /// Assign a property on the value.
    pub fn set_prop(&self, prop: impl Into<Value>, value: impl Into<Value>) -> Result<Definition> {
        self.ensure_unfrozen("set_prop")?;
        self.push(Action::SetProp {
            prop: prop.into(),
            value: value.into(),
        })
    }

    /// Pass the value to `decorator` as `decorator(value, container)`.
    ///
    /// A non-unit return value replaces the value. The decorator is called
    /// with a `Unit` context; a decorator that needs this definition should
    /// capture a handle to it.
    pub fn decorate(&self, decorator: impl Into<Value>) -> Result<Definition> {
        self.ensure_unfrozen("decorate")?;
        self.push(Action::Decorate {
            decorator: decorator.into(),
            args: Value::Unit,
            context: Value::Unit,
        })
    }

    /// Pass the value to `decorator` as `decorator(value, ...args, container)`.
    pub fn decorate_with(
        &self,
        decorator: impl Into<Value>,
        args: impl Into<Value>,
        context: impl Into<Value>,
    ) -> Result<Definition> {
        self.ensure_unfrozen("decorate")?;
        self.push(Action::Decorate {
            decorator: decorator.into(),
            args: args.into(),
            context: context.into(),
        })
    }

    /// Resolve every field of the value that is a reference, in place.
    pub fn resolve_props(&self) -> Result<Definition> {
        self.ensure_unfrozen("resolve_props")?;
        self.push(Action::ResolveProps)
    }

    /// Builders are rejected once a value exists and while a pipeline runs.
    fn ensure_unfrozen(&self, action: &'static str) -> Result<()> {
        if self.has_resolved() || !self.inner.resolving.lock().is_empty() {
            debug!(action, "Rejected action on frozen definition");
            return Err(ContainerError::FrozenDefinition { action });
        }
        Ok(())
    }

    fn push(&self, action: Action) -> Result<Definition> {
        self.inner.actions.write().push(action);
        Ok(self.clone())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Resolution
    // ═══════════════════════════════════════════════════════════════════

    /// Produce the definition's value.
    ///
    /// A shared definition returns its cached value after the first success.
    /// Otherwise the source is dereferenced through `container` and the
    /// pipeline runs in order. A failure leaves the state untouched, so the
    /// next request retries from scratch.
    ///
    /// A shared pipeline runs on one thread at a time. Other threads asking
    /// for the value meanwhile block until it is cached, or retry if the run
    /// failed. Unshared pipelines may run on several threads at once.
    pub fn get_value(&self, container: &Container) -> Result<Value> {
        let _resolving = match self.take_turn()? {
            Turn::Cached(value) => return Ok(value),
            Turn::Run(flag) => flag,
        };

        let actions = self.inner.actions.read().clone();
        debug!(
            shared = self.inner.shared,
            actions = actions.len(),
            "Resolving definition"
        );

        let mut value = container.resolve_reference(&self.inner.source)?;
        for action in &actions {
            value = action.apply(value, container)?;
        }

        let mut state = self.inner.state.lock();
        *state = if self.inner.shared {
            ResolvedState::Resolved(value.clone())
        } else {
            ResolvedState::ResolvedUnshared
        };
        Ok(value)
    }

    /// Wait until the current thread may run the pipeline.
    ///
    /// Fails if this thread is already running it.
    fn take_turn(&self) -> Result<Turn<'_>> {
        let thread = thread::current().id();
        let mut threads = self.inner.resolving.lock();
        loop {
            if self.inner.shared {
                if let ResolvedState::Resolved(value) = &*self.inner.state.lock() {
                    return Ok(Turn::Cached(value.clone()));
                }
            }
            if threads.contains(&thread) {
                return Err(ContainerError::InvalidOperation(
                    "definition requested its own value while resolving".to_string(),
                ));
            }
            if !self.inner.shared || threads.is_empty() {
                break;
            }
            self.inner.settled.wait(&mut threads);
        }

        threads.push(thread);
        Ok(Turn::Run(ResolvingFlag {
            inner: &self.inner,
            thread,
        }))
    }
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("source", &self.inner.source)
            .field("shared", &self.inner.shared)
            .field("actions", &self.action_count())
            .field("state", &*self.inner.state.lock())
            .finish()
    }
}

/// Marks a definition as being resolved by the current thread until dropped.
struct ResolvingFlag<'a> {
    inner: &'a DefinitionInner,
    thread: ThreadId,
}

impl Drop for ResolvingFlag<'_> {
    fn drop(&mut self) {
        self.inner.resolving.lock().retain(|t| *t != self.thread);
        self.inner.settled.notify_all();
    }
}
