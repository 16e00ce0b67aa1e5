//! Callable value types: functions and classes

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::{ObjectRef, ObjectValue, Value};

/// Type alias for native function pointers to reduce complexity
///
/// Arguments come first, then the call context (the receiver for methods,
/// `Value::Unit` when none was given).
pub type NativeFnPtr = Arc<dyn Fn(&[Value], &Value) -> anyhow::Result<Value> + Send + Sync>;

/// Type alias for constructor pointers.
///
/// A constructor initializes a fresh instance in place.
pub type ConstructorPtr = Arc<dyn Fn(&mut ObjectValue, &[Value]) -> anyhow::Result<()> + Send + Sync>;

/// The capability of being invoked.
///
/// Implement this for a service type to register it directly as a
/// `Value::Function`; [`FunctionValue`] covers the closure case.
pub trait Invocable: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Invoke with arguments and a call context.
    fn call(&self, args: &[Value], context: &Value) -> anyhow::Result<Value>;
}

/// A native function backed by a closure.
#[derive(Clone)]
pub struct FunctionValue {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: NativeFnPtr,
}

impl FunctionValue {
    /// Create a variadic function.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value], &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: -1,
            func: Arc::new(func),
        }
    }

    /// Create a function that checks its argument count.
    pub fn with_arity<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value], &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity: arity as i32,
            func: Arc::new(func),
        }
    }
}

impl Invocable for FunctionValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[Value], context: &Value) -> anyhow::Result<Value> {
        if self.arity >= 0 && args.len() != self.arity as usize {
            anyhow::bail!("expected {} arguments, got {}", self.arity, args.len());
        }
        (self.func)(args, context)
    }
}

impl std::fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FunctionValue({})", self.name)
    }
}

/// A constructible type.
///
/// Instances are [`ObjectValue`]s linked back to their class, so instance
/// methods are found through the class's method table. Static members are
/// mutable and shared by every holder of the class.
pub struct ClassValue {
    /// The class name, also the `type_name` of its instances
    pub name: String,

    constructor: Option<ConstructorPtr>,

    methods: IndexMap<String, Value>,

    statics: RwLock<IndexMap<String, Value>>,
}

impl ClassValue {
    /// Create a class whose constructor leaves instances empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            methods: IndexMap::new(),
            statics: RwLock::new(IndexMap::new()),
        }
    }

    /// Set the constructor (builder pattern)
    pub fn with_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&mut ObjectValue, &[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Add an instance method (builder pattern)
    ///
    /// The method receives the instance as its call context.
    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&[Value], &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let method = FunctionValue::new(name.clone(), method);
        self.methods.insert(name, Value::Function(Arc::new(method)));
        self
    }

    /// Add a static member (builder pattern)
    pub fn with_static(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.write().insert(name.into(), value.into());
        self
    }

    /// Look up an instance method
    pub fn method(&self, name: &str) -> Option<Value> {
        self.methods.get(name).cloned()
    }

    /// Read a static member
    pub fn get_static(&self, name: &str) -> Option<Value> {
        self.statics.read().get(name).cloned()
    }

    /// Write a static member
    pub fn set_static(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.statics.write().insert(name.into(), value.into());
    }

    /// Snapshot of the static members in definition order
    pub fn statics(&self) -> Vec<(String, Value)> {
        self.statics
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Create a new instance and run the constructor on it.
    pub fn instantiate(class: &Arc<ClassValue>, args: &[Value]) -> anyhow::Result<Value> {
        let mut instance = ObjectValue::instance_of(Arc::clone(class));
        if let Some(constructor) = &class.constructor {
            constructor(&mut instance, args)?;
        }
        Ok(Value::Object(ObjectRef::new(instance)))
    }
}

impl std::fmt::Debug for ClassValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassValue({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_is_checked() {
        let f = FunctionValue::with_arity("one", 1, |args, _| Ok(args[0].clone()));
        assert!(f.call(&[], &Value::Unit).is_err());
        assert_eq!(f.call(&[Value::Int(3)], &Value::Unit).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_instantiate_links_class() {
        let class = Arc::new(
            ClassValue::new("Point")
                .with_constructor(|this, args| {
                    this.set("x", args.first().cloned().unwrap_or(Value::Int(0)));
                    Ok(())
                })
                .with_method("x", |_, this| {
                    Ok(this.as_object().and_then(|o| o.get("x")).unwrap_or(Value::Unit))
                }),
        );
        let instance = ClassValue::instantiate(&class, &[Value::Int(5)]).unwrap();
        let object = instance.as_object().unwrap();
        assert_eq!(object.type_name(), Some("Point".to_string()));
        assert_eq!(object.get("x"), Some(Value::Int(5)));
        assert!(object.member("x").unwrap().is_callable());
    }

    #[test]
    fn test_statics_are_shared() {
        let class = Arc::new(ClassValue::new("Config").with_static("level", 1));
        let other = Arc::clone(&class);
        other.set_static("level", 2);
        assert_eq!(class.get_static("level"), Some(Value::Int(2)));
    }
}
