//! Pipeline actions and their execution

use tracing::{debug, trace};

use crate::container::Container;
use crate::error::{type_name, ContainerError, Result};
use crate::value::{ClassValue, Value};

/// One step of a definition's pipeline.
///
/// Every argument may be a reference; arguments are resolved against the
/// container when the action runs, not when it is added.
#[derive(Debug, Clone)]
pub enum Action {
    /// Assign `value` to the property `prop`
    SetProp {
        /// Property name (string or reference to one)
        prop: Value,
        /// Value to assign
        value: Value,
    },

    /// Call the member `method` with the current value as its context
    CallMethod {
        /// Method name (string or reference to one)
        method: Value,
        /// Argument list (list or reference to one)
        args: Value,
    },

    /// Replace the current value, a class, with a new instance of it
    Construct {
        /// Constructor arguments (list or reference to one)
        args: Value,
    },

    /// Replace the current value, a callable, with its return value
    Call {
        /// Argument list (list or reference to one)
        args: Value,
        /// Call context
        context: Value,
    },

    /// Call `decorator(current, ...args, container)`; a non-unit result
    /// replaces the current value
    Decorate {
        /// The decorator (callable or reference to one)
        decorator: Value,
        /// Extra arguments (list or reference to one)
        args: Value,
        /// Call context
        context: Value,
    },

    /// Resolve every direct field of the current value that is a reference
    ResolveProps,
}

impl Action {
    /// The builder method that adds this action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetProp { .. } => "set_prop",
            Action::CallMethod { .. } => "call_method",
            Action::Construct { .. } => "construct",
            Action::Call { .. } => "call",
            Action::Decorate { .. } => "decorate",
            Action::ResolveProps => "resolve_props",
        }
    }

    /// Run this action on `value`, returning the value for the next step.
    pub(crate) fn apply(&self, value: Value, container: &Container) -> Result<Value> {
        if container.config().trace {
            debug!(action = self.name(), value = ?value, "Applying action");
        } else {
            trace!(action = self.name(), "Applying action");
        }

        match self {
            Action::SetProp { prop, value: prop_value } => {
                let key = property_key(&container.resolve_reference(prop)?)?;
                let prop_value = container.resolve_reference(prop_value)?;
                set_member(&value, key, prop_value)?;
                Ok(value)
            }

            Action::CallMethod { method, args } => {
                let method = container.resolve_reference(method)?;
                let Some(name) = method.as_str() else {
                    return Err(ContainerError::InvalidArgument(format!(
                        "method name must be a string, got {}",
                        type_name(&method)
                    )));
                };
                let args = resolve_args(container, args)?;

                match value.member(name) {
                    Some(member) if member.is_callable() => {
                        invoke(&member, &args, &value)?;
                        Ok(value)
                    }
                    _ => Err(ContainerError::InvalidOperation(format!(
                        "cannot call \"{}\" on {}",
                        name,
                        type_name(&value)
                    ))),
                }
            }

            Action::Construct { args } => {
                let args = resolve_args(container, args)?;
                match &value {
                    Value::Class(class) => ClassValue::instantiate(class, &args).map_err(|source| {
                        ContainerError::CallFailed {
                            name: class.name.clone(),
                            source,
                        }
                    }),
                    other => Err(ContainerError::InvalidOperation(format!(
                        "cannot construct {}",
                        type_name(other)
                    ))),
                }
            }

            Action::Call { args, context } => {
                let context = container.resolve_reference(context)?;
                let args = resolve_args(container, args)?;
                invoke(&value, &args, &context)
            }

            Action::Decorate {
                decorator,
                args,
                context,
            } => {
                let decorator = container.resolve_reference(decorator)?;
                let context = container.resolve_reference(context)?;
                let extra = resolve_args(container, args)?;

                let mut full = Vec::with_capacity(extra.len() + 2);
                full.push(value.clone());
                full.extend(extra);
                full.push(Value::Container(container.clone()));

                let decorated = invoke(&decorator, &full, &context)?;
                if decorated.is_unit() {
                    Ok(value)
                } else {
                    Ok(decorated)
                }
            }

            Action::ResolveProps => {
                resolve_props(&value, container)?;
                Ok(value)
            }
        }
    }
}

/// Call `callee` if it is invocable.
fn invoke(callee: &Value, args: &[Value], context: &Value) -> Result<Value> {
    match callee {
        Value::Function(func) => {
            func.call(args, context)
                .map_err(|source| ContainerError::CallFailed {
                    name: func.name().to_string(),
                    source,
                })
        }
        other => Err(ContainerError::InvalidOperation(format!(
            "{} is not callable",
            type_name(other)
        ))),
    }
}

/// Resolve an argument list: the list itself may be a reference, and so may
/// each of its elements. `Unit` stands for "no arguments".
fn resolve_args(container: &Container, args: &Value) -> Result<Vec<Value>> {
    match container.resolve_reference(args)? {
        Value::Unit => Ok(Vec::new()),
        Value::List(items) => items
            .iter()
            .map(|item| container.resolve_reference(item))
            .collect(),
        other => Err(ContainerError::InvalidArgument(format!(
            "arguments must be a list, got {}",
            type_name(&other)
        ))),
    }
}

fn property_key(prop: &Value) -> Result<String> {
    match prop {
        Value::String(s) => Ok(s.as_ref().clone()),
        Value::Int(n) => Ok(n.to_string()),
        other => Err(ContainerError::InvalidArgument(format!(
            "property name must be a string, got {}",
            type_name(other)
        ))),
    }
}

fn set_member(target: &Value, key: String, value: Value) -> Result<()> {
    match target {
        Value::Object(object) => {
            object.set(key, value);
            Ok(())
        }
        Value::Class(class) => {
            class.set_static(key, value);
            Ok(())
        }
        other => Err(ContainerError::InvalidOperation(format!(
            "cannot set property \"{}\" on {}",
            key,
            type_name(other)
        ))),
    }
}

/// Replace reference fields of an object (or statics of a class) in place.
///
/// Fields are snapshotted first so no lock is held while references resolve.
fn resolve_props(target: &Value, container: &Container) -> Result<()> {
    let fields = match target {
        Value::Object(object) => object.fields(),
        Value::Class(class) => class.statics(),
        other => {
            return Err(ContainerError::InvalidOperation(format!(
                "cannot resolve properties of {}",
                type_name(other)
            )))
        }
    };

    let mut resolved = Vec::new();
    for (name, field) in fields {
        if field.is_reference() {
            resolved.push((name, container.resolve_reference(&field)?));
        }
    }

    for (name, field) in resolved {
        set_member(target, name, field)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Reference;
    use crate::value::ObjectValue;

    #[test]
    fn test_resolve_args_accepts_unit_and_lists() {
        let container = Container::new();
        container.add("two", Value::Int(2)).unwrap();

        assert!(resolve_args(&container, &Value::Unit).unwrap().is_empty());
        let args = resolve_args(
            &container,
            &Value::list(vec![Value::Int(1), Reference::new("two").into()]),
        )
        .unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_resolve_args_rejects_scalars() {
        let container = Container::new();
        let err = resolve_args(&container, &Value::Int(1)).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidArgument(_)));
    }

    #[test]
    fn test_set_member_on_scalar_fails() {
        let err = set_member(&Value::Int(1), "x".to_string(), Value::Unit).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidOperation(_)));
    }

    #[test]
    fn test_invoke_non_callable_fails() {
        let err = invoke(&Value::object(ObjectValue::new()), &[], &Value::Unit).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidOperation(_)));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::ResolveProps.name(), "resolve_props");
        assert_eq!(Action::Construct { args: Value::Unit }.name(), "construct");
    }

    #[test]
    fn test_class_statics_can_be_set() {
        let class: Value = ClassValue::new("Settings").into();
        set_member(&class, "mode".to_string(), Value::string("fast")).unwrap();
        assert_eq!(class.member("mode"), Some(Value::string("fast")));
    }
}
