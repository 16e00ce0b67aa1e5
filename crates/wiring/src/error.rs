//! Error types for container operations

use thiserror::Error;

use crate::value::Value;

/// A cyclic reference chain found while resolving an address.
///
/// `address_chain` lists every address on the resolution path in the order it
/// was entered, ending with the address that closed the cycle.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ReferenceRecursionError {
    /// Human-readable description
    pub message: String,

    /// The resolution path, including the repeated address
    pub address_chain: Vec<String>,
}

impl ReferenceRecursionError {
    /// Build an error from the active stack and the address that was seen twice.
    pub fn new(stack: &[String], repeated: &str) -> Self {
        let mut address_chain = stack.to_vec();
        address_chain.push(repeated.to_string());
        Self::from_chain(address_chain)
    }

    /// Build an error from a complete chain whose last address is the repeated one.
    pub fn from_chain(address_chain: Vec<String>) -> Self {
        let repeated = address_chain.last().cloned().unwrap_or_default();
        Self {
            message: format!(
                "Recursion detected while resolving reference address \"{}\": {}",
                repeated,
                address_chain.join(" -> ")
            ),
            address_chain,
        }
    }
}

/// Main error type for container operations
#[derive(Error, Debug)]
pub enum ContainerError {
    /// An argument was missing, empty or of the wrong kind
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The address is already registered in this container
    #[error("A definition for \"{address}\" has already been created")]
    DuplicateAddress {
        /// The duplicated address
        address: String,
    },

    /// The address is registered neither here nor in any parent
    #[error("A definition for \"{address}\" does not exist")]
    AddressNotFound {
        /// The missing address
        address: String,
    },

    /// A reference cycle was found
    #[error(transparent)]
    ReferenceRecursion(#[from] ReferenceRecursionError),

    /// A pipeline action was added after the definition produced a value
    #[error("Cannot call \"{action}\" after definition has been resolved")]
    FrozenDefinition {
        /// The builder method that was rejected
        action: &'static str,
    },

    /// A value was used in a way it does not support
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A user-supplied callable or constructor failed
    #[error("Call to `{name}` failed: {source}")]
    CallFailed {
        /// Name of the callable
        name: String,
        /// The error it returned
        #[source]
        source: anyhow::Error,
    },

    /// Resolution nested deeper than the configured limit
    #[error("Resolution depth exceeded: {depth} (max {max})")]
    DepthExceeded {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },
}

impl ContainerError {
    /// The address chain, if this is a recursion error.
    pub fn address_chain(&self) -> Option<&[String]> {
        match self {
            ContainerError::ReferenceRecursion(e) => Some(&e.address_chain),
            _ => None,
        }
    }
}

/// Result type alias for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;

/// A short name for the kind of a value, used in error messages.
pub fn type_name(value: &Value) -> String {
    match value {
        Value::Unit => "()".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Int(_) => "i64".to_string(),
        Value::Float(_) => "f64".to_string(),
        Value::String(_) => "String".to_string(),
        Value::List(_) => "list".to_string(),
        Value::Object(o) => match o.type_name() {
            Some(name) => name,
            None => "object".to_string(),
        },
        Value::Function(f) => format!("fn {}", f.name()),
        Value::Class(c) => format!("class {}", c.name),
        Value::Native(n) => n.type_name().to_string(),
        Value::Container(_) => "Container".to_string(),
        Value::Reference(_) => "Reference".to_string(),
        Value::ReferenceObject(_) => "ReferenceObject".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursion_error_appends_repeated_address() {
        let stack = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let err = ReferenceRecursionError::new(&stack, "a");
        assert_eq!(err.address_chain, vec!["a", "b", "c", "a"]);
        assert!(err.message.contains("a -> b -> c -> a"));
    }

    #[test]
    fn test_recursion_error_is_transparent() {
        let err: ContainerError = ReferenceRecursionError::new(&["x".to_string()], "x").into();
        assert!(err.to_string().starts_with("Recursion detected"));
        assert_eq!(
            err.address_chain(),
            Some(&["x".to_string(), "x".to_string()][..])
        );
    }

    #[test]
    fn test_frozen_definition_message() {
        let err = ContainerError::FrozenDefinition { action: "set_prop" };
        assert_eq!(
            err.to_string(),
            "Cannot call \"set_prop\" after definition has been resolved"
        );
    }

    #[test]
    fn test_type_name_scalars() {
        assert_eq!(type_name(&Value::Unit), "()");
        assert_eq!(type_name(&Value::Int(1)), "i64");
        assert_eq!(type_name(&Value::string("x")), "String");
    }
}
