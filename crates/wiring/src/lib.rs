//! # Wiring
//!
//! A dependency-injection container with lazily resolved definitions.
//!
//! A [`Container`] maps addresses to entries. An entry is a plain value, a
//! [`Reference`] to another address, a [`ReferenceObject`] whose fields are
//! references, or a [`Definition`]: a value plus a declarative pipeline
//! (construct, call, call a method, set a property, decorate, resolve
//! properties) that runs the first time the address is requested.
//!
//! ## Architecture
//!
//! - **Values**: a dynamic [`Value`] model with shared, mutable objects and
//!   invocable functions and classes
//! - **References**: address pointers, resolved on demand with cycle detection
//! - **Definitions**: singleton or factory resolution through an action pipeline
//! - **Containers**: registries with multi-parent inheritance
//!
//! ## Example
//!
//! ```
//! use wiring::{Container, Def, Ref, Value};
//!
//! let container = Container::new();
//! container.add("name", Value::string("db")).unwrap();
//! container
//!     .add("config", Def::new(Value::empty_object()))
//!     .unwrap()
//!     .set_prop("name", Ref::new("name"))
//!     .unwrap();
//!
//! let config = container.get("config").unwrap();
//! assert_eq!(config.member("name"), Some(Value::string("db")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod container;
pub mod definition;
pub mod error;
pub mod reference;
pub mod value;

// Re-export main types
pub use config::{ContainerConfig, DefinitionOptions};
pub use container::{Container, Entry};
pub use definition::{Action, Definition};
pub use error::{ContainerError, ReferenceRecursionError, Result};
pub use reference::{Reference, ReferenceObject};
pub use value::{
    ClassValue, ConstructorPtr, FunctionValue, Invocable, NativeFnPtr, NativeValue, ObjectRef,
    ObjectValue, Value,
};

/// Short alias for [`Definition`]
pub type Def = Definition;

/// Short alias for [`Reference`]
pub type Ref = Reference;

/// Short alias for [`ReferenceObject`]
pub type RefObj = ReferenceObject;

/// Wiring version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
