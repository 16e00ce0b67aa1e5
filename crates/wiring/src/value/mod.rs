//! Value representation for everything a container stores, passes and returns

mod callable;
mod display;
mod impls;
mod native;
mod object;

pub use callable::{ClassValue, ConstructorPtr, FunctionValue, Invocable, NativeFnPtr};
pub use native::NativeValue;
pub use object::{ObjectRef, ObjectValue};

use std::sync::Arc;

use crate::container::Container;
use crate::reference::{Reference, ReferenceObject};

/// Runtime value representation for the container.
///
/// Values are organized into four tiers:
/// - Tier 1: Inline scalars (no allocation)
/// - Tier 2: Shared structures (`Arc`-wrapped; objects are mutable and keep identity)
/// - Tier 3: Invocable and constructible types
/// - Tier 4: Addressing (references into a container, and containers themselves)
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// The "no value" sentinel
    Unit,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Shared Structures
    // ═══════════════════════════════════════════════════════════════════
    /// Heap-allocated string
    String(Arc<String>),

    /// Ordered sequence, used for argument lists and array fields
    List(Arc<Vec<Value>>),

    /// Mutable structural mapping with identity
    Object(ObjectRef),

    /// Opaque Rust value
    Native(NativeValue),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Invocable Types
    // ═══════════════════════════════════════════════════════════════════
    /// Anything that can be called with arguments and a context
    Function(Arc<dyn Invocable>),

    /// A constructor type with instance methods and static members
    Class(Arc<ClassValue>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 4: Addressing
    // ═══════════════════════════════════════════════════════════════════
    /// A container handle
    Container(Container),

    /// Pointer to whatever is registered at an address
    Reference(Reference),

    /// Structural reference resolved field by field
    ReferenceObject(Arc<ReferenceObject>),
}
