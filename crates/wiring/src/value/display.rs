//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),

            Value::String(s) => write!(f, "{:?}", s.as_ref()),

            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Object(o) => {
                // Held by a writer, e.g. a method mutating this object
                let Some(object) = o.try_read() else {
                    return write!(f, "<locked object>");
                };
                if let Some(name) = &object.type_name {
                    write!(f, "{} ", name)?;
                }
                write!(f, "{{")?;
                for (i, (k, v)) in object.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {:?}", k, v)?;
                }
                if object.fields.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }

            Value::Native(n) => write!(f, "<native {}>", n.type_name()),
            Value::Function(func) => write!(f, "<fn {}>", func.name()),
            Value::Class(c) => write!(f, "<class {}>", c.name),
            Value::Container(c) => write!(f, "<container of {}>", c.len()),

            Value::Reference(r) => write!(f, "Ref({:?})", r.address()),
            Value::ReferenceObject(r) => {
                write!(f, "RefObj {{")?;
                for (i, (k, v)) in r.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {:?}", k, v)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s.as_ref()), // No quotes for Display
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_object() {
        let value = Value::object(ObjectValue::named("Point").with_field("x", 1).with_field("y", 2));
        assert_eq!(format!("{:?}", value), "Point { x: 1, y: 2 }");
        assert_eq!(format!("{:?}", Value::empty_object()), "{}");
    }

    #[test]
    fn test_display_string_unquoted() {
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(format!("{:?}", Value::string("hi")), "\"hi\"");
    }

    #[test]
    fn test_debug_reference() {
        assert_eq!(format!("{:?}", Value::from(Reference::new("db"))), "Ref(\"db\")");
    }
}
