//! Static fields: a caller-owned table of named values.
//!
//! The VM holds no global state. Whoever runs frames creates a
//! [`StaticFields`], defines every field before dependent code runs, and
//! passes the table to each frame explicitly.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use opsem_common::{Kind, Value};
use thiserror::Error;

/// Errors from static field access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown static field '{0}'")]
    Unknown(String),

    #[error("static field '{name}' is {declared}, not {found}")]
    KindMismatch {
        name: String,
        declared: Kind,
        found: Kind,
    },
}

#[derive(Debug)]
struct Field {
    kind: Kind,
    value: Value,
}

/// Named static fields, each with a fixed declared kind.
///
/// Access goes through a lock so one table can be shared between frames
/// running on different threads. Each `get` or `put` is atomic on its own.
#[derive(Debug, Default)]
pub struct StaticFields {
    fields: RwLock<HashMap<String, Field>>,
}

impl StaticFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a field. Its kind is the initial value's kind.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        let field = Field {
            kind: value.kind(),
            value,
        };
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Result<Value, FieldError> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|f| f.value.clone())
            .ok_or_else(|| FieldError::Unknown(name.to_string()))
    }

    /// Replace a field's value. The value must have the declared kind.
    pub fn put(&self, name: &str, value: Value) -> Result<(), FieldError> {
        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        let field = fields
            .get_mut(name)
            .ok_or_else(|| FieldError::Unknown(name.to_string()))?;
        if field.kind != value.kind() {
            return Err(FieldError::KindMismatch {
                name: name.to_string(),
                declared: field.kind,
                found: value.kind(),
            });
        }
        field.value = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn define_get_put() {
        let statics = StaticFields::new();
        statics.define("i", Value::Int32(0));
        assert_eq!(statics.get("i"), Ok(Value::Int32(0)));
        statics.put("i", Value::Int32(1000)).unwrap();
        assert_eq!(statics.get("i"), Ok(Value::Int32(1000)));
        assert_eq!(statics.len(), 1);
    }

    #[test]
    fn unknown_field() {
        let statics = StaticFields::new();
        assert!(statics.is_empty());
        assert_eq!(statics.get("x"), Err(FieldError::Unknown("x".into())));
        assert_eq!(
            statics.put("x", Value::Int32(1)),
            Err(FieldError::Unknown("x".into()))
        );
    }

    #[test]
    fn put_checks_kind() {
        let statics = StaticFields::new();
        statics.define("l", Value::Int64(0));
        let err = statics.put("l", Value::Int32(1)).unwrap_err();
        assert_eq!(
            err,
            FieldError::KindMismatch {
                name: "l".into(),
                declared: Kind::Long,
                found: Kind::Int
            }
        );
        assert_eq!(err.to_string(), "static field 'l' is long, not int");
        assert_eq!(statics.get("l"), Ok(Value::Int64(0)));
    }

    #[test]
    fn shared_between_threads() {
        let statics = Arc::new(StaticFields::new());
        statics.define("n", Value::Int32(0));
        let handles: Vec<_> = (1..=4)
            .map(|i| {
                let statics = Arc::clone(&statics);
                thread::spawn(move || statics.put("n", Value::Int32(i)).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let n = statics.get("n").unwrap().as_i32().unwrap();
        assert!((1..=4).contains(&n));
    }
}
