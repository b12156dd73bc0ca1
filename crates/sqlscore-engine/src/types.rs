//! Row and scalar value types shared across engines.

use std::hash::{Hash, Hasher};

/// One result row: a tuple of scalar values.
pub type Row = Vec<Value>;

/// A scalar cell value, following the SQLite storage classes.
///
/// `Value` implements `Eq` and `Hash` so that whole rows can be collected
/// into hash sets for order- and duplicate-insensitive comparison. `Real`
/// uses the underlying bit pattern for equality and hashing; two results
/// that print the same float compare equal, and NaN equals NaN.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Integer(v) => v.hash(state),
            Value::Real(v) => v.to_bits().hash(state),
            Value::Text(v) => v.hash(state),
            Value::Blob(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Blob(v) => write!(f, "<blob {} bytes>", v.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rows_collect_into_sets() {
        let rows: Vec<Row> = vec![
            vec![Value::Integer(1), Value::Text("a".to_string())],
            vec![Value::Integer(1), Value::Text("a".to_string())],
            vec![Value::Null, Value::Real(0.5)],
        ];

        let set: HashSet<Row> = rows.into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_real_compares_by_bits() {
        assert_eq!(Value::Real(1.5), Value::Real(1.5));
        assert_ne!(Value::Real(1.5), Value::Real(1.6));
        assert_eq!(Value::Real(f64::NAN), Value::Real(f64::NAN));
    }

    #[test]
    fn test_cross_type_values_are_distinct() {
        assert_ne!(Value::Integer(1), Value::Real(1.0));
        assert_ne!(Value::Null, Value::Integer(0));
    }
}
