//! Typed attribute values
//!
//! A value has a format (scalar, vector, matrix), an element type and a
//! payload. Numeric payloads are wrapped in a [`Quantity`] with an
//! explicit unit; boolean and string payloads are plain nested sequences.

use serde::{Deserialize, Serialize};
use std::fmt;
use tabattr_io::format_float;

/// Unit tag of plain numbers
pub const DIMENSIONLESS: &str = "dimensionless";

/// Dimensionality of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Scalar,
    Vector,
    Matrix,
}

/// Element type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    String,
}

/// Values arranged as 0D, 1D or 2D (row-major) data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shaped<T> {
    Scalar(T),
    Vector(Vec<T>),
    Matrix(Vec<Vec<T>>),
}

impl<T> Shaped<T> {
    pub fn format(&self) -> DataFormat {
        match self {
            Shaped::Scalar(_) => DataFormat::Scalar,
            Shaped::Vector(_) => DataFormat::Vector,
            Shaped::Matrix(_) => DataFormat::Matrix,
        }
    }

    fn write_with(
        &self,
        f: &mut fmt::Formatter<'_>,
        item: impl Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        let list = |f: &mut fmt::Formatter<'_>, values: &[T]| -> fmt::Result {
            write!(f, "[")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                item(value, f)?;
            }
            write!(f, "]")
        };

        match self {
            Shaped::Scalar(value) => item(value, f),
            Shaped::Vector(values) => list(f, values.as_slice()),
            Shaped::Matrix(rows) => {
                write!(f, "[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    list(f, row.as_slice())?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Numeric payload of a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Magnitude {
    Integer(Shaped<i64>),
    Float(Shaped<f64>),
}

impl Magnitude {
    pub fn format(&self) -> DataFormat {
        match self {
            Magnitude::Integer(values) => values.format(),
            Magnitude::Float(values) => values.format(),
        }
    }
}

/// A numeric value with a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub magnitude: Magnitude,
    pub unit: String,
}

impl Quantity {
    pub fn dimensionless(magnitude: Magnitude) -> Self {
        Self {
            magnitude,
            unit: DIMENSIONLESS.to_string(),
        }
    }
}

/// Payload of a typed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrValue {
    Quantity(Quantity),
    Boolean(Shaped<bool>),
    String(Shaped<String>),
}

/// A shaped value with its declared element type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub format: DataFormat,
    pub dtype: DataType,
    pub value: AttrValue,
}

impl TypedValue {
    pub fn boolean(values: Shaped<bool>) -> Self {
        Self {
            format: values.format(),
            dtype: DataType::Boolean,
            value: AttrValue::Boolean(values),
        }
    }

    pub fn integer(values: Shaped<i64>) -> Self {
        Self {
            format: values.format(),
            dtype: DataType::Integer,
            value: AttrValue::Quantity(Quantity::dimensionless(Magnitude::Integer(values))),
        }
    }

    pub fn float(values: Shaped<f64>) -> Self {
        Self {
            format: values.format(),
            dtype: DataType::Float,
            value: AttrValue::Quantity(Quantity::dimensionless(Magnitude::Float(values))),
        }
    }

    pub fn string(values: Shaped<String>) -> Self {
        Self {
            format: values.format(),
            dtype: DataType::String,
            value: AttrValue::String(values),
        }
    }

    /// The quantity wrapper of numeric values
    pub fn quantity(&self) -> Option<&Quantity> {
        match &self.value {
            AttrValue::Quantity(q) => Some(q),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AttrValue::Quantity(q) => {
                match &q.magnitude {
                    Magnitude::Integer(v) => v.write_with(f, |x, f| write!(f, "{}", x))?,
                    Magnitude::Float(v) => {
                        v.write_with(f, |x, f| write!(f, "{}", format_float(*x)))?
                    }
                }
                write!(f, " {}", q.unit)
            }
            AttrValue::Boolean(v) => v.write_with(f, |b, f| write!(f, "{}", b)),
            AttrValue::String(v) => v.write_with(f, |s, f| write!(f, "{:?}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_track_format() {
        let value = TypedValue::integer(Shaped::Vector(vec![1, 2, 3]));
        assert_eq!(value.format, DataFormat::Vector);
        assert_eq!(value.dtype, DataType::Integer);
        assert_eq!(value.quantity().map(|q| q.unit.as_str()), Some("dimensionless"));

        let value = TypedValue::string(Shaped::Scalar("a".to_string()));
        assert_eq!(value.format, DataFormat::Scalar);
        assert!(value.quantity().is_none());
    }

    #[test]
    fn test_display() {
        let value = TypedValue::float(Shaped::Matrix(vec![vec![1.0, 1.2], vec![2.0, 3.4]]));
        assert_eq!(value.to_string(), "[[1.0, 1.2], [2.0, 3.4]] dimensionless");

        let value = TypedValue::string(Shaped::Vector(vec!["a".into(), "b".into()]));
        assert_eq!(value.to_string(), r#"["a", "b"]"#);

        let value = TypedValue::boolean(Shaped::Scalar(true));
        assert_eq!(value.to_string(), "true");
    }

    #[test]
    fn test_json_shape() {
        let value = TypedValue::integer(Shaped::Vector(vec![1, 2, 3]));
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["format"], "vector");
        assert_eq!(json["dtype"], "integer");
        assert_eq!(json["value"]["quantity"]["magnitude"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["value"]["quantity"]["unit"], "dimensionless");
    }
}
