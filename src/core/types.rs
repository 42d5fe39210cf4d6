use super::{FlexError, Result, Value};
use crate::model::ModelKey;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
    Date,
}

impl DataType {
    /// Coerces a raw form string into this type.
    ///
    /// Blank input yields `Ok(None)`: the field carries no value. Anything
    /// that does not parse is a `TypeMismatch`.
    pub fn coerce(&self, raw: &str) -> Result<Option<Value>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let value = match self {
            Self::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.mismatch(raw))?,
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(|| self.mismatch(raw))?,
            Self::Text => Value::Text(raw.to_string()),
            Self::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Value::Boolean(true),
                "false" | "0" | "off" | "no" => Value::Boolean(false),
                _ => return Err(self.mismatch(raw)),
            },
            Self::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| self.mismatch(raw))?,
        };

        Ok(Some(value))
    }

    pub fn is_compatible(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::Integer, Value::Integer(_))
                | (Self::Float, Value::Float(_))
                | (Self::Float, Value::Integer(_))
                | (Self::Text, Value::Text(_))
                | (Self::Boolean, Value::Boolean(_))
                | (Self::Date, Value::Date(_))
        )
    }

    fn mismatch(&self, raw: &str) -> FlexError {
        FlexError::TypeMismatch(format!("'{}' is not a valid {}", raw, self))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Float => write!(f, "FLOAT"),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Date => write!(f, "DATE"),
        }
    }
}

/// One declared field of a record type.
///
/// A relation field stores the referenced record's primary key, so its
/// `data_type` is the primary key type of the target model.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub relation: Option<ModelKey>,
    pub primary_key: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            relation: None,
            primary_key: false,
        }
    }

    pub fn foreign_key(name: impl Into<String>, target: ModelKey, key_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type: key_type,
            relation: Some(target),
            primary_key: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn coerce(&self, raw: &str) -> Result<Option<Value>> {
        self.data_type.coerce(raw)
    }

    pub fn validate(&self, value: &Value) -> Result<()> {
        if !self.data_type.is_compatible(value) {
            return Err(FlexError::TypeMismatch(format!(
                "Field '{}' expects type {}, got {}",
                self.name,
                self.data_type,
                value.type_name()
            )));
        }
        Ok(())
    }
}
