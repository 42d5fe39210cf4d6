use super::registry::{ModelKey, ModelRegistry, ModelSchema};
use crate::core::{DataType, FlexError, Result, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

/// A persisted record: primary key plus the values of its other fields.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<ModelSchema>,
    pk: Value,
    values: BTreeMap<String, Value>,
}

impl Record {
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    pub fn model(&self) -> &ModelKey {
        self.schema.key()
    }

    pub fn pk(&self) -> &Value {
        &self.pk
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == self.schema.pk_field().name {
            return Some(&self.pk);
        }
        self.values.get(field)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

/// Human-readable representation: the display field, or `"{Model} object ({pk})"`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self
            .schema
            .display_field_name()
            .and_then(|name| self.get(name))
        {
            Some(value) if !value.is_null() => write!(f, "{}", value),
            _ => write!(f, "{} object ({})", self.schema.name(), self.pk),
        }
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,
    next_id: i64,
}

/// In-memory record store over a fixed `ModelRegistry`.
///
/// Rows keep insertion order, which is the natural order of every query.
#[derive(Debug)]
pub struct Database {
    registry: ModelRegistry,
    tables: RwLock<HashMap<ModelKey, Table>>,
}

impl Database {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn schema(&self, key: &ModelKey) -> Result<Arc<ModelSchema>> {
        self.registry.get(key)
    }

    /// Inserts a record, assigning the next integer primary key when none is given.
    pub fn insert<I, K>(&self, key: &ModelKey, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let schema = self.registry.get(key)?;
        let pk_name = schema.pk_field().name.clone();

        let mut pk = None;
        let mut row = BTreeMap::new();
        for (name, value) in values {
            let name = name.into();
            let field = schema.require_field(&name)?;
            field.validate(&value)?;
            if name == pk_name {
                pk = Some(value);
            } else {
                row.insert(name, value);
            }
        }

        let mut tables = self.tables.write()?;
        let table = tables.entry(schema.key().clone()).or_default();

        let pk = match pk {
            Some(pk) if !pk.is_null() => pk,
            _ if schema.pk_field().data_type == DataType::Integer => {
                let id = table.next_id.checked_add(1).ok_or_else(|| {
                    FlexError::InvalidInput(format!("{} has exhausted its integer ids", schema.key()))
                })?;
                Value::Integer(id)
            }
            _ => {
                return Err(FlexError::InvalidInput(format!(
                    "{} requires an explicit primary key",
                    schema.key()
                )));
            }
        };

        if table.rows.iter().any(|r| r.pk == pk) {
            return Err(FlexError::InvalidInput(format!(
                "{} with pk {} already exists",
                schema.key(),
                pk
            )));
        }
        if let Value::Integer(id) = pk {
            table.next_id = table.next_id.max(id);
        }

        let record = Record {
            schema,
            pk,
            values: row,
        };
        table.rows.push(record.clone());
        Ok(record)
    }

    pub fn get(&self, key: &ModelKey, pk: &Value) -> Result<Option<Record>> {
        let tables = self.tables.read()?;
        Ok(tables
            .get(key)
            .and_then(|t| t.rows.iter().find(|r| &r.pk == pk))
            .cloned())
    }

    pub fn all(&self, key: &ModelKey) -> Result<Vec<Record>> {
        self.registry.get(key)?;
        let tables = self.tables.read()?;
        Ok(tables.get(key).map(|t| t.rows.clone()).unwrap_or_default())
    }

    /// Records whose `field` equals `value`, in insertion order.
    pub fn filter(&self, key: &ModelKey, field: &str, value: &Value) -> Result<Vec<Record>> {
        self.registry.get(key)?.require_field(field)?;
        let tables = self.tables.read()?;
        Ok(tables
            .get(key)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|r| r.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn delete(&self, key: &ModelKey, pk: &Value) -> Result<bool> {
        let mut tables = self.tables.write()?;
        let Some(table) = tables.get_mut(key) else {
            return Ok(false);
        };
        let before = table.rows.len();
        table.rows.retain(|r| &r.pk != pk);
        Ok(table.rows.len() != before)
    }
}
