use super::database::{Database, Record};
use super::registry::ModelSchema;
use crate::core::{FlexError, Value};
use crate::request::FormData;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Result of reading one attribute off an entity.
#[derive(Debug, Clone)]
pub enum Attr {
    Value(Value),
    Related(Record),
}

/// Why an attribute could not be read.
#[derive(Debug, Error)]
pub enum AttrError {
    /// Unknown field, or a field with no value on a partially-built entity.
    #[error("'{0}' is not set")]
    Missing(String),

    /// The field references a record that does not exist.
    #[error("{model} matching pk {pk} does not exist")]
    DoesNotExist { model: String, pk: String },

    #[error(transparent)]
    Store(#[from] FlexError),
}

impl AttrError {
    /// Missing data and dangling references both mean "not ready yet".
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Missing(_) | Self::DoesNotExist { .. })
    }
}

/// An in-memory, possibly partial, instance of a record type.
#[derive(Debug, Clone)]
pub struct Entity {
    schema: Arc<ModelSchema>,
    db: Arc<Database>,
    pk: Option<Value>,
    values: BTreeMap<String, Value>,
}

impl Entity {
    /// An entity with no values set, as on an empty add form.
    pub fn new(schema: Arc<ModelSchema>, db: Arc<Database>) -> Self {
        Self {
            schema,
            db,
            pk: None,
            values: BTreeMap::new(),
        }
    }

    pub fn from_record(record: Record, db: Arc<Database>) -> Self {
        let pk = Some(record.pk().clone());
        let values = record.values().clone();
        Self {
            schema: Arc::clone(record.schema()),
            db,
            pk,
            values,
        }
    }

    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn pk(&self) -> Option<&Value> {
        self.pk.as_ref()
    }

    pub fn is_persisted(&self) -> bool {
        self.pk.is_some()
    }

    /// The stored value of a field without resolving relations.
    pub fn raw(&self, field: &str) -> Option<&Value> {
        if field == self.schema.pk_field().name {
            return self.pk.as_ref();
        }
        self.values.get(field).filter(|v| !v.is_null())
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Reads an attribute, following relations into the record store.
    pub fn attr(&self, name: &str) -> Result<Attr, AttrError> {
        let field = self
            .schema
            .get_field(name)
            .ok_or_else(|| AttrError::Missing(name.to_string()))?;
        let value = self
            .raw(name)
            .cloned()
            .ok_or_else(|| AttrError::Missing(name.to_string()))?;

        let Some(target) = &field.relation else {
            return Ok(Attr::Value(value));
        };

        match self.db.get(target, &value)? {
            Some(record) => Ok(Attr::Related(record)),
            None => Err(AttrError::DoesNotExist {
                model: target.name().to_string(),
                pk: value.to_string(),
            }),
        }
    }

    /// Reads a relation field and returns the referenced record.
    pub fn related(&self, name: &str) -> Result<Record, AttrError> {
        match self.attr(name)? {
            Attr::Related(record) => Ok(record),
            Attr::Value(_) => Err(AttrError::Store(FlexError::TypeMismatch(format!(
                "'{}' on {} is not a relation",
                name,
                self.schema.key()
            )))),
        }
    }
}

/// Builds a partial entity from raw form strings.
///
/// Each raw value is coerced to its field's declared type. Unknown fields,
/// blank values and values that fail coercion are dropped. The primary key
/// is never taken from form data.
pub struct EntityBuilder {
    schema: Arc<ModelSchema>,
    db: Arc<Database>,
    values: BTreeMap<String, Value>,
    skipped: Vec<String>,
}

impl EntityBuilder {
    pub fn new(schema: Arc<ModelSchema>, db: Arc<Database>) -> Self {
        Self {
            schema,
            db,
            values: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Seeds the builder with every declared field present in `data`.
    pub fn from_post(schema: Arc<ModelSchema>, db: Arc<Database>, data: &FormData) -> Self {
        let names: Vec<String> = schema.fields().iter().map(|f| f.name.clone()).collect();
        names.iter().fold(Self::new(schema, db), |builder, name| {
            match data.get(name) {
                Some(raw) => builder.raw(name, raw),
                None => builder,
            }
        })
    }

    pub fn raw(mut self, name: &str, raw: &str) -> Self {
        let Some(field) = self.schema.get_field(name) else {
            return self;
        };
        if field.primary_key {
            return self;
        }

        match field.coerce(raw) {
            Ok(Some(value)) => {
                self.values.insert(name.to_string(), value);
            }
            Ok(None) => {}
            Err(err) => {
                debug!(model = %self.schema.key(), field = name, error = %err, "dropping field that failed coercion");
                self.skipped.push(name.to_string());
            }
        }
        self
    }

    /// Fields dropped because their raw value failed coercion.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn build(self) -> Entity {
        Entity {
            schema: self.schema,
            db: self.db,
            pk: None,
            values: self.values,
        }
    }
}
