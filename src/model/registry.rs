use crate::core::{DataType, Field, FlexError, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identifies a record type by `(namespace, name)`.
///
/// Comparison and hashing are case-insensitive; `name` keeps its declared
/// casing for display.
#[derive(Debug, Clone)]
pub struct ModelKey {
    namespace: String,
    name: String,
}

impl ModelKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased `namespace.name` label used in logs and error messages.
    pub fn label(&self) -> String {
        format!("{}.{}", self.namespace, self.name).to_lowercase()
    }
}

impl PartialEq for ModelKey {
    fn eq(&self, other: &Self) -> bool {
        self.namespace.eq_ignore_ascii_case(&other.namespace)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for ModelKey {}

impl Hash for ModelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.to_ascii_lowercase().hash(state);
        self.name.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Declared shape of a record type.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    key: ModelKey,
    fields: Vec<Field>,
    display_field: Option<String>,
}

impl ModelSchema {
    /// Starts a schema with an integer `id` primary key.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: ModelKey::new(namespace, name),
            fields: vec![Field::new("id", DataType::Integer).primary_key()],
            display_field: None,
        }
    }

    /// Adds a field. A field flagged as primary key replaces the current one.
    pub fn field(mut self, field: Field) -> Self {
        if field.primary_key {
            self.fields.retain(|f| !f.primary_key);
            self.fields.insert(0, field);
        } else {
            self.fields.retain(|f| f.name != field.name);
            self.fields.push(field);
        }
        self
    }

    /// Field whose value is the human-readable representation of a record.
    pub fn display_field(mut self, name: impl Into<String>) -> Self {
        self.display_field = Some(name.into());
        self
    }

    pub fn key(&self) -> &ModelKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Exact match first, then an ASCII case-insensitive one; identity keys
    /// carry lower-cased field names.
    pub fn lookup_field(&self, name: &str) -> Result<&Field> {
        self.get_field(name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| FlexError::FieldNotFound(name.to_string(), self.key.label()))
    }

    pub fn require_field(&self, name: &str) -> Result<&Field> {
        self.get_field(name)
            .ok_or_else(|| FlexError::FieldNotFound(name.to_string(), self.key.label()))
    }

    pub fn pk_field(&self) -> &Field {
        // `new` always seeds a primary key and `field` only ever swaps it.
        self.fields
            .iter()
            .find(|f| f.primary_key)
            .unwrap_or(&self.fields[0])
    }

    pub fn display_field_name(&self) -> Option<&str> {
        self.display_field.as_deref()
    }
}

/// Registry of record types, looked up by namespace and name.
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    models: HashMap<ModelKey, Arc<ModelSchema>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: ModelSchema) -> Arc<ModelSchema> {
        let schema = Arc::new(schema);
        self.models.insert(schema.key().clone(), Arc::clone(&schema));
        schema
    }

    pub fn get(&self, key: &ModelKey) -> Result<Arc<ModelSchema>> {
        self.models
            .get(key)
            .cloned()
            .ok_or_else(|| FlexError::ModelNotFound(key.label()))
    }

    pub fn get_model(&self, namespace: &str, name: &str) -> Result<Arc<ModelSchema>> {
        self.get(&ModelKey::new(namespace, name))
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_key_is_case_insensitive() {
        let mut registry = ModelRegistry::new();
        registry.register(ModelSchema::new("App", "Order"));

        let schema = registry.get_model("app", "ORDER").unwrap();
        assert_eq!(schema.name(), "Order");
        assert_eq!(schema.key().label(), "app.order");
    }

    #[test]
    fn test_unknown_model() {
        let registry = ModelRegistry::new();
        assert!(matches!(
            registry.get_model("app", "missing"),
            Err(FlexError::ModelNotFound(label)) if label == "app.missing"
        ));
    }

    #[test]
    fn test_primary_key_replacement() {
        let schema = ModelSchema::new("geo", "Country")
            .field(Field::new("code", DataType::Text).primary_key())
            .field(Field::new("name", DataType::Text));

        assert_eq!(schema.pk_field().name, "code");
        assert!(schema.get_field("id").is_none());
        assert_eq!(schema.fields().len(), 2);
    }

    #[test]
    fn test_lookup_field_ignores_case() {
        let schema = ModelSchema::new("app", "Shipment")
            .field(Field::new("shipCity", DataType::Integer))
            .field(Field::new("shipcity_note", DataType::Text));

        assert_eq!(schema.lookup_field("shipcity").unwrap().name, "shipCity");
        assert_eq!(schema.lookup_field("shipCity").unwrap().name, "shipCity");
        assert!(schema.require_field("shipcity").is_err());
        assert!(matches!(
            schema.lookup_field("ship_city"),
            Err(FlexError::FieldNotFound(field, model)) if field == "ship_city" && model == "app.shipment"
        ));
    }
}
