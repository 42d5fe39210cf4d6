use super::choices::ChoiceList;
use super::resolver::{choices_from_instance, details_from_instance};
use crate::core::{FlexError, Result};
use crate::model::{Entity, ModelKey, Record};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Route the client script posts trigger changes to.
pub const FIELD_CHANGED_URL: &str = "/flexselect/field_changed";

/// Callbacks a flex widget supplies for its base field.
pub trait FlexWidget: Send + Sync {
    /// Fields whose change refreshes the base field, in declaration order.
    fn trigger_fields(&self) -> Vec<String>;

    /// Markup shown next to the control for the selected related record.
    ///
    /// The returned string is embedded verbatim; implementations escape
    /// whatever they interpolate.
    fn details(&self, related: &Record, entity: &Entity) -> String;

    /// Related records offered as choices once every trigger field is set.
    fn queryset(&self, entity: &Entity) -> Result<Vec<Record>>;

    /// Label of the single placeholder choice shown while trigger data is missing.
    fn empty_choices_text(&self, entity: &Entity) -> String;
}

/// Replaces choice resolution entirely; receives only the entity.
pub type ChoiceFunction = Arc<dyn Fn(&Entity) -> Result<ChoiceList> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    Single,
    Multiple,
}

/// Parsed `namespace__model__field` dispatch key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityKey {
    pub namespace: String,
    pub model: String,
    pub field: String,
}

impl IdentityKey {
    pub const SEPARATOR: &'static str = "__";

    pub fn new(model: &ModelKey, field: &str) -> Self {
        Self {
            namespace: model.namespace().to_lowercase(),
            model: model.name().to_lowercase(),
            field: field.to_lowercase(),
        }
    }

    /// Parses a hashed name that must have exactly three segments.
    pub fn parse(hashed_name: &str) -> Result<Self> {
        let parts: Vec<&str> = hashed_name.split(Self::SEPARATOR).collect();
        match parts.as_slice() {
            [namespace, model, field] => Ok(Self {
                namespace: namespace.to_string(),
                model: model.to_string(),
                field: field.to_string(),
            }),
            _ => Err(FlexError::MalformedHashedName(hashed_name.to_string())),
        }
    }

    /// Model key from the first two segments; extra segments are ignored.
    pub fn model_prefix(hashed_name: &str) -> Result<ModelKey> {
        let mut parts = hashed_name.split(Self::SEPARATOR);
        match (parts.next(), parts.next()) {
            (Some(namespace), Some(model)) => Ok(ModelKey::new(namespace, model)),
            _ => Err(FlexError::MalformedHashedName(hashed_name.to_string())),
        }
    }

    pub fn model_key(&self) -> ModelKey {
        ModelKey::new(&self.namespace, &self.model)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.namespace,
            self.model,
            self.field,
            sep = Self::SEPARATOR
        )
    }
}

/// Flex widget bound to one base field of one record type.
#[derive(Clone)]
pub struct WidgetConfig {
    model: ModelKey,
    base_field: String,
    kind: SelectKind,
    url: String,
    attrs: BTreeMap<String, String>,
    widget: Arc<dyn FlexWidget>,
    choice_function: Option<ChoiceFunction>,
}

impl WidgetConfig {
    pub fn select(model: ModelKey, base_field: impl Into<String>, widget: Arc<dyn FlexWidget>) -> Self {
        Self {
            model,
            base_field: base_field.into(),
            kind: SelectKind::Single,
            url: FIELD_CHANGED_URL.to_string(),
            attrs: BTreeMap::new(),
            widget,
            choice_function: None,
        }
    }

    pub fn select_multiple(
        model: ModelKey,
        base_field: impl Into<String>,
        widget: Arc<dyn FlexWidget>,
    ) -> Self {
        Self {
            kind: SelectKind::Multiple,
            ..Self::select(model, base_field, widget)
        }
    }

    pub fn with_choice_function<F>(mut self, f: F) -> Self
    where
        F: Fn(&Entity) -> Result<ChoiceList> + Send + Sync + 'static,
    {
        self.choice_function = Some(Arc::new(f));
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn model(&self) -> &ModelKey {
        &self.model
    }

    pub fn base_field(&self) -> &str {
        &self.base_field
    }

    pub fn kind(&self) -> SelectKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn widget(&self) -> &dyn FlexWidget {
        self.widget.as_ref()
    }

    pub fn trigger_fields(&self) -> Vec<String> {
        self.widget.trigger_fields()
    }

    /// Lower-cased `namespace__model__field`; keys the client registry and refresh dispatch.
    pub fn identity_key(&self) -> String {
        IdentityKey::new(&self.model, &self.base_field).to_string()
    }

    /// Choices for `entity`: the override function if configured, otherwise the resolver.
    pub fn choices(&self, entity: &Entity) -> Result<ChoiceList> {
        match &self.choice_function {
            Some(choice_function) => choice_function(entity),
            None => choices_from_instance(entity, self.widget.as_ref()),
        }
    }

    pub fn details(&self, entity: &Entity) -> Result<String> {
        details_from_instance(entity, &self.base_field, self.widget.as_ref())
    }
}

impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("model", &self.model)
            .field("base_field", &self.base_field)
            .field("kind", &self.kind)
            .field("url", &self.url)
            .field("trigger_fields", &self.widget.trigger_fields())
            .field("choice_function", &self.choice_function.is_some())
            .finish()
    }
}
