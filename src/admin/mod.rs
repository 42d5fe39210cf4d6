//! Admin registry: which record types are editable and which of their
//! fields render as flex widgets.

pub mod change_form;
pub mod urls;

use crate::core::{FlexError, Result};
use crate::model::ModelKey;
use crate::widget::{FIELD_CHANGED_URL, Media, WidgetConfig};
use std::collections::{BTreeMap, HashMap};

/// Admin options for one record type.
#[derive(Debug, Clone)]
pub struct ModelAdmin {
    model: ModelKey,
    widgets: BTreeMap<String, WidgetConfig>,
}

impl ModelAdmin {
    pub fn new(model: ModelKey) -> Self {
        Self {
            model,
            widgets: BTreeMap::new(),
        }
    }

    /// Binds a flex widget to its base field, replacing any previous binding.
    pub fn flex_widget(mut self, config: WidgetConfig) -> Self {
        self.widgets.insert(config.base_field().to_string(), config);
        self
    }

    pub fn model(&self) -> &ModelKey {
        &self.model
    }

    /// The widget bound to `field`.
    pub fn widget_for(&self, field: &str) -> Result<&WidgetConfig> {
        self.widgets
            .get(field)
            .ok_or_else(|| FlexError::WidgetNotConfigured(field.to_string(), self.model.label()))
    }
}

/// All registered model admins plus the settings their widgets share.
#[derive(Debug, Clone)]
pub struct AdminSite {
    registry: HashMap<ModelKey, ModelAdmin>,
    field_changed_url: String,
    media: Media,
}

impl AdminSite {
    pub fn new(media: Media) -> Self {
        Self {
            registry: HashMap::new(),
            field_changed_url: FIELD_CHANGED_URL.to_string(),
            media,
        }
    }

    /// Refresh URL written into every widget registered afterwards.
    pub fn with_field_changed_url(mut self, url: impl Into<String>) -> Self {
        self.field_changed_url = url.into();
        self
    }

    pub fn register(&mut self, admin: ModelAdmin) {
        let ModelAdmin { model, widgets } = admin;
        let widgets = widgets
            .into_iter()
            .map(|(field, config)| (field, config.with_url(&self.field_changed_url)))
            .collect();
        self.registry
            .insert(model.clone(), ModelAdmin { model, widgets });
    }

    pub fn model_admin(&self, model: &ModelKey) -> Result<&ModelAdmin> {
        self.registry
            .get(model)
            .ok_or_else(|| FlexError::NotRegistered(model.label()))
    }

    pub fn media(&self) -> &Media {
        &self.media
    }

    pub fn field_changed_url(&self) -> &str {
        &self.field_changed_url
    }
}
