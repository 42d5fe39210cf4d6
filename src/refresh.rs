//! The field-changed round trip, independent of the HTTP layer.

use crate::admin::AdminSite;
use crate::core::{FlexError, Result};
use crate::model::{Database, Entity};
use crate::reconstruct::{HASHED_NAME, object_from_post};
use crate::request::FormData;
use crate::widget::{IdentityKey, render_options};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Form key asking for fresh `<option>` markup.
pub const INCLUDE_OPTIONS: &str = "include_options";

/// JSON body returned to the client script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshEnvelope {
    /// `None` when the client asked for details only.
    pub options: Option<String>,
    pub details: String,
}

/// Recomputes options and details for the widget named by the posted `hashed_name`.
pub fn field_changed(site: &AdminSite, db: &Arc<Database>, data: &FormData) -> Result<RefreshEnvelope> {
    let hashed_name = data
        .get(HASHED_NAME)
        .ok_or_else(|| FlexError::InvalidInput(format!("'{HASHED_NAME}' is required")))?;
    let key = IdentityKey::parse(hashed_name)?;
    let include_options = include_options(data)?;

    let schema = db.schema(&key.model_key())?;
    let entity = object_from_post(Arc::clone(&schema), Arc::clone(db), data);

    let base_field = schema.lookup_field(&key.field)?.name.clone();
    let widget = site.model_admin(schema.key())?.widget_for(&base_field)?;

    debug!(widget = %key, include_options, "field changed");

    let options = if include_options {
        let choices = widget.choices(&entity)?;
        Some(render_options(&choices, &selected_value(&entity, &base_field)))
    } else {
        None
    };

    Ok(RefreshEnvelope {
        options,
        details: widget.details(&entity)?,
    })
}

/// `include_options` is an integer flag; absent means false.
fn include_options(data: &FormData) -> Result<bool> {
    match data.get(INCLUDE_OPTIONS) {
        None => Ok(false),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(|flag| flag != 0)
            .map_err(|_| {
                FlexError::InvalidInput(format!("'{INCLUDE_OPTIONS}' must be an integer, got '{raw}'"))
            }),
    }
}

/// Key of the record the base field currently references, if it resolves.
fn selected_value(entity: &Entity, base_field: &str) -> Vec<String> {
    entity
        .related(base_field)
        .map(|record| vec![record.pk().to_form_value()])
        .unwrap_or_default()
}
