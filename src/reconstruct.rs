//! Rebuilds the entity a request is editing.

use crate::admin::urls;
use crate::core::{FlexError, Result, Value};
use crate::model::{Database, Entity, EntityBuilder, ModelSchema};
use crate::request::{FormData, FormRequest};
use crate::widget::IdentityKey;
use std::sync::Arc;
use tracing::debug;

/// Form key carrying a widget's identity key on refresh posts.
pub const HASHED_NAME: &str = "hashed_name";

/// Partial entity of `schema` built from posted values.
pub fn object_from_post(schema: Arc<ModelSchema>, db: Arc<Database>, data: &FormData) -> Entity {
    EntityBuilder::from_post(schema, db, data).build()
}

/// Resolves the entity for a render or refresh request.
///
/// A posted `hashed_name` names the record type directly. Otherwise the
/// admin path decides: a change page loads the stored record, an add page
/// builds a partial entity from whatever was posted.
pub fn reconstruct_entity(request: &FormRequest, db: &Arc<Database>) -> Result<Entity> {
    if let Some(hashed_name) = request.post.get(HASHED_NAME) {
        let schema = db.schema(&IdentityKey::model_prefix(hashed_name)?)?;
        return Ok(object_from_post(schema, Arc::clone(db), &request.post));
    }

    let resolved = urls::resolve_or_err(&request.path)?;
    let schema = db.schema(&resolved.model_key())?;

    match resolved.pk.as_deref().map(|raw| key_from_path(&schema, raw)) {
        Some(Some(pk)) => {
            let record = db.get(schema.key(), &pk)?.ok_or_else(|| FlexError::RecordNotFound {
                model: schema.name().to_string(),
                pk: pk.to_string(),
            })?;
            Ok(Entity::from_record(record, Arc::clone(db)))
        }
        _ => {
            debug!(path = %request.path, "no usable primary key in path, building from post");
            Ok(object_from_post(schema, Arc::clone(db), &request.post))
        }
    }
}

fn key_from_path(schema: &ModelSchema, raw: &str) -> Option<Value> {
    schema.pk_field().coerce(raw).ok().flatten()
}
