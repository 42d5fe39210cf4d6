//! Choice and detail resolution for flex widgets.
//!
//! Both resolvers first read every trigger field off the entity. If any of
//! them cannot be read (not set yet, or pointing at a record that does not
//! exist) the widget is "not ready": choices collapse to a single
//! placeholder and details to an empty string.

use super::choices::{Choice, ChoiceList, choices_from_records};
use super::config::FlexWidget;
use crate::core::{FlexError, Result};
use crate::model::{AttrError, Entity, Record};
use tracing::debug;

/// Checks that every trigger field can be read.
///
/// `Ok(false)` means some trigger data is missing; store failures propagate.
fn triggers_ready<S: AsRef<str>>(entity: &Entity, trigger_fields: &[S]) -> Result<bool> {
    for name in trigger_fields {
        match entity.attr(name.as_ref()) {
            Ok(_) => {}
            Err(err) if err.is_unreadable() => {
                debug!(model = %entity.schema().key(), field = name.as_ref(), reason = %err, "trigger field not readable");
                return Ok(false);
            }
            Err(err) => return Err(into_flex(err)),
        }
    }
    Ok(true)
}

fn into_flex(err: AttrError) -> FlexError {
    match err {
        AttrError::Store(inner) => inner,
        other => FlexError::InvalidInput(other.to_string()),
    }
}

/// Resolves the choice list for a base field.
pub fn resolve_choices<S, Q, E>(
    entity: &Entity,
    trigger_fields: &[S],
    query: Q,
    empty_text: E,
) -> Result<ChoiceList>
where
    S: AsRef<str>,
    Q: FnOnce(&Entity) -> Result<Vec<Record>>,
    E: FnOnce(&Entity) -> String,
{
    if !triggers_ready(entity, trigger_fields)? {
        return Ok(vec![Choice::placeholder(empty_text(entity))]);
    }
    let records = query(entity)?;
    Ok(choices_from_records(&records))
}

/// Resolves the details markup for the record currently referenced by `base_field`.
pub fn resolve_details<S, D>(
    entity: &Entity,
    base_field: &str,
    trigger_fields: &[S],
    details: D,
) -> Result<String>
where
    S: AsRef<str>,
    D: FnOnce(&Record, &Entity) -> String,
{
    if !triggers_ready(entity, trigger_fields)? {
        return Ok(String::new());
    }
    match entity.related(base_field) {
        Ok(related) => Ok(details(&related, entity)),
        Err(err) if err.is_unreadable() => Ok(String::new()),
        Err(err) => Err(into_flex(err)),
    }
}

/// `resolve_choices` driven by a widget's own callbacks.
pub fn choices_from_instance(entity: &Entity, widget: &dyn FlexWidget) -> Result<ChoiceList> {
    let triggers = widget.trigger_fields();
    resolve_choices(
        entity,
        triggers.as_slice(),
        |e| widget.queryset(e),
        |e| widget.empty_choices_text(e),
    )
}

/// `resolve_details` driven by a widget's own callbacks.
pub fn details_from_instance(
    entity: &Entity,
    base_field: &str,
    widget: &dyn FlexWidget,
) -> Result<String> {
    let triggers = widget.trigger_fields();
    resolve_details(entity, base_field, triggers.as_slice(), |related, e| {
        widget.details(related, e)
    })
}
