use super::AdminSite;
use super::urls::{self, AdminView};
use crate::core::Result;
use crate::model::Database;
use crate::reconstruct::reconstruct_entity;
use crate::request::FormRequest;
use crate::widget::html::escape;
use std::sync::Arc;

/// Renders the add or change form addressed by `request.path`.
///
/// Fields bound to a flex widget render through it; every other non-key
/// field renders as a text input holding the entity's current value.
/// The form has no submit control: it only carries the values the client
/// script posts to the refresh endpoint.
pub fn render_change_form(
    site: &AdminSite,
    db: &Arc<Database>,
    request: &FormRequest,
    username: &str,
) -> Result<String> {
    let resolved = urls::resolve_or_err(&request.path)?;
    let schema = db.schema(&resolved.model_key())?;
    let admin = site.model_admin(schema.key())?;
    let entity = reconstruct_entity(request, db)?;

    let mut rows = Vec::new();
    for field in schema.fields().iter().filter(|f| !f.primary_key) {
        let current = entity
            .raw(&field.name)
            .map(|v| v.to_form_value())
            .unwrap_or_default();
        let selected: Vec<&str> = if current.is_empty() {
            Vec::new()
        } else {
            vec![current.as_str()]
        };

        let control = match admin.widget_for(&field.name) {
            Ok(widget) => widget.render_for(&field.name, &selected, &entity)?,
            Err(_) => format!(
                "<input type=\"text\" name=\"{name}\" id=\"id_{name}\" value=\"{value}\">",
                name = escape(&field.name),
                value = escape(&current),
            ),
        };

        rows.push(format!(
            "<div class=\"form-row field-{name}\">\n<label for=\"id_{name}\">{name}</label>\n{control}\n</div>",
            name = escape(&field.name),
        ));
    }

    let title = match resolved.view {
        AdminView::Add => format!("Add {}", schema.name()),
        AdminView::Change => format!("Change {}", schema.name()),
    };

    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{title}</title>\n{media}\n</head>\n<body>\n<div id=\"user-tools\">Logged in as <strong>{user}</strong></div>\n<h1>{title}</h1>\n<form id=\"{form_id}_form\">\n{rows}\n</form>\n</body>\n</html>\n",
        title = escape(&title),
        media = site.media().render(),
        user = escape(username),
        form_id = escape(&schema.name().to_lowercase()),
        rows = rows.join("\n"),
    ))
}
