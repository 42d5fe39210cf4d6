use super::choices::Choice;
use super::config::{SelectKind, WidgetConfig};
use super::html::{escape, flatten_attrs};
use crate::core::Result;
use crate::model::{Database, Entity};
use crate::reconstruct::reconstruct_entity;
use crate::request::FormRequest;
use serde::Serialize;
use std::sync::Arc;

/// Client registry entry emitted next to each rendered widget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptEntry<'a> {
    base_field: &'a str,
    trigger_fields: Vec<String>,
    url: &'a str,
}

/// `<option>` markup for `choices`, marking every value in `selected`.
pub fn render_options<S: AsRef<str>>(choices: &[Choice], selected: &[S]) -> String {
    choices
        .iter()
        .map(|choice| {
            let is_selected = selected.iter().any(|s| s.as_ref() == choice.value);
            format!(
                "<option value=\"{}\"{}>{}</option>",
                escape(&choice.value),
                if is_selected { " selected" } else { "" },
                escape(&choice.label),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl WidgetConfig {
    /// Renders the widget for the entity the request describes.
    ///
    /// Output is the select control, the client registry script and the
    /// details container, in that order.
    pub fn render<S: AsRef<str>>(
        &self,
        name: &str,
        value: &[S],
        request: &FormRequest,
        db: &Arc<Database>,
    ) -> Result<String> {
        let entity = reconstruct_entity(request, db)?;
        self.render_for(name, value, &entity)
    }

    /// Renders the widget against an already reconstructed entity.
    pub fn render_for<S: AsRef<str>>(
        &self,
        name: &str,
        value: &[S],
        entity: &Entity,
    ) -> Result<String> {
        let choices = self.choices(entity)?;
        let details = self.details(entity)?;

        Ok([
            self.render_select(name, &choices, value),
            self.build_js()?,
            "<span class=\"flexselect_details\">".to_string(),
            details,
            "</span>".to_string(),
        ]
        .concat())
    }

    pub fn render_select<S: AsRef<str>>(&self, name: &str, choices: &[Choice], value: &[S]) -> String {
        let mut attrs = self.attrs().clone();
        attrs
            .entry("id".to_string())
            .or_insert_with(|| format!("id_{name}"));
        attrs.insert("name".to_string(), name.to_string());
        if self.kind() == SelectKind::Multiple {
            attrs.insert("multiple".to_string(), String::new());
        }

        format!(
            "<select{}>\n{}\n</select>",
            flatten_attrs(&attrs),
            render_options(choices, value)
        )
    }

    /// Script registering this widget under `flexselect.fields.<identity key>`.
    pub fn build_js(&self) -> Result<String> {
        let entry = ScriptEntry {
            base_field: self.base_field(),
            trigger_fields: self.trigger_fields(),
            url: self.url(),
        };
        // `</` inside the JSON would close the script element early.
        let payload = serde_json::to_string(&entry)?.replace("</", "<\\/");

        Ok(format!(
            "\n<script>\n    var flexselect = flexselect || {{}};\n    flexselect.fields = flexselect.fields || {{}};\n    flexselect.fields.{} = {};\n</script>",
            self.identity_key(),
            payload
        ))
    }
}
