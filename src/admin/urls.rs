//! Admin URL resolution: request path to record type and primary key.

use crate::core::{FlexError, Result};
use crate::model::ModelKey;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ADMIN_PATH: Regex = Regex::new(
        r"^/admin/(?P<namespace>[A-Za-z0-9_]+)/(?P<model>[A-Za-z0-9_]+)/(?:(?P<pk>[^/]+)/change|add)/?$"
    )
    .expect("admin path pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
    Add,
    Change,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub namespace: String,
    pub model: String,
    pub view: AdminView,
    pub pk: Option<String>,
}

impl ResolvedPath {
    pub fn model_key(&self) -> ModelKey {
        ModelKey::new(&self.namespace, &self.model)
    }

    /// Route name in `namespace_model_view` form.
    pub fn url_name(&self) -> String {
        let view = match self.view {
            AdminView::Add => "add",
            AdminView::Change => "change",
        };
        format!("{}_{}_{}", self.namespace, self.model, view).to_lowercase()
    }
}

/// Resolves an add or change page path; anything else is `None`.
pub fn resolve(path: &str) -> Option<ResolvedPath> {
    let caps = ADMIN_PATH.captures(path)?;
    let pk = caps.name("pk").map(|m| m.as_str().to_string());
    Some(ResolvedPath {
        namespace: caps["namespace"].to_string(),
        model: caps["model"].to_string(),
        view: if pk.is_some() {
            AdminView::Change
        } else {
            AdminView::Add
        },
        pk,
    })
}

pub fn resolve_or_err(path: &str) -> Result<ResolvedPath> {
    resolve(path).ok_or_else(|| FlexError::UnresolvedPath(path.to_string()))
}

pub fn add_url(model: &ModelKey) -> String {
    format!(
        "/admin/{}/{}/add/",
        model.namespace().to_lowercase(),
        model.name().to_lowercase()
    )
}

pub fn change_url(model: &ModelKey, pk: &str) -> String {
    format!(
        "/admin/{}/{}/{}/change/",
        model.namespace().to_lowercase(),
        model.name().to_lowercase(),
        pk
    )
}
