//! Dependent select widgets for admin forms.
//!
//! When an editor changes a trigger field, the base field's choices and its
//! details panel are recomputed server-side and swapped in by the client.
//!
//! # Examples
//!
//! ```
//! use flexselect::demo;
//! use flexselect::request::FormData;
//! use flexselect::config::FlexSelectConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = demo::database()?;
//! let site = demo::admin_site(&FlexSelectConfig::default());
//!
//! let post = FormData::new()
//!     .with("hashed_name", "app__order__city")
//!     .with("include_options", "1")
//!     .with("country", "FR");
//! let envelope = flexselect::refresh::field_changed(&site, &db, &post)?;
//! assert!(envelope.options.unwrap().contains("Paris"));
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod auth;
pub mod config;
pub mod core;
pub mod demo;
pub mod model;
pub mod reconstruct;
pub mod refresh;
pub mod request;
pub mod web;
pub mod widget;

pub use crate::core::{DataType, Field, FlexError, Result, Value};
pub use model::{Database, Entity, EntityBuilder, ModelKey, ModelRegistry, ModelSchema, Record};
pub use refresh::RefreshEnvelope;
pub use request::{FormData, FormRequest};
pub use widget::{Choice, ChoiceList, FlexWidget, WidgetConfig};
