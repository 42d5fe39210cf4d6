//! Flex widgets: select controls whose choices depend on other form fields.
//!
//! A widget is declared per base field with a [`FlexWidget`] implementation.
//! At render time it reconstructs the entity being edited, resolves choices
//! and details through [`resolver`], and emits the control together with a
//! script entry telling the client which fields trigger a refresh.

pub mod choices;
pub mod config;
pub mod html;
pub mod media;
pub mod render;
pub mod resolver;

pub use choices::{Choice, ChoiceList, EMPTY_CHOICE_LABEL, choices_from_records};
pub use config::{
    ChoiceFunction, FIELD_CHANGED_URL, FlexWidget, IdentityKey, SelectKind, WidgetConfig,
};
pub use media::Media;
pub use render::render_options;
pub use resolver::{choices_from_instance, details_from_instance, resolve_choices, resolve_details};
