//! Sample orders admin: an order's `city` choices depend on its `country`.
//!
//! Used by the binary and by the integration tests.

use crate::admin::{AdminSite, ModelAdmin};
use crate::auth::AuthManager;
use crate::config::FlexSelectConfig;
use crate::core::{DataType, Field, Result, Value};
use crate::model::{Database, Entity, ModelKey, ModelRegistry, ModelSchema, Record};
use crate::web::AppState;
use crate::widget::html::escape;
use crate::widget::{FlexWidget, Media, WidgetConfig};
use std::sync::Arc;

pub const NAMESPACE: &str = "app";

pub fn country_key() -> ModelKey {
    ModelKey::new(NAMESPACE, "Country")
}

pub fn city_key() -> ModelKey {
    ModelKey::new(NAMESPACE, "City")
}

pub fn order_key() -> ModelKey {
    ModelKey::new(NAMESPACE, "Order")
}

/// Cities of the order's country.
pub struct CityWidget;

impl FlexWidget for CityWidget {
    fn trigger_fields(&self) -> Vec<String> {
        vec!["country".to_string()]
    }

    fn details(&self, related: &Record, entity: &Entity) -> String {
        let population = related
            .get("population")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let country = entity
            .related("country")
            .map(|c| c.to_string())
            .unwrap_or_default();
        format!(
            "<div class=\"city-details\"><strong>{}</strong>, {} (population {})</div>",
            escape(&related.to_string()),
            escape(&country),
            escape(&population),
        )
    }

    fn queryset(&self, entity: &Entity) -> Result<Vec<Record>> {
        let country = entity.raw("country").cloned().unwrap_or(Value::Null);
        entity.db().filter(&city_key(), "country", &country)
    }

    fn empty_choices_text(&self, _entity: &Entity) -> String {
        "Select a country first".to_string()
    }
}

pub fn registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry.register(
        ModelSchema::new(NAMESPACE, "Country")
            .field(Field::new("code", DataType::Text).primary_key())
            .field(Field::new("name", DataType::Text))
            .display_field("name"),
    );
    registry.register(
        ModelSchema::new(NAMESPACE, "City")
            .field(Field::new("name", DataType::Text))
            .field(Field::foreign_key("country", country_key(), DataType::Text))
            .field(Field::new("population", DataType::Integer))
            .display_field("name"),
    );
    registry.register(
        ModelSchema::new(NAMESPACE, "Order")
            .field(Field::new("customer", DataType::Text))
            .field(Field::foreign_key("country", country_key(), DataType::Text))
            .field(Field::foreign_key("city", city_key(), DataType::Integer))
            .field(Field::new("quantity", DataType::Integer))
            .field(Field::new("ordered_on", DataType::Date)),
    );
    registry
}

/// Countries FR and DE; cities Paris (1), Lyon (2), Berlin (3).
pub fn seed(db: &Database) -> Result<()> {
    for (code, name) in [("FR", "France"), ("DE", "Germany")] {
        db.insert(&country_key(), [("code", Value::from(code)), ("name", Value::from(name))])?;
    }
    for (name, country, population) in [
        ("Paris", "FR", 2_102_650),
        ("Lyon", "FR", 522_250),
        ("Berlin", "DE", 3_878_100),
    ] {
        db.insert(
            &city_key(),
            [
                ("name", Value::from(name)),
                ("country", Value::from(country)),
                ("population", Value::Integer(population)),
            ],
        )?;
    }
    Ok(())
}

pub fn database() -> Result<Arc<Database>> {
    let db = Database::new(registry());
    seed(&db)?;
    Ok(Arc::new(db))
}

pub fn admin_site(config: &FlexSelectConfig) -> AdminSite {
    let mut site = AdminSite::new(Media::new(config.include_jquery, &config.static_url));
    site.register(
        ModelAdmin::new(order_key())
            .flex_widget(WidgetConfig::select(order_key(), "city", Arc::new(CityWidget))),
    );
    site.register(ModelAdmin::new(city_key()));
    site.register(ModelAdmin::new(country_key()));
    site
}

/// Fully wired state: seeded database, admin site and an admin account.
pub fn app_state(config: FlexSelectConfig, hash_cost: u32) -> Result<AppState> {
    let db = database()?;
    let site = admin_site(&config);
    let auth = AuthManager::with_admin_cost(&config.admin_username, &config.admin_password, hash_cost)?;
    Ok(AppState::new(site, db, auth, config))
}
