use flexselect::{
    Choice, Entity, EntityBuilder, FormData, FormRequest, Value, WidgetConfig,
    demo::{self, CityWidget},
    widget::{FlexWidget, resolve_choices, resolve_details},
};
use std::sync::Arc;

fn order_entity(pairs: &[(&str, &str)]) -> Entity {
    let db = demo::database().expect("demo database");
    let schema = db.schema(&demo::order_key()).unwrap();
    pairs
        .iter()
        .fold(EntityBuilder::new(schema, db), |b, (k, v)| b.raw(k, v))
        .build()
}

fn city_choices(entity: &Entity) -> Vec<Choice> {
    let widget = CityWidget;
    resolve_choices(
        entity,
        &widget.trigger_fields(),
        |e| widget.queryset(e),
        |e| widget.empty_choices_text(e),
    )
    .unwrap()
}

fn city_details(entity: &Entity) -> String {
    let widget = CityWidget;
    resolve_details(entity, "city", &widget.trigger_fields(), |r, e| {
        widget.details(r, e)
    })
    .unwrap()
}

#[test]
fn unset_trigger_gives_single_placeholder() {
    let entity = order_entity(&[]);
    assert_eq!(
        city_choices(&entity),
        vec![Choice::new("", "Select a country first")]
    );
}

#[test]
fn set_trigger_lists_related_records_in_order() {
    let entity = order_entity(&[("country", "FR")]);
    assert_eq!(
        city_choices(&entity),
        vec![
            Choice::new("", "---------"),
            Choice::new("1", "Paris"),
            Choice::new("2", "Lyon"),
        ]
    );
}

#[test]
fn details_are_empty_exactly_when_choices_are_a_placeholder() {
    let cases: &[&[(&str, &str)]] = &[
        &[],
        &[("city", "1")],
        &[("country", "ZZ"), ("city", "1")],
        &[("country", "FR")],
        &[("country", "FR"), ("city", "2")],
        &[("country", "DE"), ("city", "3")],
    ];

    for pairs in cases {
        let entity = order_entity(pairs);
        let choices = city_choices(&entity);
        let details = city_details(&entity);
        let placeholder = choices.len() == 1 && choices[0].value.is_empty();
        if placeholder {
            assert_eq!(details, "", "{pairs:?}");
        } else {
            assert_eq!(choices[0], Choice::empty(), "{pairs:?}");
        }
    }
}

#[test]
fn deleting_the_trigger_record_collapses_to_placeholder() {
    let entity = order_entity(&[("country", "DE"), ("city", "3")]);
    assert_eq!(city_choices(&entity).len(), 2);

    entity
        .db()
        .delete(&demo::country_key(), &Value::from("DE"))
        .unwrap();
    assert_eq!(
        city_choices(&entity),
        vec![Choice::new("", "Select a country first")]
    );
    assert_eq!(city_details(&entity), "");
}

#[test]
fn render_emits_control_script_and_details() {
    let db = demo::database().unwrap();
    let config = WidgetConfig::select(demo::order_key(), "city", Arc::new(CityWidget));
    let post = FormData::new().with("country", "FR").with("city", "1");
    let request = FormRequest::post("/admin/app/order/add/", post);

    let html = config.render("city", &["1"], &request, &db).unwrap();

    let select_end = html.find("</select>").expect("select control");
    let script_start = html.find("<script>").expect("script block");
    let details_start = html.find("<span class=\"flexselect_details\">").expect("details");
    assert!(select_end < script_start && script_start < details_start);

    assert!(html.starts_with("<select id=\"id_city\" name=\"city\">"));
    assert!(html.contains("<option value=\"1\" selected>Paris</option>"));
    assert!(html.contains("<strong>Paris</strong>, France"));
}

#[test]
fn script_payload_declares_triggers_and_url() {
    let config = WidgetConfig::select(demo::order_key(), "city", Arc::new(CityWidget))
        .with_url("/custom/changed");
    let js = config.build_js().unwrap();

    let marker = "flexselect.fields.app__order__city = ";
    let start = js.find(marker).expect("registry entry") + marker.len();
    let end = js[start..].find(";\n").expect("statement end") + start;
    let payload: serde_json::Value = serde_json::from_str(&js[start..end]).unwrap();

    assert_eq!(
        payload,
        serde_json::json!({
            "baseField": "city",
            "triggerFields": ["country"],
            "url": "/custom/changed",
        })
    );
}

#[test]
fn choice_function_overrides_resolution() {
    let db = demo::database().unwrap();
    let config = WidgetConfig::select(demo::order_key(), "city", Arc::new(CityWidget))
        .with_choice_function(|entity| {
            let mut choices = vec![Choice::new("", "any city")];
            choices.extend(
                entity
                    .db()
                    .all(&demo::city_key())?
                    .iter()
                    .map(Choice::from_record),
            );
            Ok(choices)
        });

    let request = FormRequest::get("/admin/app/order/add/");
    let none: [&str; 0] = [];
    let html = config.render("city", &none, &request, &db).unwrap();

    assert!(html.contains("<option value=\"\">any city</option>"));
    assert!(html.contains("Berlin"));
    assert!(!html.contains("Select a country first"));
}

#[test]
fn multiple_select_marks_every_selected_value() {
    let db = demo::database().unwrap();
    let config =
        WidgetConfig::select_multiple(demo::order_key(), "city", Arc::new(CityWidget))
            .with_attr("class", "wide");
    let post = FormData::new().with("country", "FR");
    let request = FormRequest::post("/admin/app/order/add/", post);

    let html = config.render("city", &["1", "2"], &request, &db).unwrap();

    assert!(html.starts_with("<select class=\"wide\" id=\"id_city\" multiple name=\"city\">"));
    assert!(html.contains("<option value=\"1\" selected>Paris</option>"));
    assert!(html.contains("<option value=\"2\" selected>Lyon</option>"));
}

#[test]
fn render_reuses_hashed_name_from_post() {
    let db = demo::database().unwrap();
    let config = WidgetConfig::select(demo::order_key(), "city", Arc::new(CityWidget));
    let post = FormData::new()
        .with("hashed_name", "app__order__city")
        .with("country", "DE");
    let request = FormRequest::post("/somewhere/else/", post);

    let html = config.render("city", &["3"], &request, &db).unwrap();
    assert!(html.contains("<option value=\"3\" selected>Berlin</option>"));
}

#[test]
fn mixed_case_base_field_round_trips_through_its_identity_key() {
    use flexselect::admin::{AdminSite, ModelAdmin};
    use flexselect::widget::Media;
    use flexselect::{DataType, Database, Field, ModelSchema, refresh};

    let mut registry = demo::registry();
    let shipment = registry
        .register(
            ModelSchema::new("app", "Shipment")
                .field(Field::foreign_key("country", demo::country_key(), DataType::Text))
                .field(Field::foreign_key("shipCity", demo::city_key(), DataType::Integer)),
        )
        .key()
        .clone();
    let db = Database::new(registry);
    demo::seed(&db).unwrap();
    let db = Arc::new(db);

    let widget = WidgetConfig::select(shipment.clone(), "shipCity", Arc::new(CityWidget));
    let hashed_name = widget.identity_key().to_string();
    assert_eq!(hashed_name, "app__shipment__shipcity");

    let html = widget
        .render("shipCity", &["1"], &FormRequest::get("/admin/app/shipment/add/"), &db)
        .unwrap();
    assert!(html.contains("flexselect.fields.app__shipment__shipcity = "));
    assert!(html.contains("\"baseField\":\"shipCity\""));

    let mut site = AdminSite::new(Media::new(false, "/static/"));
    site.register(ModelAdmin::new(shipment).flex_widget(widget));

    let post = FormData::new()
        .with("hashed_name", hashed_name)
        .with("include_options", "1")
        .with("country", "FR")
        .with("shipCity", "2");
    let envelope = refresh::field_changed(&site, &db, &post).unwrap();

    let options = envelope.options.unwrap();
    assert!(options.contains("<option value=\"2\" selected>Lyon</option>"));
    assert!(!options.contains("Berlin"));
    assert!(envelope.details.contains("<strong>Lyon</strong>, France"));
}
