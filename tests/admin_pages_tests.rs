use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use flexselect::{
    Value,
    config::FlexSelectConfig,
    demo,
    web::{AppState, build_router},
};
use tower::ServiceExt;

fn state() -> AppState {
    let state = demo::app_state(FlexSelectConfig::default(), 4).expect("demo state should build");
    state
        .db
        .insert(
            &demo::order_key(),
            [
                ("customer", Value::from("Ada")),
                ("country", Value::from("FR")),
                ("city", Value::Integer(2)),
                ("quantity", Value::Integer(3)),
            ],
        )
        .expect("order should insert");
    state
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

async fn login(app: &Router, body: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/accounts/login/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, request).await
}

fn session_cookie(headers: &HeaderMap) -> String {
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("login should set a cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn get_page(app: &Router, uri: &str, cookie: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

#[tokio::test]
async fn login_then_render_add_form() {
    let app = build_router(state());

    let (status, headers, _) = login(
        &app,
        "username=admin&password=adminpass&next=/admin/app/order/add/",
    )
    .await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/admin/app/order/add/");
    let cookie = session_cookie(&headers);
    assert!(cookie.starts_with("sessionid="));

    let (status, _, html) = get_page(&app, "/admin/app/order/add/", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Add Order</title>"));
    assert!(html.contains("<script src=\"/static/flexselect/js/flexselect.js\"></script>"));
    assert!(html.contains("<select id=\"id_city\" name=\"city\">"));
    assert!(html.contains("<option value=\"\">Select a country first</option>"));
    assert!(html.contains("flexselect.fields.app__order__city = "));
    assert!(html.contains("<span class=\"flexselect_details\"></span>"));
    assert!(html.contains("<input type=\"text\" name=\"customer\" id=\"id_customer\" value=\"\">"));
    assert!(html.contains("Logged in as <strong>admin</strong>"));
    assert!(html.contains("<form id=\"order_form\">"));
    assert!(!html.contains("type=\"submit\""));
}

#[tokio::test]
async fn change_form_preselects_stored_city() {
    let app = build_router(state());
    let (_, headers, _) = login(&app, "username=admin&password=adminpass").await;
    let cookie = session_cookie(&headers);

    let (status, _, html) = get_page(&app, "/admin/app/order/1/change/", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Change Order</title>"));
    assert!(html.contains("<option value=\"1\">Paris</option>"));
    assert!(html.contains("<option value=\"2\" selected>Lyon</option>"));
    assert!(!html.contains("Berlin"));
    assert!(html.contains("<strong>Lyon</strong>, France"));
    assert!(html.contains("value=\"Ada\""));
}

#[tokio::test]
async fn change_form_for_missing_record_is_not_found() {
    let app = build_router(state());
    let (_, headers, _) = login(&app, "username=admin&password=adminpass").await;
    let cookie = session_cookie(&headers);

    let (status, _, _) = get_page(&app, "/admin/app/order/42/change/", &cookie).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get_page(&app, "/admin/app/order/", &cookie).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_foreign_redirects() {
    let app = build_router(state());

    let (status, _, body) = login(&app, "username=admin&password=wrongpass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("unauthorized"));

    let (status, headers, _) = login(
        &app,
        "username=admin&password=adminpass&next=//evil.example/",
    )
    .await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/admin/");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = build_router(state());
    let (_, headers, _) = login(&app, "username=admin&password=adminpass").await;
    let cookie = session_cookie(&headers);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/accounts/logout/")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/accounts/login/");

    let (status, headers, _) = get_page(&app, "/admin/app/order/add/", &cookie).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        "/accounts/login/?next=%2Fadmin%2Fapp%2Forder%2Fadd%2F"
    );
}

async fn get_anonymous(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

#[tokio::test]
async fn anonymous_visit_completes_through_login_form() {
    let app = build_router(state());

    let (status, headers, _) = get_anonymous(&app, "/admin/app/order/1/change/").await;
    assert_eq!(status, StatusCode::FOUND);
    let location = headers
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(location, "/accounts/login/?next=%2Fadmin%2Fapp%2Forder%2F1%2Fchange%2F");

    let (status, _, html) = get_anonymous(&app, &location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<form method=\"post\" action=\"/accounts/login/\">"));
    assert!(html.contains("<input type=\"hidden\" name=\"next\" value=\"/admin/app/order/1/change/\">"));

    let (status, headers, _) = login(
        &app,
        "username=admin&password=adminpass&next=%2Fadmin%2Fapp%2Forder%2F1%2Fchange%2F",
    )
    .await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/admin/app/order/1/change/");

    let cookie = session_cookie(&headers);
    let (status, _, html) = get_page(&app, "/admin/app/order/1/change/", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<option value=\"2\" selected>Lyon</option>"));
}

#[tokio::test]
async fn login_form_escapes_next() {
    let app = build_router(state());
    let (status, _, html) = get_anonymous(&app, "/accounts/login/?next=%22%3E%3Cscript%3E").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("\"><script>"));
    assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
}

#[tokio::test]
async fn widget_script_is_served_without_a_session() {
    let app = build_router(state());
    let (status, headers, body) = get_anonymous(&app, "/static/flexselect/js/flexselect.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("javascript")
    );
    assert!(body.contains("flexselect.bindEvents"));
    assert!(body.contains("include_options"));

    let (status, _, _) = get_anonymous(&app, "/static/flexselect/js/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
