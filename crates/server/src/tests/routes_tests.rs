use super::*;
use axum::{
    body::{self, Body},
    http::{header, Request, Response},
};
use server_api::ApiContext;
use storage::Catalog;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app() -> (Router, TempDir) {
    let static_dir = tempfile::tempdir().expect("static dir");
    std::fs::write(
        static_dir.path().join("index.html"),
        "<h1>Mergington High School</h1>",
    )
    .expect("index");

    let state = AppState {
        api: ApiContext::new(Catalog::seeded()),
        static_dir: static_dir.path().to_path_buf(),
    };
    (build_router(Arc::new(state)), static_dir)
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("response")
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

async fn activities(app: &Router) -> ActivityCatalog {
    let request = Request::get("/activities")
        .body(Body::empty())
        .expect("request");
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

fn post_request(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).expect("request")
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn root_redirects_to_static_index() {
    let (app, _static_dir) = test_app();
    let response = send(&app, Request::get("/").body(Body::empty()).expect("request")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        INDEX_PAGE
    );
}

#[tokio::test]
async fn static_index_is_served() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        Request::get(INDEX_PAGE).body(Body::empty()).expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert!(String::from_utf8_lossy(&bytes).contains("Mergington"));

    let missing = send(
        &app,
        Request::get("/static/missing.js")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _static_dir) = test_app();
    let response = send(&app, Request::get("/healthz").body(Body::empty()).expect("request")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(bytes.as_ref(), b"ok");
}

#[tokio::test]
async fn fresh_start_lists_seeded_activities() {
    let (app, _static_dir) = test_app();
    let listed = activities(&app).await;
    assert_eq!(listed.len(), 9);
    for name in ["Basketball", "Soccer", "Programming Class"] {
        assert!(listed.get(name).is_some(), "missing {name}");
    }
    assert_eq!(
        listed.get("Basketball").expect("basketball").participants,
        vec!["liam@mergington.edu", "noah@mergington.edu"]
    );
}

#[tokio::test]
async fn activity_json_has_expected_fields() {
    let (app, _static_dir) = test_app();
    let request = Request::get("/activities")
        .body(Body::empty())
        .expect("request");
    let value: serde_json::Value = json_body(send(&app, request).await).await;
    let basketball = value["Basketball"].as_object().expect("object");
    let mut keys: Vec<&str> = basketball.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["description", "max_participants", "participants", "schedule"]
    );
    assert!(basketball["participants"].is_array());
}

#[tokio::test]
async fn single_activity_route() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        Request::get("/activities/Chess%20Club")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let chess: ActivityDetails = json_body(response).await;
    assert_eq!(chess.max_participants, 12);

    let response = send(
        &app,
        Request::get("/activities/Knitting")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signup_adds_participant() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        post_request("/activities/Basketball/signup?email=test@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let message: MessageResponse = json_body(response).await;
    assert_eq!(
        message.message,
        "Signed up test@mergington.edu for Basketball"
    );

    let listed = activities(&app).await;
    assert!(listed
        .get("Basketball")
        .expect("basketball")
        .is_enrolled("test@mergington.edu"));
}

#[tokio::test]
async fn signup_for_unknown_activity_is_404() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        post_request("/activities/NonExistent/signup?email=test@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let detail: ErrorDetail = json_body(response).await;
    assert_eq!(detail.detail, "Activity not found");
}

#[tokio::test]
async fn duplicate_signup_is_400() {
    let (app, _static_dir) = test_app();
    let uri = "/activities/Basketball/signup?email=duplicate@mergington.edu";
    assert_eq!(send(&app, post_request(uri)).await.status(), StatusCode::OK);

    let response = send(&app, post_request(uri)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let detail: ErrorDetail = json_body(response).await;
    assert!(detail.detail.contains("already signed up"));
}

#[tokio::test]
async fn percent_encoded_activity_name_matches_exact_key() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        post_request("/activities/Painting%20Class/signup?email=artist@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = activities(&app).await;
    assert!(listed
        .get("Painting Class")
        .expect("painting")
        .is_enrolled("artist@mergington.edu"));
}

#[tokio::test]
async fn percent_encoded_email_is_decoded() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        post_request("/activities/Soccer/signup?email=first.last%2Bclub%40mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = activities(&app).await;
    assert!(listed
        .get("Soccer")
        .expect("soccer")
        .is_enrolled("first.last+club@mergington.edu"));
}

#[tokio::test]
async fn missing_or_blank_email_is_422() {
    let (app, _static_dir) = test_app();
    let response = send(&app, post_request("/activities/Basketball/signup")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail: ErrorDetail = json_body(response).await;
    assert!(detail.detail.contains("email"));

    let response = send(&app, delete_request("/activities/Basketball/unregister?email=")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unregister_seeded_participant() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        delete_request("/activities/Basketball/unregister?email=liam@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let message: MessageResponse = json_body(response).await;
    assert!(message.message.starts_with("Unregistered"));

    let listed = activities(&app).await;
    let basketball = listed.get("Basketball").expect("basketball");
    assert!(!basketball.is_enrolled("liam@mergington.edu"));
    assert_eq!(basketball.participants, vec!["noah@mergington.edu"]);
}

#[tokio::test]
async fn unregister_failures() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        delete_request("/activities/NonExistent/unregister?email=test@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let detail: ErrorDetail = json_body(response).await;
    assert_eq!(detail.detail, "Activity not found");

    let response = send(
        &app,
        delete_request("/activities/Basketball/unregister?email=notregistered@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let detail: ErrorDetail = json_body(response).await;
    assert!(detail.detail.contains("not registered"));
}

#[tokio::test]
async fn signup_and_unregister_workflow_restores_count() {
    let (app, _static_dir) = test_app();
    let initial = activities(&app).await.get("Soccer").expect("soccer").participants.len();

    let uri_signup = "/activities/Soccer/signup?email=workflow@mergington.edu";
    assert_eq!(send(&app, post_request(uri_signup)).await.status(), StatusCode::OK);
    assert_eq!(
        activities(&app).await.get("Soccer").expect("soccer").participants.len(),
        initial + 1
    );

    let uri_unregister = "/activities/Soccer/unregister?email=workflow@mergington.edu";
    assert_eq!(send(&app, delete_request(uri_unregister)).await.status(), StatusCode::OK);
    let soccer = activities(&app).await;
    let soccer = soccer.get("Soccer").expect("soccer");
    assert_eq!(soccer.participants.len(), initial);
    assert!(!soccer.is_enrolled("workflow@mergington.edu"));
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        Request::get("/activities/Basketball/signup?email=a@mergington.edu")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn each_app_gets_an_isolated_catalog() {
    let (first, _first_dir) = test_app();
    let (second, _second_dir) = test_app();
    assert_eq!(
        send(&first, post_request("/activities/Gym%20Class/signup?email=solo@mergington.edu"))
            .await
            .status(),
        StatusCode::OK
    );
    assert!(!activities(&second)
        .await
        .get("Gym Class")
        .expect("gym")
        .is_enrolled("solo@mergington.edu"));
}

#[tokio::test]
async fn undecodable_activity_name_gets_json_detail() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        post_request("/activities/%FF/signup?email=a@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("content type"),
        "application/json"
    );
    let detail: ErrorDetail = json_body(response).await;
    assert!(!detail.detail.is_empty());

    let response = send(
        &app,
        Request::get("/activities/%FF")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail: ErrorDetail = json_body(response).await;
    assert!(!detail.detail.is_empty());
}

#[tokio::test]
async fn repeated_email_parameter_gets_json_detail() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        post_request(
            "/activities/Basketball/signup?email=a@mergington.edu&email=b@mergington.edu",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail: ErrorDetail = json_body(response).await;
    assert!(detail.detail.contains("email"));

    let response = send(
        &app,
        delete_request(
            "/activities/Basketball/unregister?email=liam@mergington.edu&email=noah@mergington.edu",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let detail: ErrorDetail = json_body(response).await;
    assert!(detail.detail.contains("email"));

    let listed = activities(&app).await;
    assert_eq!(
        listed.get("Basketball").expect("basketball").participants,
        vec!["liam@mergington.edu", "noah@mergington.edu"]
    );
}

#[tokio::test]
async fn plus_in_query_is_kept_as_a_space() {
    let (app, _static_dir) = test_app();
    let response = send(
        &app,
        post_request("/activities/Basketball/signup?email=+liam@mergington.edu"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = activities(&app).await;
    let basketball = listed.get("Basketball").expect("basketball");
    assert!(basketball.is_enrolled(" liam@mergington.edu"));
    assert!(basketball.is_enrolled("liam@mergington.edu"));
}
