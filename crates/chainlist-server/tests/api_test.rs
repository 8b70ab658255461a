//! API driver tests
//!
//! Requests go through `ApiDriver::handle` exactly as the transport would
//! deliver them, and the JSON envelopes are decoded back for assertions.

use chainlist_core::LinkedList;
use chainlist_proto::{ApiResponse, NodeView};
use chainlist_server::{
    ApiDriver,
    http::{HttpRequest, HttpResponse, Method, StatusCode},
};

fn driver(values: &[i64]) -> ApiDriver {
    ApiDriver::new(LinkedList::from_values(values.iter().copied()))
}

fn get() -> HttpRequest {
    HttpRequest::new(Method::Get, "/api/linkedlist")
}

fn insert(body: &str) -> HttpRequest {
    HttpRequest::new(Method::Post, "/api/linkedlist/insert").with_json(body.to_string())
}

fn delete(body: &str) -> HttpRequest {
    HttpRequest::new(Method::Delete, "/api/linkedlist/delete").with_json(body.to_string())
}

fn envelope(response: &HttpResponse) -> ApiResponse {
    ApiResponse::from_json(&response.body).unwrap()
}

#[test]
fn get_returns_success_envelope() {
    let mut driver = driver(&[1, 2, 3]);
    let response = driver.handle(&get());

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        envelope(&response),
        ApiResponse::success(vec![
            NodeView::new(1, Some(1)),
            NodeView::new(2, Some(2)),
            NodeView::new(3, None),
        ])
    );
}

#[test]
fn get_on_empty_list_returns_empty_array() {
    let mut driver = driver(&[]);
    let response = driver.handle(&get());
    assert_eq!(&response.body[..], br#"{"status":"success","data":[]}"#);
}

#[test]
fn insert_at_start_returns_new_snapshot() {
    let mut driver = driver(&[5, 7]);
    let response = driver.handle(&insert(r#"{"value": 3, "position": "start"}"#));

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        envelope(&response).data().unwrap(),
        &[NodeView::new(3, Some(1)), NodeView::new(5, Some(2)), NodeView::new(7, None)]
    );
}

#[test]
fn insert_without_position_appends() {
    let mut driver = driver(&[5]);
    let response = driver.handle(&insert(r#"{"value": 7}"#));

    assert_eq!(
        envelope(&response).data().unwrap(),
        &[NodeView::new(5, Some(1)), NodeView::new(7, None)]
    );
}

#[test]
fn insert_non_numeric_is_rejected_without_mutation() {
    let mut driver = driver(&[1]);

    for body in [r#"{"value": "abc"}"#, r#"{"value": 1.5}"#, r#"{"position": "end"}"#, "", "{"] {
        let response = driver.handle(&insert(body));
        assert_eq!(response.status, StatusCode::BadRequest, "body {body:?}");
        assert!(!envelope(&response).is_success());
    }

    assert_eq!(driver.list().values(), vec![1]);
}

#[test]
fn insert_with_unknown_position_is_rejected() {
    let mut driver = driver(&[]);
    let response = driver.handle(&insert(r#"{"value": 1, "position": "middle"}"#));

    assert_eq!(response.status, StatusCode::BadRequest);
    assert!(driver.list().is_empty());
}

#[test]
fn missing_value_has_fixed_message() {
    let mut driver = driver(&[]);
    let response = driver.handle(&delete("{}"));

    assert_eq!(response.status, StatusCode::BadRequest);
    assert_eq!(envelope(&response).message(), Some("No value provided"));
}

#[test]
fn delete_returns_new_snapshot() {
    let mut driver = driver(&[1, 2, 3]);
    let response = driver.handle(&delete(r#"{"value": 2}"#));

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        envelope(&response).data().unwrap(),
        &[NodeView::new(1, Some(1)), NodeView::new(3, None)]
    );
}

#[test]
fn delete_missing_value_is_not_found_and_list_survives() {
    let mut driver = driver(&[1, 2, 3]);
    let response = driver.handle(&delete(r#"{"value": 9}"#));

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(envelope(&response), ApiResponse::error("Value 9 not found"));

    let after = driver.handle(&get());
    assert_eq!(envelope(&after).data().unwrap().len(), 3);
}

#[test]
fn delete_duplicate_removes_first_only() {
    let mut driver = driver(&[5, 1, 5]);
    let response = driver.handle(&delete(r#"{"value": 5}"#));

    assert_eq!(
        envelope(&response).data().unwrap(),
        &[NodeView::new(1, Some(1)), NodeView::new(5, None)]
    );
}

#[test]
fn unknown_path_is_not_found() {
    let mut driver = driver(&[]);
    let response = driver.handle(&HttpRequest::new(Method::Get, "/api/tree"));

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(envelope(&response).message(), Some("No route for /api/tree"));
}

#[test]
fn wrong_method_is_not_allowed() {
    let mut driver = driver(&[1]);
    let response = driver.handle(&HttpRequest::new(Method::Get, "/api/linkedlist/delete"));

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.header("allow"), Some("DELETE, OPTIONS"));
    assert_eq!(driver.list().values(), vec![1]);
}

#[test]
fn preflight_allows_api_methods() {
    let mut driver = driver(&[]);
    let response = driver.handle(&HttpRequest::new(Method::Options, "/api/linkedlist/insert"));

    assert_eq!(response.status, StatusCode::NoContent);
    assert!(response.body.is_empty());
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
    assert_eq!(response.header("access-control-allow-methods"), Some("GET, POST, DELETE, OPTIONS"));
    assert_eq!(response.header("access-control-allow-headers"), Some("Content-Type"));
}

#[test]
fn insert_then_delete_restores_snapshot() {
    let mut driver = driver(&[4, 8]);
    let before = envelope(&driver.handle(&get()));

    driver.handle(&insert(r#"{"value": 6, "position": "start"}"#));
    let after = envelope(&driver.handle(&delete(r#"{"value": 6}"#)));

    assert_eq!(after, before);
}
