use http_fixture::{Body, HarnessError, TestContext, TestContextArgs};
use http_fixture_testing::{StubResponse, StubServer, refused_url};

use crate::helpers::{client, json_context, messages, unset_status_context};

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_capture_status_content_type_and_body() {
    let server = StubServer::single("/a", StubResponse::json(200, r#"{"a":1}"#)).await;
    let mut tc = json_context(server.url("/a"));

    let resp = tc.test_json_get(&client()).await.unwrap().unwrap();

    assert_eq!(resp.status_code, Some(200));
    assert_eq!(resp.content_type, "application/json");
    assert_eq!(resp.body, Some(Body::Raw(r#"{"a":1}"#.to_owned())));
    assert_eq!(tc.expected_response().raw_body(), Some(r#"{"a":1}"#));
    tc.reporter().assert_all_passed();

    let url = server.url("/a");
    let names: Vec<&str> = tc.reporter().steps().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            format!("Get_URL_via_HTTP[{url}]"),
            format!("Check_StatusCode[{url}]"),
            format!("Read_Body[{url}]"),
            format!("Check_ContentType[{url}]"),
            format!("Body_Is_Valid_JSON[{url}]"),
        ]
    );
}

#[tokio::test]
async fn should_record_observed_status_when_none_demanded() {
    let server = StubServer::single("/a", StubResponse::json(200, "[]")).await;
    let mut tc = unset_status_context(server.url("/a"));

    let resp = tc.test_json_get(&client()).await.unwrap().unwrap();

    assert_eq!(resp.status_code, Some(200));
    assert!(tc.reporter().all_passed());
}

// ── Status code ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_status_mismatch_and_stop_before_body() {
    let server = StubServer::single("/missing", StubResponse::json(404, r#"{"error":"nope"}"#)).await;
    let mut tc = json_context(server.url("/missing"));

    let resp = tc.test_json_get(&client()).await.unwrap();

    assert!(resp.is_none());
    assert!(tc.expected_response().body.is_none());
    assert!(tc.expected_response().content_type.is_empty());
    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(
        failures[0].starts_with("Got status code 404, expected 200"),
        "{failures:?}"
    );
    assert_eq!(tc.reporter().steps().len(), 2);
}

#[tokio::test]
async fn should_keep_reading_body_after_status_mismatch_on_200() {
    let server = StubServer::single("/a", StubResponse::json(200, r#"{"a":1}"#)).await;
    let mut tc = TestContext::new(TestContextArgs {
        test_url: server.url("/a"),
        status_code: 201,
        validate_body: Some(http_fixture::any_json()),
        ..Default::default()
    });

    let resp = tc.test_json_get(&client()).await.unwrap();

    assert!(resp.is_some());
    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(failures[0].contains("Got status code 200, expected 201"));
}

// ── Transport errors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_ignore_refused_connection_when_no_status_demanded() {
    let mut tc = unset_status_context(refused_url());

    let resp = tc.test_json_get(&client()).await.unwrap();

    assert!(resp.is_none());
    tc.reporter().assert_all_passed();
}

#[tokio::test]
async fn should_report_refused_connection_when_status_demanded() {
    let url = refused_url();
    let mut tc = json_context(url.clone());

    let resp = tc.test_json_get(&client()).await.unwrap();

    assert!(resp.is_none());
    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(
        failures[0].starts_with(&format!("Failed to HTTP GET from {url}: connection refused")),
        "{failures:?}"
    );
}

// ── Body and headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_empty_body() {
    let server = StubServer::single("/empty", StubResponse::json(200, "")).await;
    let mut tc = json_context(server.url("/empty"));

    let result = tc.test_json_get(&client()).await;

    assert!(
        matches!(result, Err(HarnessError::InvalidBody(_))),
        "expected InvalidBody, got {result:?}"
    );
    let failures = messages(&tc);
    assert_eq!(failures.len(), 2, "{failures:?}");
    assert!(failures[0].starts_with("Failed due to empty body returned"));
    assert!(failures[1].starts_with("Failed to unmarshal JSON from body"));
}

#[tokio::test]
async fn should_report_missing_content_type() {
    let server = StubServer::single("/bare", StubResponse::bare(200, "{}")).await;
    let mut tc = json_context(server.url("/bare"));

    let resp = tc.test_json_get(&client()).await.unwrap();

    assert!(resp.is_some());
    assert!(tc.expected_response().content_type.is_empty());
    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(failures[0].starts_with("no 'Content-Type' header"));
}

#[tokio::test]
async fn should_report_ambiguous_content_type() {
    let response = StubResponse::json(200, "{}").with_header("content-type", "text/plain");
    let server = StubServer::single("/twice", response).await;
    let mut tc = json_context(server.url("/twice"));

    tc.test_json_get(&client()).await.unwrap();

    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(failures[0].starts_with("ambiguous 'Content-Type' header"));
}

#[tokio::test]
async fn should_keep_raw_body_when_validation_fails() {
    let server = StubServer::single("/html", StubResponse::json(200, "<html></html>")).await;
    let mut tc = json_context(server.url("/html"));

    let result = tc.test_json_get(&client()).await;

    assert!(matches!(result, Err(HarnessError::InvalidBody(_))));
    assert_eq!(tc.expected_response().raw_body(), Some("<html></html>"));
    assert_eq!(tc.expected_response().content_type, "application/json");
    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(failures[0].starts_with("Failed to unmarshal JSON from body"));
}

#[tokio::test]
async fn should_report_missing_validator() {
    let server = StubServer::single("/a", StubResponse::json(200, "{}")).await;
    let mut tc = TestContext::new(TestContextArgs {
        test_url: server.url("/a"),
        ..Default::default()
    });

    let result = tc.test_json_get(&client()).await;

    assert!(matches!(result, Err(HarnessError::MissingValidator)));
    assert!(messages(&tc)[0].ends_with("no body validator configured"));
}
