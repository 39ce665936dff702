use http_fixture::{HarnessConfig, HarnessError, any_json};
use http_fixture_testing::{StubResponse, StubServer};

use crate::helpers::{client, fixture_context, messages};

#[tokio::test]
async fn should_match_freshly_refreshed_fixture() {
    let server = StubServer::single("/a", StubResponse::json(200, r#"{"a":[1,{"b":null}]}"#)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut refresh = fixture_context(server.url("/a"), dir.path(), "a.json", any_json());
    refresh.refresh_json_fixture(&client()).await.unwrap();

    let mut tc = fixture_context(server.url("/a"), dir.path(), "a.json", any_json());
    tc.assert_json_fixture(&client()).await.unwrap();

    tc.reporter().assert_all_passed();
    let last = tc.reporter().steps().last().unwrap();
    assert_eq!(last.name, format!("Match_Fixture[{}]", server.url("/a")));
}

#[tokio::test]
async fn should_report_body_drift() {
    let server = StubServer::start(vec![
        ("/old", StubResponse::json(200, r#"{"count":1}"#)),
        ("/new", StubResponse::json(200, r#"{"count":2}"#)),
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let mut refresh = fixture_context(server.url("/old"), dir.path(), "count.json", any_json());
    refresh.refresh_json_fixture(&client()).await.unwrap();

    let mut tc = fixture_context(server.url("/new"), dir.path(), "count.json", any_json());
    tc.assert_json_fixture(&client()).await.unwrap();

    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(
        failures[0].starts_with(r#"body: expected {"count":1}, got {"count":2}"#),
        "{failures:?}"
    );
    let content = std::fs::read_to_string(dir.path().join("count.json")).unwrap();
    assert!(content.contains("\"count\": 1"), "comparison must not rewrite the fixture");
}

#[tokio::test]
async fn should_report_content_type_drift() {
    let server = StubServer::start(vec![
        ("/json", StubResponse::json(200, "{}")),
        (
            "/vnd",
            StubResponse::bare(200, "{}").with_header("content-type", "application/vnd.api+json"),
        ),
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let mut refresh = fixture_context(server.url("/json"), dir.path(), "ct.json", any_json());
    refresh.refresh_json_fixture(&client()).await.unwrap();

    let mut tc = fixture_context(server.url("/vnd"), dir.path(), "ct.json", any_json());
    tc.assert_json_fixture(&client()).await.unwrap();

    let failures = messages(&tc);
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert!(failures[0].starts_with("content type: expected \"application/json\""));
}

#[tokio::test]
async fn should_report_missing_fixture_file() {
    let server = StubServer::single("/a", StubResponse::json(200, "{}")).await;
    let dir = tempfile::tempdir().unwrap();
    let mut tc = fixture_context(server.url("/a"), dir.path(), "absent.json", any_json());

    let result = tc.assert_json_fixture(&client()).await;

    assert!(matches!(result, Err(HarnessError::ReadFixture { .. })));
    assert!(tc.reporter().steps().is_empty());
    assert!(messages(&tc)[0].starts_with("Failed to load fixture absent.json"));
}

#[tokio::test]
async fn should_compare_through_run_by_default() {
    let server = StubServer::single("/a", StubResponse::json(200, "[1,2,3]")).await;
    let dir = tempfile::tempdir().unwrap();
    let mut refresh = fixture_context(server.url("/a"), dir.path(), "a.json", any_json());
    refresh.refresh_json_fixture(&client()).await.unwrap();
    let before = std::fs::read(dir.path().join("a.json")).unwrap();

    let mut tc = fixture_context(server.url("/a"), dir.path(), "a.json", any_json());
    tc.run_json_fixture(&client(), &HarnessConfig::default())
        .await
        .unwrap();

    tc.reporter().assert_all_passed();
    assert_eq!(std::fs::read(dir.path().join("a.json")).unwrap(), before);
}
