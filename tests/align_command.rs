//! End to end runs of the `align` command against a mocked NiFi REST API

use nifi_align::{run, AppError, EXIT_FAILURE};
use nifi_align_core::AlignError;
use nifi_align_e2e_tests::{cli, flow_body, mount_flow, mount_session, mount_update, position_updates};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_five_siblings_laid_out_in_four_columns() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_flow(&server, "root", flow_body("root-id", &["a", "b", "c", "d", "e"], 0)).await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/nifi-api/process-groups/[a-e]$"))
        .and(body_string_contains("\"version\":1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(5)
        .mount(&server)
        .await;

    let report = run(cli(&server, &["-d", "1"])).await.unwrap();

    assert_eq!(report.groups_visited, 1);
    assert_eq!(report.positions_updated, 5);
    assert_eq!(
        position_updates(&server).await,
        vec![
            ("a".to_string(), 0.0, 0.0),
            ("b".to_string(), 394.0, 0.0),
            ("c".to_string(), 788.0, 0.0),
            ("d".to_string(), 1182.0, 0.0),
            ("e".to_string(), 0.0, 186.0),
        ]
    );
}

#[tokio::test]
async fn test_subtree_aligned_before_its_group_moves() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_flow(&server, "top", flow_body("top", &["parent"], 0)).await;
    mount_flow(&server, "parent", flow_body("parent", &["leaf-1", "leaf-2"], 0)).await;
    mount_flow(&server, "leaf-1", flow_body("leaf-1", &[], 0)).await;
    mount_flow(&server, "leaf-2", flow_body("leaf-2", &[], 2)).await;
    for id in ["parent", "leaf-1", "leaf-2"] {
        mount_update(&server, id, 200, 1).await;
    }

    let report = run(cli(&server, &["-d", "-1", "-r", "top"])).await.unwrap();

    assert_eq!(report.groups_visited, 3);
    assert_eq!(report.groups_skipped, 1);
    assert_eq!(
        position_updates(&server).await,
        vec![
            ("leaf-1".to_string(), 0.0, 0.0),
            ("leaf-2".to_string(), 394.0, 0.0),
            ("parent".to_string(), 0.0, 0.0),
        ]
    );
}

#[tokio::test]
async fn test_conflict_aborts_run_without_retry() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    mount_flow(&server, "root", flow_body("root-id", &["a", "b", "c", "d", "e"], 0)).await;
    mount_update(&server, "a", 200, 1).await;
    mount_update(&server, "b", 200, 1).await;
    mount_update(&server, "c", 409, 1).await;
    mount_update(&server, "d", 200, 0).await;
    mount_update(&server, "e", 200, 0).await;

    let err = run(cli(&server, &["-d", "1"])).await.unwrap_err();

    assert!(matches!(err, AppError::Alignment(ref e) if e.is_conflict()), "{err:?}");
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert_eq!(position_updates(&server).await.len(), 3);
}

#[tokio::test]
async fn test_rejected_credentials_skip_flow_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nifi-api/access/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let err = run(cli(&server, &[])).await.unwrap_err();

    assert_eq!(
        err,
        AppError::Authentication(AlignError::Authentication("Unauthorized!".to_string()))
    );
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_zero_columns_rejected_before_network() {
    let server = MockServer::start().await;

    let err = run(cli(&server, &["-c", "0"])).await.unwrap_err();

    assert_eq!(
        err,
        AppError::Configuration(AlignError::Configuration(
            "Maximum columns number can not be less than 1.".to_string()
        ))
    );
    assert_eq!(err.exit_code(), 70);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_zero_depth_sends_nothing() {
    let server = MockServer::start().await;

    let report = run(cli(&server, &["-d", "0"])).await.unwrap();

    assert_eq!(report.positions_updated, 0);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_missing_group_reports_remote_error() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/nifi-api/flow/process-groups/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Unable to find process group with id 'nope'."))
        .expect(1)
        .mount(&server)
        .await;

    let err = run(cli(&server, &["-r", "nope"])).await.unwrap_err();

    assert_eq!(
        err.cause(),
        &AlignError::remote(404, "Unable to find process group with id 'nope'.")
    );
}

#[tokio::test]
async fn test_crafted_root_id_stays_in_flow_endpoint() {
    let server = MockServer::start().await;
    mount_session(&server, 1).await;

    let err = run(cli(&server, &["-r", "../access/token?x=1"])).await.unwrap_err();

    assert_eq!(err.cause().status(), Some(404));
    let requests = server.received_requests().await.unwrap_or_default();
    let fetch = requests
        .iter()
        .find(|r| r.method.to_string() == "GET")
        .unwrap();
    assert!(fetch.url.path().starts_with("/nifi-api/flow/process-groups/"), "{}", fetch.url);
    assert_eq!(fetch.url.path_segments().map(|s| s.count()), Some(4));
    assert_eq!(fetch.url.query(), None);
}
