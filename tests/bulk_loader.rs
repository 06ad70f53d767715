mod common;

use std::path::{Path, PathBuf};

use axum::http::{Method, StatusCode};
use clap::Parser;
use common::{MockSearchEngine, BASIC_ADMIN_SECRET, REFUSED_URL};
use es_ingest_tools::bulk_loader::{execute, BulkLoaderArgs};
use es_ingest_tools::IngestError;

const TWO_ROWS_PAYLOAD: &str = "{\"index\":{\"_index\":\"test\"}}\n{\"id\":\"1\",\"name\":\"a\"}\n\
                                {\"index\":{\"_index\":\"test\"}}\n{\"id\":\"2\",\"name\":\"b\"}\n";

fn write_csv(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("reviews.csv");
    std::fs::write(&path, content).unwrap();
    path
}

fn args(csv: &Path, output: &Path, url: &str, extra: &[&str]) -> BulkLoaderArgs {
    let mut argv = vec![
        "csv-bulk-loader".to_string(),
        "--file".to_string(),
        csv.display().to_string(),
        "--output".to_string(),
        output.display().to_string(),
        "--index".to_string(),
        "test".to_string(),
        "--url".to_string(),
        url.to_string(),
        "--username".to_string(),
        "admin".to_string(),
        "--password".to_string(),
        "secret".to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    BulkLoaderArgs::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn sends_the_table_as_one_bulk_request() {
    let mock = MockSearchEngine::start(
        StatusCode::OK,
        r#"{"took":3,"errors":false,"items":[{"index":{"status":201}},{"index":{"status":201}}]}"#,
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id;name\n1;a\n2;b\n");
    let output = dir.path().join("bulk_data.json");

    let response = execute(args(&csv, &output, &mock.url(), &["--keep-strings"]))
        .await
        .unwrap()
        .expect("not a dry run");

    assert_eq!(response["took"], 3);
    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/_bulk");
    assert_eq!(request.content_type.as_deref(), Some("application/x-ndjson"));
    assert_eq!(request.authorization.as_deref(), Some(BASIC_ADMIN_SECRET));
    assert_eq!(request.body, TWO_ROWS_PAYLOAD);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), TWO_ROWS_PAYLOAD);
}

#[tokio::test]
async fn inferred_cells_are_typed_in_the_payload() {
    let mock = MockSearchEngine::start(StatusCode::OK, r#"{"took":1,"errors":false,"items":[]}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id;rating;recommended;review\n10;4.5;true;Nice\n");
    let output = dir.path().join("bulk_data.json");

    execute(args(&csv, &output, &mock.url(), &[])).await.unwrap();

    let body = &mock.requests()[0].body;
    assert_eq!(
        body,
        "{\"index\":{\"_index\":\"test\"}}\n{\"id\":10,\"rating\":4.5,\"recommended\":true,\"review\":\"Nice\"}\n"
    );
}

#[tokio::test]
async fn item_level_errors_are_reported_as_is() {
    let body = r#"{"took":5,"errors":true,"items":[{"index":{"status":400,"error":{"type":"mapper_parsing_exception"}}}]}"#;
    let mock = MockSearchEngine::start(StatusCode::OK, body).await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id\nx\n");
    let output = dir.path().join("bulk_data.json");

    let response = execute(args(&csv, &output, &mock.url(), &[]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response, serde_json::from_str::<serde_json::Value>(body).unwrap());
}

#[tokio::test]
async fn rejected_request_is_a_server_error() {
    let mock = MockSearchEngine::start(StatusCode::PAYLOAD_TOO_LARGE, "request entity too large").await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id;name\n1;a\n");
    let output = dir.path().join("bulk_data.json");

    let err = execute(args(&csv, &output, &mock.url(), &[])).await.unwrap_err();
    match err {
        IngestError::Server { status, body } => {
            assert_eq!(status, 413);
            assert_eq!(body, "request entity too large");
        }
        other => panic!("expected ServerError, got {other:?}"),
    }
    // the inspection copy is written before the request
    assert!(output.exists());
}

#[tokio::test]
async fn unreachable_cluster_is_a_network_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id;name\n1;a\n");
    let output = dir.path().join("bulk_data.json");

    let err = execute(args(&csv, &output, REFUSED_URL, &[])).await.unwrap_err();
    assert!(matches!(err, IngestError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn non_json_success_body_is_a_parse_error() {
    let mock = MockSearchEngine::start(StatusCode::OK, "<html>proxy</html>").await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id\n1\n");
    let output = dir.path().join("bulk_data.json");

    let err = execute(args(&csv, &output, &mock.url(), &[])).await.unwrap_err();
    assert!(matches!(err, IngestError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_table_aborts_before_sending() {
    let mock = MockSearchEngine::start(StatusCode::OK, "{}").await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id;name\n1;a;surplus\n");
    let output = dir.path().join("bulk_data.json");

    let err = execute(args(&csv, &output, &mock.url(), &[])).await.unwrap_err();
    assert!(matches!(err, IngestError::Parse(_)), "got {err:?}");
    assert!(mock.requests().is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn dry_run_writes_but_does_not_send() {
    let mock = MockSearchEngine::start(StatusCode::OK, "{}").await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id;name\n1;a\n2;b\n");
    let output = dir.path().join("out").join("bulk_data.json");

    let response = execute(args(&csv, &output, &mock.url(), &["--dry-run", "--keep-strings"]))
        .await
        .unwrap();
    assert!(response.is_none());
    assert!(mock.requests().is_empty());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), TWO_ROWS_PAYLOAD);
}

#[tokio::test]
async fn failed_inspection_copy_does_not_abort() {
    let mock = MockSearchEngine::start(StatusCode::OK, r#"{"took":1,"errors":false,"items":[]}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "id;name\n1;a\n");
    // the output path is an existing directory, so the write fails
    let output = dir.path().to_path_buf();

    let response = execute(args(&csv, &output, &mock.url(), &[])).await.unwrap();
    assert!(response.is_some());
    assert_eq!(mock.requests().len(), 1);
}
