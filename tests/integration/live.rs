//! Live-org tests. Ignored unless run with `--ignored`.

use super::common::live_client;
use futures::StreamExt;
use sf_ingest::{BulkOperation, JobState};

#[tokio::test]
#[ignore = "requires a real Salesforce org configured through SF_* variables"]
async fn test_live_login_and_get_url() {
    let client = live_client();

    client.login().await.expect("login should succeed");
    let base_url = client.get_url().await.expect("identity lookup should succeed");

    assert!(base_url.starts_with("https://"), "unexpected base URL: {base_url}");
    assert!(!base_url.ends_with('/'));
}

#[tokio::test]
#[ignore = "requires a real Salesforce org configured through SF_* variables"]
async fn test_live_insert_lifecycle() {
    let client = live_client();
    if client.config().operation() != Some(BulkOperation::Insert)
        || client.config().object() != Some("Account")
    {
        panic!("set SF_OBJECT=Account and SF_OPERATION=insert for the live lifecycle test");
    }

    let stamp = chrono::Utc::now().timestamp_millis();
    let csv = format!("Name,Industry\nIngest Live {stamp} A,Technology\nIngest Live {stamp} B,Finance\n");

    client.upload_job_data(csv.into_bytes()).await.expect("upload should succeed");
    let closed = client.close_job(None).await.expect("close should succeed");
    assert_eq!(closed.state, JobState::UploadComplete);

    let job = client.wait_for_job(None).await.expect("job should finish");
    assert_eq!(job.state, JobState::JobComplete, "job ended as {:?}: {:?}", job.state, job.error_message);
    assert_eq!(job.number_records_processed, 2);
    assert_eq!(job.number_records_failed, 0);

    let mut successes = client.get_successful_results(None).await.unwrap();
    let mut body = Vec::new();
    while let Some(chunk) = successes.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    let body = String::from_utf8(body).unwrap();
    assert!(body.starts_with("\"sf__Id\""));
    assert_eq!(body.lines().count(), 3);

    // The created accounts stay; only the job record is removed
    client.delete_job(None).await.expect("delete should succeed");
}
