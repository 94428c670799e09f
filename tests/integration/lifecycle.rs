//! End-to-end job lifecycle against a mock org.

use super::common::{job_json, MockOrg, ACCESS_TOKEN, JOBS_PATH};
use futures::StreamExt;
use sf_ingest::{BulkOperation, ErrorKind, JobState};
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const JOB_ID: &str = "7505fEXAMPLE4C2AAM";
const CSV: &str = "Name,Industry\nAcme Corp,Technology\nGlobex,Manufacturing\n";

#[tokio::test]
async fn test_upload_close_poll_and_stream_successes() {
    let org = MockOrg::start().await;
    let server = &org.server;
    let job_path = format!("{JOBS_PATH}/{JOB_ID}");

    Mock::given(method("POST"))
        .and(path(JOBS_PATH))
        .and(header("Authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .and(body_json(serde_json::json!({
            "object": "Account",
            "operation": "insert"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, "Open", 0, 0)))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{job_path}/batches")))
        .and(header("Content-Type", "text/csv"))
        .and(body_string(CSV))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(job_path.as_str()))
        .and(body_json(serde_json::json!({"state": "UploadComplete"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, "UploadComplete", 0, 0)),
        )
        .expect(1)
        .mount(server)
        .await;

    // First status read: still open; then two processing polls; then done
    Mock::given(method("GET"))
        .and(path(job_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, "Open", 0, 0)))
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(job_path.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, "InProgress", 1, 0)),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(job_path.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, "JobComplete", 2, 0)),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{job_path}/successfulResults/")))
        .and(header("Accept", "text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "\"sf__Id\",\"sf__Created\",Name,Industry\n\
             \"001xx000003DGb1AAG\",\"true\",\"Acme Corp\",\"Technology\"\n\
             \"001xx000003DGb2AAG\",\"true\",\"Globex\",\"Manufacturing\"\n",
        ))
        .expect(1)
        .mount(server)
        .await;

    let client = org.client("Account", BulkOperation::Insert);
    assert_eq!(client.api_version(), "62.0");

    client.upload_job_data(CSV).await.expect("upload should create a job and send the CSV");
    assert_eq!(client.job_id().await.as_deref(), Some(JOB_ID));

    let info = client.get_job_info(None).await.unwrap();
    assert_eq!(info.state, JobState::Open);
    assert!(!info.state.is_terminal());

    let closed = client.close_job(None).await.unwrap();
    assert_eq!(closed.state, JobState::UploadComplete);

    let done = client.wait_for_job(None).await.unwrap();
    assert_eq!(done.state, JobState::JobComplete);
    assert_eq!(done.number_records_processed, 2);
    assert_eq!(done.api_version.as_deref(), Some("62.0"));

    let mut successes = client.get_successful_results(None).await.unwrap();
    let mut body = Vec::new();
    while let Some(chunk) = successes.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    let body = String::from_utf8(body).unwrap();
    assert_eq!(body.lines().count(), 3);
    assert!(body.contains("001xx000003DGb2AAG"));
}

#[tokio::test]
async fn test_abort_then_close_surfaces_invalid_state() {
    let org = MockOrg::start().await;
    let server = &org.server;
    let job_path = format!("{JOBS_PATH}/{JOB_ID}");

    Mock::given(method("POST"))
        .and(path(JOBS_PATH))
        .and(body_json(serde_json::json!({
            "object": "Contact",
            "operation": "upsert",
            "externalIdFieldName": "Ext_Id__c"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, "Open", 0, 0)))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(job_path.as_str()))
        .and(body_json(serde_json::json!({"state": "Aborted"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, "Aborted", 0, 0)))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(job_path.as_str()))
        .and(body_json(serde_json::json!({"state": "UploadComplete"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!([{
            "errorCode": "INVALIDJOBSTATE",
            "message": "Aborted Job cannot be updated"
        }])))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(job_path.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(server)
        .await;

    let client = sf_ingest::JobClient::builder()
        .url(server.uri())
        .username("integration@example.com")
        .password("correct-horse")
        .token("BATTERYSTAPLE")
        .api_version("62.0")
        .consumer_key("3MVG9-consumer-key")
        .consumer_secret("consumer-secret")
        .object("Contact")
        .operation(BulkOperation::Upsert)
        .external_id_field_name("Ext_Id__c")
        .client_config(
            sf_ingest::client::ClientConfig::builder()
                .with_compression(false)
                .build(),
        )
        .build()
        .unwrap();

    let job = client.create_job().await.unwrap();
    let aborted = client.abort_job(Some(job.id.as_str())).await.unwrap();
    assert_eq!(aborted.state, JobState::Aborted);

    let err = client.close_job(None).await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Client(_)));
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("INVALIDJOBSTATE"));

    client.delete_job(None).await.unwrap();
}

#[tokio::test]
async fn test_failed_job_exposes_failed_and_unprocessed_records() {
    let org = MockOrg::start().await;
    let server = &org.server;
    let other_job = "7505fOTHERJOB01AAA";
    let job_path = format!("{JOBS_PATH}/{other_job}");

    Mock::given(method("GET"))
        .and(path(job_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut job = job_json(other_job, "Failed", 1, 1);
            job["errorMessage"] = serde_json::json!("InvalidBatch : Field name not found : Nme");
            job
        }))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{job_path}/failedResults/")))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "\"sf__Id\",\"sf__Error\",Nme\n\"\",\"INVALID_FIELD:Nme\",\"Acme\"\n",
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{job_path}/unprocessedrecords/")))
        .respond_with(ResponseTemplate::new(200).set_body_string("Nme\n\"Globex\"\n"))
        .expect(1)
        .mount(server)
        .await;

    let client = org.client("Account", BulkOperation::Insert);

    // The client never created a job; all calls name one explicitly
    let job = client.wait_for_job(Some(other_job)).await.unwrap();
    assert_eq!(job.state, JobState::Failed);
    assert!(!job.state.is_success());
    assert!(job.error_message.unwrap().contains("Nme"));

    let failed = client
        .get_failed_results(Some(other_job))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(failed.contains("INVALID_FIELD"));

    let unprocessed = client
        .get_unprocessed_records(Some(other_job))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(unprocessed, "Nme\n\"Globex\"\n");

    assert!(client.job_id().await.is_none());
}
