use sf_ingest::client::ClientConfig;
use sf_ingest::{BulkOperation, JobClient, JobClientBuilder};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_TOKEN: &str = "00Dxx0000001gPL!AQ4AQFakeSessionToken";
pub const JOBS_PATH: &str = "/services/data/v62.0/jobs/ingest";

/// A mock org whose login, identity and service endpoints share one server.
pub struct MockOrg {
    pub server: MockServer,
}

impl MockOrg {
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": ACCESS_TOKEN,
                "id": format!("{}/id/00Dxx0000001gPL/00536000000IigRAAS", server.uri()),
                "instance_url": server.uri(),
                "token_type": "Bearer",
                "issued_at": "1700000000000",
                "signature": "c2lnbmF0dXJl"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/id/00Dxx0000001gPL/00536000000IigRAAS"))
            .and(header("Authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_id": "00536000000IigRAAS",
                "organization_id": "00Dxx0000001gPL",
                "username": "integration@example.com",
                "urls": {
                    "profile": format!("{}/00536000000IigRAAS", server.uri()),
                    "rest": format!("{}/services/data/v{{version}}/", server.uri())
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Self { server }
    }

    pub fn client(&self, object: &str, operation: BulkOperation) -> JobClient {
        JobClient::builder()
            .url(self.server.uri())
            .username("integration@example.com")
            .password("correct-horse")
            .token("BATTERYSTAPLE")
            .api_version("v62.0")
            .consumer_key("3MVG9-consumer-key")
            .consumer_secret("consumer-secret")
            .object(object)
            .operation(operation)
            .client_config(ClientConfig::builder().with_compression(false).build())
            .poll_interval(Duration::from_millis(20))
            .max_wait(Duration::from_secs(5))
            .build()
            .expect("mock org client should build")
    }
}

pub fn job_json(id: &str, state: &str, processed: i64, failed: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "operation": "insert",
        "object": "Account",
        "createdById": "00536000000IigRAAS",
        "createdDate": "2024-06-01T10:00:00.000+0000",
        "systemModstamp": "2024-06-01T10:00:05.000+0000",
        "state": state,
        "concurrencyMode": "Parallel",
        "contentType": "CSV",
        "apiVersion": 62.0,
        "lineEnding": "LF",
        "columnDelimiter": "COMMA",
        "numberRecordsProcessed": processed,
        "numberRecordsFailed": failed,
        "totalProcessingTime": 120
    })
}

/// Build a client for a real org from `SF_*` variables, panicking with a
/// pointer to the missing setting.
pub fn live_client() -> JobClient {
    JobClientBuilder::from_env()
        .and_then(|builder| builder.build())
        .unwrap_or_else(|e| {
            panic!(
                "live integration tests need SF_LOGIN_URL, SF_USERNAME, SF_PASSWORD, \
                 SF_SECURITY_TOKEN, SF_API_VERSION, SF_CONSUMER_KEY and SF_CONSUMER_SECRET: {e}"
            )
        })
}
