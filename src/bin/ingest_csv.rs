//! Upload one CSV file as a Bulk API 2.0 ingest job.
//!
//! Connection settings and the job shape come from `SF_*` environment
//! variables. Successful results are streamed to stdout; a summary and any
//! failed records go to stderr.
//!
//! ```sh
//! export SF_LOGIN_URL=https://login.salesforce.com
//! export SF_USERNAME=... SF_PASSWORD=... SF_SECURITY_TOKEN=...
//! export SF_CONSUMER_KEY=... SF_CONSUMER_SECRET=...
//! export SF_API_VERSION=62.0 SF_OBJECT=Account SF_OPERATION=insert
//! RUST_LOG=info cargo run --bin ingest-csv -- accounts.csv > created.csv
//! ```

use std::io::Write;
use std::process::ExitCode;

use futures::StreamExt;
use sf_ingest::{JobClientBuilder, ResultStream};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: ingest-csv <file.csv>");
        return ExitCode::from(2);
    };

    match run(&path).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every record was processed successfully.
async fn run(path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let csv = std::fs::read(path)?;
    let client = JobClientBuilder::from_env()?.build()?;

    client.upload_job_data(csv).await?;
    let job = client.close_job(None).await?;
    eprintln!("Job {} closed, waiting for processing...", job.id);

    let job = client.wait_for_job(None).await?;
    eprintln!(
        "Job {} finished: {:?}, {} processed, {} failed",
        job.id, job.state, job.number_records_processed, job.number_records_failed
    );
    if let Some(ref message) = job.error_message {
        eprintln!("  {message}");
    }

    if job.state.is_success() {
        copy_to(client.get_successful_results(None).await?, &mut std::io::stdout()).await?;
    }

    if job.number_records_failed > 0 {
        eprintln!("Failed records:");
        copy_to(client.get_failed_results(None).await?, &mut std::io::stderr()).await?;
    }

    Ok(job.state.is_success() && job.number_records_failed == 0)
}

async fn copy_to(mut results: ResultStream, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    while let Some(chunk) = results.next().await {
        out.write_all(&chunk?)?;
    }
    out.flush()?;
    Ok(())
}
