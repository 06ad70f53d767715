use std::process::ExitCode;

use es_ingest_tools::log_generator;

#[tokio::main]
async fn main() -> ExitCode {
    log_generator::run().await
}
