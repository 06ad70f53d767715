use std::process::ExitCode;

use es_ingest_tools::bulk_loader;

#[tokio::main]
async fn main() -> ExitCode {
    bulk_loader::run().await
}
