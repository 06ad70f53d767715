//! CSV file to `_bulk` request, sent in one shot.

mod payload;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::conf::ConnectionArgs;
use crate::error::IngestError;
use crate::es_client::EsClient;
use crate::models::bulk_response::BulkResponse;
use crate::utils;

pub use payload::{build_bulk_payload, write_inspection_copy};
pub use table::{infer_value, load_table, CellTyping, Record};

#[derive(Parser, Debug)]
#[command(name = "csv-bulk-loader", version, about = "Load a CSV file into an index through the bulk API")]
pub struct BulkLoaderArgs {
    /// Delimited text file with a header row
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,
    #[arg(long, default_value = ";", value_parser = parse_delimiter)]
    delimiter: u8,
    #[arg(long, default_value = "product_reviews")]
    index: String,
    /// Where the generated payload is written before sending
    #[arg(short, long, value_name = "PATH", default_value = "bulk_data.json")]
    output: PathBuf,
    /// Send every cell as a string instead of inferring numbers and booleans
    #[arg(long)]
    keep_strings: bool,
    /// Build and write the payload without sending it
    #[arg(long)]
    dry_run: bool,
    /// No timeout is applied unless set; at least one second
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_seconds: Option<u64>,
    #[arg(short, long)]
    debug: bool,
    #[command(flatten)]
    connection: ConnectionArgs,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    if value == "\\t" {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("delimiter must be a single ASCII character, got {value:?}")),
    }
}

pub async fn run() -> ExitCode {
    let args = BulkLoaderArgs::parse();
    utils::init_tracing(args.debug);
    info!("Bulk loader started!");

    match execute(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[{}] bulk load aborted: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

/// Load, render, persist and submit. Returns the parsed response, or `None`
/// on a dry run.
pub async fn execute(args: BulkLoaderArgs) -> Result<Option<Value>, IngestError> {
    let typing = if args.keep_strings {
        CellTyping::Strings
    } else {
        CellTyping::Inferred
    };
    let records = load_table(&args.file, args.delimiter, typing)?;
    info!(
        "Loaded {} rows from {:?}, memory={}",
        records.len(),
        args.file,
        utils::physical_memory_label()
    );

    let payload = build_bulk_payload(&records, &args.index)?;
    info!(
        "Bulk payload for index {} is {}",
        args.index,
        utils::size_label(payload.len())
    );

    match write_inspection_copy(&payload, &args.output).await {
        Ok(()) => info!("Bulk data has been written to {:?}", args.output),
        Err(e) => warn!("[{}] could not write inspection copy: {}", e.kind(), e),
    }

    if args.dry_run {
        info!("Dry run, nothing sent");
        return Ok(None);
    }

    let timeout = args.timeout_seconds.map(Duration::from_secs);
    let endpoint = args.connection.into_endpoint(&args.index, timeout);
    let client = EsClient::new(endpoint)?;
    let response = submit_bulk(&client, payload).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(Some(response))
}

/// One POST of the full payload; the top-level summary is logged as-is.
pub async fn submit_bulk(client: &EsClient, payload: String) -> Result<Value, IngestError> {
    let response = client.bulk(payload).await?;
    let summary = BulkResponse::new(&response);
    info!(
        "Bulk request accepted, took={:?}ms, items={}",
        summary.get_took(),
        summary.get_item_count()
    );
    if summary.has_errors() {
        warn!("Bulk response reports errors for some items, see the response body");
    }
    Ok(response)
}
