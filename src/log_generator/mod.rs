//! Fake access logs, indexed one document at a time.

mod generator;
mod shipper;

use std::num::NonZeroU64;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use rand::Rng;
use tracing::{error, info};

use crate::conf::ConnectionArgs;
use crate::error::IngestError;
use crate::es_client::EsClient;
use crate::utils;

pub use generator::{
    error_message_for, LogGenerator, API_PREFIX, BROWSERS, DEVICE_TYPES, HTTP_METHODS, OS_TYPES,
    RESOURCES, STATUS_CODES, STATUS_WEIGHTS,
};
pub use shipper::{LogShipper, RunCounter, SendOutcome, MILESTONE_EVERY};

#[derive(Parser, Debug)]
#[command(name = "fake-log-generator", version, about = "Enhanced fake log generator")]
pub struct LogGeneratorArgs {
    /// Number of logs to generate (0 for infinite)
    #[arg(short = 'n', long = "num", value_name = "COUNT", default_value_t = 100)]
    num_lines: u64,
    /// Sleep time between logs (in seconds)
    #[arg(short, long, value_name = "SECONDS", default_value = "0.5", value_parser = parse_sleep)]
    sleep: Duration,
    #[arg(long, default_value = "logs-demo")]
    index: String,
    /// Per-request timeout, at least one second
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_seconds: u64,
    #[arg(short, long)]
    debug: bool,
    #[command(flatten)]
    connection: ConnectionArgs,
}

impl LogGeneratorArgs {
    /// `None` means run until interrupted.
    pub fn limit(&self) -> Option<NonZeroU64> {
        NonZeroU64::new(self.num_lines)
    }

    pub fn pause(&self) -> Duration {
        self.sleep
    }
}

fn parse_sleep(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|e| format!("invalid number of seconds {value:?}: {e}"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("sleep must be a finite, non-negative number, got {value}"))
}

/// Totals of one loop run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    pub attempts: u64,
    pub accepted: u64,
    pub milestones: u64,
}

pub async fn run() -> ExitCode {
    let args = LogGeneratorArgs::parse();
    utils::init_tracing(args.debug);

    match execute(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[{}] log generator could not start: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

/// Only setup errors are returned; failed sends are logged and skipped.
pub async fn execute(args: LogGeneratorArgs) -> Result<LoopReport, IngestError> {
    let limit = args.limit();
    let pause = args.pause();
    let timeout = Some(Duration::from_secs(args.timeout_seconds));
    let endpoint = args.connection.into_endpoint(&args.index, timeout);
    let target = format!("{}/{}", endpoint.get_url(), endpoint.get_index());

    let mut shipper = LogShipper::new(EsClient::new(endpoint)?);
    let mut generator = LogGenerator::from_os_rng()?;

    match limit {
        Some(count) => info!("Sending {} logs to {} every {:?}", count, target, pause),
        None => info!("Sending logs to {} every {:?} until interrupted", target, pause),
    }

    let report = run_loop(&mut generator, &mut shipper, limit, pause).await;
    info!("Finished sending {} logs to {}!", report.accepted, target);
    Ok(report)
}

/// Generate, send, sleep; strictly in that order. Never returns when
/// `limit` is `None`.
pub async fn run_loop<R: Rng>(
    generator: &mut LogGenerator<R>,
    shipper: &mut LogShipper,
    limit: Option<NonZeroU64>,
    pause: Duration,
) -> LoopReport {
    let mut remaining = limit.map(NonZeroU64::get);
    let mut attempts = 0;
    let mut milestones = 0;

    while remaining != Some(0) {
        let entry = generator.generate_entry();
        if let SendOutcome::Accepted {
            milestone: true, ..
        } = shipper.send_entry(&entry).await
        {
            milestones += 1;
        }
        attempts += 1;

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        if let Some(left) = remaining.as_mut() {
            *left -= 1;
        }
    }

    LoopReport {
        attempts,
        accepted: shipper.counter().get(),
        milestones,
    }
}
