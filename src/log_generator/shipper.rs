use reqwest::StatusCode;
use tracing::{error, info};

use crate::error::IngestError;
use crate::es_client::EsClient;
use crate::models::log_entry::LogEntry;

pub const MILESTONE_EVERY: u64 = 10;

/// Successful deliveries for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunCounter {
    accepted: u64,
}

impl RunCounter {
    /// Counts one accepted entry; true when a milestone was just reached.
    pub fn record_success(&mut self) -> bool {
        self.accepted += 1;
        self.accepted % MILESTONE_EVERY == 0
    }

    pub fn get(&self) -> u64 {
        self.accepted
    }
}

#[derive(Debug)]
pub enum SendOutcome {
    Accepted { total: u64, milestone: bool },
    /// Any status other than 200 or 201 arrives as `IngestError::Server`,
    /// connection-level failures as `IngestError::Network`.
    Failed(IngestError),
}

/// Owns the client and the run counter; one document per call.
#[derive(Debug)]
pub struct LogShipper {
    client: EsClient,
    counter: RunCounter,
}

impl LogShipper {
    pub fn new(client: EsClient) -> Self {
        Self {
            client,
            counter: RunCounter::default(),
        }
    }

    pub fn counter(&self) -> RunCounter {
        self.counter
    }

    pub async fn send_entry(&mut self, entry: &LogEntry) -> SendOutcome {
        info!(
            "Sending log: {}",
            serde_json::to_string(entry).unwrap_or_default()
        );

        let result = self.client.index_document(entry).await.and_then(|response| {
            if response.status == StatusCode::OK || response.status == StatusCode::CREATED {
                Ok(())
            } else {
                Err(IngestError::Server {
                    status: response.status.as_u16(),
                    body: response.body,
                })
            }
        });

        match result {
            Ok(()) => {
                let milestone = self.counter.record_success();
                if milestone {
                    info!("{} logs sent successfully!", self.counter.get());
                }
                SendOutcome::Accepted {
                    total: self.counter.get(),
                    milestone,
                }
            }
            Err(e) => {
                match &e {
                    IngestError::Server { status, body } => {
                        error!("[{}] Failed to send log: {}, {}", e.kind(), status, body)
                    }
                    _ => error!("[{}] Connection error: {}", e.kind(), e),
                }
                SendOutcome::Failed(e)
            }
        }
    }
}
