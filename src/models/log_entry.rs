use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// One synthetic access-log record, indexed as a single document.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub ip: String,
    pub datetime: String,
    pub session_id: String,
    pub user_id: u32,
    pub lat: f64,
    pub lon: f64,
    pub http_method: String,
    pub url: String,
    /// Emitted as a string, e.g. `"200"`.
    #[serde_as(as = "DisplayFromStr")]
    pub status_code: u16,
    pub response_size: i64,
    pub referer: String,
    pub referrer_domain: String,
    pub user_agent: String,
    pub browser: String,
    pub os: String,
    pub device_type: String,
    pub request_time: f64,
    pub error_message: String,
}
