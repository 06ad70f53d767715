use chrono::{DateTime, Local, SecondsFormat, Utc};
use fake::faker::internet::en::{DomainSuffix, IPv4, UserAgent};
use fake::faker::lorem::en::Word;
use fake::faker::name::en::LastName;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::weighted::WeightedIndex;
use rand_distr::{Distribution, Normal};
use uuid::Builder;

use crate::error::IngestError;
use crate::models::log_entry::LogEntry;
use crate::utils::round_to;

pub const HTTP_METHODS: [&str; 5] = ["GET", "POST", "DELETE", "PUT", "PATCH"];
pub const RESOURCES: [&str; 8] = [
    "/login",
    "/register",
    "/products",
    "/cart",
    "/checkout",
    "/api/v1/user",
    "/api/v1/orders",
    "/api/v1/payment",
];
pub const API_PREFIX: &str = "/api/v1/";
pub const STATUS_CODES: [u16; 6] = [200, 404, 500, 301, 403, 503];
pub const STATUS_WEIGHTS: [f64; 6] = [0.85, 0.05, 0.02, 0.04, 0.02, 0.02];
pub const BROWSERS: [&str; 5] = ["Chrome", "Firefox", "Edge", "Safari", "Opera"];
pub const OS_TYPES: [&str; 5] = ["Windows", "macOS", "Linux", "Android", "iOS"];
pub const DEVICE_TYPES: [&str; 3] = ["Desktop", "Mobile", "Tablet"];
const PAGE_EXTENSIONS: [&str; 5] = ["", "/", ".html", ".php", ".jsp"];

const RESPONSE_SIZE_MEAN: f64 = 5000.0;
const RESPONSE_SIZE_STD_DEV: f64 = 50.0;

pub fn error_message_for(status_code: u16) -> &'static str {
    match status_code {
        500 => "Internal Server Error",
        403 => "Forbidden - Access Denied",
        404 => "Page Not Found",
        503 => "Service Unavailable",
        _ => "",
    }
}

/// Builds fake access-log entries. Every field is drawn independently per call.
pub struct LogGenerator<R: Rng> {
    rng: R,
    status_dist: WeightedIndex<f64>,
    size_dist: Normal<f64>,
}

impl LogGenerator<StdRng> {
    pub fn from_os_rng() -> Result<Self, IngestError> {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> LogGenerator<R> {
    pub fn new(rng: R) -> Result<Self, IngestError> {
        let status_dist = WeightedIndex::new(STATUS_WEIGHTS)
            .map_err(|e| IngestError::Config(format!("status weights: {e}")))?;
        let size_dist = Normal::new(RESPONSE_SIZE_MEAN, RESPONSE_SIZE_STD_DEV)
            .map_err(|e| IngestError::Config(format!("response size distribution: {e}")))?;
        Ok(Self {
            rng,
            status_dist,
            size_dist,
        })
    }

    pub fn generate_entry(&mut self) -> LogEntry {
        self.generate_entry_at(Utc::now())
    }

    pub fn generate_entry_at(&mut self, now: DateTime<Utc>) -> LogEntry {
        let status_code = self.pick_status();
        let referer = self.random_referer();
        let referrer_domain = reqwest::Url::parse(&referer)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default();

        LogEntry {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, false),
            ip: IPv4().fake_with_rng(&mut self.rng),
            datetime: now
                .with_timezone(&Local)
                .format("%d/%b/%Y:%H:%M:%S %z")
                .to_string(),
            session_id: Builder::from_random_bytes(self.rng.random())
                .into_uuid()
                .to_string(),
            user_id: self.rng.random_range(1000..=9999),
            lat: round_to(self.rng.random_range(-90.0..=90.0), 6),
            lon: round_to(self.rng.random_range(-180.0..=180.0), 6),
            http_method: self.pick(&HTTP_METHODS).to_string(),
            url: self.pick_url(),
            status_code,
            response_size: self.size_dist.sample(&mut self.rng) as i64,
            referer,
            referrer_domain,
            user_agent: UserAgent().fake_with_rng(&mut self.rng),
            browser: self.pick(&BROWSERS).to_string(),
            os: self.pick(&OS_TYPES).to_string(),
            device_type: self.pick(&DEVICE_TYPES).to_string(),
            request_time: round_to(self.rng.random_range(0.1..=1.5), 3),
            error_message: error_message_for(status_code).to_string(),
        }
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.random_range(0..items.len())]
    }

    fn pick_url(&mut self) -> String {
        let resource = self.pick(&RESOURCES);
        if resource.starts_with(API_PREFIX) {
            format!("{}/{}", resource, self.rng.random_range(100..=999))
        } else {
            resource.to_string()
        }
    }

    fn pick_status(&mut self) -> u16 {
        STATUS_CODES[self.status_dist.sample(&mut self.rng)]
    }

    fn random_referer(&mut self) -> String {
        let scheme = if self.rng.random_bool(0.5) { "https" } else { "http" };
        let www = if self.rng.random_bool(0.5) { "www." } else { "" };
        let name: String = LastName().fake_with_rng(&mut self.rng);
        let suffix: String = DomainSuffix().fake_with_rng(&mut self.rng);

        let mut path = String::new();
        for _ in 0..self.rng.random_range(1..=3) {
            let word: String = Word().fake_with_rng(&mut self.rng);
            path.push('/');
            path.push_str(&slug(&word, "page"));
        }
        path.push_str(self.pick(&PAGE_EXTENSIONS));

        format!(
            "{}://{}{}.{}{}",
            scheme,
            www,
            slug(&name, "example"),
            slug(&suffix, "com"),
            path
        )
    }
}

fn slug(value: &str, fallback: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
