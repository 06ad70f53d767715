use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

/// Connection flags shared by both binaries.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the search cluster
    #[arg(long, env = "ES_INGEST_URL", default_value = "https://localhost:9200")]
    url: String,
    #[arg(long, env = "ES_INGEST_USERNAME", default_value = "admin")]
    username: String,
    /// Basic auth is only sent when a password is set
    #[arg(long, env = "ES_INGEST_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Disable TLS certificate verification
    #[arg(long, env = "ES_INGEST_INSECURE")]
    insecure: bool,
    /// Directory with PEM files added as trusted roots
    #[arg(
        long = "root-certificates",
        alias = "ca-path",
        env = "ES_INGEST_ROOT_CERTIFICATES",
        value_name = "DIR"
    )]
    root_certificates: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn into_endpoint(self, index: &str, timeout: Option<Duration>) -> EndpointConfig {
        let mut endpoint = EndpointConfig::new(&self.url, index)
            .with_insecure(self.insecure)
            .with_timeout(timeout);
        if let Some(password) = self.password {
            endpoint = endpoint.with_basic_auth(&self.username, &password);
        }
        if let Some(dir) = self.root_certificates {
            endpoint = endpoint.with_root_certificates(dir);
        }
        endpoint
    }
}

#[derive(Debug, Clone)]
pub struct EndpointConfig {
    url: String,
    index: String,
    basic_auth: Option<BasicAuth>,
    insecure: bool,
    root_certificates: Option<PathBuf>,
    timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct BasicAuth {
    username: String,
    password: Option<String>,
}

impl BasicAuth {
    pub fn get_username(&self) -> &str {
        &self.username
    }
    pub fn get_password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl EndpointConfig {
    pub fn new(url: &str, index: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            index: index.to_string(),
            basic_auth: None,
            insecure: false,
            root_certificates: None,
            timeout: None,
        }
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.to_string(),
            password: Some(password.to_string()),
        });
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_root_certificates(mut self, dir: PathBuf) -> Self {
        self.root_certificates = Some(dir);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn get_url(&self) -> &str {
        &self.url
    }
    pub fn get_index(&self) -> &str {
        &self.index
    }
    pub fn get_root_certificates(&self) -> Option<&PathBuf> {
        self.root_certificates.as_ref()
    }
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }
    pub fn has_basic_auth(&self) -> bool {
        match &self.basic_auth {
            Some(auth) => !auth.get_username().is_empty() && auth.get_password().is_some(),
            None => false,
        }
    }
    pub fn get_username(&self) -> String {
        if let Some(basic_auth) = &self.basic_auth {
            basic_auth.get_username().to_string()
        } else {
            String::default()
        }
    }
    pub fn get_password(&self) -> Option<String> {
        self.basic_auth
            .as_ref()
            .and_then(|auth| auth.get_password().map(str::to_string))
    }
}
