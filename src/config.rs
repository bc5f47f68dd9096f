use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Process configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub endpoint: Url,
    pub port: u16,
    pub public_base_url: String,
    pub upload_dir: PathBuf,
    pub backend_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load from the process environment (call `dotenv()` first to pick up `.env`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let (api_key, endpoint) = match (get("AZURE_API_KEY"), get("AZURE_ENDPOINT")) {
            (Some(key), Some(endpoint)) => (key, endpoint),
            _ => bail!("Missing Azure API Key or Endpoint in .env (AZURE_API_KEY, AZURE_ENDPOINT)"),
        };

        let endpoint = Url::parse(&endpoint)
            .with_context(|| format!("AZURE_ENDPOINT is not a valid URL: {}", endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!("AZURE_ENDPOINT must be an http(s) URL, got {}", endpoint);
        }

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {}", raw))?,
            None => DEFAULT_PORT,
        };

        let public_base_url = get("API_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let upload_dir = get("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let backend_timeout = match get("BACKEND_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .with_context(|| format!("BACKEND_TIMEOUT_SECS must be a number: {}", raw))?;
                if secs == 0 {
                    bail!("BACKEND_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("MAX_UPLOAD_BYTES must be a number: {}", raw))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            api_key,
            endpoint,
            port,
            public_base_url,
            upload_dir,
            backend_timeout,
            max_upload_bytes,
        })
    }

    pub fn docs_url(&self) -> String {
        format!("{}/api-docs", self.public_base_url)
    }
}
