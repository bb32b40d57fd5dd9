use std::time::Duration;

// A plain browser user-agent; some pages answer bots with stripped-down
// markup and the extraction API then sees different images.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("TimeoutError: {0}")]
    Timeout(String),
    #[error("ConnectError: {0}")]
    Connect(String),
    #[error("RequestError: {0}")]
    Request(String),
}

// ── Fetch outcome ────────────────────────────────────────────────────────────

/// What one GET produced: the URL after redirects, the status code, and
/// the raw body bytes.
#[derive(Debug)]
pub struct FetchOutcome {
    pub final_url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

// ── Fetcher ──────────────────────────────────────────────────────────────────

/// Thin GET wrapper shared by all three outbound calls.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(accept_invalid_certs: bool) -> Result<Self, FetchError> {
        let mut builder = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT);

        if accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for outbound requests");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn get(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(e.to_string())
            } else if e.is_connect() {
                FetchError::Connect(e.to_string())
            } else {
                FetchError::Request(e.to_string())
            }
        })?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?
            .to_vec();

        tracing::debug!(%url, status, bytes = body.len(), "fetched");

        Ok(FetchOutcome {
            final_url,
            status,
            body,
        })
    }
}
