use std::env;

const DEFAULT_IMAGES_TO_KEEP: usize = 3;
const DEFAULT_MAX_WIDTH: u32 = 70;
const DEFAULT_MAX_HEIGHT: u32 = 55;
const DEFAULT_EXTRACT_API_URL: &str = "https://api.embed.ly/1/extract";
const DEFAULT_DISPLAY_API_URL: &str = "https://i.embed.ly/1/display/crop";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub resolver: ResolverConfig,
}

/// Per-deployment resolver settings. `imagesToKeep` and the thumbnail
/// dimensions are fixed at startup, not per-request.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub api_key: String,
    pub images_to_keep: usize,
    pub max_width: u32,
    pub max_height: u32,
    pub extract_api_url: String,
    pub display_api_url: String,
    /// Opt-in only. Skips TLS certificate verification on outbound calls.
    pub accept_invalid_certs: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            images_to_keep: DEFAULT_IMAGES_TO_KEEP,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            extract_api_url: DEFAULT_EXTRACT_API_URL.to_string(),
            display_api_url: DEFAULT_DISPLAY_API_URL.to_string(),
            accept_invalid_certs: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            resolver: ResolverConfig::from_env(),
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("EMBEDLY_API_KEY").unwrap_or_default(),
            images_to_keep: env::var("IMAGES_TO_KEEP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_IMAGES_TO_KEEP),
            max_width: env::var("THUMB_MAX_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_WIDTH),
            max_height: env::var("THUMB_MAX_HEIGHT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_HEIGHT),
            extract_api_url: env::var("EXTRACT_API_URL")
                .unwrap_or_else(|_| DEFAULT_EXTRACT_API_URL.to_string()),
            display_api_url: env::var("DISPLAY_API_URL")
                .unwrap_or_else(|_| DEFAULT_DISPLAY_API_URL.to_string()),
            accept_invalid_certs: env::var("ACCEPT_INVALID_CERTS").as_deref() == Ok("1"),
        }
    }
}
