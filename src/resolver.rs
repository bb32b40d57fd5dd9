use base64::{engine::general_purpose, Engine as _};
use futures::future::join_all;
use url::Url;

use crate::config::ResolverConfig;
use crate::fetch::{FetchError, HttpFetcher};
use crate::models::{ExtractPayload, ReportDimensions, ThumbnailReport};

// ── Image flavor ─────────────────────────────────────────────────────────────

/// Photographic images go through the crop API; icons are served verbatim.
#[derive(Debug, Clone, Copy)]
enum Flavor {
    Photo,
    Icon,
}

impl Flavor {
    fn media_type(self) -> &'static str {
        match self {
            Flavor::Photo => "jpeg",
            Flavor::Icon => "x-icon",
        }
    }
}

// ── Discovery outcome ────────────────────────────────────────────────────────

/// What the extraction step concluded. An unparseable body gets its own
/// variant so operators can tell it apart from a genuinely image-free page,
/// even though both end in the default thumbnail.
#[derive(Debug)]
enum Discovery {
    Photos(Vec<String>),
    Favicon(String),
    Nothing,
    MalformedPayload,
    UpstreamFailure,
}

#[derive(Debug)]
struct Extraction {
    final_page_url: String,
    discovery: Discovery,
}

#[derive(Debug)]
struct Rendered {
    thumbnails: Vec<String>,
    width: u32,
    height: u32,
}

// ── Resolver ─────────────────────────────────────────────────────────────────

pub struct ThumbnailResolver {
    fetcher: HttpFetcher,
    config: ResolverConfig,
}

impl ThumbnailResolver {
    pub fn new(config: ResolverConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config.accept_invalid_certs)?;
        Ok(Self { fetcher, config })
    }

    /// Runs the full pipeline for one request. Never fails: every problem is
    /// reported through the diagnostics list and the default-thumbnail flag.
    pub async fn resolve(&self, page_url: Option<&str>) -> ThumbnailReport {
        let mut diagnostics = Vec::new();

        let page_url = match page_url {
            Some(raw) if validate_page_url(raw).is_some() => raw,
            _ => {
                diagnostics.push(
                    "no pageUrl given, or the value is not an absolute http(s) URL".to_string(),
                );
                return rejected_report(diagnostics);
            }
        };

        let extraction = self.discover(page_url, &mut diagnostics).await;
        let rendered = self.render(&extraction.discovery, &mut diagnostics).await;

        let image_urls: Vec<String> = match &extraction.discovery {
            Discovery::Photos(urls) => urls.clone(),
            Discovery::Favicon(url) => vec![url.clone()],
            _ => Vec::new(),
        };

        // The flag covers every dead end: upstream failure, nothing found,
        // or a candidate list that produced no thumbnail at all.
        let use_default_thumb = rendered.thumbnails.is_empty();

        ThumbnailReport {
            use_default_thumb,
            debug_info: diagnostics,
            final_page_url: extraction.final_page_url,
            image_urls,
            thumbnails: rendered.thumbnails,
            dimensions: ReportDimensions {
                width: Some(rendered.width),
                height: Some(rendered.height),
            },
        }
    }

    // ── Discovery ────────────────────────────────────────────────────────────

    async fn discover(&self, page_url: &str, diagnostics: &mut Vec<String>) -> Extraction {
        // First hop only resolves redirects; the body is discarded. The
        // extraction API gets the canonical URL, not the one the caller sent.
        let final_page_url = match self.fetcher.get(page_url).await {
            Ok(outcome) => outcome.final_url,
            Err(err) => {
                diagnostics.push(format!(
                    "could not reach \"{page_url}\" ({err}), continuing with the URL as given"
                ));
                page_url.to_string()
            }
        };

        let outcome = match self.extract_request_url(&final_page_url) {
            Ok(request_url) => self.fetcher.get(request_url.as_str()).await,
            Err(reason) => Err(FetchError::Request(reason)),
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                diagnostics.push(format!("extraction request failed for \"{page_url}\" ({err})"));
                return Extraction {
                    final_page_url,
                    discovery: Discovery::UpstreamFailure,
                };
            }
        };

        if outcome.status != 200 {
            diagnostics.push(format!(
                "extraction API answered {} for \"{page_url}\"",
                outcome.status
            ));
            return Extraction {
                final_page_url,
                discovery: Discovery::UpstreamFailure,
            };
        }

        let discovery = match serde_json::from_slice::<ExtractPayload>(&outcome.body) {
            Ok(payload) => classify(payload, self.config.images_to_keep, diagnostics),
            Err(_) => {
                diagnostics.push(
                    "extraction API body was not valid JSON, treating the page as image-free"
                        .to_string(),
                );
                Discovery::MalformedPayload
            }
        };

        Extraction {
            final_page_url,
            discovery,
        }
    }

    fn extract_request_url(&self, final_page_url: &str) -> Result<Url, String> {
        Url::parse_with_params(
            &self.config.extract_api_url,
            [
                ("key", self.config.api_key.as_str()),
                ("url", final_page_url),
            ],
        )
        .map_err(|e| e.to_string())
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    async fn render(&self, discovery: &Discovery, diagnostics: &mut Vec<String>) -> Rendered {
        let width = self.config.max_width;
        let height = self.config.max_height;

        match discovery {
            Discovery::Photos(urls) if !urls.is_empty() => {
                let thumbnails = self.crop_all(urls, diagnostics).await;
                Rendered {
                    thumbnails,
                    width,
                    height,
                }
            }
            Discovery::Favicon(url) => {
                let thumbnails = self.fetch_icon(url, diagnostics).await;
                // Icons are kept square, so the reported width is the height.
                Rendered {
                    thumbnails,
                    width: height,
                    height,
                }
            }
            _ => {
                diagnostics
                    .push("no image URLs to render, no thumbnails were produced".to_string());
                Rendered {
                    thumbnails: Vec::new(),
                    width,
                    height,
                }
            }
        }
    }

    /// Crop requests are independent, so they fan out concurrently;
    /// `join_all` hands the results back in input order.
    async fn crop_all(&self, urls: &[String], diagnostics: &mut Vec<String>) -> Vec<String> {
        let crops = join_all(urls.iter().map(|url| self.crop_one(url))).await;

        let mut thumbnails = Vec::with_capacity(urls.len());
        for (url, crop) in urls.iter().zip(crops) {
            match crop {
                Ok(bytes) => thumbnails.push(data_uri(Flavor::Photo, &bytes)),
                Err(reason) => diagnostics.push(format!(
                    "crop request for \"{url}\" failed ({reason}), skipping this image"
                )),
            }
        }
        thumbnails
    }

    async fn crop_one(&self, image_url: &str) -> Result<Vec<u8>, String> {
        let width = self.config.max_width.to_string();
        let height = self.config.max_height.to_string();
        let request_url = Url::parse_with_params(
            &self.config.display_api_url,
            [
                ("key", self.config.api_key.as_str()),
                ("url", image_url),
                ("width", width.as_str()),
                ("height", height.as_str()),
            ],
        )
        .map_err(|e| e.to_string())?;

        let outcome = self
            .fetcher
            .get(request_url.as_str())
            .await
            .map_err(|e| e.to_string())?;

        if outcome.status != 200 {
            return Err(format!("status {}", outcome.status));
        }
        Ok(outcome.body)
    }

    /// Icons are not cropped; the favicon is fetched as-is.
    async fn fetch_icon(&self, icon_url: &str, diagnostics: &mut Vec<String>) -> Vec<String> {
        match self.fetcher.get(icon_url).await {
            Ok(outcome) if outcome.status == 200 => {
                vec![data_uri(Flavor::Icon, &outcome.body)]
            }
            Ok(outcome) => {
                diagnostics.push(format!(
                    "favicon request for \"{icon_url}\" answered {}",
                    outcome.status
                ));
                Vec::new()
            }
            Err(err) => {
                diagnostics.push(format!("favicon request for \"{icon_url}\" failed ({err})"));
                Vec::new()
            }
        }
    }
}

// ── Classification ───────────────────────────────────────────────────────────

fn classify(
    payload: ExtractPayload,
    images_to_keep: usize,
    diagnostics: &mut Vec<String>,
) -> Discovery {
    if !payload.images.is_empty() {
        let found = payload.images.len();
        diagnostics.push(format!("extraction API found {found} candidate images"));
        if found > images_to_keep {
            diagnostics.push(format!("keeping the first {images_to_keep}"));
        }
        let urls = payload
            .images
            .into_iter()
            .take(images_to_keep)
            .map(|image| image.url)
            .collect();
        return Discovery::Photos(urls);
    }

    diagnostics.push("extraction API found no images, falling back to the favicon".to_string());

    match payload.favicon_url.filter(|url| !url.is_empty()) {
        Some(url) => {
            diagnostics.push("favicon found, using it as the only candidate".to_string());
            Discovery::Favicon(url)
        }
        None => {
            diagnostics.push("no favicon either, default thumbnail will be used".to_string());
            Discovery::Nothing
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn validate_page_url(raw: &str) -> Option<Url> {
    let parsed = Url::parse(raw).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(parsed),
        _ => None,
    }
}

fn data_uri(flavor: Flavor, bytes: &[u8]) -> String {
    format!(
        "data:image/{};base64,{}",
        flavor.media_type(),
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Report for input that never validated: no outbound calls were made, so
/// there is no final URL and no dimensions to speak of.
fn rejected_report(diagnostics: Vec<String>) -> ThumbnailReport {
    ThumbnailReport {
        use_default_thumb: true,
        debug_info: diagnostics,
        final_page_url: String::new(),
        image_urls: Vec::new(),
        thumbnails: Vec::new(),
        dimensions: ReportDimensions {
            width: None,
            height: None,
        },
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
