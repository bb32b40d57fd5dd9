use serde::{Deserialize, Serialize, Serializer};

// ── Inbound ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ThumbnailParams {
    #[serde(rename = "pageUrl")]
    pub page_url: Option<String>,
}

// ── Extraction API payload ───────────────────────────────────────────────────

/// The slice of the extraction API response this service reads. Absent
/// fields degrade to empty so a sparse payload falls through the favicon
/// branch instead of failing to parse.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractPayload {
    #[serde(default)]
    pub images: Vec<ExtractImage>,
    pub favicon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractImage {
    pub url: String,
}

// ── Outbound report ──────────────────────────────────────────────────────────

/// The one externally visible output, in the legacy wire shape consumers
/// already parse: `useDefaultThumb` is the string `"true"`/`"false"`, and
/// dimensions are numbers or `""` when the input never validated.
#[derive(Debug, Serialize)]
pub struct ThumbnailReport {
    #[serde(rename = "useDefaultThumb", serialize_with = "bool_as_literal")]
    pub use_default_thumb: bool,
    #[serde(rename = "debugInfoArray")]
    pub debug_info: Vec<String>,
    #[serde(rename = "finalPageUrl")]
    pub final_page_url: String,
    #[serde(rename = "imageUrlArray")]
    pub image_urls: Vec<String>,
    #[serde(rename = "thumbnailedImages")]
    pub thumbnails: Vec<String>,
    #[serde(rename = "thumbnailDimensions")]
    pub dimensions: ReportDimensions,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportDimensions {
    #[serde(serialize_with = "dimension_or_empty")]
    pub width: Option<u32>,
    #[serde(serialize_with = "dimension_or_empty")]
    pub height: Option<u32>,
}

fn bool_as_literal<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "true" } else { "false" })
}

fn dimension_or_empty<S>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_u32(*v),
        None => serializer.serialize_str(""),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
