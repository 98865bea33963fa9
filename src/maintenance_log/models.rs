use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A maintenance issue submission.
///
/// Every field defaults when absent so the render endpoint can accept partial
/// records; creating a stored log validates the required fields separately.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[schema(example = "L1")]
    #[serde(default)]
    pub id: String,
    #[schema(example = "Leak")]
    #[serde(default)]
    pub title: String,
    #[schema(example = "it")]
    #[serde(default)]
    pub category: String,
    #[schema(example = "Rm 4")]
    #[serde(default)]
    pub location: String,
    #[schema(example = "Pipe burst\nWater on the floor")]
    #[serde(default)]
    pub description: String,
    #[schema(example = "A. Smith")]
    #[serde(default, alias = "author")]
    pub created_by: String,
    /// Pre-formatted by the client and printed verbatim.
    #[schema(example = "2024-01-01")]
    #[serde(default)]
    pub timestamp: String,
    /// Base64 payloads or data URIs, in photo order.
    #[serde(default)]
    pub images: Vec<String>,
    #[schema(example = "https://example.com/logo.png")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteLogResponse {
    pub message: String,
    pub id: String,
}
