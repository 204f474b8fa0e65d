//! Address normalizer backed by the Gemini `generateContent` REST API.
//!
//! The model is asked for a JSON object matching a fixed response schema at zero temperature.
//! Output is still model-generated and not CASS certified; callers should treat it as an
//! estimate.

use crate::domain::ports::AddressNormalizer;
use crate::domain::record::NormalizedAddress;
use crate::error::{ImbError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiNormalizer`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct GeminiNormalizer {
    client: Client,
    config: GeminiConfig,
}

impl GeminiNormalizer {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ImbError::Config("Gemini API key is empty".to_string()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn prompt(raw_address: &str) -> String {
    format!(
        "You are an expert US Address Standardization system.\n\n\
         Task:\n\
         1. Standardize the input address to official USPS format (Caps, Abbreviations).\n\
         2. ZIP+4 LOOKUP: If the input is missing the +4 extension, you MUST identify the correct \
         4-digit add-on for the specific street address. Do not default to \"0000\" unless the \
         address is strictly invalid.\n\
         3. DELIVERY POINT: Calculate the 2-digit Delivery Point Code (typically the last two \
         digits of the primary street number).\n\n\
         Input Address: \"{raw_address}\"\n"
    )
}

fn address_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "street": { "type": "STRING", "description": "Standardized street address line 1" },
            "city": { "type": "STRING", "description": "City name" },
            "state": { "type": "STRING", "description": "2-letter state abbreviation" },
            "zip": { "type": "STRING", "description": "5-digit ZIP code" },
            "plus4": {
                "type": "STRING",
                "description": "The specific 4-digit add-on code. Calculate based on address range."
            },
            "deliveryPoint": {
                "type": "STRING",
                "description": "2-digit delivery point code (e.g. last 2 digits of street num)"
            }
        },
        "required": ["street", "city", "state", "zip", "plus4", "deliveryPoint"]
    })
}

#[async_trait]
impl AddressNormalizer for GeminiNormalizer {
    async fn normalize(&self, raw_address: &str) -> Result<NormalizedAddress> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt(raw_address)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: address_schema(),
                temperature: 0.0,
            },
        };

        debug!(model = %self.config.model, "Requesting address standardization");
        let response: GenerateContentResponse = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| ImbError::Normalizer("no response text".to_string()))?;

        Ok(serde_json::from_str(&text)?)
    }
}
