//! Generation API client and request orchestration.
//!
//! Sends one composed request to the Gemini `generateContent` endpoint and
//! maps the outcome to a precise error taxonomy. There is no retry logic
//! anywhere: one user action, one request, and the user re-triggers manually
//! on failure.
//!
//! # Error taxonomy
//!
//! Upstream failures are deliberately split so the caller can react
//! differently to each:
//!
//! - [`GenerateError::MissingKey`]: no API key before the request is sent
//! - [`GenerateError::EmptyResponse`]: the model returned no candidates
//! - [`GenerateError::MalformedResponse`]: a candidate without content parts
//! - [`GenerateError::NoImage`]: parts present, none carries image data
//! - [`GenerateError::Credential`]: the upstream message indicates an
//!   invalid or unauthorized key; the caller should prompt for
//!   re-authentication instead of showing a generic failure
//! - [`GenerateError::Upstream`]: anything else, original message attached
//!
//! # Credential boundary
//!
//! The API key comes from an injected [`KeySource`] rather than an ambient
//! global, so the CLI can read the environment while tests substitute a
//! fixed or absent key.

use crate::compose::{GenerationRequest, Part};
use crate::project::ImageData;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("no API key configured (set {API_KEY_VAR})")]
    MissingKey,
    #[error("the model did not return any candidates")]
    EmptyResponse,
    #[error("the model candidate did not contain any content parts")]
    MalformedResponse,
    #[error("the model did not return an image part")]
    NoImage,
    #[error("credential rejected by the API: {0}")]
    Credential(String),
    #[error("generation request failed: {0}")]
    Upstream(String),
}

/// Capability for obtaining the generation API key.
pub trait KeySource {
    fn has_key(&self) -> bool;
    fn key(&self) -> Option<String>;
}

/// Reads the key from the `GEMINI_API_KEY` environment variable.
pub struct EnvKeySource;

impl KeySource for EnvKeySource {
    fn has_key(&self) -> bool {
        self.key().is_some()
    }

    fn key(&self) -> Option<String> {
        std::env::var(API_KEY_VAR).ok().filter(|k| !k.is_empty())
    }
}

// ============================================================================
// Wire types (REST generateContent, camelCase JSON)
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentBody {
    contents: Vec<WireContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct WireContent {
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
struct WirePart {
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireInlineData {
    #[serde(rename = "mimeType", default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Serialize)]
struct WireGenerationConfig {
    #[serde(rename = "imageConfig")]
    image_config: WireImageConfig,
}

#[derive(Debug, Serialize)]
struct WireImageConfig {
    #[serde(rename = "aspectRatio")]
    aspect_ratio: &'static str,
    #[serde(rename = "imageSize")]
    image_size: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(rename = "inlineData", default)]
    inline_data: Option<WireInlineData>,
}

fn to_body(request: &GenerationRequest) -> GenerateContentBody {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            Part::Inline(image) => WirePart {
                inline_data: Some(WireInlineData {
                    mime_type: Some(image.mime_type.clone()),
                    data: image.to_base64(),
                }),
                text: None,
            },
            Part::Text(text) => WirePart {
                inline_data: None,
                text: Some(text.clone()),
            },
        })
        .collect();

    GenerateContentBody {
        contents: vec![WireContent { parts }],
        generation_config: request.image_config.map(|config| WireGenerationConfig {
            image_config: WireImageConfig {
                aspect_ratio: config.aspect_ratio,
                image_size: config.image_size,
            },
        }),
    }
}

// ============================================================================
// Client
// ============================================================================

/// Blocking client for the generation endpoint.
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl Client {
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint root (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Issue exactly one generation request and await its single outcome.
    ///
    /// The returned image is the first inline-data part of the first
    /// candidate, re-wrapped as [`ImageData`].
    pub fn generate(
        &self,
        keys: &dyn KeySource,
        request: &GenerationRequest,
    ) -> Result<ImageData, GenerateError> {
        let key = keys.key().ok_or(GenerateError::MissingKey)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        info!("requesting render from {}", request.model);
        debug!("{} content parts", request.parts.len());

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&to_body(request))
            .send()
            .map_err(|e| GenerateError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| GenerateError::Upstream(format!("unreadable response: {e}")))?;
        extract_image(&parsed)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an HTTP failure to `Credential` when the message points at the key,
/// otherwise `Upstream` with the original message intact.
fn classify_failure(status: u16, body: &str) -> GenerateError {
    let credential_message =
        body.contains("API_KEY_INVALID") || body.contains("Requested entity was not found");
    if credential_message || status == 401 || status == 403 {
        GenerateError::Credential(body.to_string())
    } else {
        GenerateError::Upstream(format!("API error {status}: {body}"))
    }
}

/// Walk candidates/parts and pull out the first inline image.
///
/// Pure over the deserialized response; this is where the empty/malformed/
/// no-image distinctions are made.
pub fn extract_image(response: &GenerateContentResponse) -> Result<ImageData, GenerateError> {
    let candidate = response
        .candidates
        .first()
        .ok_or(GenerateError::EmptyResponse)?;
    let content = candidate
        .content
        .as_ref()
        .ok_or(GenerateError::MalformedResponse)?;
    if content.parts.is_empty() {
        return Err(GenerateError::MalformedResponse);
    }

    for part in &content.parts {
        if let Some(inline) = &part.inline_data {
            let data = BASE64
                .decode(inline.data.as_bytes())
                .map_err(|_| GenerateError::MalformedResponse)?;
            return Ok(ImageData {
                mime_type: inline
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| "image/png".to_string()),
                data,
            });
        }
    }
    Err(GenerateError::NoImage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ImageConfig, compose};
    use crate::project::{ElementKind, ProjectState};

    /// Key source with a fixed key, or none.
    struct FixedKey(Option<&'static str>);

    impl KeySource for FixedKey {
        fn has_key(&self) -> bool {
            self.0.is_some()
        }
        fn key(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn response_from(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    // =========================================================================
    // extract_image taxonomy
    // =========================================================================

    #[test]
    fn no_candidates_is_empty_response() {
        let response = response_from(r#"{"candidates": []}"#);
        assert!(matches!(
            extract_image(&response),
            Err(GenerateError::EmptyResponse)
        ));

        let response = response_from("{}");
        assert!(matches!(
            extract_image(&response),
            Err(GenerateError::EmptyResponse)
        ));
    }

    #[test]
    fn candidate_without_parts_is_malformed() {
        let response = response_from(r#"{"candidates": [{}]}"#);
        assert!(matches!(
            extract_image(&response),
            Err(GenerateError::MalformedResponse)
        ));

        let response = response_from(r#"{"candidates": [{"content": {"parts": []}}]}"#);
        assert!(matches!(
            extract_image(&response),
            Err(GenerateError::MalformedResponse)
        ));
    }

    #[test]
    fn text_only_parts_is_no_image() {
        let response =
            response_from(r#"{"candidates": [{"content": {"parts": [{"text": "sorry"}]}}]}"#);
        assert!(matches!(
            extract_image(&response),
            Err(GenerateError::NoImage)
        ));
    }

    #[test]
    fn inline_data_is_decoded_and_wrapped() {
        let response = response_from(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "here you go"},
                {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
            ]}}]}"#,
        );
        let image = extract_image(&response).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, vec![1, 2, 3]);
    }

    #[test]
    fn missing_mime_type_defaults_to_png() {
        let response = response_from(
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {"data": "AQID"}}]}}]}"#,
        );
        assert_eq!(extract_image(&response).unwrap().mime_type, "image/png");
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let response = response_from(
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {"data": "!!!"}}]}}]}"#,
        );
        assert!(matches!(
            extract_image(&response),
            Err(GenerateError::MalformedResponse)
        ));
    }

    // =========================================================================
    // Failure classification
    // =========================================================================

    #[test]
    fn api_key_invalid_message_is_credential() {
        let err = classify_failure(400, r#"{"error": {"status": "API_KEY_INVALID"}}"#);
        assert!(matches!(err, GenerateError::Credential(_)));
    }

    #[test]
    fn entity_not_found_message_is_credential() {
        let err = classify_failure(404, "Requested entity was not found.");
        assert!(matches!(err, GenerateError::Credential(_)));
    }

    #[test]
    fn unauthorized_status_is_credential() {
        assert!(matches!(
            classify_failure(401, "unauthorized"),
            GenerateError::Credential(_)
        ));
        assert!(matches!(
            classify_failure(403, "forbidden"),
            GenerateError::Credential(_)
        ));
    }

    #[test]
    fn other_failures_keep_original_message() {
        let err = classify_failure(503, "model overloaded");
        match err {
            GenerateError::Upstream(msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("model overloaded"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    // =========================================================================
    // Request body shape and key handling
    // =========================================================================

    fn ready_project() -> ProjectState {
        let mut project = ProjectState::default();
        project.land_photo = Some(crate::project::ImageData::jpeg(vec![7, 7]));
        project.select(ElementKind::Composter);
        project
    }

    #[test]
    fn body_orders_inline_parts_before_text() {
        let body = to_body(&compose(&ready_project()));
        let json = serde_json::to_value(&body).unwrap();
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0]["inlineData"]["data"].is_string());
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert!(parts[1]["text"].is_string());
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn image_config_serializes_under_generation_config() {
        let mut request = compose(&ready_project());
        request.image_config = Some(ImageConfig {
            aspect_ratio: "16:9",
            image_size: "1K",
        });
        let json = serde_json::to_value(to_body(&request)).unwrap();
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert_eq!(json["generationConfig"]["imageConfig"]["imageSize"], "1K");
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        // Unroutable base URL: if the key check didn't come first, this
        // would surface as an Upstream transport error instead.
        let client = Client::with_base_url("http://127.0.0.1:0");
        let result = client.generate(&FixedKey(None), &compose(&ready_project()));
        assert!(matches!(result, Err(GenerateError::MissingKey)));
    }

    #[test]
    fn fixed_key_source_round_trips() {
        let keys = FixedKey(Some("test-key"));
        assert!(keys.has_key());
        assert_eq!(keys.key().unwrap(), "test-key");
    }
}
