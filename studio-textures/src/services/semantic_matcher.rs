//! AI semantic-match client
//!
//! Asks a chat-completions model whether a material descriptor is an existing
//! catalog texture (`link`) or needs a new one (`create`). The wire response
//! is loosely typed JSON; `parse_decision` turns it into `SemanticDecision`,
//! and anything that is neither a usable link nor a usable proposal becomes
//! `Unclear`.

use crate::models::{BilingualName, MaterialDescriptor, PriceTier};
use crate::services::match_context::MatchContextSnapshot;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Minimum AI confidence for a `link` decision to be accepted
pub const AI_LINK_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Semantic matcher errors
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty response from model")]
    EmptyResponse,
}

/// Input for one semantic-match call
#[derive(Debug, Clone)]
pub struct SemanticMatchRequest {
    pub descriptor: MaterialDescriptor,
    pub context: Arc<MatchContextSnapshot>,
    pub style_context: Option<String>,
    pub price_tier: PriceTier,
}

/// Properties the model proposes for a new texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureProposal {
    /// English side is always present; Hebrew may be empty (filled from the translation table)
    pub name: BilingualName,
    pub finish: Option<String>,
    pub sheen: Option<String>,
    pub base_color: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Model decision
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticDecision {
    Linked {
        target_id: Uuid,
        confidence: f64,
        reasoning: String,
    },
    Created {
        proposal: TextureProposal,
        confidence: f64,
        reasoning: String,
    },
    Unclear {
        reasoning: String,
    },
}

/// AI semantic-match service
#[async_trait]
pub trait SemanticMatcher: Send + Sync {
    async fn match_material(&self, request: &SemanticMatchRequest) -> Result<SemanticDecision, AiError>;
}

/// Matcher used when no AI credentials are configured; every descriptor goes to fallback synthesis
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSemanticMatcher;

#[async_trait]
impl SemanticMatcher for DisabledSemanticMatcher {
    async fn match_material(&self, _request: &SemanticMatchRequest) -> Result<SemanticDecision, AiError> {
        Ok(SemanticDecision::Unclear {
            reasoning: "semantic matching disabled".to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecision {
    action: Option<String>,
    target_id: Option<String>,
    confidence: Option<f64>,
    reasoning: Option<String>,
    proposal: Option<RawProposal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProposal {
    name: Option<RawName>,
    finish: Option<String>,
    sheen: Option<String>,
    base_color: Option<String>,
    category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    en: Option<String>,
    he: Option<String>,
}

/// Parse model output (optionally wrapped in a ```json fence) into a decision
///
/// Invalid JSON is an error; valid JSON with missing or inconsistent fields is `Unclear`.
pub fn parse_decision(content: &str) -> Result<SemanticDecision, AiError> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let raw: RawDecision =
        serde_json::from_str(body).map_err(|e| AiError::ParseError(e.to_string()))?;

    Ok(interpret(raw))
}

fn interpret(raw: RawDecision) -> SemanticDecision {
    let reasoning = raw.reasoning.unwrap_or_default();
    let confidence = raw.confidence.unwrap_or(0.0).clamp(0.0, 1.0);

    match raw.action.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("link") => match raw.target_id.as_deref().map(Uuid::parse_str) {
            Some(Ok(target_id)) => SemanticDecision::Linked {
                target_id,
                confidence,
                reasoning,
            },
            _ => SemanticDecision::Unclear {
                reasoning: format!("link without a valid target id: {}", reasoning),
            },
        },
        Some("create") => {
            let Some(proposal) = raw.proposal else {
                return SemanticDecision::Unclear {
                    reasoning: format!("create without a proposal: {}", reasoning),
                };
            };
            let (en, he) = proposal
                .name
                .map(|n| (n.en.unwrap_or_default(), n.he.unwrap_or_default()))
                .unwrap_or_default();
            if en.trim().is_empty() {
                return SemanticDecision::Unclear {
                    reasoning: format!("create without an English name: {}", reasoning),
                };
            }

            SemanticDecision::Created {
                proposal: TextureProposal {
                    name: BilingualName::new(en.trim(), he.trim()),
                    finish: non_blank(proposal.finish),
                    sheen: non_blank(proposal.sheen),
                    base_color: non_blank(proposal.base_color),
                    category_id: proposal
                        .category_id
                        .as_deref()
                        .and_then(|id| Uuid::parse_str(id).ok()),
                },
                confidence,
                reasoning,
            }
        }
        _ => SemanticDecision::Unclear { reasoning },
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

const SYSTEM_PROMPT: &str = "You maintain an interior-design material catalog. \
Given a material description and the existing textures and categories, decide whether the \
material is already in the catalog. Reply with a single JSON object only:\n\
{\"action\":\"link\",\"targetId\":\"<texture id>\",\"confidence\":0.0-1.0,\"reasoning\":\"...\"}\n\
or\n\
{\"action\":\"create\",\"proposal\":{\"name\":{\"en\":\"...\",\"he\":\"...\"},\"finish\":\"...\",\
\"sheen\":\"...\",\"baseColor\":\"...\",\"categoryId\":\"<category id>\"},\"confidence\":0.0-1.0,\
\"reasoning\":\"...\"}\n\
Only link when the existing texture is the same material with a compatible finish.";

/// User message: descriptor plus catalog context as JSON
pub fn build_user_prompt(request: &SemanticMatchRequest) -> String {
    let textures: Vec<_> = request
        .context
        .textures
        .iter()
        .map(|t| {
            json!({
                "id": t.id,
                "name": { "en": t.name.en, "he": t.name.he },
                "finish": t.finish,
                "sheen": t.sheen,
                "category": t.category_slug,
            })
        })
        .collect();
    let categories: Vec<_> = request
        .context
        .categories
        .iter()
        .map(|c| json!({ "id": c.id, "slug": c.slug, "name": { "en": c.name.en, "he": c.name.he } }))
        .collect();

    json!({
        "material": {
            "name": request.descriptor.candidate_name,
            "finish": request.descriptor.finish_hint,
            "category": request.descriptor.category_hint,
            "keywords": request.descriptor.keywords,
            "description": request.descriptor.source_fragment,
        },
        "priceTier": request.price_tier,
        "styleContext": request.style_context,
        "availableTextures": textures,
        "availableCategories": categories,
    })
    .to_string()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: serde_json::Value,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat-completions HTTP client
pub struct HttpSemanticMatcher {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    rate_limiter: governor::DefaultDirectRateLimiter,
}

impl HttpSemanticMatcher {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        requests_per_minute: u32,
    ) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            rate_limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        })
    }
}

#[async_trait]
impl SemanticMatcher for HttpSemanticMatcher {
    async fn match_material(&self, request: &SemanticMatchRequest) -> Result<SemanticDecision, AiError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.2,
            response_format: json!({ "type": "json_object" }),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(build_user_prompt(request)),
                },
            ],
        };

        debug!(
            candidate = %request.descriptor.candidate_name,
            textures = request.context.textures.len(),
            "Requesting semantic match"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AiError::EmptyResponse)?;

        parse_decision(&content)
    }
}
