use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::AiConfig;

/// Maximum length for upstream response bodies kept in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

const CHAT_SYSTEM_PROMPT: &str = "أنت مساعد ودود لمنصة الرحلة التعليمية للأطفال. \
تساعد الأهالي في اختيار القصص المخصصة وباقات الكتابة الإبداعية والاشتراكات. \
أجب باللغة العربية بإيجاز، واقترح حتى ثلاثة ردود سريعة يمكن للمستخدم اختيارها.";

const STORY_IDEAS_SYSTEM_PROMPT: &str = "أنت كاتب قصص أطفال تربوي. \
اقترح أفكار قصص قصيرة مناسبة لعمر الطفل، لكل فكرة عنوان وهدف تربوي وملخص من جملتين.";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Story assistant is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Upstream returned no content")]
    EmptyResponse,

    #[error("Failed to parse upstream response: {0}")]
    Parse(String),
}

impl AiError {
    /// Short description that is safe to hand back to clients.
    pub fn public_details(&self) -> &'static str {
        match self {
            AiError::NotConfigured(_) => "assistant not configured",
            AiError::InvalidRequest(_) => "invalid request",
            AiError::Http(_) => "upstream unreachable",
            AiError::Upstream { .. } => "upstream error",
            AiError::EmptyResponse => "empty upstream response",
            AiError::Parse(_) => "malformed upstream response",
        }
    }

    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub context: Option<String>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<&[ChatMessage], AiError> {
        match self.messages.as_deref() {
            Some(messages) if !messages.is_empty() => Ok(messages),
            _ => Err(AiError::InvalidRequest("messages is required".to_string())),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoryIdeasRequest {
    #[serde(default)]
    pub child_name: Option<String>,
    #[serde(default)]
    pub child_age: Option<u32>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl StoryIdeasRequest {
    pub fn validate(&self) -> Result<(), AiError> {
        let mut missing = Vec::new();
        if self.child_name.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("childName");
        }
        if self.child_age.is_none() {
            missing.push("childAge");
        }
        if self.theme.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("theme");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AiError::InvalidRequest(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    fn prompt(&self) -> String {
        format!(
            "اسم الطفل: {}\nالعمر: {}\nالموضوع: {}\nلغة القصة: {}\nاقترح ثلاث أفكار.",
            self.child_name.as_deref().unwrap_or_default().trim(),
            self.child_age.unwrap_or_default(),
            self.theme.as_deref().unwrap_or_default().trim(),
            self.language.as_deref().unwrap_or("العربية"),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoryIdea {
    pub title: String,
    pub goal: String,
    pub summary: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoryIdeas {
    pub ideas: Vec<StoryIdea>,
}

/// The generative backend behind `/api/chat` and `/api/generateStoryIdeas`.
#[async_trait]
pub trait StoryAssistant: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AiError>;
    async fn story_ideas(&self, request: &StoryIdeasRequest) -> Result<StoryIdeas, AiError>;

    /// Whether the backend can be called at all.
    fn is_configured(&self) -> bool {
        true
    }
}

// Wire types for the Generative Language `generateContent` call

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiService {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }

    async fn generate<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        contents: Vec<Content>,
        response_schema: Value,
    ) -> Result<T, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;

        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };

        log::debug!("Calling {} with model {}", self.api_base, self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiError::Upstream {
                status: status.as_u16(),
                body: AiError::truncate_body(&error_text),
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        Self::extract_json(body)
    }

    fn extract_json<T: DeserializeOwned>(body: GenerateContentResponse) -> Result<T, AiError> {
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }

        serde_json::from_str(text.trim()).map_err(|e| AiError::Parse(e.to_string()))
    }

    fn chat_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "reply": { "type": "STRING" },
                "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["reply"]
        })
    }

    fn story_ideas_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "ideas": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "goal": { "type": "STRING" },
                            "summary": { "type": "STRING" }
                        },
                        "required": ["title", "goal", "summary"]
                    }
                }
            },
            "required": ["ideas"]
        })
    }
}

#[async_trait]
impl StoryAssistant for GeminiService {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AiError> {
        let messages = request.validate()?;

        let mut system_prompt = CHAT_SYSTEM_PROMPT.to_string();
        if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
            system_prompt.push_str("\n\n");
            system_prompt.push_str(context.trim());
        }

        let contents = messages
            .iter()
            .map(|message| Content {
                role: Some(match message.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                }),
                parts: vec![Part {
                    text: message.text.clone(),
                }],
            })
            .collect();

        self.generate(&system_prompt, contents, Self::chat_schema())
            .await
    }

    async fn story_ideas(&self, request: &StoryIdeasRequest) -> Result<StoryIdeas, AiError> {
        request.validate()?;

        let contents = vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: request.prompt(),
            }],
        }];

        self.generate(STORY_IDEAS_SYSTEM_PROMPT, contents, Self::story_ideas_schema())
            .await
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
