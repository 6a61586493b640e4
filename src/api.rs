use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const API_BASE: &str = "https://api.hyperbolic.xyz";

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct";
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.9;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<Message<'a>>,
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Per-question result. Failures are reported to the user and never
/// abort the surrounding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { content: String },
    Failure { message: String },
}

pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Sends one question as a single user message. One attempt, no retry.
    pub async fn ask(&self, question: &str) -> Outcome {
        match self.send(question).await {
            Ok(content) => Outcome::Success { content },
            Err(err) => Outcome::Failure {
                message: format!("{err:#}"),
            },
        }
    }

    async fn send(&self, question: &str) -> Result<String> {
        let body = ChatRequest {
            messages: vec![Message {
                role: "user",
                content: question,
            }],
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        let response = self
            .http
            .post(format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            );
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Malformed completion response")?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .context("Completion response contained no choices")?;

        Ok(choice.message.content)
    }
}
