//! OpenAI-backed claim analysis.
//!
//! Sends the claim and the ranked evidence to a chat model and asks for a
//! JSON judgment. The reply is parsed into an [`Analysis`] with every score
//! clamped to 0.0-1.0.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{read_body, truncate_chars, Analyst};
use crate::error::{SourceError, SourceResult};
use crate::security::Credential;
use crate::types::claim::Claim;
use crate::types::evidence::ScoredEvidence;
use crate::types::verdict::{dedupe_strings, Analysis};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_EVIDENCE_CHARS: usize = 600;

const SYSTEM_PROMPT: &str = "You are a careful fact-checker. Judge the claim using only the \
evidence provided. Respond with a JSON object with these fields: \
\"accuracy\" (0.0-1.0, how likely the claim is true), \
\"confidence\" (0.0-1.0, how sure you are of that figure), \
\"issues\" (array of short strings describing problems with the claim), \
\"suggestions\" (array of short strings describing how to correct or verify it), \
\"explanation\" (one or two sentences). \
If the evidence does not address the claim, say so and keep confidence low.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Loosely typed model reply; models sometimes return numbers as strings.
#[derive(Deserialize)]
struct RawAnalysis {
    accuracy: serde_json::Value,
    confidence: serde_json::Value,
    #[serde(default)]
    issues: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    explanation: String,
}

/// Analyst backed by an OpenAI chat model.
pub struct OpenAiAnalyst {
    client: reqwest::Client,
    api_key: Credential,
    model: String,
    base_url: String,
}

impl OpenAiAnalyst {
    pub fn new(api_key: Credential) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Analyst for OpenAiAnalyst {
    async fn analyze(&self, claim: &Claim, evidence: &[ScoredEvidence]) -> SourceResult<Analysis> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(claim, evidence),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let chat: ChatResponse = serde_json::from_str(&read_body(response).await?)?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SourceError::MalformedResponse("no choices in completion".into()))?;

        parse_analysis(&content)
    }
}

/// User message listing the claim and numbered evidence.
pub(crate) fn build_prompt(claim: &Claim, evidence: &[ScoredEvidence]) -> String {
    let mut prompt = format!("Claim: {}\n", claim.text);
    if !claim.originating_context.trim().is_empty() {
        prompt.push_str(&format!("Context: {}\n", claim.originating_context.trim()));
    }

    if evidence.is_empty() {
        prompt.push_str("\nNo evidence was found.\n");
        return prompt;
    }

    prompt.push_str("\nEvidence:\n");
    for (i, item) in evidence.iter().enumerate() {
        let ev = &item.evidence;
        prompt.push_str(&format!(
            "{}. [{} | credibility {:.2}] {}\n   {}\n",
            i + 1,
            if ev.domain.is_empty() { ev.source.id() } else { ev.domain.as_str() },
            ev.credibility_weight,
            ev.title,
            truncate_chars(&ev.content, MAX_EVIDENCE_CHARS),
        ));
    }
    prompt
}

fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

fn unit_score(value: &serde_json::Value, field: &str) -> SourceResult<f32> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| SourceError::MalformedResponse(format!("{} is not a number", field)))?;

    Ok((number as f32).clamp(0.0, 1.0))
}

/// Parse a model reply into an [`Analysis`].
pub(crate) fn parse_analysis(content: &str) -> SourceResult<Analysis> {
    let raw: RawAnalysis = serde_json::from_str(strip_code_blocks(content))?;

    let clean = |items: Vec<String>| {
        dedupe_strings(
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    };

    Ok(Analysis {
        accuracy: unit_score(&raw.accuracy, "accuracy")?,
        confidence: unit_score(&raw.confidence, "confidence")?,
        issues: clean(raw.issues),
        suggestions: clean(raw.suggestions),
        explanation: raw.explanation.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceKind;
    use crate::types::claim::Category;
    use crate::types::evidence::EvidenceResult;

    #[test]
    fn test_parse_plain_json() {
        let analysis = parse_analysis(
            r#"{"accuracy":0.9,"confidence":0.8,"issues":[],"suggestions":["Cite the founding charter"],"explanation":"Matches the encyclopedia."}"#,
        )
        .unwrap();
        assert_eq!(analysis.accuracy, 0.9);
        assert_eq!(analysis.confidence, 0.8);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.suggestions, vec!["Cite the founding charter"]);
    }

    #[test]
    fn test_parse_fenced_and_clamped() {
        let content = "```json\n{\"accuracy\": 1.7, \"confidence\": \"0.4\", \"issues\": [\"Overstated\", \" Overstated \", \"\"]}\n```";
        let analysis = parse_analysis(content).unwrap();
        assert_eq!(analysis.accuracy, 1.0);
        assert_eq!(analysis.confidence, 0.4);
        assert_eq!(analysis.issues, vec!["Overstated"]);
        assert_eq!(analysis.explanation, "");
    }

    #[test]
    fn test_parse_rejects_non_numeric_scores() {
        let result = parse_analysis(r#"{"accuracy":"high","confidence":0.5}"#);
        assert!(matches!(result, Err(SourceError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_analysis("The claim seems true."),
            Err(SourceError::Json(_))
        ));
    }

    #[test]
    fn test_prompt_lists_evidence() {
        let claim = Claim::new(
            "Stanford University was founded in 1885",
            Category::Institutional,
            "University history page",
        );
        let evidence = vec![ScoredEvidence::new(
            EvidenceResult::from_url(
                SourceKind::Encyclopedia,
                "Stanford University",
                "https://en.wikipedia.org/wiki/Stanford_University",
                "It was founded in 1885 by Leland and Jane Stanford.",
            ),
            1.0,
        )];

        let prompt = build_prompt(&claim, &evidence);
        assert!(prompt.starts_with("Claim: Stanford University was founded in 1885\n"));
        assert!(prompt.contains("Context: University history page"));
        assert!(prompt.contains("1. [en.wikipedia.org | credibility 0.80] Stanford University"));
    }

    #[test]
    fn test_prompt_without_evidence() {
        let claim = Claim::new("x y z", Category::General, "");
        assert!(build_prompt(&claim, &[]).contains("No evidence was found."));
    }
}
