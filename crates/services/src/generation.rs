use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use tutor_core::model::{ExamplePair, ProficiencyLevel, Question, QuestionKind, TopicId};

use crate::error::GenerationError;

//
// ─── SERVICE SEAM ──────────────────────────────────────────────────────────────
//

/// External question generation service.
///
/// The engine only cares about the contract: topic, level, and count in,
/// structurally valid questions out. Implementations may be rule engines,
/// databases, or generative models.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generates up to `count` questions for the topic at the given level.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the service is disabled or the
    /// round-trip fails. An empty `Ok` result is valid and means the attempt
    /// failed softly.
    async fn generate(
        &self,
        topic: TopicId,
        level: ProficiencyLevel,
        count: usize,
    ) -> Result<Vec<Question>, GenerationError>;
}

//
// ─── HTTP IMPLEMENTATION ───────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeneratorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("TUTOR_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("TUTOR_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("TUTOR_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Chat-completions-backed question generator.
#[derive(Clone)]
pub struct HttpQuestionGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl HttpQuestionGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn build_prompt(topic: TopicId, level: ProficiencyLevel, count: usize) -> String {
        format!(
            "Generate {count} multiple-choice or cloze questions about {context}.\n\
             Difficulty: {level}.\n\
             The user is an Italian speaker learning French.\n\
             Questions/prompts should be in Italian (asking to translate or fill in the \
             blank), but options/answers in French. Cloze prompts mark the blank with \
             '_______'.\n\
             Output strictly a JSON array of objects with keys: kind (\"multiple_choice\" \
             or \"cloze\"), question, options (4 unique strings), correctAnswer (one of \
             options), explanation (Italian), exampleSentence {{french, italian}}. \
             No prose around the JSON.",
            context = topic.generation_context(),
            level = level.label(),
        )
    }
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(
        &self,
        topic: TopicId,
        level: ProficiencyLevel,
        count: usize,
    ) -> Result<Vec<Question>, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: Self::build_prompt(topic, level, count),
            }],
            temperature: 0.7,
        };

        tracing::debug!(topic = %topic, level = level.code(), count, "requesting questions");

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResponse)?;

        let records: Vec<QuestionRecord> = serde_json::from_str(strip_code_fence(&content))?;
        Ok(into_questions(records))
    }
}

/// Models wrap JSON in markdown fences often enough to be worth handling.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Validates records into domain questions, dropping structurally broken ones.
fn into_questions(records: Vec<QuestionRecord>) -> Vec<Question> {
    records
        .into_iter()
        .filter_map(|record| {
            let kind = record.kind.unwrap_or(QuestionKind::MultipleChoice);
            let example = record.example_sentence.map_or_else(
                || ExamplePair {
                    target: record.correct_answer.clone(),
                    native: String::new(),
                },
                |pair| ExamplePair {
                    target: pair.french,
                    native: pair.italian,
                },
            );
            Question::new(
                kind,
                record.question,
                record.options,
                record.correct_answer,
                record.explanation,
                example,
            )
            .map_err(|err| tracing::warn!(%err, "dropping invalid generated question"))
            .ok()
        })
        .collect()
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    #[serde(default)]
    kind: Option<QuestionKind>,
    question: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
    #[serde(default)]
    example_sentence: Option<ExampleRecord>,
}

#[derive(Debug, Deserialize)]
struct ExampleRecord {
    french: String,
    italian: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_code_fence_handles_fenced_and_bare_json() {
        assert_eq!(strip_code_fence("[1]"), "[1]");
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
    }

    #[test]
    fn records_map_into_validated_questions() {
        let json = r#"[
            {
                "question": "Come si dice 'La guardo'?",
                "options": ["Je la regarde", "Je regarde la", "La je regarde", "Regarde je la"],
                "correctAnswer": "Je la regarde",
                "explanation": "Il pronome COD va prima del verbo.",
                "exampleSentence": {"french": "Je la regarde.", "italian": "La guardo."}
            },
            {
                "kind": "cloze",
                "question": "Je _______ regarde.",
                "options": ["la", "le", "les", "l'"],
                "correctAnswer": "la",
                "explanation": "Femminile singolare.",
                "exampleSentence": {"french": "Je la regarde.", "italian": "La guardo."}
            }
        ]"#;
        let records: Vec<QuestionRecord> = serde_json::from_str(json).unwrap();
        let questions = into_questions(records);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].kind(), QuestionKind::MultipleChoice);
        assert_eq!(questions[1].kind(), QuestionKind::Cloze);
        assert!(questions[1].is_correct("la"));
    }

    #[test]
    fn broken_records_are_dropped_not_fatal() {
        let json = r#"[
            {
                "question": "Ok?",
                "options": ["a", "b", "c", "d"],
                "correctAnswer": "a",
                "explanation": ""
            },
            {
                "question": "Bad",
                "options": ["a", "b"],
                "correctAnswer": "z",
                "explanation": ""
            }
        ]"#;
        let records: Vec<QuestionRecord> = serde_json::from_str(json).unwrap();
        let questions = into_questions(records);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt(), "Ok?");
    }

    #[test]
    fn generator_without_config_is_disabled() {
        let generator = HttpQuestionGenerator::new(None);
        assert!(!generator.enabled());
    }
}
