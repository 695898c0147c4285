use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use tutor_core::model::{Conversation, Persona, Speaker};
use tutor_core::protocol::{CORRECTION_OPEN, LANGUAGE_SEPARATOR};

use crate::error::DialogueError;
use crate::generation::GeneratorConfig;

//
// ─── SERVICE SEAM ──────────────────────────────────────────────────────────────
//

/// External dialogue generation service.
///
/// Receives a read-only view of the conversation (ending with the user's
/// newest utterance) and returns one raw reply honoring the tutor response
/// protocol.
#[async_trait]
pub trait DialogueGenerator: Send + Sync {
    /// Produces the persona's next reply.
    ///
    /// # Errors
    ///
    /// Returns `DialogueError` when the service is disabled or the round-trip
    /// fails.
    async fn reply(&self, conversation: &Conversation) -> Result<String, DialogueError>;
}

//
// ─── HTTP IMPLEMENTATION ───────────────────────────────────────────────────────
//

/// Chat-completions-backed dialogue generator.
#[derive(Clone)]
pub struct HttpDialogueGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl HttpDialogueGenerator {
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

    fn system_instruction(persona: &Persona) -> String {
        format!(
            "{}\n\n\
             Formato della risposta: prima la battuta in francese, poi '{separator}', \
             poi una breve spiegazione in italiano. Le didascalie vanno tra asterischi \
             (*così*). Se l'utente ha fatto un errore di grammatica, inizia con \
             '{open} frase corretta. spiegazione]' prima del resto.",
            persona.system_instruction(),
            separator = LANGUAGE_SEPARATOR,
            open = CORRECTION_OPEN,
        )
    }

    fn build_messages(conversation: &Conversation) -> Vec<ChatMessage> {
        let persona = Persona::for_topic(conversation.topic());
        let mut messages = vec![ChatMessage {
            role: "system",
            content: Self::system_instruction(persona),
        }];
        for turn in conversation.turns() {
            let role = match turn.speaker() {
                Speaker::User => "user",
                Speaker::Persona => "assistant",
            };
            messages.push(ChatMessage {
                role,
                // Multi-line utterances confuse turn boundaries in the prompt.
                content: turn.text().replace('\n', " "),
            });
        }
        messages
    }
}

#[async_trait]
impl DialogueGenerator for HttpDialogueGenerator {
    async fn reply(&self, conversation: &Conversation) -> Result<String, DialogueError> {
        let config = self.config.as_ref().ok_or(DialogueError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: Self::build_messages(conversation),
            temperature: 0.8,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DialogueError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(DialogueError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
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

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::model::{ConversationTurn, TopicId};
    use tutor_core::time::fixed_now;

    #[test]
    fn messages_start_with_system_and_follow_history() {
        let now = fixed_now();
        let mut convo = Conversation::new(TopicId::Imperatif);
        convo.push(ConversationTurn::persona("Garde-à-vous!", None, now));
        convo.push(ConversationTurn::user("Mange!\nTout de suite!", now));

        let messages = HttpDialogueGenerator::build_messages(&convo);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("sergente"));
        assert!(messages[0].content.contains(LANGUAGE_SEPARATOR));
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].role, "user");
        assert_eq!(messages[2].content, "Mange! Tout de suite!");
    }

    #[test]
    fn generator_without_config_is_disabled() {
        assert!(!HttpDialogueGenerator::new(None).enabled());
    }
}
