use std::sync::Arc;

use rand::seq::IndexedRandom;

use tutor_core::Clock;
use tutor_core::model::{Conversation, ConversationTurn, Persona, TopicId};
use tutor_core::protocol::{self, CORRECTION_OPEN, SegmentLanguage, SpeechSegment};

use crate::dialogue::DialogueGenerator;
use crate::error::{RoleplayError, SpeechError};
use crate::speech::{SpeechInput, SpeechSequencer};

/// Spoken when the dialogue service fails mid-conversation. The persona
/// stays in character and the learner can simply try again.
const FAULT_REPLY: &str = "Désolé, je suis fatigué. (Erreur API)";

/// Conversation workflow for one roleplay session.
///
/// Owns the conversation history; the dialogue generator sees it read-only.
/// Every persona turn is parsed through the reply protocol and handed to the
/// speech sequencer, so there is exactly one place where raw model output
/// enters the system.
pub struct RoleplayService {
    clock: Clock,
    dialogue: Arc<dyn DialogueGenerator>,
    sequencer: SpeechSequencer,
    input: Option<Arc<dyn SpeechInput>>,
    conversation: Conversation,
}

impl RoleplayService {
    /// Opens a conversation on the topic: seeds the history with one of the
    /// persona's scripted openers and speaks it.
    #[must_use]
    pub fn open(
        topic: TopicId,
        dialogue: Arc<dyn DialogueGenerator>,
        sequencer: SpeechSequencer,
        clock: Clock,
    ) -> Self {
        let persona = Persona::for_topic(topic);
        let opener = persona
            .openers()
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default();

        let mut conversation = Conversation::new(topic);
        conversation.push(ConversationTurn::persona(opener, None, clock.now()));

        let service = Self {
            clock,
            dialogue,
            sequencer,
            input: None,
            conversation,
        };
        service.sequencer.speak(&[SpeechSegment {
            text: opener.to_string(),
            language: SegmentLanguage::Target,
        }]);
        service
    }

    #[must_use]
    pub fn with_input(mut self, input: Arc<dyn SpeechInput>) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub fn persona(&self) -> &'static Persona {
        Persona::for_topic(self.conversation.topic())
    }

    /// Sends the learner's utterance and appends the persona's reply.
    ///
    /// A dialogue service failure is not fatal: the persona answers with a
    /// scripted in-character apology and the conversation stays open.
    ///
    /// # Errors
    ///
    /// Returns `RoleplayError::EmptyUtterance` for blank input.
    pub async fn submit(&mut self, utterance: &str) -> Result<(), RoleplayError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(RoleplayError::EmptyUtterance);
        }

        self.conversation
            .push(ConversationTurn::user(utterance, self.clock.now()));

        let raw = match self.dialogue.reply(&self.conversation).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "dialogue service failed, answering in character");
                self.conversation.push(ConversationTurn::persona(
                    FAULT_REPLY,
                    None,
                    self.clock.now(),
                ));
                self.sequencer.speak(&[SpeechSegment {
                    text: FAULT_REPLY.to_string(),
                    language: SegmentLanguage::Target,
                }]);
                return Ok(());
            }
        };

        let parsed = protocol::parse(&raw);
        if raw.contains(CORRECTION_OPEN) && parsed.correction.is_none() {
            tracing::warn!("reply contains an unterminated correction block");
        }

        self.conversation.push(ConversationTurn::persona(
            parsed.display_text,
            parsed.correction,
            self.clock.now(),
        ));
        self.sequencer.speak(&parsed.segments);
        Ok(())
    }

    /// Listens once for a spoken utterance in the target language.
    ///
    /// Playback is cancelled first so the microphone never picks up the
    /// persona's own voice.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Unsupported` when no speech input facility is
    /// configured, otherwise the facility's classified error.
    pub async fn listen(&self) -> Result<String, RoleplayError> {
        let input = self
            .input
            .as_ref()
            .ok_or(RoleplayError::Speech(SpeechError::Unsupported))?;

        self.sequencer.cancel();
        let tag = self.sequencer.settings().target_tag.clone();
        Ok(input.listen(&tag).await?)
    }

    /// Stops any in-flight speech.
    pub fn stop_speaking(&self) {
        self.sequencer.cancel();
    }
}
