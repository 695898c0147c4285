use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::TopicId;

//
// ─── TURNS ─────────────────────────────────────────────────────────────────────
//

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Persona,
}

/// A grammar correction extracted from a tutor reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub corrected_sentence: String,
    pub explanation: String,
}

/// One utterance in a roleplay conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    speaker: Speaker,
    text: String,
    correction: Option<Correction>,
    at: DateTime<Utc>,
}

impl ConversationTurn {
    #[must_use]
    pub fn user(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            correction: None,
            at,
        }
    }

    #[must_use]
    pub fn persona(
        text: impl Into<String>,
        correction: Option<Correction>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            speaker: Speaker::Persona,
            text: text.into(),
            correction,
            at,
        }
    }

    #[must_use]
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correction(&self) -> Option<&Correction> {
        self.correction.as_ref()
    }

    #[must_use]
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }
}

//
// ─── CONVERSATION ──────────────────────────────────────────────────────────────
//

/// Append-only history of one roleplay session.
///
/// The roleplay workflow owns the only mutable handle; the dialogue
/// generation service sees it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    topic: TopicId,
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    /// Opens an empty conversation for a topic.
    #[must_use]
    pub fn new(topic: TopicId) -> Self {
        Self {
            topic,
            turns: Vec::new(),
        }
    }

    #[must_use]
    pub fn topic(&self) -> TopicId {
        self.topic
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Appends a turn to the history.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
