//! Shared error types for the services crate.
//!
//! Every external-service failure is converted to one of these at the
//! boundary; no raw transport error reaches a state-machine transition.

use thiserror::Error;

/// Errors emitted by the question generation service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("generation service is not configured")]
    Disabled,
    #[error("generation service returned an empty response")]
    EmptyResponse,
    #[error("generation service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("generation service returned an unparsable payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the dialogue generation service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DialogueError {
    #[error("dialogue service is not configured")]
    Disabled,
    #[error("dialogue service returned an empty response")]
    EmptyResponse,
    #[error("dialogue service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the quiz session state machine and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("session can only be configured during setup")]
    NotInSetup,
    #[error("session is not playing")]
    NotPlaying,
    #[error("current question has not been answered yet")]
    CurrentUnanswered,
    #[error("generation service yielded no usable questions")]
    NoQuestions,
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Classified speech input/output failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("no speech detected")]
    NoSpeech,
    #[error("speech recognition is not supported on this platform")]
    Unsupported,
    #[error("speech failed: {0}")]
    Other(String),
}

/// Errors emitted by the roleplay workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RoleplayError {
    #[error("utterance is empty")]
    EmptyUtterance,
    #[error(transparent)]
    Speech(#[from] SpeechError),
}
